//! Hex dumps of RAM and flash

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Write};

use crate::Device;

/// Bytes of RAM per row
pub const RAM_BYTES_PER_ROW: usize = 16;

/// Instruction words of flash per row. Each word covers two addresses.
pub const FLASH_WORDS_PER_ROW: usize = 8;

/// A block of memory to dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemorySpan {
    /// First address
    pub base: u32,
    /// Length, in bytes for RAM or in program addresses for flash
    pub len: u32,
}

impl MemorySpan {
    /// The span from `start` up to (but not including) `end`.
    ///
    /// Empty if `end` is below `start`.
    pub const fn between(start: u32, end: u32) -> MemorySpan {
        MemorySpan {
            base: start,
            len: end.saturating_sub(start),
        }
    }

    /// One past the last address
    pub const fn end(&self) -> u32 {
        self.base.saturating_add(self.len)
    }
}

/// Dump a span of data space
pub fn dump_ram<D: Device, W: Write>(out: &mut W, device: &mut D, span: MemorySpan) -> fmt::Result {
    let mut buf = [0u8; RAM_BYTES_PER_ROW];
    let mut address = span.base;
    while address < span.end() {
        let len = RAM_BYTES_PER_ROW.min((span.end() - address) as usize);
        let row = &mut buf[..len];
        device.read_data(address as u16, row);
        write_ram_row(out, address, row)?;
        address += len as u32;
    }
    Ok(())
}

/// Dump a span of program memory
pub fn dump_flash<D: Device, W: Write>(
    out: &mut W,
    device: &mut D,
    span: MemorySpan,
) -> fmt::Result {
    let mut buf = [0u32; FLASH_WORDS_PER_ROW];
    let mut address = span.base;
    while address < span.end() {
        let words = FLASH_WORDS_PER_ROW.min(((span.end() - address) as usize).div_ceil(2));
        let row = &mut buf[..words];
        device.read_program(address, row);
        write_flash_row(out, address, row)?;
        address += (words * 2) as u32;
    }
    Ok(())
}

/// One row of RAM
///
/// ```text
///   1000: 00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F
/// ```
pub fn write_ram_row<W: Write>(out: &mut W, address: u32, bytes: &[u8]) -> fmt::Result {
    write!(out, "\n  {:04X}:", address)?;
    for byte in bytes {
        write!(out, " {:02X}", byte)?;
    }
    Ok(())
}

/// One row of flash
///
/// ```text
///   000000: 040200 000000 0002A6 0002A6 0002A6 0002A6 0002A6 0002A6
/// ```
pub fn write_flash_row<W: Write>(out: &mut W, address: u32, words: &[u32]) -> fmt::Result {
    write!(out, "\n  {:06X}:", address)?;
    for word in words {
        write!(out, " {:06X}", word & 0x00FF_FFFF)?;
    }
    Ok(())
}


// End of File
