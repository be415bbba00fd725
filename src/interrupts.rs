//! Renders the interrupt flag, enable and priority registers as a table

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Write};

use crate::{Device, console};

/// Banks shown side by side in one group of rows
pub const BANKS_PER_GROUP: usize = 4;

/// Priority registers per flag bank: four bits of priority per interrupt
pub const PRIORITY_WORDS_PER_BANK: usize = 4;

/// Width of one bank's column, including the gap after it
const COLUMN_WIDTH: usize = 19;

/// Longest bank label we can build
const LABEL_CAPACITY: usize = 32;

/// One flag bank, with the enable and priority registers that go with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptBank {
    /// Which `IFSx`/`IECx` this is
    pub index: usize,
    /// `IFSx`
    pub flag: u16,
    /// `IECx`
    pub enable: u16,
    /// `IPC(4x)` to `IPC(4x+3)`, lowest first
    pub priority: [u16; PRIORITY_WORDS_PER_BANK],
}

impl InterruptBank {
    /// Read bank `index` from the device
    pub fn read<D: Device>(device: &mut D, index: usize) -> InterruptBank {
        let symbols = device.symbols();
        let (ifs0, iec0, ipc0) = (symbols.ifs0, symbols.iec0, symbols.ipc0);
        let offset = (index * 2) as u16;
        let mut priority = [0u16; PRIORITY_WORDS_PER_BANK];
        for (word, ipc) in priority.iter_mut().enumerate() {
            let ipc_offset = ((index * PRIORITY_WORDS_PER_BANK + word) * 2) as u16;
            *ipc = device.read_word(ipc0.wrapping_add(ipc_offset));
        }
        InterruptBank {
            index,
            flag: device.read_word(ifs0.wrapping_add(offset)),
            enable: device.read_word(iec0.wrapping_add(offset)),
            priority,
        }
    }

    /// Interrupts that are both flagged and enabled
    pub const fn pending(&self) -> u16 {
        self.flag & self.enable
    }
}

/// How many flag banks this part has.
///
/// The enable registers sit straight after the flag registers, so the gap
/// between `IFS0` and `IEC0` tells us.
pub fn bank_count<D: Device>(device: &D) -> usize {
    let symbols = device.symbols();
    usize::from(symbols.iec0.saturating_sub(symbols.ifs0)) / 2
}

/// Write out the whole interrupt table
pub fn render<D: Device, W: Write>(out: &mut W, device: &mut D) -> fmt::Result {
    out.write_str("\n\nInterrupt SFRs (red indicates flag and enable set):")?;
    let count = bank_count(device);
    let mut group = [InterruptBank::default(); BANKS_PER_GROUP];
    for first in (0..count).step_by(BANKS_PER_GROUP) {
        let len = BANKS_PER_GROUP.min(count - first);
        for (offset, bank) in group[..len].iter_mut().enumerate() {
            *bank = InterruptBank::read(device, first + offset);
        }
        render_group(out, &group[..len])?;
    }
    Ok(())
}

/// Write out one group of banks, highest bank on the left.
///
/// ```text
///
///        IFS3/IEC3/IPC12    IFS2/IEC2/IPC8     IFS1/IEC1/IPC4     IFS0/IEC0/IPC0
///   IFS  0000000000000000   0000000000000000   0000000000000000   0000000000010000
///   IEC  0000000000000000   0000000000000000   0000000000000000   0000000000011000
///   IPC  4444444444444444   4444444444444444   4444444444444444   4444444444444444
/// ```
pub fn render_group<W: Write>(out: &mut W, banks: &[InterruptBank]) -> fmt::Result {
    out.write_str("\n\n       ")?;
    for (column, bank) in banks.iter().rev().enumerate() {
        let mut label: heapless::String<LABEL_CAPACITY> = heapless::String::new();
        write!(
            label,
            "IFS{}/IEC{}/IPC{}",
            bank.index,
            bank.index,
            bank.index * PRIORITY_WORDS_PER_BANK
        )?;
        if column + 1 < banks.len() {
            write!(out, "{:<width$}", label.as_str(), width = COLUMN_WIDTH)?;
        } else {
            out.write_str(&label)?;
        }
    }

    out.write_str("\n  IFS  ")?;
    write_columns(out, banks, |out, bank| {
        let pending = bank.pending();
        for bit in (0..16).rev() {
            let mask = 1 << bit;
            if bank.flag & mask == 0 {
                out.write_char('0')?;
            } else if pending & mask != 0 {
                write!(out, "{}1{}", console::RED, console::RESET)?;
            } else {
                out.write_char('1')?;
            }
        }
        Ok(())
    })?;

    out.write_str("\n  IEC  ")?;
    write_columns(out, banks, |out, bank| {
        for bit in (0..16).rev() {
            out.write_char(if bank.enable & (1 << bit) != 0 { '1' } else { '0' })?;
        }
        Ok(())
    })?;

    out.write_str("\n  IPC  ")?;
    write_columns(out, banks, |out, bank| {
        for word in bank.priority.iter().rev() {
            write!(out, "{:04X}", word)?;
        }
        Ok(())
    })?;

    out.write_str("\n")
}

/// Run `column` for each bank, highest first, with gaps in between
fn write_columns<W, F>(out: &mut W, banks: &[InterruptBank], mut column: F) -> fmt::Result
where
    W: Write,
    F: FnMut(&mut W, &InterruptBank) -> fmt::Result,
{
    for (idx, bank) in banks.iter().rev().enumerate() {
        column(out, bank)?;
        if idx + 1 < banks.len() {
            out.write_str("   ")?;
        }
    }
    Ok(())
}


// End of File
