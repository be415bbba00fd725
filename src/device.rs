//! Holds the [`Device`] and [`CpuState`] traits, and the [`Symbols`] table

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::register::{BitNames, INTCON1_BITS, RCON_BITS, SR_BITS};

/// Addresses of the DSP engine registers, on parts that have one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DspSymbols {
    /// `ACCAL`, followed by `ACCAH` and `ACCAU`
    pub acca: u16,
    /// `ACCBL`, followed by `ACCBH` and `ACCBU`
    pub accb: u16,
    /// `DCOUNT`
    pub dcount: u16,
    /// `DOSTARTL`, followed by `DOSTARTH`
    pub dostart: u16,
    /// `DOENDL`, followed by `DOENDH`
    pub doend: u16,
}

/// The data-space addresses of everything the trap report looks at.
///
/// Anything wrapped in an [`Option`] is not implemented on every part. The
/// board layer fills this in once, from its linker symbols, and a `None`
/// simply drops the matching lines from the report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Symbols {
    pub sr: u16,
    pub corcon: u16,
    pub rcon: u16,
    pub intcon1: u16,
    pub splim: u16,
    pub tblpag: u16,
    pub disicnt: u16,
    /// Program space visibility page, on parts without `DSRPAG`
    pub psvpag: Option<u16>,
    /// Data space read page
    pub dsrpag: Option<u16>,
    /// Data space write page. Only ever present alongside `DSRPAG`.
    pub dswpag: Option<u16>,
    pub dsp: Option<DspSymbols>,
    pub ctxtstat: Option<u16>,
    /// First interrupt flag register
    pub ifs0: u16,
    /// First interrupt enable register. The distance from `IFS0` is the
    /// number of flag banks this part has.
    pub iec0: u16,
    /// First interrupt priority register
    pub ipc0: u16,
    /// `_DATA_BASE`, the bottom of ordinary RAM
    pub data_base: u16,
    /// `_SP_init`, the initial stack pointer
    pub sp_init: u16,
    /// Program memory addresses per flash erase sector
    pub addresses_per_sector: u32,
    /// Value of the `_DEBUG` symbol, if one was linked in
    pub debug: Option<u32>,
}

impl Symbols {
    /// Which page register name describes the captured page value
    pub fn page_register(&self) -> Option<PageRegister> {
        if self.dsrpag.is_some() {
            Some(PageRegister::Dsrpag)
        } else if self.psvpag.is_some() {
            Some(PageRegister::Psvpag)
        } else {
            None
        }
    }

    /// Is the image built for debugging?
    ///
    /// True only when `_DEBUG` was linked in and is non-zero.
    pub fn debug_mode(&self) -> bool {
        matches!(self.debug, Some(value) if value != 0)
    }

    /// Find the bit-name table for the SFR at the given address.
    ///
    /// This goes by address, so a RAM copy of (say) `SR` does not pick up the
    /// `SR` bit names.
    pub fn bit_names_for(&self, address: u16) -> Option<&'static BitNames> {
        if address == self.intcon1 {
            Some(&INTCON1_BITS)
        } else if address == self.rcon {
            Some(&RCON_BITS)
        } else if address == self.sr {
            Some(&SR_BITS)
        } else {
            None
        }
    }
}

/// The page register this part uses for data space access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageRegister {
    /// `PSVPAG`, found on older parts
    Psvpag,
    /// `DSRPAG` (and `DSWPAG`), found on parts with extended data space
    Dsrpag,
}

impl PageRegister {
    /// The name used in the trap report
    pub const fn name(self) -> &'static str {
        match self {
            PageRegister::Psvpag => "PSVPAG",
            PageRegister::Dsrpag => "DSRPAG",
        }
    }
}

/// Access to the memory of the faulting system
///
/// SFRs live in data space, so everything except program memory is read
/// through [`Device::read_data`].
pub trait Device {
    /// The symbol table for this part
    fn symbols(&self) -> &Symbols;

    /// Copy bytes out of data space, starting at `address`.
    ///
    /// This must be a plain copy, with no side effects on the memory being
    /// read.
    fn read_data(&mut self, address: u16, buf: &mut [u8]);

    /// Write one 16-bit word into data space
    fn write_data_word(&mut self, address: u16, value: u16);

    /// Read unpacked 24-bit instruction words from program memory, starting at
    /// `address`. Each word covers two program addresses.
    fn read_program(&mut self, address: u32, buf: &mut [u32]);

    /// Stop for the debugger
    fn software_breakpoint(&mut self);

    /// Read one 16-bit word from data space
    fn read_word(&mut self, address: u16) -> u16 {
        let mut buf = [0u8; 2];
        self.read_data(address, &mut buf);
        u16::from_le_bytes(buf)
    }

    /// Read one 32-bit long from data space
    fn read_long(&mut self, address: u16) -> u32 {
        let mut buf = [0u8; 4];
        self.read_data(address, &mut buf);
        u32::from_le_bytes(buf)
    }
}

/// Raw access to the CPU registers, for the trap entry sequence
///
/// # Safety
///
/// Implementations must hand back the register contents as they were when
/// the trap was taken. In practice this means the implementation is the
/// first thing that runs in the trap vector, before any compiler-generated
/// prologue.
pub unsafe trait CpuState {
    /// Read working register `W<index>`, where `index` is `0..16`
    fn working_register(&mut self, index: usize) -> u16;

    /// Read the `REPEAT` loop counter
    fn rcount(&mut self) -> u16;

    /// Write the `REPEAT` loop counter
    fn set_rcount(&mut self, value: u16);

    /// Read an SFR, such as `SR` or a page register
    fn sfr(&mut self, address: u16) -> u16;
}

// End of File
