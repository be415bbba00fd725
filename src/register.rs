//! Renders one register per line, with optional extra decodings

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Write};

bitflags::bitflags! {
    /// Extra ways to show a register value, alongside the hex
    ///
    /// All of these are ignored when the value is zero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FormatFlags: u16 {
        /// Show the sixteen bits, split into two bytes
        const BINARY = 0x0002;
        /// Show as a signed decimal
        const DECIMAL = 0x0004;
        /// Show as an unsigned decimal. With `DECIMAL` as well, a non-negative
        /// value is only shown once.
        const UNSIGNED = 0x0008;
    }
}

/// Names for the sixteen bits of a register. Index 0 is bit 0.
#[derive(Debug, PartialEq, Eq)]
pub struct BitNames(pub [&'static str; 16]);

/// Interrupt control register 1
pub static INTCON1_BITS: BitNames = BitNames([
    "", "OSCFAIL", "STKERR", "ADDRERR", "MATHERR", "DMACERR", "DIV0ERR", "SFTACERR", "COVTE",
    "OVBTE", "OVATE", "COVBERR", "COVAERR", "OVBERR", "OVAERR", "NSTDIS",
]);

/// Reset control register
pub static RCON_BITS: BitNames = BitNames([
    "POR",
    "BOR",
    "IDLE",
    "SLEEP",
    "WDTO",
    "SWDTEN",
    "SWR",
    "EXTR",
    "PMSLP/VREGS",
    "CM",
    "DPSLP",
    "VREGSF",
    "RETEN",
    "SBOREN",
    "IOPUWR",
    "TRAPR",
]);

/// CPU status register
pub static SR_BITS: BitNames = BitNames([
    "C", "Z", "OV", "N", "RA", "IPL[0]", "IPL[1]", "IPL[2]", "DC", "DA", "SAB", "OAB", "SB", "SA",
    "OB", "OA",
]);

/// Width of the name column, including the padding after the name
const NAME_WIDTH: usize = 9;

/// Describes one line of register output
#[derive(Debug, Clone, Copy)]
pub struct RegisterDescriptor<'a> {
    /// What to call it. If `None`, the address is shown instead.
    name: Option<&'a str>,
    /// Where the value was read from
    address: u16,
    /// The value read
    value: u16,
    flags: FormatFlags,
    bit_names: Option<&'static BitNames>,
}

impl<'a> RegisterDescriptor<'a> {
    /// Describe a named value
    ///
    /// Names of up to eight characters keep the columns lined up.
    pub const fn new(name: &'a str, address: u16, value: u16, flags: FormatFlags) -> Self {
        RegisterDescriptor {
            name: Some(name),
            address,
            value,
            flags,
            bit_names: None,
        }
    }

    /// Describe a value known only by its address
    pub const fn anonymous(address: u16, value: u16, flags: FormatFlags) -> Self {
        RegisterDescriptor {
            name: None,
            address,
            value,
            flags,
            bit_names: None,
        }
    }

    /// Attach a table of bit names, if there is one
    pub const fn with_bit_names(mut self, bit_names: Option<&'static BitNames>) -> Self {
        self.bit_names = bit_names;
        self
    }

    /// The value that will be shown
    pub const fn value(&self) -> u16 {
        self.value
    }

    /// Write this register out as one line, with a leading newline.
    ///
    /// ```text
    ///   CORCON   0x1234   00010010 00110100
    ///   w3       0xFFFF       -1   65535
    /// ```
    pub fn render<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self.name {
            Some(name) => write!(out, "\n  {:<width$}0x{:04X}", name, self.value, width = NAME_WIDTH)?,
            None => write!(out, "\n  {:04X}     0x{:04X}", self.address, self.value)?,
        }

        if self.value != 0 {
            if self.flags.contains(FormatFlags::BINARY) {
                out.write_str("   ")?;
                write_binary(out, self.value)?;
            }
            let signed = self.value as i16;
            if self.flags.contains(FormatFlags::DECIMAL)
                && (signed < 0 || !self.flags.contains(FormatFlags::UNSIGNED))
            {
                write!(out, "   {:6}", signed)?;
            }
            if self.flags.contains(FormatFlags::UNSIGNED) {
                write!(out, "   {:5}", self.value)?;
            }
        }

        if let Some(bit_names) = self.bit_names {
            write_bit_names(out, self.value, bit_names)?;
        }

        Ok(())
    }
}

/// Sixteen binary digits, with a gap between the bytes
fn write_binary<W: Write>(out: &mut W, value: u16) -> fmt::Result {
    for bit in (0..16).rev() {
        out.write_char(if value & (1 << bit) != 0 { '1' } else { '0' })?;
        if bit == 8 {
            out.write_char(' ')?;
        }
    }
    Ok(())
}

/// The names of the set bits, most significant first
fn write_bit_names<W: Write>(out: &mut W, value: u16, bit_names: &BitNames) -> fmt::Result {
    if value == 0 {
        return out.write_str(" {none}");
    }
    out.write_str(" {")?;
    let mut remaining = value;
    for bit in (0..16).rev() {
        let mask = 1 << bit;
        if remaining & mask != 0 {
            remaining ^= mask;
            out.write_str(bit_names.0[bit])?;
            if remaining != 0 {
                out.write_str(", ")?;
            }
        }
    }
    out.write_str("}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(desc: &RegisterDescriptor) -> String {
        let mut s = String::new();
        desc.render(&mut s).unwrap();
        s
    }

    const ALL: FormatFlags = FormatFlags::all();

    #[test]
    fn zero_only_shows_hex() {
        let desc = RegisterDescriptor::new("w0", 0x0000, 0x0000, ALL);
        assert_eq!(render(&desc), "\n  w0       0x0000");
    }

    #[test]
    fn zero_with_bit_names_says_none() {
        let desc = RegisterDescriptor::new("RCON", 0x0740, 0x0000, FormatFlags::BINARY)
            .with_bit_names(Some(&RCON_BITS));
        assert_eq!(render(&desc), "\n  RCON     0x0000 {none}");
    }

    #[test]
    fn binary_is_split_into_bytes() {
        let desc = RegisterDescriptor::new("CORCON", 0x0044, 0x1234, FormatFlags::BINARY);
        assert_eq!(render(&desc), "\n  CORCON   0x1234   00010010 00110100");
    }

    #[test]
    fn negative_shows_signed_once() {
        let desc = RegisterDescriptor::new(
            "w3",
            0x0006,
            0x8000,
            FormatFlags::DECIMAL | FormatFlags::UNSIGNED,
        );
        let line = render(&desc);
        assert_eq!(line, "\n  w3       0x8000   -32768   32768");
        assert_eq!(line.matches("-32768").count(), 1);
    }

    #[test]
    fn positive_decimal_and_unsigned_shows_one_number() {
        let desc = RegisterDescriptor::new(
            "w1",
            0x0002,
            0x0001,
            FormatFlags::DECIMAL | FormatFlags::UNSIGNED,
        );
        assert_eq!(render(&desc), "\n  w1       0x0001       1");
    }

    #[test]
    fn decimal_alone_is_signed() {
        let desc = RegisterDescriptor::new("w2", 0x0004, 0xFFFF, FormatFlags::DECIMAL);
        assert_eq!(render(&desc), "\n  w2       0xFFFF       -1");
    }

    #[test]
    fn unsigned_alone() {
        let desc = RegisterDescriptor::new("RCOUNT", 0x0036, 0x0010, FormatFlags::UNSIGNED);
        assert_eq!(render(&desc), "\n  RCOUNT   0x0010      16");
    }

    #[test]
    fn anonymous_shows_address() {
        let desc = RegisterDescriptor::anonymous(0x1234, 0x00AB, FormatFlags::empty());
        assert_eq!(render(&desc), "\n  1234     0x00AB");
    }

    #[test]
    fn bit_names_most_significant_first() {
        let desc = RegisterDescriptor::new("INTCON1", 0x08C0, 0x8014, FormatFlags::BINARY)
            .with_bit_names(Some(&INTCON1_BITS));
        assert_eq!(
            render(&desc),
            "\n  INTCON1  0x8014   10000000 00010100 {NSTDIS, MATHERR, STKERR}"
        );
    }

    #[test]
    fn rendering_twice_is_identical() {
        let desc = RegisterDescriptor::new("SR", 0x0042, 0x0044, ALL)
            .with_bit_names(Some(&SR_BITS));
        assert_eq!(render(&desc), render(&desc));
    }
}

// End of File
