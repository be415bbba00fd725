//! Decodes the return information the hardware pushes when taking a trap

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

/// Program counter bits in a stacked return address
const PC_MASK: u32 = 0x007F_FFFE;

/// The stacked return word, split into its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrapReturn {
    /// Where execution continues, with the control bits cleared
    pub address: u32,
    /// Stack Frame Active. Set when the interrupted code had a frame pointer
    /// in W14.
    pub sfa: bool,
    /// Interrupt priority level of the interrupted code
    pub ipl: u8,
    /// Low byte of the interrupted code's `SR`
    pub sr_low: u8,
}

impl TrapReturn {
    /// Decode the four bytes found at the stack pointer, lowest address first.
    ///
    /// The hardware stores PC<15:0>, then PC<22:16> with IPL3 in the top bit,
    /// then SR<7:0>. Bit 0 of the PC slot holds the SFA flag.
    pub fn decode(raw: [u8; 4]) -> TrapReturn {
        let word = u32::from_le_bytes(raw);
        let sr_low = raw[3];
        let ipl3 = (raw[2] & 0x80) >> 4;
        TrapReturn {
            address: word & PC_MASK,
            sfa: word & 1 != 0,
            ipl: ipl3 | (sr_low >> 5),
            sr_low,
        }
    }

    /// Program memory address of the instruction before the one that trapped
    pub const fn preceding(&self) -> u32 {
        self.address.wrapping_sub(4)
    }

    /// Program memory address of the instruction that trapped
    pub const fn trigger(&self) -> u32 {
        self.address.wrapping_sub(2)
    }
}

/// Offset below the frame pointer where the caller's return address sits
pub const FRAME_RETURN_OFFSET: u16 = 6;

/// Decode the caller's return address, stored below the frame pointer
pub fn frame_return(raw: [u8; 4]) -> u32 {
    u32::from_le_bytes(raw) & !1
}


// End of File
