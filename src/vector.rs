//! Holds the [`TrapVector`] type

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

/// The trap vectors that share the one trap handler
///
/// A board hooks each of these up to its entry stub. A part that gives a
/// vector its own dedicated handler simply leaves it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrapVector {
    /// Any interrupt with no handler of its own
    DefaultInterrupt,
    OscillatorFail,
    AddressError,
    HardTrapError,
    StackError,
    MathError,
    DmacError,
    SoftTrapError,
    NvmError,
    GeneralError,
    ReservedTrap7,
}

impl TrapVector {
    /// Every vector this handler can be attached to
    pub const ALL: [TrapVector; 11] = [
        TrapVector::OscillatorFail,
        TrapVector::AddressError,
        TrapVector::HardTrapError,
        TrapVector::StackError,
        TrapVector::MathError,
        TrapVector::DmacError,
        TrapVector::SoftTrapError,
        TrapVector::NvmError,
        TrapVector::GeneralError,
        TrapVector::ReservedTrap7,
        TrapVector::DefaultInterrupt,
    ];

    /// The linker symbol for this vector's handler
    pub const fn symbol(self) -> &'static str {
        match self {
            TrapVector::DefaultInterrupt => "_DefaultInterrupt",
            TrapVector::OscillatorFail => "_OscillatorFail",
            TrapVector::AddressError => "_AddressError",
            TrapVector::HardTrapError => "_HardTrapError",
            TrapVector::StackError => "_StackError",
            TrapVector::MathError => "_MathError",
            TrapVector::DmacError => "_DMACError",
            TrapVector::SoftTrapError => "_SoftTrapError",
            TrapVector::NvmError => "_NVMError",
            TrapVector::GeneralError => "_GeneralError",
            TrapVector::ReservedTrap7 => "_ReservedTrap7",
        }
    }
}

impl core::fmt::Display for TrapVector {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fmt.write_str(self.symbol())
    }
}


// End of File
