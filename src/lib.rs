//! # trapdump
//!
//! Post-mortem trap reporting for 16-bit DSC/MCU parts.
//!
//! When the CPU takes a trap (address error, stack error, math error and so
//! on) the entry stub snapshots the working registers before anything else
//! can clobber them. The report then prints, in order:
//!
//! * W0 to W15 and the special registers this part implements
//! * the trap return address and the opcodes around it
//! * the caller's return address, if a stack frame was active
//! * the interrupt flag/enable/priority table
//! * ordinary RAM, stack RAM and the first flash sector
//!
//! Finally the trap flags in `INTCON1` are cleared and we either return to
//! the code that trapped, or, if `_DEBUG` is set, stop on a breakpoint.
//!
//! Hardware access goes through the [`Device`] and [`CpuState`] traits and
//! the report goes to a [`Console`].

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

#![cfg_attr(not(test), no_std)]

mod fmt;

mod capture;
pub mod console;
mod device;
pub mod dump;
pub mod frame;
pub mod interrupts;
mod register;
pub mod report;
mod vector;

pub use capture::{CaptureBuffer, capture, last_capture};
pub use console::Console;
pub use device::{CpuState, Device, DspSymbols, PageRegister, Symbols};
pub use register::{
    BitNames, FormatFlags, INTCON1_BITS, RCON_BITS, RegisterDescriptor, SR_BITS,
};
pub use report::{ReportOptions, Resolution};
pub use vector::TrapVector;

/// Handle a trap.
///
/// Call this from the entry stub for every [`TrapVector`] you want reported.
/// It records the CPU state in the persistent capture buffer, writes the
/// report to `console` and then either returns (so the stub can return from
/// the trap) or stops on a breakpoint first, if the image was built for
/// debugging.
///
/// # Safety
///
/// Must only be called from a trap handler, once per trap, with `cpu` still
/// holding the state from the moment the trap was taken.
pub unsafe fn on_trap<P, D, C>(
    vector: TrapVector,
    cpu: &mut P,
    device: &mut D,
    console: &mut C,
    options: &ReportOptions,
) -> Resolution
where
    P: CpuState,
    D: Device,
    C: Console,
{
    // SAFETY: Traps do not nest, so nobody else has this buffer
    let buffer = unsafe { capture::capture_slot() }.write(CaptureBuffer::new());
    // SAFETY: Our caller promises `cpu` is untouched since the trap
    unsafe { capture(buffer, cpu, device.symbols()) };
    error!("trap taken via {}", vector);
    report::run(buffer, device, console, options)
}

// End of File
