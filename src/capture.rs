//! Holds the [`CaptureBuffer`] and the trap entry sequence that fills it

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

use core::{
    cell::UnsafeCell,
    mem::MaybeUninit,
    sync::atomic::{Ordering, compiler_fence},
};

use crate::{CpuState, Symbols};

/// CPU state captured at the very start of a trap.
///
/// The layout matches what a hand-written entry stub stores, so it is
/// `repr(C)` and made only of 16-bit words.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureBuffer {
    /// W0 to W15. W15 is the stack pointer.
    pub w: [u16; 16],
    /// The `REPEAT` loop counter
    pub rcount: u16,
    /// `DSRPAG` or `PSVPAG`, whichever the part implements
    pub page: u16,
    /// `DSWPAG`, if the part implements it
    pub dswpag: u16,
    /// `SR`, as adjusted by the trap hardware
    pub sr: u16,
}

impl CaptureBuffer {
    /// Number of bytes the hardware pushes onto the stack when taking a trap
    ///
    /// PC<15:0> first, then SR<7:0>, IPL3 and PC<22:16>.
    pub const TRAP_FRAME_BYTES: u16 = 4;

    /// Make an all-zero buffer
    pub const fn new() -> CaptureBuffer {
        CaptureBuffer {
            w: [0; 16],
            rcount: 0,
            page: 0,
            dswpag: 0,
            sr: 0,
        }
    }

    /// The stack pointer at the time of the trap
    pub const fn stack_pointer(&self) -> u16 {
        self.w[15]
    }

    /// The frame pointer at the time of the trap
    pub const fn frame_pointer(&self) -> u16 {
        self.w[14]
    }

    /// Take the trap frame off the captured stack pointer, so it points at
    /// the hardware-pushed return address.
    pub fn pop_trap_frame(&mut self) {
        self.w[15] = self.w[15].wrapping_sub(Self::TRAP_FRAME_BYTES);
    }
}

/// Snapshot the CPU into `buffer`.
///
/// The order matters. W0 and W1 go first, because an entry stub needs them
/// as scratch. `RCOUNT` is read before the bulk copy of W2 to W15, because
/// that copy runs under `REPEAT` and clobbers it, and `RCOUNT` is put back at
/// the end so an interrupted `REPEAT` instruction resumes correctly.
///
/// # Safety
///
/// `cpu` must still hold the state from the moment the trap was taken - see
/// [`CpuState`].
#[inline(always)]
pub unsafe fn capture<C: CpuState>(buffer: &mut CaptureBuffer, cpu: &mut C, symbols: &Symbols) {
    buffer.w[0] = cpu.working_register(0);
    buffer.w[1] = cpu.working_register(1);
    compiler_fence(Ordering::SeqCst);

    buffer.rcount = cpu.rcount();
    compiler_fence(Ordering::SeqCst);

    for index in (2..16).rev() {
        buffer.w[index] = cpu.working_register(index);
    }
    compiler_fence(Ordering::SeqCst);

    if let Some(address) = symbols.dsrpag.or(symbols.psvpag) {
        buffer.page = cpu.sfr(address);
    }
    if let Some(address) = symbols.dswpag {
        buffer.dswpag = cpu.sfr(address);
    }
    buffer.sr = cpu.sfr(symbols.sr);
    compiler_fence(Ordering::SeqCst);

    cpu.set_rcount(buffer.rcount);
}

/// Where the last trap was recorded.
///
/// This lives outside `.bss` so start-up code does not clear it, and a
/// post-reset routine can look at the previous crash.
struct CaptureCell(UnsafeCell<MaybeUninit<CaptureBuffer>>);

/// SAFETY: Only the trap handler writes to this, and traps do not nest.
unsafe impl Sync for CaptureCell {}

#[cfg_attr(target_os = "none", unsafe(link_section = ".persist.trapdump"))]
static LAST_TRAP: CaptureCell = CaptureCell(UnsafeCell::new(MaybeUninit::uninit()));

/// Get the persistent capture buffer slot.
///
/// # Safety
///
/// Only the trap handler may call this, and it must not hold two of these
/// references at once.
pub(crate) unsafe fn capture_slot() -> &'static mut MaybeUninit<CaptureBuffer> {
    // SAFETY: Traps do not nest, so the caller has exclusive access
    unsafe { &mut *LAST_TRAP.0.get() }
}

/// Get a copy of whatever the last trap left in the persistent buffer.
///
/// After a power-on reset this is garbage. After a watchdog or software reset
/// it is the state captured by the most recent trap.
///
/// # Safety
///
/// Must not be called while a trap is being handled, and a trap must have
/// been recorded since the buffer's memory was last powered up.
pub unsafe fn last_capture() -> CaptureBuffer {
    // SAFETY: The caller promises a trap filled this in
    unsafe { *(*LAST_TRAP.0.get()).assume_init_ref() }
}


// End of File
