//! Produces the trap report and decides whether to resume or halt

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Write};

use crate::{
    CaptureBuffer, Console, Device, FormatFlags, RegisterDescriptor, Symbols, console, dump,
    frame::{self, TrapReturn},
    interrupts,
};

/// `INTCON1` bits that are not trap flags: `NSTDIS` and the accumulator
/// overflow trap enables
pub const INTCON1_KEEP_MASK: u16 = 0x8700;

/// Instruction words shown around the trap return address
const OPCODE_CONTEXT_WORDS: usize = 3;

/// Settings for the trap report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportOptions {
    /// Shown at the top of the report, as `name():`
    pub handler_name: &'static str,
    /// How long to wait for the console to drain
    pub flush_timeout_ms: u32,
}

impl ReportOptions {
    /// The default settings
    pub const fn new() -> ReportOptions {
        ReportOptions {
            handler_name: "trap_handler",
            flush_timeout_ms: 1000,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions::new()
    }
}

/// What happened once the report was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// Return from the trap, to the given address
    Resume {
        /// Where execution will pick up
        return_address: u32,
    },
    /// We hit a software breakpoint for the debugger. If the debugger lets us
    /// continue, we return to the given address.
    Halted {
        /// Where execution will pick up
        return_address: u32,
    },
}

/// Write the full report for a captured trap, then clear the trap flags,
/// flush the console and apply the resume/halt policy.
///
/// `capture` must have just been filled in by [`crate::capture()`]. Its
/// stack pointer is adjusted to drop the trap frame.
pub fn run<D, C>(
    capture: &mut CaptureBuffer,
    device: &mut D,
    console: &mut C,
    options: &ReportOptions,
) -> Resolution
where
    D: Device,
    C: Console,
{
    capture.pop_trap_frame();
    let mut raw = [0u8; 4];
    device.read_data(capture.stack_pointer(), &mut raw);
    let trap_return = TrapReturn::decode(raw);
    debug!(
        "trap return {=u32:06x}, sp {=u16:04x}",
        trap_return.address,
        capture.stack_pointer()
    );

    if write_report(console, capture, device, &trap_return, options).is_err() {
        warn!("trap report truncated: console write failed");
    }

    let intcon1 = device.symbols().intcon1;
    let flags = device.read_word(intcon1);
    device.write_data_word(intcon1, flags & INTCON1_KEEP_MASK);

    if console
        .write_str("\nAttempting to return from trap handler...")
        .is_err()
    {
        warn!("trap return notice lost: console write failed");
    }
    console.flush(options.flush_timeout_ms);

    let return_address = trap_return.address;
    if device.symbols().debug_mode() {
        if console
            .write_str("\nOn second thought, you are in debug mode, so let's halt instead.")
            .is_err()
        {
            warn!("debug halt notice lost: console write failed");
        }
        console.flush(options.flush_timeout_ms);
        info!("halting for debugger");
        device.software_breakpoint();
        Resolution::Halted { return_address }
    } else {
        Resolution::Resume { return_address }
    }
}

/// Write every section of the report, in order
fn write_report<D, W>(
    out: &mut W,
    capture: &CaptureBuffer,
    device: &mut D,
    trap_return: &TrapReturn,
    options: &ReportOptions,
) -> fmt::Result
where
    D: Device,
    W: Write,
{
    write!(out, "\n\n{}():", options.handler_name)?;
    write_registers(out, capture, device)?;
    write_trap_return(out, capture, device, trap_return)?;
    interrupts::render(out, device)?;

    let symbols = device.symbols();
    let data_base = u32::from(symbols.data_base);
    let sp_init = u32::from(symbols.sp_init);
    let sector = symbols.addresses_per_sector;

    out.write_str("\nRegular RAM:")?;
    dump::dump_ram(out, device, dump::MemorySpan::between(data_base, sp_init))?;

    out.write_str("\nStack RAM:")?;
    let stack_pointer = u32::from(capture.stack_pointer());
    dump::dump_ram(out, device, dump::MemorySpan::between(sp_init, stack_pointer))?;

    out.write_str("\nFirst page of flash:")?;
    dump::dump_flash(out, device, dump::MemorySpan { base: 0, len: sector })
}

/// The working registers, then the special registers this part has
fn write_registers<D, W>(out: &mut W, capture: &CaptureBuffer, device: &mut D) -> fmt::Result
where
    D: Device,
    W: Write,
{
    for (index, value) in capture.w.iter().enumerate() {
        let mut name: heapless::String<4> = heapless::String::new();
        write!(name, "w{}", index)?;
        let address = (index * 2) as u16;
        RegisterDescriptor::new(name.as_str(), address, *value, FormatFlags::DECIMAL | FormatFlags::UNSIGNED)
            .render(out)?;
    }

    let symbols = device.symbols().clone();
    write_sfr(out, device, &symbols, "SPLIM", symbols.splim, FormatFlags::empty())?;
    write_sfr(out, device, &symbols, "RCON", symbols.rcon, FormatFlags::BINARY)?;
    write_sfr(out, device, &symbols, "INTCON1", symbols.intcon1, FormatFlags::BINARY)?;
    // This is our copy, not the live SFR
    RegisterDescriptor::new("SR", symbols.sr, capture.sr, FormatFlags::BINARY).render(out)?;
    write_sfr(out, device, &symbols, "CORCON", symbols.corcon, FormatFlags::BINARY)?;
    RegisterDescriptor::new("RCOUNT", 0, capture.rcount, FormatFlags::UNSIGNED).render(out)?;
    write_sfr(out, device, &symbols, "DISICNT", symbols.disicnt, FormatFlags::UNSIGNED)?;
    write_sfr(out, device, &symbols, "TBLPAG", symbols.tblpag, FormatFlags::empty())?;

    if let Some(page) = symbols.page_register() {
        RegisterDescriptor::new(page.name(), 0, capture.page, FormatFlags::empty()).render(out)?;
        if page == crate::PageRegister::Dsrpag && symbols.dswpag.is_some() {
            RegisterDescriptor::new("DSWPAG", 0, capture.dswpag, FormatFlags::empty())
                .render(out)?;
        }
    }

    if let Some(dsp) = symbols.dsp {
        let acca = read_words::<_, 3>(device, dsp.acca);
        let accb = read_words::<_, 3>(device, dsp.accb);
        let dcount = device.read_word(dsp.dcount);
        let dostart = device.read_long(dsp.dostart);
        let doend = device.read_long(dsp.doend);
        write!(
            out,
            "\n  ACCA     0x{:04X}{:04X}{:04X}\n  ACCB     0x{:04X}{:04X}{:04X}",
            acca[2], acca[1], acca[0], accb[2], accb[1], accb[0]
        )?;
        write!(
            out,
            "\n  DCOUNT   0x{:04X} ({})\n  DSTART   0x{:06X}\n  DEND     0x{:06X}",
            dcount, dcount, dostart, doend
        )?;
    }

    if let Some(ctxtstat) = symbols.ctxtstat {
        write_sfr(out, device, &symbols, "CTXTSTAT", ctxtstat, FormatFlags::empty())?;
    }

    Ok(())
}

/// Read a live SFR and render it, with bit names if it has them
fn write_sfr<D, W>(
    out: &mut W,
    device: &mut D,
    symbols: &Symbols,
    name: &str,
    address: u16,
    flags: FormatFlags,
) -> fmt::Result
where
    D: Device,
    W: Write,
{
    let value = device.read_word(address);
    RegisterDescriptor::new(name, address, value, flags)
        .with_bit_names(symbols.bit_names_for(address))
        .render(out)
}

/// Consecutive words, lowest address first
fn read_words<D: Device, const N: usize>(device: &mut D, address: u16) -> [u16; N] {
    let mut words = [0u16; N];
    for (idx, word) in words.iter_mut().enumerate() {
        *word = device.read_word(address.wrapping_add((idx * 2) as u16));
    }
    words
}

/// The return address, the opcodes around it, and the caller if there was a
/// stack frame
fn write_trap_return<D, W>(
    out: &mut W,
    capture: &CaptureBuffer,
    device: &mut D,
    trap_return: &TrapReturn,
) -> fmt::Result
where
    D: Device,
    W: Write,
{
    write!(
        out,
        "\n\nTrap return address: 0x{:06X} (SFA = {:X}, IPL = {:X}, SR<7:0> = 0x{:02X})",
        trap_return.address,
        u8::from(trap_return.sfa),
        trap_return.ipl,
        trap_return.sr_low
    )?;

    let mut opcodes = [0u32; OPCODE_CONTEXT_WORDS];
    device.read_program(trap_return.preceding(), &mut opcodes);
    write!(
        out,
        "\n  Preceeding opcode:   {:06X}  0x{:06X}\n  Trap trigger opcode: {:06X}  {}0x{:06X}{}\n  Trap return opcode:  {:06X}  0x{:06X}",
        trap_return.preceding(),
        opcodes[0],
        trap_return.trigger(),
        console::RED,
        opcodes[1],
        console::RESET,
        trap_return.address,
        opcodes[2]
    )?;

    let frame_pointer = capture.frame_pointer();
    if frame_pointer != 0 && trap_return.sfa {
        let mut raw = [0u8; 4];
        device.read_data(frame_pointer.wrapping_sub(frame::FRAME_RETURN_OFFSET), &mut raw);
        write!(
            out,
            "\n  Stack frame was active. They return to: 0x{:06X}",
            frame::frame_return(raw)
        )?;
    }

    Ok(())
}

// End of File
