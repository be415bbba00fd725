//! A simulated part, for driving the trap report on the host

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(dead_code)]

use trapdump::{CaptureBuffer, Console, CpuState, Device, DspSymbols, Symbols};

pub const SR: u16 = 0x0042;
pub const CORCON: u16 = 0x0044;
pub const RCON: u16 = 0x0740;
pub const INTCON1: u16 = 0x08C0;
pub const SPLIM: u16 = 0x0020;
pub const TBLPAG: u16 = 0x0054;
pub const DISICNT: u16 = 0x0052;
pub const DSRPAG: u16 = 0x0032;
pub const DSWPAG: u16 = 0x0034;
pub const CTXTSTAT: u16 = 0x005A;
pub const IFS0: u16 = 0x0800;
pub const IEC0: u16 = 0x0820;
pub const IPC0: u16 = 0x0840;
pub const DATA_BASE: u16 = 0x1000;
pub const STACK_TOP: u16 = 0x1040;
pub const SECTOR: u32 = 0x0020;

/// Symbols for a part with everything
pub fn full_symbols() -> Symbols {
    Symbols {
        sr: SR,
        corcon: CORCON,
        rcon: RCON,
        intcon1: INTCON1,
        splim: SPLIM,
        tblpag: TBLPAG,
        disicnt: DISICNT,
        psvpag: None,
        dsrpag: Some(DSRPAG),
        dswpag: Some(DSWPAG),
        dsp: Some(DspSymbols {
            acca: 0x0022,
            accb: 0x0028,
            dcount: 0x0038,
            dostart: 0x003A,
            doend: 0x003E,
        }),
        ctxtstat: Some(CTXTSTAT),
        ifs0: IFS0,
        iec0: IEC0,
        ipc0: IPC0,
        data_base: DATA_BASE,
        sp_init: STACK_TOP,
        addresses_per_sector: SECTOR,
        debug: None,
    }
}

/// Symbols for an older part: `PSVPAG`, no DSP, no `CTXTSTAT`
pub fn minimal_symbols() -> Symbols {
    Symbols {
        psvpag: Some(DSRPAG),
        dsrpag: None,
        dswpag: None,
        dsp: None,
        ctxtstat: None,
        ..full_symbols()
    }
}

/// Flat data and program memory
#[derive(Clone)]
pub struct SimDevice {
    pub symbols: Symbols,
    pub data: Vec<u8>,
    pub program: Vec<u32>,
    pub breakpoints: usize,
}

impl SimDevice {
    pub fn new(symbols: Symbols) -> SimDevice {
        SimDevice {
            symbols,
            data: vec![0; 0x1_0000],
            program: vec![0; 0x1000],
            breakpoints: 0,
        }
    }

    pub fn set_word(&mut self, address: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.data[address as usize] = lo;
        self.data[address as usize + 1] = hi;
    }

    pub fn word(&self, address: u16) -> u16 {
        u16::from_le_bytes([self.data[address as usize], self.data[address as usize + 1]])
    }

    pub fn set_bytes(&mut self, address: u16, bytes: &[u8]) {
        let start = address as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn set_opcode(&mut self, address: u32, opcode: u32) {
        self.program[(address / 2) as usize] = opcode;
    }
}

impl Device for SimDevice {
    fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    fn read_data(&mut self, address: u16, buf: &mut [u8]) {
        for (idx, byte) in buf.iter_mut().enumerate() {
            *byte = self.data[(address as usize + idx) & 0xFFFF];
        }
    }

    fn write_data_word(&mut self, address: u16, value: u16) {
        self.set_word(address, value);
    }

    fn read_program(&mut self, address: u32, buf: &mut [u32]) {
        let len = self.program.len();
        for (idx, word) in buf.iter_mut().enumerate() {
            *word = self.program[(address as usize / 2 + idx) % len];
        }
    }

    fn software_breakpoint(&mut self) {
        self.breakpoints += 1;
    }
}

/// Collects the report text
#[derive(Default)]
pub struct SimConsole {
    pub text: String,
    pub flushes: usize,
    /// How much text had been written at the last flush
    pub flushed_len: usize,
}

impl core::fmt::Write for SimConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}

impl Console for SimConsole {
    fn flush(&mut self, _timeout_ms: u32) {
        self.flushes += 1;
        self.flushed_len = self.text.len();
    }
}

/// A CPU as seen by an entry stub: reading `RCOUNT` goes through W1, and the
/// bulk register copy runs under `REPEAT`, ticking `RCOUNT` down.
pub struct SimCpu {
    pub w: [u16; 16],
    pub rcount: u16,
    pub sfrs: Vec<(u16, u16)>,
}

unsafe impl CpuState for SimCpu {
    fn working_register(&mut self, index: usize) -> u16 {
        let value = self.w[index];
        if index >= 2 {
            self.rcount = self.rcount.wrapping_sub(1);
        }
        value
    }

    fn rcount(&mut self) -> u16 {
        self.w[1] = self.rcount;
        self.rcount
    }

    fn set_rcount(&mut self, value: u16) {
        self.rcount = value;
    }

    fn sfr(&mut self, address: u16) -> u16 {
        self.sfrs
            .iter()
            .find(|(a, _)| *a == address)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }
}

/// The return word for address 0x001234, SFA set, IPL3 clear, SR<7:0> 0x44
pub const RETURN_WORD: [u8; 4] = [0x35, 0x12, 0x00, 0x44];

/// A part that trapped at 0x001232 with a trap frame on the stack
pub fn trapped(symbols: Symbols) -> (CaptureBuffer, SimDevice) {
    let mut device = SimDevice::new(symbols);
    device.set_bytes(STACK_TOP + 4, &RETURN_WORD);
    device.set_opcode(0x1230, 0x000000);
    device.set_opcode(0x1232, 0x780F00);
    device.set_opcode(0x1234, 0x060000);

    let mut capture = CaptureBuffer::new();
    capture.w[15] = STACK_TOP + 8;
    capture.sr = 0x0044;
    (capture, device)
}
