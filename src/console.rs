//! Holds the [`Console`] trait, where the trap report goes

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

/// ANSI escape to turn text red
pub const RED: &str = "\u{001B}[31m";

/// ANSI escape to reset all text attributes
pub const RESET: &str = "\u{001B}[0m";

/// A buffered text output, such as a UART transmit FIFO
///
/// The trap handler assumes nothing else writes to the console while the
/// report is being produced.
pub trait Console: core::fmt::Write {
    /// Block until every buffered byte has been physically sent, or until
    /// `timeout_ms` milliseconds have passed.
    fn flush(&mut self, timeout_ms: u32);
}

// End of File
