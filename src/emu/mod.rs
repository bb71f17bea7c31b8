//! The Z80 machine that the supervisor inspects and controls.

use std::{io, time::Duration};

use thiserror::Error;

use crate::plat::{ClockMode, Terminal};

pub mod machine;
pub mod ram;
pub mod registers;
pub mod rom;

/// An error raised by the machine while carrying out a supervisor request.
#[derive(Debug, Error)]
pub enum EmuError {
    #[error("{len} bytes at {address:04x} overrun memory")]
    Overrun { address: u16, len: usize },
    #[error("{name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Type alias for Result<T, [EmuError]>.
pub type EResult<T> = Result<T, EmuError>;

/// Everything the supervisor needs from the machine: registers, reset, clock, bus trace and memory loading.
///
/// Calls are expected to return promptly.
pub trait Machine {
    /// Writes a register dump to the terminal.
    fn show_regs(&self, out: &mut dyn Terminal);

    /// Pulls the CPU's reset line.
    fn reset(&mut self);

    fn clock_frequency(&self) -> f64;

    fn clock_mode(&self) -> ClockMode;

    /// Lets the clock free-run at `hz`. A frequency of zero stops it.
    fn set_clock_independent(&mut self, hz: f64);

    /// Drives the clock from the supervisor at `hz`, so bus cycles can be traced.
    fn set_clock_supervised(&mut self, hz: f64);

    fn trace_level(&self) -> i32;

    fn set_trace_level(&mut self, level: i32);

    /// Copies `image` into memory at `address` and points the CPU at `start`.
    fn load_program(&mut self, image: &[u8], address: u16, start: u16) -> EResult<()>;

    /// Reads the named file and loads it as a program. Returns the number of bytes loaded.
    fn load_file(&mut self, name: &str, address: u16, start: u16) -> EResult<usize>;

    /// Hands a byte from the operator to the machine's serial port.
    fn uart_write(&mut self, byte: u8);

    /// Runs the clock for `elapsed` of wall time. Returns the number of T-states generated,
    /// which is zero while the clock is stopped.
    fn advance(&mut self, elapsed: Duration) -> u64;
}
