//! Common platform code shared by the supervisor and the machine model.

use std::fmt;

use thiserror::Error;

/// Backspace.
pub const BS: u8 = 0x08;
/// Delete.
pub const DEL: u8 = 0x7f;
/// Carriage return.
pub const CR: u8 = 0x0d;
/// Line feed.
pub const LF: u8 = 0x0a;
/// Escape.
pub const ESC: u8 = 0x1b;
/// Bell.
pub const BEL: u8 = 0x07;
/// End of transmission (Ctrl-D).
pub const EOT: u8 = 0x04;

/// Rubs out the character left of the cursor.
pub const ERASE: &[u8] = b"\x08 \x08";
pub const BOLD_ON: &[u8] = b"\x1b[1m";
pub const BOLD_OFF: &[u8] = b"\x1b[0m";

/// An error in the arguments of a supervisor command.
///
/// The [`Display`](fmt::Display) form is exactly what the operator sees, minus the line ending.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SuperError {
    #[error("error: bad frequency")]
    BadFrequency,
    #[error("error: unrecognised unit suffix?")]
    UnitSuffix,
    #[error("error: {0}")]
    Usage(&'static str),
}

/// Type alias for Result<T, [SuperError]>.
pub type SResult<T> = Result<T, SuperError>;

/// How the emulated clock is being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// No clock edges are generated.
    #[default]
    Stopped,
    /// The clock free-runs at its configured frequency.
    Independent,
    /// Every clock edge is generated by the supervisor so the bus can be traced.
    Supervised,
}

impl ClockMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Independent => "independent",
            Self::Supervised => "supervised",
        }
    }
}

impl fmt::Display for ClockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The text sink that everything the operator sees is written through.
///
/// Implementations own the transport; writes are fire-and-forget.
pub trait Terminal {
    fn write_bytes(&mut self, bytes: &[u8]);

    fn write_byte(&mut self, byte: u8) {
        self.write_bytes(&[byte]);
    }

    /// Writes formatted text. Use the [`report!`](crate::report) macro rather than calling this directly.
    ///
    /// The terminal is byte oriented, so text goes out as Latin-1 (see [`latin1`]).
    fn report(&mut self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(s) if s.is_ascii() => self.write_bytes(s.as_bytes()),
            Some(s) => self.write_bytes(&latin1(s)),
            None => self.write_bytes(&latin1(&args.to_string())),
        }
    }
}

/// Encodes `text` one byte per `char`, the inverse of how command lines are decoded.
/// Anything outside Latin-1 becomes `?`.
pub fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(c).unwrap_or(b'?'))
        .collect()
}

impl Terminal for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// `printf`-style output to a [`Terminal`]. The first argument must be a `&mut` to the terminal.
#[macro_export]
macro_rules! report {
    ($out:expr, $($arg:tt)*) => {
        $crate::plat::Terminal::report(&mut *$out, format_args!($($arg)*))
    };
}
