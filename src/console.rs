//! The serial console: passes bytes through to the machine until the operator escapes into the supervisor.

use std::io::{self, IsTerminal, Write};

use crossterm::terminal;

use crate::{
    emu::Machine,
    plat::Terminal,
    supervisor::Supervisor,
};

/// A [`Terminal`] over any byte sink, such as stdout standing in for the serial port.
pub struct SerialOut<W: Write> {
    inner: W,
}

impl<W: Write> SerialOut<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.inner.flush() {
            log::warn!("serial flush failed: {}", e);
        }
    }
}

impl<W: Write> Terminal for SerialOut<W> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        if let Err(e) = self.inner.write_all(bytes) {
            log::warn!("serial write failed: {}", e);
        }
    }
}

/// Holds the controlling terminal in raw mode while alive, so keys arrive one at a time
/// without the terminal echoing or line-buffering them. Restores cooked mode on drop.
#[derive(Debug)]
pub struct RawMode {
    engaged: bool,
}

impl RawMode {
    /// Switches to raw mode if stdin is a terminal. Piped input is left alone.
    pub fn enable() -> io::Result<Self> {
        Self::enable_if(io::stdin().is_terminal())
    }

    pub fn enable_if(tty: bool) -> io::Result<Self> {
        if tty {
            terminal::enable_raw_mode()?;
            log::debug!("terminal in raw mode");
        }
        Ok(Self { engaged: tty })
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if !self.engaged {
            return;
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("failed to restore terminal: {}", e);
        }
    }
}

/// Routes operator keypresses either to the machine or to the supervisor menu.
pub struct Console<M: Machine> {
    machine: M,
    supervisor: Supervisor,
    escape_keycode: u8,
    in_menu: bool,
}

impl<M: Machine> Console<M> {
    pub fn new(machine: M, supervisor: Supervisor, escape_keycode: u8) -> Self {
        Self {
            machine,
            supervisor,
            escape_keycode,
            in_menu: false,
        }
    }

    /// Handles one byte from the operator.
    pub fn feed(&mut self, byte: u8, out: &mut dyn Terminal) {
        if self.in_menu {
            if !self.supervisor.key_in(byte, &mut self.machine, out) {
                self.supervisor.exit();
                self.in_menu = false;
                log::debug!("left supervisor");
            }
        } else if byte == self.escape_keycode {
            log::debug!("entered supervisor");
            self.in_menu = true;
            self.supervisor.enter(out);
        } else {
            self.machine.uart_write(byte);
        }
    }

    pub fn in_menu(&self) -> bool {
        self.in_menu
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }
}
