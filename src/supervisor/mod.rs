//! The supervisor menu: a small command interpreter for poking at the machine from the serial console.
//!
//! Keypresses go through a [`LineEditor`]; finished lines are run by a [`Dispatcher`].

use crate::{emu::Machine, plat::Terminal};

pub mod clock;
pub mod commands;
pub mod line;
pub mod parse;
pub mod tokenizer;

pub use clock::ClockPolicy;
pub use commands::Dispatcher;
pub use line::{Edit, LineEditor};

use crate::emu::rom::RomSet;

pub const PROMPT: &str = "Supervisor> ";

/// Settings for a [`Supervisor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupervisorConfig {
    /// Size of the command line buffer, terminator slot included.
    pub line_capacity: usize,
    /// The transport's own escape key, which aborts a line like ESC.
    pub escape_keycode: u8,
    pub clock: ClockPolicy,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            line_capacity: 80,
            escape_keycode: 0x1d,
            clock: ClockPolicy::default(),
        }
    }
}

pub struct Supervisor {
    editor: LineEditor,
    dispatcher: Dispatcher,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig, roms: RomSet) -> Self {
        Self {
            editor: LineEditor::new(config.line_capacity, config.escape_keycode),
            dispatcher: Dispatcher::new(config.clock, roms),
        }
    }

    /// Opens the menu: clears the line and prints the prompt.
    pub fn enter(&mut self, out: &mut dyn Terminal) {
        self.editor.clear();
        out.write_bytes(PROMPT.as_bytes());
    }

    /// Closes the menu. The line is cleared on the next [`enter`](Self::enter).
    pub fn exit(&mut self) {}

    /// Feeds one keypress to the menu. Returns `false` once the line has been run or aborted.
    pub fn key_in(&mut self, byte: u8, machine: &mut dyn Machine, out: &mut dyn Terminal) -> bool {
        match self.editor.key_in(byte, out) {
            Edit::Editing => true,
            Edit::Abort => false,
            Edit::Submit => {
                let line = self.editor.line();
                self.dispatcher.execute(&line, machine, out);
                false
            }
        }
    }

    /// Runs a whole command line. Returns `false` if it ends the session.
    pub fn execute(&self, line: &str, machine: &mut dyn Machine, out: &mut dyn Terminal) -> bool {
        self.dispatcher.execute(line, machine, out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{io, time::Duration};

    use super::*;
    use crate::{
        emu::{EResult, EmuError},
        plat::ClockMode,
        report,
    };

    /// Records every state-changing call made on it.
    #[derive(Default)]
    pub struct FakeMachine {
        pub calls: Vec<String>,
        mode: ClockMode,
        hz: f64,
        trace: i32,
    }

    impl Machine for FakeMachine {
        fn show_regs(&self, out: &mut dyn Terminal) {
            report!(out, "PC=0000\r\n");
        }

        fn reset(&mut self) {
            self.calls.push("reset".into());
        }

        fn clock_frequency(&self) -> f64 {
            self.hz
        }

        fn clock_mode(&self) -> ClockMode {
            self.mode
        }

        fn set_clock_independent(&mut self, hz: f64) {
            self.calls.push(format!("set_clock_independent({hz})"));
            self.mode = if hz == 0.0 {
                ClockMode::Stopped
            } else {
                ClockMode::Independent
            };
            self.hz = hz;
        }

        fn set_clock_supervised(&mut self, hz: f64) {
            self.calls.push(format!("set_clock_supervised({hz})"));
            self.mode = ClockMode::Supervised;
            self.hz = hz;
        }

        fn trace_level(&self) -> i32 {
            self.trace
        }

        fn set_trace_level(&mut self, level: i32) {
            self.calls.push(format!("set_trace_level({level})"));
            self.trace = level;
        }

        fn load_program(&mut self, image: &[u8], address: u16, start: u16) -> EResult<()> {
            self.calls.push(format!(
                "load_program({}, {:04x}, {:04x})",
                image.len(),
                address,
                start
            ));
            Ok(())
        }

        fn load_file(&mut self, name: &str, address: u16, start: u16) -> EResult<usize> {
            if name == "MISSING.BIN" {
                return Err(EmuError::Io {
                    name: name.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "not found"),
                });
            }
            self.calls
                .push(format!("load_file({}, {:04x}, {:04x})", name, address, start));
            Ok(16)
        }

        fn uart_write(&mut self, byte: u8) {
            self.calls.push(format!("uart_write({byte:02x})"));
        }

        fn advance(&mut self, _elapsed: Duration) -> u64 {
            0
        }
    }

    fn type_bytes(sup: &mut Supervisor, m: &mut FakeMachine, bytes: &[u8]) -> (Vec<bool>, Vec<u8>) {
        let mut out: Vec<u8> = Vec::new();
        let editing = bytes.iter().map(|&b| sup.key_in(b, &mut *m, &mut out)).collect();
        (editing, out)
    }

    fn type_line(sup: &mut Supervisor, m: &mut FakeMachine, bytes: &[u8]) -> (Vec<bool>, String) {
        let (editing, out) = type_bytes(sup, m, bytes);
        (editing, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_enter_prints_prompt_and_clears() {
        let mut sup = Supervisor::new(SupervisorConfig::default(), RomSet::default());
        let mut m = FakeMachine::default();
        type_line(&mut sup, &mut m, b"junk");
        let mut out: Vec<u8> = Vec::new();
        sup.enter(&mut out);
        assert_eq!(out, PROMPT.as_bytes());
        let (_, text) = type_line(&mut sup, &mut m, b"\r");
        assert_eq!(text, "\r\n");
        assert!(m.calls.is_empty());
    }

    #[test]
    fn test_submit_dispatches_and_stops_editing() {
        let mut sup = Supervisor::new(SupervisorConfig::default(), RomSet::default());
        let mut m = FakeMachine::default();
        sup.enter(&mut Vec::<u8>::new());
        let (editing, text) = type_line(&mut sup, &mut m, b"clk 2m\r");
        assert_eq!(editing, [true, true, true, true, true, true, false]);
        assert!(text.ends_with("\r\nclock: independent 2.000MHz\r\n"));
    }

    #[test]
    fn test_backspace_edits_dispatched_line() {
        let mut sup = Supervisor::new(SupervisorConfig::default(), RomSet::default());
        let mut m = FakeMachine::default();
        sup.enter(&mut Vec::<u8>::new());
        type_line(&mut sup, &mut m, b"resetx\x7f\r");
        assert_eq!(m.calls, ["reset"]);
    }

    #[test]
    fn test_abort_does_not_dispatch() {
        let mut sup = Supervisor::new(SupervisorConfig::default(), RomSet::default());
        let mut m = FakeMachine::default();
        sup.enter(&mut Vec::<u8>::new());
        let (editing, text) = type_line(&mut sup, &mut m, b"reset\x1b");
        assert_eq!(editing.last(), Some(&false));
        assert!(text.ends_with("*abort*\r\n"));
        assert!(m.calls.is_empty());
    }

    #[test]
    fn test_quit_ends_editing() {
        let mut sup = Supervisor::new(SupervisorConfig::default(), RomSet::default());
        let mut m = FakeMachine::default();
        sup.enter(&mut Vec::<u8>::new());
        let (editing, _) = type_line(&mut sup, &mut m, b"q\r");
        assert_eq!(editing, [true, false]);
        assert!(!sup.execute("quit", &mut m, &mut Vec::<u8>::new()));
        assert!(sup.execute("regs", &mut m, &mut Vec::<u8>::new()));
    }

    #[test]
    fn test_overlong_line_is_truncated() {
        let config = SupervisorConfig {
            line_capacity: 8,
            ..SupervisorConfig::default()
        };
        let mut sup = Supervisor::new(config, RomSet::default());
        let mut m = FakeMachine::default();
        sup.enter(&mut Vec::<u8>::new());
        let (_, text) = type_line(&mut sup, &mut m, b"trace 1234\r");
        assert_eq!(text.matches('\x07').count(), 3);
        assert_eq!(m.calls, ["set_trace_level(1)", "set_clock_supervised(0)"]);
    }

    #[test]
    fn test_high_bytes_reach_the_command() {
        let mut sup = Supervisor::new(SupervisorConfig::default(), RomSet::default());
        let mut m = FakeMachine::default();
        sup.enter(&mut Vec::<u8>::new());
        type_bytes(&mut sup, &mut m, b"loadfile CAF\xc9.BIN 0 0\r");
        assert_eq!(m.calls, ["load_file(CAF\u{c9}.BIN, 0000, 0000)"]);
    }

    #[test]
    fn test_unknown_verb_is_echoed_byte_for_byte() {
        let mut sup = Supervisor::new(SupervisorConfig::default(), RomSet::default());
        let mut m = FakeMachine::default();
        sup.enter(&mut Vec::<u8>::new());
        let (_, out) = type_bytes(&mut sup, &mut m, b"foo\xe9\r");
        assert!(out.ends_with(b"\r\nerror: unknown command \"foo\xe9\"\r\n"));
        assert!(m.calls.is_empty());
    }
}
