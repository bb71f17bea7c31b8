use crate::{
    emu::{
        rom::{RomKind, RomSet},
        Machine,
    },
    plat::{SuperError, Terminal},
    report,
};

use super::{
    clock::{self, ClockPolicy},
    parse,
    tokenizer::tokenize,
};

pub const LOADROM_USAGE: &str = "syntax: loadrom [basic|monitor]";
pub const LOADFILE_USAGE: &str = "syntax: loadfile [filename] [address] [start address]";
pub const LOADFILE_NOTE: &str = "note: [filename] must be 8.3 format, address and start address in hex";

/// The things a command can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Regs,
    Clock,
    Reset,
    LoadRom,
    LoadFile,
    Trace,
}

/// An entry in the command table. A command without a handler ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub handler: Option<Handler>,
}

const fn cmd(name: &'static str, handler: Option<Handler>) -> Command {
    Command { name, handler }
}

/// Every supervisor command, searched in order.
pub const COMMANDS: &[Command] = &[
    cmd("quit", None),
    cmd("exit", None),
    cmd("q", None),
    cmd("regs", Some(Handler::Regs)),
    cmd("clk", Some(Handler::Clock)),
    cmd("clock", Some(Handler::Clock)),
    cmd("reset", Some(Handler::Reset)),
    cmd("loadrom", Some(Handler::LoadRom)),
    cmd("loadfile", Some(Handler::LoadFile)),
    cmd("trace", Some(Handler::Trace)),
];

/// Finds the first command named `verb`, ignoring case.
pub fn lookup(verb: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(verb))
}

/// Runs command lines against a machine.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    pub clock: ClockPolicy,
    pub roms: RomSet,
}

impl Dispatcher {
    pub fn new(clock: ClockPolicy, roms: RomSet) -> Self {
        Self { clock, roms }
    }

    /// Executes one command line. Returns `false` if the command ends the session.
    ///
    /// Problems with the command are reported to `out`; they never end the session.
    pub fn execute(&self, line: &str, machine: &mut dyn Machine, out: &mut dyn Terminal) -> bool {
        let argv = tokenize(line);
        let Some((verb, args)) = argv.split_first() else {
            return true;
        };
        let Some(command) = lookup(verb) else {
            report!(out, "error: unknown command \"{}\"\r\n", verb);
            return true;
        };
        let Some(handler) = command.handler else {
            log::debug!("{}: end of session", command.name);
            return false;
        };
        log::debug!("{} {:?}", command.name, args);
        match handler {
            Handler::Regs => machine.show_regs(out),
            Handler::Clock => self.clock.clk(args, machine, out),
            Handler::Reset => machine.reset(),
            Handler::LoadRom => self.loadrom(args, machine, out),
            Handler::LoadFile => loadfile(args, machine, out),
            Handler::Trace => clock::trace(args, machine, out),
        }
        true
    }

    /// `loadrom basic|monitor`
    fn loadrom(&self, args: &[&str], machine: &mut dyn Machine, out: &mut dyn Terminal) {
        let kind = match args {
            [name] => RomKind::from_name(name),
            _ => None,
        };
        let Some(kind) = kind else {
            report!(out, "{}\r\n", SuperError::Usage(LOADROM_USAGE));
            return;
        };
        let Some(image) = self.roms.image(kind) else {
            report!(out, "error: loadrom: {} image not available\r\n", kind.name());
            return;
        };
        if let Err(e) = machine.load_program(image, kind.address(), kind.start()) {
            report!(out, "error: loadrom: {}\r\n", e);
            return;
        }
        match kind {
            RomKind::Basic => report!(out, "loadrom: basic loaded. entry at 0150.\r\n"),
            RomKind::Monitor => report!(out, "loadrom: monitor loaded at {:04x}\r\n", kind.address()),
        }
    }
}

/// `loadfile <name> <address> <start address>`
fn loadfile(args: &[&str], machine: &mut dyn Machine, out: &mut dyn Terminal) {
    let [name, address, start, ..] = args else {
        report!(out, "{}\r\n", SuperError::Usage(LOADFILE_USAGE));
        report!(out, "{}\r\n", LOADFILE_NOTE);
        return;
    };
    let address = parse::hex_prefix(address);
    let start = parse::hex_prefix(start);
    match machine.load_file(name, address, start) {
        Ok(len) => report!(
            out,
            "loadfile: {} bytes at {:04x}, entry at {:04x}\r\n",
            len,
            address,
            start
        ),
        Err(e) => report!(out, "error: loadfile: {}\r\n", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::tests::FakeMachine;

    fn run(d: &Dispatcher, m: &mut FakeMachine, line: &str) -> (bool, String) {
        let mut out: Vec<u8> = Vec::new();
        let cont = d.execute(line, m, &mut out);
        (cont, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_ordered() {
        assert_eq!(lookup("CLK").unwrap().handler, Some(Handler::Clock));
        assert_eq!(lookup("Clock").unwrap().name, "clock");
        assert_eq!(lookup("Q").unwrap().handler, None);
        assert!(lookup("qu").is_none());
    }

    #[test]
    fn test_blank_lines_continue() {
        let d = Dispatcher::default();
        let mut m = FakeMachine::default();
        assert_eq!(run(&d, &mut m, ""), (true, String::new()));
        assert_eq!(run(&d, &mut m, "   "), (true, String::new()));
        assert!(m.calls.is_empty());
    }

    #[test]
    fn test_session_enders() {
        let d = Dispatcher::default();
        let mut m = FakeMachine::default();
        for line in ["quit", "exit", "q", "  QUIT  ", "Exit now"] {
            assert_eq!(run(&d, &mut m, line), (false, String::new()));
        }
        assert!(m.calls.is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let d = Dispatcher::default();
        let mut m = FakeMachine::default();
        let (cont, text) = run(&d, &mut m, "foobar 1 2");
        assert!(cont);
        assert_eq!(text, "error: unknown command \"foobar\"\r\n");
        assert!(m.calls.is_empty());
    }

    #[test]
    fn test_regs_and_reset() {
        let d = Dispatcher::default();
        let mut m = FakeMachine::default();
        assert_eq!(run(&d, &mut m, "regs extra"), (true, "PC=0000\r\n".to_string()));
        assert!(run(&d, &mut m, "RESET").0);
        assert_eq!(m.calls, ["reset"]);
    }

    #[test]
    fn test_clock_alias() {
        let d = Dispatcher::default();
        let mut m = FakeMachine::default();
        let (cont, text) = run(&d, &mut m, "clock 2m");
        assert!(cont);
        assert_eq!(text, "clock: independent 2.000MHz\r\n");
    }

    #[test]
    fn test_loadrom() {
        let roms = RomSet::new(Some(vec![0xc3, 0x50, 0x01]), Some(vec![0xf3]));
        let d = Dispatcher::new(ClockPolicy::default(), roms);
        let mut m = FakeMachine::default();

        let (_, text) = run(&d, &mut m, "loadrom BASIC");
        assert_eq!(text, "loadrom: basic loaded. entry at 0150.\r\n");
        let (_, text) = run(&d, &mut m, "loadrom monitor");
        assert_eq!(text, "loadrom: monitor loaded at f000\r\n");
        assert_eq!(
            m.calls,
            ["load_program(3, 0000, 0000)", "load_program(1, f000, f000)"]
        );
    }

    #[test]
    fn test_loadrom_syntax() {
        let d = Dispatcher::new(ClockPolicy::default(), RomSet::new(Some(vec![0]), None));
        let mut m = FakeMachine::default();
        for line in ["loadrom", "loadrom cpm", "loadrom basic monitor"] {
            let (cont, text) = run(&d, &mut m, line);
            assert!(cont);
            assert_eq!(text, "error: syntax: loadrom [basic|monitor]\r\n");
        }
        let (_, text) = run(&d, &mut m, "loadrom monitor");
        assert_eq!(text, "error: loadrom: monitor image not available\r\n");
        assert!(m.calls.is_empty());
    }

    #[test]
    fn test_loadfile_usage() {
        let d = Dispatcher::default();
        let mut m = FakeMachine::default();
        for line in ["loadfile", "loadfile onlyone", "loadfile PROG.BIN 100"] {
            let (cont, text) = run(&d, &mut m, line);
            assert!(cont);
            assert_eq!(
                text,
                "error: syntax: loadfile [filename] [address] [start address]\r\n\
                 note: [filename] must be 8.3 format, address and start address in hex\r\n"
            );
        }
        assert!(m.calls.is_empty());
    }

    #[test]
    fn test_loadfile() {
        let d = Dispatcher::default();
        let mut m = FakeMachine::default();
        let (_, text) = run(&d, &mut m, "loadfile PROG.BIN 8000 0x8010");
        assert_eq!(text, "loadfile: 16 bytes at 8000, entry at 8010\r\n");
        assert_eq!(m.calls, ["load_file(PROG.BIN, 8000, 8010)"]);
    }

    #[test]
    fn test_loadfile_failure_is_reported() {
        let d = Dispatcher::default();
        let mut m = FakeMachine::default();
        let (cont, text) = run(&d, &mut m, "loadfile MISSING.BIN 0 0");
        assert!(cont);
        assert_eq!(text, "error: loadfile: MISSING.BIN: not found\r\n");
    }
}
