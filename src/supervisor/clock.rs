//! The `clk` and `trace` commands, and the rule that ties them together:
//! bus tracing needs a supervised clock, and a supervised clock can't run fast.

use crate::{
    emu::Machine,
    plat::{SResult, SuperError, Terminal},
    report,
};

use super::parse;

pub const CLK_USAGE: &str = "syntax: clk [stop|fast|<freq[kHz|MHz|GHz]>]";
pub const TRACE_USAGE: &str = "trace [0|1|2]";

/// Frequency limits applied by the `clk` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockPolicy {
    /// What `clk fast` selects.
    pub fast_hz: f64,
    /// The fastest the clock may run while the bus is being traced.
    pub slow_max_hz: f64,
}

impl Default for ClockPolicy {
    fn default() -> Self {
        Self {
            fast_hz: 8_000_000.0,
            slow_max_hz: 100_000.0,
        }
    }
}

/// What a `clk` command line asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ClockRequest {
    Report,
    Set(f64),
}

impl ClockPolicy {
    fn parse(&self, args: &[&str]) -> SResult<ClockRequest> {
        match args {
            [] => Ok(ClockRequest::Report),
            [arg] if arg.eq_ignore_ascii_case("stop") || arg.eq_ignore_ascii_case("stopped") => {
                Ok(ClockRequest::Set(0.0))
            }
            [arg] if arg.eq_ignore_ascii_case("fast") => Ok(ClockRequest::Set(self.fast_hz)),
            [arg] => parse::frequency(arg).map(ClockRequest::Set),
            _ => Err(SuperError::Usage(CLK_USAGE)),
        }
    }

    /// Sets the clock to `hz`, first switching tracing off if `hz` is too fast for it.
    pub fn apply(&self, hz: f64, machine: &mut dyn Machine, out: &mut dyn Terminal) {
        if hz > self.slow_max_hz && machine.trace_level() != 0 {
            report!(out, "clock: disabling bus tracing for high speed\r\n");
            machine.set_trace_level(0);
        }
        if machine.trace_level() != 0 && hz != 0.0 {
            machine.set_clock_supervised(hz);
        } else {
            machine.set_clock_independent(hz);
        }
    }

    /// `clk [stop|stopped|fast|<freq>]`
    pub fn clk(&self, args: &[&str], machine: &mut dyn Machine, out: &mut dyn Terminal) {
        match self.parse(args) {
            Ok(ClockRequest::Report) => {}
            Ok(ClockRequest::Set(hz)) => self.apply(hz, machine, out),
            Err(e) => {
                report!(out, "{}\r\n", e);
                return;
            }
        }
        report!(
            out,
            "clock: {} {}\r\n",
            machine.clock_mode(),
            format_frequency(machine.clock_frequency())
        );
    }
}

/// `trace <level>`
pub fn trace(args: &[&str], machine: &mut dyn Machine, out: &mut dyn Terminal) {
    let [level] = args else {
        report!(out, "{}\r\n", SuperError::Usage(TRACE_USAGE));
        return;
    };
    let level = parse::decimal_prefix(level);
    machine.set_trace_level(level);
    if level > 0 {
        let hz = machine.clock_frequency();
        machine.set_clock_supervised(hz);
    }
}

/// Renders a frequency in MHz, kHz or Hz, whichever keeps the figure near or above 1.
pub fn format_frequency(hz: f64) -> String {
    if hz >= 950_000.0 {
        format!("{:.3}MHz", hz / 1_000_000.0)
    } else if hz > 950.0 {
        format!("{:.3}kHz", hz / 1_000.0)
    } else {
        format!("{:.3}Hz", hz)
    }
}
