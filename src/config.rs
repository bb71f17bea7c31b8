//! Command line configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use log::LevelFilter;

use crate::supervisor::{ClockPolicy, SupervisorConfig};

/// Serial console supervisor for an emulated Z80 machine.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Config {
    /// Frequency selected by `clk fast`, in Hz.
    #[arg(long, default_value_t = 8_000_000.0)]
    pub fast_hz: f64,

    /// Highest clock frequency allowed while the bus is traced, in Hz.
    #[arg(long, default_value_t = 100_000.0)]
    pub slow_max_hz: f64,

    /// Key that opens the supervisor menu (decimal or 0x-prefixed hex).
    #[arg(long, default_value = "0x1d", value_parser = parse_keycode)]
    pub escape_keycode: u8,

    /// Size of the supervisor's command line buffer.
    #[arg(long, default_value_t = 80)]
    pub line_capacity: usize,

    /// BASIC ROM image for `loadrom basic`.
    #[arg(long)]
    pub basic_rom: Option<PathBuf>,

    /// Monitor ROM image for `loadrom monitor`.
    #[arg(long)]
    pub monitor_rom: Option<PathBuf>,

    /// Directory `loadfile` reads from.
    #[arg(long, default_value = ".")]
    pub file_dir: PathBuf,

    /// Read whole lines with history-free line editing and run them as supervisor commands.
    #[arg(long)]
    pub line_mode: bool,

    /// How often the emulated clock is advanced, in milliseconds.
    #[arg(long, default_value_t = 10)]
    pub tick_ms: u64,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Config {
    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            line_capacity: self.line_capacity,
            escape_keycode: self.escape_keycode,
            clock: ClockPolicy {
                fast_hz: self.fast_hz,
                slow_max_hz: self.slow_max_hz,
            },
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

fn parse_keycode(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("bad keycode {s:?}: {e}"))
}
