use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::plat::{ClockMode, Terminal};

use super::{ram::Sram, registers::Registers, EResult, EmuError, Machine};

/// A software stand-in for the Z80 board: register file, SRAM, clock generator and serial port.
///
/// There is no instruction decoder; the clock only counts T-states.
pub struct SimMachine {
    pub registers: Registers,
    pub sram: Sram,
    clock_mode: ClockMode,
    clock_hz: f64,
    trace_level: i32,
    t_states: u64,
    cycle_remainder: f64,
    uart_rx: VecDeque<u8>,
    file_dir: PathBuf,
}

impl SimMachine {
    /// Creates a powered-on machine with a stopped clock. `loadfile` names are resolved under `file_dir`.
    pub fn new(file_dir: impl Into<PathBuf>) -> Self {
        Self {
            registers: Registers::power_on(),
            sram: Sram::new(),
            clock_mode: ClockMode::Stopped,
            clock_hz: 0.0,
            trace_level: 0,
            t_states: 0,
            cycle_remainder: 0.0,
            uart_rx: VecDeque::new(),
            file_dir: file_dir.into(),
        }
    }

    pub fn t_states(&self) -> u64 {
        self.t_states
    }

    /// Takes the oldest byte the operator sent to the serial port.
    pub fn uart_take(&mut self) -> Option<u8> {
        self.uart_rx.pop_front()
    }

    fn set_clock(&mut self, mode: ClockMode, hz: f64) {
        self.clock_mode = mode;
        self.clock_hz = hz;
        self.cycle_remainder = 0.0;
        log::info!("clock {} at {} Hz", mode, hz);
    }
}

impl Machine for SimMachine {
    fn show_regs(&self, out: &mut dyn Terminal) {
        self.registers.dump(out);
        crate::report!(out, "T={}\r\n", self.t_states);
    }

    fn reset(&mut self) {
        log::info!("reset");
        self.registers = Registers::power_on();
    }

    fn clock_frequency(&self) -> f64 {
        self.clock_hz
    }

    fn clock_mode(&self) -> ClockMode {
        self.clock_mode
    }

    fn set_clock_independent(&mut self, hz: f64) {
        let mode = if hz == 0.0 {
            ClockMode::Stopped
        } else {
            ClockMode::Independent
        };
        self.set_clock(mode, hz);
    }

    fn set_clock_supervised(&mut self, hz: f64) {
        self.set_clock(ClockMode::Supervised, hz);
    }

    fn trace_level(&self) -> i32 {
        self.trace_level
    }

    fn set_trace_level(&mut self, level: i32) {
        log::info!("bus trace level {}", level);
        self.trace_level = level;
    }

    fn load_program(&mut self, image: &[u8], address: u16, start: u16) -> EResult<()> {
        self.sram.load(address, image)?;
        self.registers.pc = start;
        log::info!(
            "loaded {} bytes at {:04x}, pc={:04x}",
            image.len(),
            address,
            start
        );
        Ok(())
    }

    fn load_file(&mut self, name: &str, address: u16, start: u16) -> EResult<usize> {
        if !is_short_name(name) {
            log::warn!("{}: not an 8.3 file name", name);
        }
        let path = self.file_dir.join(name);
        let image = read_file(&path, name)?;
        self.load_program(&image, address, start)?;
        Ok(image.len())
    }

    fn uart_write(&mut self, byte: u8) {
        log::trace!("uart rx {:02x}", byte);
        self.uart_rx.push_back(byte);
    }

    fn advance(&mut self, elapsed: Duration) -> u64 {
        if self.clock_mode == ClockMode::Stopped
            || !self.clock_hz.is_finite()
            || self.clock_hz <= 0.0
        {
            return 0;
        }
        let cycles = self.clock_hz * elapsed.as_secs_f64() + self.cycle_remainder;
        let whole = cycles.floor();
        self.cycle_remainder = cycles - whole;
        let whole = whole as u64;
        self.t_states = self.t_states.saturating_add(whole);

        if self.clock_mode == ClockMode::Supervised && self.trace_level > 0 && whole > 0 {
            log::trace!(
                "bus: +{} cycles t={} pc={:04x} level={}",
                whole,
                self.t_states,
                self.registers.pc,
                self.trace_level
            );
        }
        whole
    }
}

fn read_file(path: &Path, name: &str) -> EResult<Vec<u8>> {
    fs::read(path).map_err(|source| EmuError::Io {
        name: name.to_string(),
        source,
    })
}

/// Checks for a DOS short name: up to eight characters, optionally a dot and up to three more.
pub fn is_short_name(name: &str) -> bool {
    let (stem, ext) = match name.split_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (name, ""),
    };
    let valid = |part: &str| part.bytes().all(|b| b.is_ascii_graphic() && b != b'.');
    !stem.is_empty() && stem.len() <= 8 && ext.len() <= 3 && valid(stem) && valid(ext)
}
