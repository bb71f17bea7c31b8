use std::{io, time};

use anyhow::Result;
use clap::Parser;
use rustyline::{error::ReadlineError, DefaultEditor};
use tokio::{
    io::AsyncReadExt,
    runtime::Builder,
    time::{interval, Instant, MissedTickBehavior},
};
use z80super::{
    config::Config,
    console::{Console, RawMode, SerialOut},
    emu::{machine::SimMachine, rom::RomSet, Machine},
    plat::EOT,
    supervisor::{Supervisor, PROMPT},
};

fn main() -> Result<()> {
    let config = Config::parse();
    simplelog::TermLogger::init(
        config.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let roms = RomSet::load(config.basic_rom.as_deref(), config.monitor_rom.as_deref());
    let machine = SimMachine::new(&config.file_dir);
    let supervisor = Supervisor::new(config.supervisor_config(), roms);

    if config.line_mode {
        run_lines(machine, supervisor)
    } else {
        let console = Console::new(machine, supervisor, config.escape_keycode);
        run_serial(console, &config)
    }
}

/// Feeds stdin to the console a byte at a time while the clock ticks over in between.
///
/// On a terminal, raw mode is held for the whole loop; Ctrl-D inside the supervisor then quits,
/// since the terminal no longer turns it into end of input.
fn run_serial(mut console: Console<SimMachine>, config: &Config) -> Result<()> {
    let raw = RawMode::enable()?;
    log::info!(
        "console ready, press 0x{:02x} for the supervisor",
        config.escape_keycode
    );
    let rt = Builder::new_current_thread().enable_all().build()?;
    let tick = config.tick();
    rt.block_on(async move {
        let mut stdin = tokio::io::stdin();
        let mut out = SerialOut::new(io::stdout());
        let mut clock = interval(tick);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();
        let mut byte = [0u8; 1];
        loop {
            tokio::select! {
                read = stdin.read(&mut byte) => {
                    if read? == 0 || (raw.is_engaged() && console.in_menu() && byte[0] == EOT) {
                        break;
                    }
                    console.feed(byte[0], &mut out);
                    out.flush();
                }
                now = clock.tick() => {
                    console.machine_mut().advance(now - last);
                    last = now;
                }
            }
        }
        log::info!("end of input after {} T-states", console.machine().t_states());
        Ok::<(), anyhow::Error>(())
    })
}

/// Runs whole lines from the terminal as supervisor commands until one of them ends the session.
fn run_lines(mut machine: SimMachine, supervisor: Supervisor) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut out = SerialOut::new(io::stdout());
    let mut last = time::Instant::now();
    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let now = time::Instant::now();
        machine.advance(now - last);
        last = now;
        let keep_going = supervisor.execute(&line, &mut machine, &mut out);
        out.flush();
        if !keep_going {
            break;
        }
    }
    Ok(())
}
