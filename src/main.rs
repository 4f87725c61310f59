//! Serial-console host for the 6502 emulator.
//!
//! Loads a raw program image, wires the monitored RAM and the serial
//! queues, and runs the machine with three threads: the emulation loop,
//! a stdin producer feeding the guest's input port, and a stdout consumer
//! draining the guest's output port. Diagnostics go to stderr so the
//! guest's serial stream stays clean on stdout.
//!
//! Exit codes: 0 on success, 1 on initialization failure, 2 when the
//! guest executes an invalid opcode.

use clap::Parser;
use mos6502_emu::{Bus, ByteQueue, ClockPacer, Cpu, EmulatorError, MonitoredRam};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

const EXIT_INIT_FAILURE: i32 = 1;
const EXIT_INVALID_OPCODE: i32 = 2;

#[derive(Parser)]
#[command(version, about = "Cycle-aware MOS 6502 emulator with a serial console")]
struct Options {
    /// Raw program image (no header) copied into memory at the load
    /// address.
    program: PathBuf,

    /// Load address and reset target, decimal or 0x-prefixed hex.
    #[arg(short = 'a', long, default_value = "0x0400", value_parser = parse_address)]
    load_address: u16,

    /// Nominal clock frequency in Hz, or a preset: apple1, atari2600,
    /// c64.
    #[arg(short, long, default_value = "1000000", value_parser = parse_frequency)]
    frequency: f64,

    /// Start execution here instead of at the load address (useful for
    /// full 64 KiB images whose entry point is not their base).
    #[arg(long, value_parser = parse_address)]
    start_pc: Option<u16>,

    /// Trace every executed instruction on stderr.
    #[arg(long)]
    debug: bool,

    /// Stop after this many instructions; 0 means run until halted.
    #[arg(long, default_value_t = 0)]
    max_instructions: u64,
}

fn parse_address(text: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        text.parse::<u16>()
    };
    parsed.map_err(|_| format!("not a 16-bit address: {}", text))
}

fn parse_frequency(text: &str) -> Result<f64, String> {
    let hz = match text.to_ascii_lowercase().as_str() {
        "apple1" => ClockPacer::APPLE_I_HZ,
        "atari2600" => ClockPacer::ATARI_2600_HZ,
        "c64" => ClockPacer::COMMODORE_64_HZ,
        other => other
            .parse::<f64>()
            .map_err(|_| format!("not a frequency: {}", text))?,
    };

    if hz.is_finite() && hz > 0.0 {
        Ok(hz)
    } else {
        Err(format!("frequency must be positive: {}", text))
    }
}

fn lock_cpu(cpu: &Mutex<Cpu<Bus>>) -> MutexGuard<'_, Cpu<Bus>> {
    cpu.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn main() {
    let options = Options::parse();

    let default_level = if options.debug { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    std::process::exit(run(options));
}

fn run(options: Options) -> i32 {
    let image = match std::fs::read(&options.program) {
        Ok(bytes) => bytes,
        Err(err) => {
            let error = if err.kind() == std::io::ErrorKind::NotFound {
                EmulatorError::FileNotFound(options.program.display().to_string())
            } else {
                EmulatorError::ReadFailed(err.to_string())
            };
            log::error!("{}", error);
            return EXIT_INIT_FAILURE;
        }
    };

    let input = Arc::new(ByteQueue::new());
    let output = Arc::new(ByteQueue::new());

    // Monitored RAM backs the whole address space; the serial ports are
    // intercepted by the CPU ahead of the bus.
    let mut bus = Bus::new();
    if let Err(err) = bus.connect(
        Box::new(MonitoredRam::new(Arc::clone(&output))),
        0x0000,
        0xFFFF,
    ) {
        log::error!("bus setup failed: {}", err);
        return EXIT_INIT_FAILURE;
    }

    let mut cpu = Cpu::with_io(bus, Arc::clone(&input), Arc::clone(&output));
    cpu.set_debug(options.debug);

    if let Err(err) = cpu.set_frequency(options.frequency) {
        log::error!("{}", err);
        return EXIT_INIT_FAILURE;
    }
    if let Err(err) = cpu.load_program(&image, options.load_address) {
        log::error!(
            "cannot load {} at 0x{:04X}: {}",
            options.program.display(),
            options.load_address,
            err
        );
        return EXIT_INIT_FAILURE;
    }

    cpu.reset();
    if let Some(pc) = options.start_pc {
        cpu.set_pc(pc);
    }
    log::info!(
        "loaded {} bytes at 0x{:04X}, clock {:.0} Hz",
        image.len(),
        options.load_address,
        options.frequency
    );

    let control = cpu.control();
    let cpu = Arc::new(Mutex::new(cpu));

    // Guest output to stdout; drains the backlog before honoring exit.
    let consumer = {
        let output = Arc::clone(&output);
        let control = Arc::clone(&control);
        thread::spawn(move || {
            let mut stdout = std::io::stdout();
            loop {
                match output.dequeue() {
                    Some(byte) => {
                        let _ = stdout.write_all(&[byte]);
                        let _ = stdout.flush();
                    }
                    None => {
                        if control.exit_requested() {
                            break;
                        }
                        thread::sleep(Duration::from_millis(2));
                    }
                }
            }
        })
    };

    // Host input to the guest's serial port. Detached: a blocking stdin
    // read cannot be interrupted portably, and the process exit reaps it.
    {
        let input = Arc::clone(&input);
        let control = Arc::clone(&control);
        thread::spawn(move || {
            let mut stdin = std::io::stdin();
            let mut buf = [0u8; 1];
            while !control.exit_requested() {
                match stdin.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        // Back off until the guest consumes its backlog.
                        while input.enqueue(buf[0]).is_err() {
                            if control.exit_requested() {
                                return;
                            }
                            thread::sleep(Duration::from_millis(2));
                        }
                    }
                }
            }
        });
    }

    let emulation = {
        let cpu = Arc::clone(&cpu);
        let control = Arc::clone(&control);
        let max_instructions = options.max_instructions;
        thread::spawn(move || -> i32 {
            let mut executed: u64 = 0;
            while !control.exit_requested() {
                let result = lock_cpu(&cpu).step();
                match result {
                    Ok(_) => {
                        executed += 1;
                        if max_instructions != 0 && executed >= max_instructions {
                            log::info!("instruction budget of {} reached", max_instructions);
                            break;
                        }
                    }
                    Err(EmulatorError::InvalidOpcode { pc, opcode }) => {
                        log::error!(
                            "halting: invalid opcode 0x{:02X} at PC 0x{:04X}",
                            opcode,
                            pc
                        );
                        control.request_exit();
                        return EXIT_INVALID_OPCODE;
                    }
                    Err(err) => {
                        log::error!("halting: {}", err);
                        control.request_exit();
                        return EXIT_INIT_FAILURE;
                    }
                }
            }
            control.request_exit();
            0
        })
    };

    let code = emulation.join().unwrap_or(EXIT_INIT_FAILURE);
    let _ = consumer.join();

    {
        let cpu = lock_cpu(&cpu);
        log::info!("{}  cycles: {}", cpu.snapshot_registers(), cpu.cycles());
    }

    code
}
