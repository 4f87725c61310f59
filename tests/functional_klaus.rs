//! Klaus Dormann's 6502 functional test.
//!
//! Integrates the comprehensive suite from
//! https://github.com/Klaus2m5/6502_65C02_functional_tests, which
//! exercises every documented opcode and addressing mode, including
//! decimal arithmetic.
//!
//! ## How the test works
//!
//! 1. load the 64 KiB binary image (code, data, and vectors)
//! 2. start execution at the entry point (0x0400)
//! 3. run until the PC stops moving (`JMP *` traps)
//! 4. pass if the trap is the known success address (0x3469)
//!
//! Any other trap address identifies the failing test; look it up in the
//! listing that accompanies the binary.
//!
//! The binary is not committed; drop it at
//! `tests/fixtures/6502_functional_test.bin` and run with `--ignored`.

use mos6502_emu::{Cpu, FlatMemory, MemoryBus};
use std::path::Path;

const FIXTURE_PATH: &str = "tests/fixtures/6502_functional_test.bin";

/// Entry point of the functional test.
const ENTRY_POINT: u16 = 0x0400;

/// Where the PC traps when every test passed.
const SUCCESS_ADDRESS: u16 = 0x3469;

/// Upper bound before declaring the run hung.
const MAX_STEPS: u64 = 100_000_000;

/// Consecutive identical PC values that count as a trap.
const TRAP_THRESHOLD: u32 = 3;

fn load_fixture() -> Option<FlatMemory> {
    if !Path::new(FIXTURE_PATH).exists() {
        return None;
    }

    let image = std::fs::read(FIXTURE_PATH)
        .unwrap_or_else(|err| panic!("cannot read {}: {}", FIXTURE_PATH, err));
    assert_eq!(image.len(), 0x10000, "expected a full 64 KiB image");

    let mut memory = FlatMemory::new();
    memory.load_bytes(0x0000, &image);

    // Make sure reset lands on the entry point regardless of what the
    // image put in the vector.
    memory.write(0xFFFC, (ENTRY_POINT & 0xFF) as u8);
    memory.write(0xFFFD, (ENTRY_POINT >> 8) as u8);

    Some(memory)
}

/// Runs until the PC traps in place, returning the trap address.
fn run_until_trap(cpu: &mut Cpu<FlatMemory>) -> Result<u16, String> {
    let mut last_pc = cpu.pc();
    let mut repeats: u32 = 0;

    for _ in 0..MAX_STEPS {
        if let Err(err) = cpu.step() {
            return Err(format!("execution failed at PC ${:04X}: {}", last_pc, err));
        }

        let pc = cpu.pc();
        if pc == last_pc {
            repeats += 1;
            if repeats >= TRAP_THRESHOLD {
                return Ok(pc);
            }
        } else {
            repeats = 0;
            last_pc = pc;
        }
    }

    Err(format!(
        "no trap after {} steps, last PC ${:04X}",
        MAX_STEPS, last_pc
    ))
}

#[test]
#[ignore = "slow; needs tests/fixtures/6502_functional_test.bin"]
fn klaus_functional_test_reaches_success_trap() {
    let memory = match load_fixture() {
        Some(memory) => memory,
        None => {
            eprintln!("skipping: {} not present", FIXTURE_PATH);
            return;
        }
    };

    let mut cpu = Cpu::new(memory);
    assert_eq!(cpu.pc(), ENTRY_POINT);

    // Run flat out; pacing at a nominal guest speed would take minutes.
    cpu.set_frequency(1_000_000_000.0).unwrap();

    match run_until_trap(&mut cpu) {
        Ok(SUCCESS_ADDRESS) => {}
        Ok(trap) => panic!(
            "trapped at ${:04X} instead of ${:04X}; {}",
            trap,
            SUCCESS_ADDRESS,
            cpu.snapshot_registers()
        ),
        Err(err) => panic!("{}", err),
    }
}
