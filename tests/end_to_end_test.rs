//! End-to-end guest programs exercising the whole execution engine.

use mos6502_emu::{Cpu, EmulatorError, FlatMemory, MemoryBus};

fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.load_bytes(0xFFFC, &[0x00, 0x80]);
    Cpu::new(memory)
}

#[test]
fn test_immediate_load_and_store_then_brk() {
    let mut cpu = setup_cpu();

    // LDA #$42; STA $2000; BRK
    cpu.memory_mut()
        .load_bytes(0x8000, &[0xA9, 0x42, 0x8D, 0x00, 0x20, 0x00]);
    cpu.memory_mut().load_bytes(0xFFFE, &[0x00, 0xA0]);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x42);
    assert_eq!(cpu.memory().read(0x2000), 0x42);
    assert_eq!(cpu.pc(), 0x8005); // sitting on the BRK

    cpu.step().unwrap();

    // BRK pushed PC+1 (0x8007), pushed P|0x30, set I, vectored.
    assert_eq!(cpu.pc(), 0xA000);
    assert!(cpu.flag_i());
    assert_eq!(cpu.memory().read(0x01FD), 0x80);
    assert_eq!(cpu.memory().read(0x01FC), 0x07);
    assert_eq!(cpu.memory().read(0x01FB) & 0x30, 0x30);
}

#[test]
fn test_countdown_loop() {
    let mut cpu = setup_cpu();

    // LDX #$05
    // loop: DEX
    //       BNE loop
    //       STX $0200
    cpu.memory_mut()
        .load_bytes(0x8000, &[0xA2, 0x05, 0xCA, 0xD0, 0xFD, 0x86, 0x00]);

    // LDX + 5*(DEX+BNE) + STX, with the final BNE not taken.
    for _ in 0..12 {
        cpu.step().unwrap();
    }

    assert_eq!(cpu.x(), 0x00);
    assert_eq!(cpu.memory().read(0x0000), 0x00);
    assert_eq!(cpu.pc(), 0x8007);
    assert!(cpu.flag_z());
}

#[test]
fn test_subroutine_adds_via_stack() {
    let mut cpu = setup_cpu();

    // Main: LDA #$21; JSR $9000; STA $0300; BRK-free spin
    cpu.memory_mut()
        .load_bytes(0x8000, &[0xA9, 0x21, 0x20, 0x00, 0x90, 0x8D, 0x00, 0x03]);
    // Sub: CLC; ADC #$21; RTS
    cpu.memory_mut().load_bytes(0x9000, &[0x18, 0x69, 0x21, 0x60]);

    for _ in 0..6 {
        cpu.step().unwrap();
    }

    assert_eq!(cpu.memory().read(0x0300), 0x42);
    assert_eq!(cpu.sp(), 0xFD);
    assert_eq!(cpu.pc(), 0x8008);
}

#[test]
fn test_invalid_opcode_halts_with_context() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load_bytes(0x8000, &[0xEA, 0x02]);

    cpu.step().unwrap();
    let err = cpu.step().unwrap_err();

    assert_eq!(
        err,
        EmulatorError::InvalidOpcode {
            pc: 0x8001,
            opcode: 0x02
        }
    );
    assert_eq!(err.to_string(), "invalid opcode 0x02 at PC 0x8001");
}

#[test]
fn test_pc_wraps_at_top_of_memory() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0xFFFF, 0xEA); // NOP at the very top
    cpu.set_pc(0xFFFF);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x0000);
}

#[test]
fn test_decimal_counter_program() {
    let mut cpu = setup_cpu();

    // SED; LDA #$09; CLC; ADC #$01; STA $0210
    cpu.memory_mut()
        .load_bytes(0x8000, &[0xF8, 0xA9, 0x09, 0x18, 0x69, 0x01, 0x85, 0x10]);

    for _ in 0..5 {
        cpu.step().unwrap();
    }

    // 9 + 1 = 10 in BCD.
    assert_eq!(cpu.memory().read(0x0010), 0x10);
}
