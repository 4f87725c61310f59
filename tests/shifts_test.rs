//! Tests for ASL, LSR, ROL, and ROR in accumulator and memory forms.

use mos6502_emu::{Cpu, FlatMemory, MemoryBus};

fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    Cpu::new(memory)
}

#[test]
fn test_asl_accumulator() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x0A);
    cpu.set_a(0x81);

    let cycles = cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x02);
    assert!(cpu.flag_c()); // bit 7 shifted out
    assert!(!cpu.flag_n());
    assert_eq!(cycles, 2);
}

#[test]
fn test_asl_memory() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load_bytes(0x8000, &[0x06, 0x10]); // ASL $10
    cpu.memory_mut().write(0x0010, 0x40);

    let cycles = cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x0010), 0x80);
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
    assert_eq!(cycles, 5);
}

#[test]
fn test_asl_absolute_x_flat_cost() {
    let mut cpu = setup_cpu();

    // Read-modify-write cost is 7 regardless of page crossing.
    cpu.memory_mut().load_bytes(0x8000, &[0x1E, 0xFF, 0x10]);
    cpu.set_x(0x01);
    cpu.memory_mut().write(0x1100, 0x01);

    let cycles = cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x1100), 0x02);
    assert_eq!(cycles, 7);
}

#[test]
fn test_lsr_accumulator() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x4A);
    cpu.set_a(0x01);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_c()); // bit 0 shifted out
    assert!(cpu.flag_z());
    assert!(!cpu.flag_n()); // LSR can never set N
}

#[test]
fn test_rol_carries_through() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x2A);
    cpu.set_a(0x80);
    cpu.set_flag_c(true);

    cpu.step().unwrap();

    // Old C enters bit 0, old bit 7 exits into C.
    assert_eq!(cpu.a(), 0x01);
    assert!(cpu.flag_c());
}

#[test]
fn test_ror_carries_through() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load_bytes(0x8000, &[0x66, 0x10]); // ROR $10
    cpu.memory_mut().write(0x0010, 0x01);
    cpu.set_flag_c(true);

    cpu.step().unwrap();

    // Old C enters bit 7, old bit 0 exits into C.
    assert_eq!(cpu.memory().read(0x0010), 0x80);
    assert!(cpu.flag_c());
    assert!(cpu.flag_n());
}

#[test]
fn test_rotate_pair_restores_value() {
    // ROL then ROR with the carry threading through restores A and C.
    let mut cpu = setup_cpu();
    cpu.memory_mut().load_bytes(0x8000, &[0x2A, 0x6A]);
    cpu.set_a(0xB7);
    cpu.set_flag_c(false);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0xB7);
    assert!(!cpu.flag_c());
}
