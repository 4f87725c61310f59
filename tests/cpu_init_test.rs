//! Tests for CPU power-on and reset behavior.

use mos6502_emu::{Cpu, FlatMemory, MemoryBus};

fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    Cpu::new(memory)
}

#[test]
fn test_power_on_reads_reset_vector() {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x34);
    memory.write(0xFFFD, 0x12);

    let cpu = Cpu::new(memory);
    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_power_on_register_state() {
    let cpu = setup_cpu();

    assert_eq!(cpu.a(), 0x00);
    assert_eq!(cpu.x(), 0x00);
    assert_eq!(cpu.y(), 0x00);
    assert_eq!(cpu.sp(), 0xFD);
    assert_eq!(cpu.cycles(), 0);

    // P = 0x24: I and U set, everything else clear.
    assert_eq!(cpu.status(), 0x24);
    assert!(cpu.flag_i());
    assert!(!cpu.flag_n());
    assert!(!cpu.flag_v());
    assert!(!cpu.flag_d());
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_c());
}

#[test]
fn test_reset_rereads_vector() {
    let mut cpu = setup_cpu();

    // Move the vector, then reset; PC must follow the new vector.
    cpu.memory_mut().write(0xFFFC, 0x00);
    cpu.memory_mut().write(0xFFFD, 0xC0);
    cpu.set_pc(0x4567);

    cpu.reset();
    assert_eq!(cpu.pc(), 0xC000);
}

#[test]
fn test_reset_scrubs_state() {
    let mut cpu = setup_cpu();

    cpu.set_a(0x11);
    cpu.set_x(0x22);
    cpu.set_y(0x33);
    cpu.set_sp(0x40);
    cpu.set_flag_d(true);
    cpu.set_flag_c(true);
    cpu.set_flag_n(true);

    cpu.reset();

    assert_eq!(cpu.a(), 0x00);
    assert_eq!(cpu.x(), 0x00);
    assert_eq!(cpu.y(), 0x00);
    assert_eq!(cpu.sp(), 0xFD);
    assert_eq!(cpu.status(), 0x24);
    assert_eq!(cpu.cycles(), 0);
}

#[test]
fn test_reset_is_idempotent() {
    let mut cpu = setup_cpu();

    cpu.reset();
    let first = cpu.snapshot_registers();
    cpu.reset();
    let second = cpu.snapshot_registers();

    assert_eq!(first, second);
}

#[test]
fn test_reset_clears_pending_interrupts() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0xEA); // NOP

    // Point the NMI vector somewhere recognizable.
    cpu.memory_mut().write(0xFFFA, 0x00);
    cpu.memory_mut().write(0xFFFB, 0x90);

    cpu.inject_nmi();
    cpu.reset();

    // The latch was cleared by reset, so the NOP runs normally.
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8001);
}

#[test]
fn test_reset_releases_pause() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0xEA);

    cpu.control().pause();
    cpu.reset();
    assert!(!cpu.control().is_paused());

    // Would deadlock if the pause flag survived the reset.
    cpu.step().unwrap();
}
