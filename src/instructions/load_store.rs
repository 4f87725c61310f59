//! Load and store instructions.
//!
//! Loads pay the page-cross penalty on indexed modes; stores never do
//! (their base cycle costs already cover the fixup cycle).

use crate::addressing::{resolve, AddressingMode};
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

/// LDA: load accumulator.
pub(crate) fn lda<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let ea = resolve(cpu, mode);
    let value = cpu.read(ea.addr);
    cpu.a = value;
    cpu.set_zn(value);
    ea.page_crossed as u8
}

/// LDX: load X register.
pub(crate) fn ldx<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let ea = resolve(cpu, mode);
    let value = cpu.read(ea.addr);
    cpu.x = value;
    cpu.set_zn(value);
    ea.page_crossed as u8
}

/// LDY: load Y register.
pub(crate) fn ldy<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let ea = resolve(cpu, mode);
    let value = cpu.read(ea.addr);
    cpu.y = value;
    cpu.set_zn(value);
    ea.page_crossed as u8
}

/// STA: store accumulator. Flags untouched.
pub(crate) fn sta<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let ea = resolve(cpu, mode);
    let a = cpu.a;
    cpu.write(ea.addr, a);
    0
}

/// STX: store X register.
pub(crate) fn stx<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let ea = resolve(cpu, mode);
    let x = cpu.x;
    cpu.write(ea.addr, x);
    0
}

/// STY: store Y register.
pub(crate) fn sty<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let ea = resolve(cpu, mode);
    let y = cpu.y;
    cpu.write(ea.addr, y);
    0
}
