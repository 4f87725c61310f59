//! Shift and rotate instructions.
//!
//! Each exists in an accumulator form and a memory read-modify-write form;
//! the addressing mode selects between them. C always receives the
//! shifted-out bit, and for rotates the vacated bit receives the previous
//! C.

use crate::addressing::{resolve, AddressingMode};
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

fn modify<M, F>(cpu: &mut Cpu<M>, mode: AddressingMode, operation: F) -> u8
where
    M: MemoryBus,
    F: FnOnce(&mut Cpu<M>, u8) -> u8,
{
    if mode == AddressingMode::Accumulator {
        let value = cpu.a;
        let result = operation(cpu, value);
        cpu.a = result;
        cpu.set_zn(result);
    } else {
        let ea = resolve(cpu, mode);
        let value = cpu.read(ea.addr);
        let result = operation(cpu, value);
        cpu.write(ea.addr, result);
        cpu.set_zn(result);
    }
    0
}

/// ASL: shift left, bit 7 into C, bit 0 cleared.
pub(crate) fn asl<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    modify(cpu, mode, |cpu, value| {
        cpu.flag_c = (value & 0x80) != 0;
        value << 1
    })
}

/// LSR: shift right, bit 0 into C, bit 7 cleared.
pub(crate) fn lsr<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    modify(cpu, mode, |cpu, value| {
        cpu.flag_c = (value & 0x01) != 0;
        value >> 1
    })
}

/// ROL: rotate left through carry.
pub(crate) fn rol<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    modify(cpu, mode, |cpu, value| {
        let carry_in = cpu.flag_c as u8;
        cpu.flag_c = (value & 0x80) != 0;
        (value << 1) | carry_in
    })
}

/// ROR: rotate right through carry.
pub(crate) fn ror<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    modify(cpu, mode, |cpu, value| {
        let carry_in = (cpu.flag_c as u8) << 7;
        cpu.flag_c = (value & 0x01) != 0;
        (value >> 1) | carry_in
    })
}
