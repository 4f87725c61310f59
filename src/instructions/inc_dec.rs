//! Increment and decrement instructions.

use crate::addressing::{resolve, AddressingMode};
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

/// INC: read-modify-write increment of memory.
pub(crate) fn inc<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let ea = resolve(cpu, mode);
    let value = cpu.read(ea.addr).wrapping_add(1);
    cpu.write(ea.addr, value);
    cpu.set_zn(value);
    0
}

/// DEC: read-modify-write decrement of memory.
pub(crate) fn dec<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let ea = resolve(cpu, mode);
    let value = cpu.read(ea.addr).wrapping_sub(1);
    cpu.write(ea.addr, value);
    cpu.set_zn(value);
    0
}

/// INX: increment X.
pub(crate) fn inx<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.x = cpu.x.wrapping_add(1);
    let x = cpu.x;
    cpu.set_zn(x);
    0
}

/// INY: increment Y.
pub(crate) fn iny<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.y = cpu.y.wrapping_add(1);
    let y = cpu.y;
    cpu.set_zn(y);
    0
}

/// DEX: decrement X.
pub(crate) fn dex<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.x = cpu.x.wrapping_sub(1);
    let x = cpu.x;
    cpu.set_zn(x);
    0
}

/// DEY: decrement Y.
pub(crate) fn dey<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.y = cpu.y.wrapping_sub(1);
    let y = cpu.y;
    cpu.set_zn(y);
    0
}
