//! Register transfer instructions.
//!
//! All update Z and N from the transferred value except TXS, which moves
//! X into the stack pointer without touching any flag.

use crate::addressing::AddressingMode;
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

/// TAX: A to X.
pub(crate) fn tax<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.x = cpu.a;
    let x = cpu.x;
    cpu.set_zn(x);
    0
}

/// TAY: A to Y.
pub(crate) fn tay<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.y = cpu.a;
    let y = cpu.y;
    cpu.set_zn(y);
    0
}

/// TXA: X to A.
pub(crate) fn txa<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.a = cpu.x;
    let a = cpu.a;
    cpu.set_zn(a);
    0
}

/// TYA: Y to A.
pub(crate) fn tya<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.a = cpu.y;
    let a = cpu.a;
    cpu.set_zn(a);
    0
}

/// TSX: SP to X.
pub(crate) fn tsx<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.x = cpu.sp;
    let x = cpu.x;
    cpu.set_zn(x);
    0
}

/// TXS: X to SP. No flags.
pub(crate) fn txs<M: MemoryBus>(cpu: &mut Cpu<M>, _mode: AddressingMode) -> u8 {
    cpu.sp = cpu.x;
    0
}
