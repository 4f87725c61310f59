//! Conditional branch instructions.
//!
//! Every branch consumes its relative operand whether or not it is taken.
//! A taken branch costs one extra cycle, two when the target lies on a
//! different page than the instruction following the branch.

use crate::addressing::{resolve, AddressingMode};
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

fn branch_on<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode, taken: bool) -> u8 {
    let ea = resolve(cpu, mode);

    if taken {
        cpu.pc = ea.addr;
        1 + ea.page_crossed as u8
    } else {
        0
    }
}

/// BCC: branch when carry clear.
pub(crate) fn bcc<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let taken = !cpu.flag_c;
    branch_on(cpu, mode, taken)
}

/// BCS: branch when carry set.
pub(crate) fn bcs<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let taken = cpu.flag_c;
    branch_on(cpu, mode, taken)
}

/// BEQ: branch when zero set.
pub(crate) fn beq<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let taken = cpu.flag_z;
    branch_on(cpu, mode, taken)
}

/// BNE: branch when zero clear.
pub(crate) fn bne<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let taken = !cpu.flag_z;
    branch_on(cpu, mode, taken)
}

/// BMI: branch when negative set.
pub(crate) fn bmi<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let taken = cpu.flag_n;
    branch_on(cpu, mode, taken)
}

/// BPL: branch when negative clear.
pub(crate) fn bpl<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let taken = !cpu.flag_n;
    branch_on(cpu, mode, taken)
}

/// BVC: branch when overflow clear.
pub(crate) fn bvc<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let taken = !cpu.flag_v;
    branch_on(cpu, mode, taken)
}

/// BVS: branch when overflow set.
pub(crate) fn bvs<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) -> u8 {
    let taken = cpu.flag_v;
    branch_on(cpu, mode, taken)
}
