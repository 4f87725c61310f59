//! # Opcode Dispatch Table
//!
//! The 256-entry table mapping every opcode byte to its mnemonic,
//! instruction, addressing mode, base cycle cost, and encoded size. The
//! table is built at compile time; there is no runtime dispatch state.
//!
//! All 151 documented NMOS 6502 opcodes are present. Undocumented opcodes
//! decode to [`Instruction::Illegal`] and are reported as errors by the
//! execution engine, with one conventional exception: `0xEB` behaves as
//! `SBC #imm`.
//!
//! Base cycle costs exclude the dynamic penalties (page crossings on
//! indexed reads, taken branches); those are added during execution.

use crate::addressing::AddressingMode;

/// The operation an opcode performs, independent of addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
    /// No documented meaning; executing it is an error.
    Illegal,
}

/// Static decode information for one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    /// Three-letter instruction name, `"???"` for undocumented opcodes.
    pub mnemonic: &'static str,

    /// Operation to perform.
    pub instruction: Instruction,

    /// How the operand bytes are interpreted.
    pub mode: AddressingMode,

    /// Cycle cost before page-cross and branch penalties.
    pub base_cycles: u8,

    /// Encoded size including the opcode byte (1 to 3).
    pub size_bytes: u8,
}

const ILLEGAL: OpcodeEntry = OpcodeEntry {
    mnemonic: "???",
    instruction: Instruction::Illegal,
    mode: AddressingMode::Implied,
    base_cycles: 0,
    size_bytes: 1,
};

const fn op(
    mnemonic: &'static str,
    instruction: Instruction,
    mode: AddressingMode,
    base_cycles: u8,
    size_bytes: u8,
) -> OpcodeEntry {
    OpcodeEntry {
        mnemonic,
        instruction,
        mode,
        base_cycles,
        size_bytes,
    }
}

/// Complete decode table indexed by opcode byte.
///
/// # Examples
///
/// ```
/// use mos6502_emu::{AddressingMode, Instruction, OPCODE_TABLE};
///
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, "LDA");
/// assert_eq!(lda_imm.instruction, Instruction::Lda);
/// assert_eq!(lda_imm.mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// assert_eq!(lda_imm.size_bytes, 2);
/// ```
pub const OPCODE_TABLE: [OpcodeEntry; 256] = build_table();

const fn build_table() -> [OpcodeEntry; 256] {
    use AddressingMode::*;
    use Instruction::*;

    let mut t = [ILLEGAL; 256];

    // ADC - Add with Carry
    t[0x69] = op("ADC", Adc, Immediate, 2, 2);
    t[0x65] = op("ADC", Adc, ZeroPage, 3, 2);
    t[0x75] = op("ADC", Adc, ZeroPageX, 4, 2);
    t[0x6D] = op("ADC", Adc, Absolute, 4, 3);
    t[0x7D] = op("ADC", Adc, AbsoluteX, 4, 3);
    t[0x79] = op("ADC", Adc, AbsoluteY, 4, 3);
    t[0x61] = op("ADC", Adc, IndirectX, 6, 2);
    t[0x71] = op("ADC", Adc, IndirectY, 5, 2);

    // AND - Logical AND
    t[0x29] = op("AND", And, Immediate, 2, 2);
    t[0x25] = op("AND", And, ZeroPage, 3, 2);
    t[0x35] = op("AND", And, ZeroPageX, 4, 2);
    t[0x2D] = op("AND", And, Absolute, 4, 3);
    t[0x3D] = op("AND", And, AbsoluteX, 4, 3);
    t[0x39] = op("AND", And, AbsoluteY, 4, 3);
    t[0x21] = op("AND", And, IndirectX, 6, 2);
    t[0x31] = op("AND", And, IndirectY, 5, 2);

    // ASL - Arithmetic Shift Left
    t[0x0A] = op("ASL", Asl, Accumulator, 2, 1);
    t[0x06] = op("ASL", Asl, ZeroPage, 5, 2);
    t[0x16] = op("ASL", Asl, ZeroPageX, 6, 2);
    t[0x0E] = op("ASL", Asl, Absolute, 6, 3);
    t[0x1E] = op("ASL", Asl, AbsoluteX, 7, 3);

    // Branches
    t[0x90] = op("BCC", Bcc, Relative, 2, 2);
    t[0xB0] = op("BCS", Bcs, Relative, 2, 2);
    t[0xF0] = op("BEQ", Beq, Relative, 2, 2);
    t[0x30] = op("BMI", Bmi, Relative, 2, 2);
    t[0xD0] = op("BNE", Bne, Relative, 2, 2);
    t[0x10] = op("BPL", Bpl, Relative, 2, 2);
    t[0x50] = op("BVC", Bvc, Relative, 2, 2);
    t[0x70] = op("BVS", Bvs, Relative, 2, 2);

    // BIT - Bit Test
    t[0x24] = op("BIT", Bit, ZeroPage, 3, 2);
    t[0x2C] = op("BIT", Bit, Absolute, 4, 3);

    // BRK - Force Interrupt
    t[0x00] = op("BRK", Brk, Implied, 7, 1);

    // Flag operations
    t[0x18] = op("CLC", Clc, Implied, 2, 1);
    t[0xD8] = op("CLD", Cld, Implied, 2, 1);
    t[0x58] = op("CLI", Cli, Implied, 2, 1);
    t[0xB8] = op("CLV", Clv, Implied, 2, 1);
    t[0x38] = op("SEC", Sec, Implied, 2, 1);
    t[0xF8] = op("SED", Sed, Implied, 2, 1);
    t[0x78] = op("SEI", Sei, Implied, 2, 1);

    // CMP - Compare Accumulator
    t[0xC9] = op("CMP", Cmp, Immediate, 2, 2);
    t[0xC5] = op("CMP", Cmp, ZeroPage, 3, 2);
    t[0xD5] = op("CMP", Cmp, ZeroPageX, 4, 2);
    t[0xCD] = op("CMP", Cmp, Absolute, 4, 3);
    t[0xDD] = op("CMP", Cmp, AbsoluteX, 4, 3);
    t[0xD9] = op("CMP", Cmp, AbsoluteY, 4, 3);
    t[0xC1] = op("CMP", Cmp, IndirectX, 6, 2);
    t[0xD1] = op("CMP", Cmp, IndirectY, 5, 2);

    // CPX - Compare X Register
    t[0xE0] = op("CPX", Cpx, Immediate, 2, 2);
    t[0xE4] = op("CPX", Cpx, ZeroPage, 3, 2);
    t[0xEC] = op("CPX", Cpx, Absolute, 4, 3);

    // CPY - Compare Y Register
    t[0xC0] = op("CPY", Cpy, Immediate, 2, 2);
    t[0xC4] = op("CPY", Cpy, ZeroPage, 3, 2);
    t[0xCC] = op("CPY", Cpy, Absolute, 4, 3);

    // DEC - Decrement Memory
    t[0xC6] = op("DEC", Dec, ZeroPage, 5, 2);
    t[0xD6] = op("DEC", Dec, ZeroPageX, 6, 2);
    t[0xCE] = op("DEC", Dec, Absolute, 6, 3);
    t[0xDE] = op("DEC", Dec, AbsoluteX, 7, 3);

    // Register increments and decrements
    t[0xCA] = op("DEX", Dex, Implied, 2, 1);
    t[0x88] = op("DEY", Dey, Implied, 2, 1);
    t[0xE8] = op("INX", Inx, Implied, 2, 1);
    t[0xC8] = op("INY", Iny, Implied, 2, 1);

    // EOR - Exclusive OR
    t[0x49] = op("EOR", Eor, Immediate, 2, 2);
    t[0x45] = op("EOR", Eor, ZeroPage, 3, 2);
    t[0x55] = op("EOR", Eor, ZeroPageX, 4, 2);
    t[0x4D] = op("EOR", Eor, Absolute, 4, 3);
    t[0x5D] = op("EOR", Eor, AbsoluteX, 4, 3);
    t[0x59] = op("EOR", Eor, AbsoluteY, 4, 3);
    t[0x41] = op("EOR", Eor, IndirectX, 6, 2);
    t[0x51] = op("EOR", Eor, IndirectY, 5, 2);

    // INC - Increment Memory
    t[0xE6] = op("INC", Inc, ZeroPage, 5, 2);
    t[0xF6] = op("INC", Inc, ZeroPageX, 6, 2);
    t[0xEE] = op("INC", Inc, Absolute, 6, 3);
    t[0xFE] = op("INC", Inc, AbsoluteX, 7, 3);

    // JMP - Jump
    t[0x4C] = op("JMP", Jmp, Absolute, 3, 3);
    t[0x6C] = op("JMP", Jmp, Indirect, 5, 3);

    // JSR / RTS / RTI
    t[0x20] = op("JSR", Jsr, Absolute, 6, 3);
    t[0x60] = op("RTS", Rts, Implied, 6, 1);
    t[0x40] = op("RTI", Rti, Implied, 6, 1);

    // LDA - Load Accumulator
    t[0xA9] = op("LDA", Lda, Immediate, 2, 2);
    t[0xA5] = op("LDA", Lda, ZeroPage, 3, 2);
    t[0xB5] = op("LDA", Lda, ZeroPageX, 4, 2);
    t[0xAD] = op("LDA", Lda, Absolute, 4, 3);
    t[0xBD] = op("LDA", Lda, AbsoluteX, 4, 3);
    t[0xB9] = op("LDA", Lda, AbsoluteY, 4, 3);
    t[0xA1] = op("LDA", Lda, IndirectX, 6, 2);
    t[0xB1] = op("LDA", Lda, IndirectY, 5, 2);

    // LDX - Load X Register
    t[0xA2] = op("LDX", Ldx, Immediate, 2, 2);
    t[0xA6] = op("LDX", Ldx, ZeroPage, 3, 2);
    t[0xB6] = op("LDX", Ldx, ZeroPageY, 4, 2);
    t[0xAE] = op("LDX", Ldx, Absolute, 4, 3);
    t[0xBE] = op("LDX", Ldx, AbsoluteY, 4, 3);

    // LDY - Load Y Register
    t[0xA0] = op("LDY", Ldy, Immediate, 2, 2);
    t[0xA4] = op("LDY", Ldy, ZeroPage, 3, 2);
    t[0xB4] = op("LDY", Ldy, ZeroPageX, 4, 2);
    t[0xAC] = op("LDY", Ldy, Absolute, 4, 3);
    t[0xBC] = op("LDY", Ldy, AbsoluteX, 4, 3);

    // LSR - Logical Shift Right
    t[0x4A] = op("LSR", Lsr, Accumulator, 2, 1);
    t[0x46] = op("LSR", Lsr, ZeroPage, 5, 2);
    t[0x56] = op("LSR", Lsr, ZeroPageX, 6, 2);
    t[0x4E] = op("LSR", Lsr, Absolute, 6, 3);
    t[0x5E] = op("LSR", Lsr, AbsoluteX, 7, 3);

    // NOP - No Operation
    t[0xEA] = op("NOP", Nop, Implied, 2, 1);

    // ORA - Logical Inclusive OR
    t[0x09] = op("ORA", Ora, Immediate, 2, 2);
    t[0x05] = op("ORA", Ora, ZeroPage, 3, 2);
    t[0x15] = op("ORA", Ora, ZeroPageX, 4, 2);
    t[0x0D] = op("ORA", Ora, Absolute, 4, 3);
    t[0x1D] = op("ORA", Ora, AbsoluteX, 4, 3);
    t[0x19] = op("ORA", Ora, AbsoluteY, 4, 3);
    t[0x01] = op("ORA", Ora, IndirectX, 6, 2);
    t[0x11] = op("ORA", Ora, IndirectY, 5, 2);

    // Stack operations
    t[0x48] = op("PHA", Pha, Implied, 3, 1);
    t[0x08] = op("PHP", Php, Implied, 3, 1);
    t[0x68] = op("PLA", Pla, Implied, 4, 1);
    t[0x28] = op("PLP", Plp, Implied, 4, 1);

    // ROL - Rotate Left
    t[0x2A] = op("ROL", Rol, Accumulator, 2, 1);
    t[0x26] = op("ROL", Rol, ZeroPage, 5, 2);
    t[0x36] = op("ROL", Rol, ZeroPageX, 6, 2);
    t[0x2E] = op("ROL", Rol, Absolute, 6, 3);
    t[0x3E] = op("ROL", Rol, AbsoluteX, 7, 3);

    // ROR - Rotate Right
    t[0x6A] = op("ROR", Ror, Accumulator, 2, 1);
    t[0x66] = op("ROR", Ror, ZeroPage, 5, 2);
    t[0x76] = op("ROR", Ror, ZeroPageX, 6, 2);
    t[0x6E] = op("ROR", Ror, Absolute, 6, 3);
    t[0x7E] = op("ROR", Ror, AbsoluteX, 7, 3);

    // SBC - Subtract with Carry
    t[0xE9] = op("SBC", Sbc, Immediate, 2, 2);
    t[0xE5] = op("SBC", Sbc, ZeroPage, 3, 2);
    t[0xF5] = op("SBC", Sbc, ZeroPageX, 4, 2);
    t[0xED] = op("SBC", Sbc, Absolute, 4, 3);
    t[0xFD] = op("SBC", Sbc, AbsoluteX, 4, 3);
    t[0xF9] = op("SBC", Sbc, AbsoluteY, 4, 3);
    t[0xE1] = op("SBC", Sbc, IndirectX, 6, 2);
    t[0xF1] = op("SBC", Sbc, IndirectY, 5, 2);
    // Undocumented alias that decodes identically to SBC #imm.
    t[0xEB] = op("SBC", Sbc, Immediate, 2, 2);

    // STA - Store Accumulator
    t[0x85] = op("STA", Sta, ZeroPage, 3, 2);
    t[0x95] = op("STA", Sta, ZeroPageX, 4, 2);
    t[0x8D] = op("STA", Sta, Absolute, 4, 3);
    t[0x9D] = op("STA", Sta, AbsoluteX, 5, 3);
    t[0x99] = op("STA", Sta, AbsoluteY, 5, 3);
    t[0x81] = op("STA", Sta, IndirectX, 6, 2);
    t[0x91] = op("STA", Sta, IndirectY, 6, 2);

    // STX - Store X Register
    t[0x86] = op("STX", Stx, ZeroPage, 3, 2);
    t[0x96] = op("STX", Stx, ZeroPageY, 4, 2);
    t[0x8E] = op("STX", Stx, Absolute, 4, 3);

    // STY - Store Y Register
    t[0x84] = op("STY", Sty, ZeroPage, 3, 2);
    t[0x94] = op("STY", Sty, ZeroPageX, 4, 2);
    t[0x8C] = op("STY", Sty, Absolute, 4, 3);

    // Register transfers
    t[0xAA] = op("TAX", Tax, Implied, 2, 1);
    t[0xA8] = op("TAY", Tay, Implied, 2, 1);
    t[0xBA] = op("TSX", Tsx, Implied, 2, 1);
    t[0x8A] = op("TXA", Txa, Implied, 2, 1);
    t[0x9A] = op("TXS", Txs, Implied, 2, 1);
    t[0x98] = op("TYA", Tya, Implied, 2, 1);

    t
}
