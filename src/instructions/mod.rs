//! # Instruction Implementations
//!
//! The 56 documented 6502 instructions, grouped by category. Each function
//! takes the CPU and the addressing mode of the opcode being executed,
//! resolves its operand through [`crate::addressing::resolve`], applies the
//! operation, and returns the number of EXTRA cycles beyond the opcode's
//! base cost (page-cross penalties on indexed reads, taken-branch
//! penalties). Base cycles are accounted by the execution engine.
//!
//! ## Categories
//!
//! - **alu**: ADC, SBC, AND, ORA, EOR, BIT, CMP, CPX, CPY
//! - **branches**: BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS
//! - **control**: BRK, JMP, JSR, RTS, RTI, NOP
//! - **flags**: CLC, CLD, CLI, CLV, SEC, SED, SEI
//! - **inc_dec**: INC, DEC, INX, INY, DEX, DEY
//! - **load_store**: LDA, LDX, LDY, STA, STX, STY
//! - **shifts**: ASL, LSR, ROL, ROR
//! - **stack**: PHA, PHP, PLA, PLP
//! - **transfer**: TAX, TAY, TXA, TYA, TSX, TXS

pub mod alu;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;
