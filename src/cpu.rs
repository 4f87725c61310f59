//! # CPU Core
//!
//! The 6502 register file and the fetch-decode-dispatch engine.
//!
//! ## Execution Model
//!
//! [`Cpu::step`] executes exactly one instruction:
//!
//! 1. block while the host holds the pause flag
//! 2. sample the interrupt latches; service NMI, else IRQ when I is clear
//! 3. fetch the opcode and decode it through [`OPCODE_TABLE`]
//! 4. resolve the addressing mode (fetching operand bytes)
//! 5. run the instruction
//! 6. account base cycles plus page-cross / branch penalties
//! 7. ask the clock pacer to sleep up to the nominal schedule
//!
//! The CPU is generic over its memory. Reads of the serial input port and
//! writes of the serial output port are intercepted ahead of the memory,
//! so the guest talks to the host byte queues no matter what is mapped
//! there.
//!
//! Host threads interact through [`CpuControl`] clones (interrupt
//! injection, pause/resume, shutdown) and through the shared byte queues;
//! the register file itself belongs to the emulation thread.

use crate::addressing::AddressingMode;
use crate::clock::ClockPacer;
use crate::control::{CpuControl, Interrupt};
use crate::memory::MemoryBus;
use crate::opcodes::{Instruction, OPCODE_TABLE};
use crate::queue::ByteQueue;
use crate::registers::Registers;
use crate::{instructions, EmulatorError};
use crate::{INPUT_ADDR, IRQ_VECTOR, NMI_VECTOR, OUTPUT_ADDR, RESET_VECTOR};
use std::sync::Arc;

/// Result of a step that honors a breakpoint predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction ran, consuming this many cycles.
    Executed(u64),
    /// The program counter matched the predicate; nothing was executed.
    BreakpointHit {
        /// The matching address.
        pc: u16,
    },
}

/// The 6502 processor state and execution engine.
///
/// # Examples
///
/// ```
/// use mos6502_emu::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.load_bytes(0x8000, &[0xA9, 0x42, 0xAA]); // LDA #$42; TAX
/// memory.load_bytes(0xFFFC, &[0x00, 0x80]);
///
/// let mut cpu = Cpu::new(memory);
/// cpu.step().unwrap();
/// cpu.step().unwrap();
///
/// assert_eq!(cpu.a(), 0x42);
/// assert_eq!(cpu.x(), 0x42);
/// ```
pub struct Cpu<M: MemoryBus> {
    /// Accumulator.
    pub(crate) a: u8,

    /// X index register.
    pub(crate) x: u8,

    /// Y index register.
    pub(crate) y: u8,

    /// Program counter.
    pub(crate) pc: u16,

    /// Stack pointer; the stack occupies `0x0100 | sp`.
    pub(crate) sp: u8,

    /// Negative flag.
    pub(crate) flag_n: bool,

    /// Overflow flag.
    pub(crate) flag_v: bool,

    /// Decimal mode flag.
    pub(crate) flag_d: bool,

    /// Interrupt disable flag.
    pub(crate) flag_i: bool,

    /// Zero flag.
    pub(crate) flag_z: bool,

    /// Carry flag.
    pub(crate) flag_c: bool,

    /// Total cycles executed since power-on or reset.
    cycles: u64,

    /// Memory behind the MMIO intercept.
    pub(crate) memory: M,

    clock: ClockPacer,
    input: Arc<ByteQueue>,
    output: Arc<ByteQueue>,
    control: Arc<CpuControl>,
    debug: bool,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a CPU over `memory` with freshly allocated I/O queues.
    ///
    /// The CPU comes up in the reset state: `PC` loaded from the vector at
    /// `0xFFFC/0xFFFD`, `SP = 0xFD`, `P = 0x24` (I and U set), registers
    /// zeroed, pacing at the default 1 MHz.
    pub fn new(memory: M) -> Self {
        Self::with_io(
            memory,
            Arc::new(ByteQueue::new()),
            Arc::new(ByteQueue::new()),
        )
    }

    /// Creates a CPU sharing the given I/O queues.
    ///
    /// Use this when another party already holds a queue end, e.g. a
    /// [`crate::MonitoredRam`] that mirrors its hook writes into the same
    /// output stream the CPU's serial port feeds.
    pub fn with_io(memory: M, input: Arc<ByteQueue>, output: Arc<ByteQueue>) -> Self {
        let mut cpu = Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            pc: 0x0000,
            sp: 0xFD,
            flag_n: false,
            flag_v: false,
            flag_d: false,
            flag_i: true,
            flag_z: false,
            flag_c: false,
            cycles: 0,
            memory,
            clock: ClockPacer::default(),
            input,
            output,
            control: Arc::new(CpuControl::new()),
            debug: false,
        };
        cpu.pc = cpu.read_word(RESET_VECTOR);
        cpu
    }

    /// Returns the CPU to its reset state.
    ///
    /// Reloads `PC` from the reset vector, restores `SP = 0xFD` and
    /// `P = 0x24`, zeroes the registers and the cycle counter, clears the
    /// interrupt latches, and releases a pending pause. The reset sequence
    /// itself is worth 7 cycles of pacing.
    pub fn reset(&mut self) {
        self.a = 0x00;
        self.x = 0x00;
        self.y = 0x00;
        self.sp = 0xFD;
        self.flag_n = false;
        self.flag_v = false;
        self.flag_d = false;
        self.flag_i = true;
        self.flag_z = false;
        self.flag_c = false;
        self.pc = self.read_word(RESET_VECTOR);
        self.cycles = 0;
        self.control.clear_interrupts();
        self.control.resume();
        self.clock.reset();
        self.clock.advance(7);
    }

    /// Copies a raw program image into memory and points the reset vector
    /// at it.
    ///
    /// The image is written through the memory (not the MMIO intercept),
    /// so a program may span the serial port addresses. After writing, the
    /// reset vector is read back; callers are expected to `reset()` next,
    /// and a vector that does not verify is reported as
    /// [`EmulatorError::ReadFailed`].
    ///
    /// # Errors
    ///
    /// - [`EmulatorError::ReadFailed`] on an empty image or a vector that
    ///   fails verification
    /// - [`EmulatorError::MemoryOverflow`] when the image does not fit
    ///   between `base` and `0xFFFF`
    pub fn load_program(&mut self, bytes: &[u8], base: u16) -> Result<(), EmulatorError> {
        if bytes.is_empty() {
            return Err(EmulatorError::ReadFailed("program image is empty".into()));
        }
        if base as usize + bytes.len() > 0x10000 {
            return Err(EmulatorError::MemoryOverflow {
                base,
                len: bytes.len(),
            });
        }

        for (i, &byte) in bytes.iter().enumerate() {
            self.memory.write(base.wrapping_add(i as u16), byte);
        }

        self.memory.write(RESET_VECTOR, (base & 0xFF) as u8);
        self.memory.write(RESET_VECTOR.wrapping_add(1), (base >> 8) as u8);

        let lo = self.memory.read(RESET_VECTOR) as u16;
        let hi = self.memory.read(RESET_VECTOR.wrapping_add(1)) as u16;
        if (hi << 8) | lo != base {
            return Err(EmulatorError::ReadFailed(
                "reset vector did not verify after load".into(),
            ));
        }

        Ok(())
    }

    /// Executes one instruction and returns the cycles it consumed
    /// (including any interrupt-servicing cycles folded into this step).
    ///
    /// Blocks while the host holds the pause flag, and inside the clock
    /// pacer when emulation runs ahead of the nominal schedule.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::InvalidOpcode`] when the fetched byte has no
    /// documented meaning. No state changes beyond the fetch itself.
    pub fn step(&mut self) -> Result<u64, EmulatorError> {
        self.control.wait_while_paused();
        self.step_inner()
    }

    /// Like [`Cpu::step`], but consults `is_breakpoint` against the
    /// current program counter first. On a match nothing executes and the
    /// outcome reports the address; the host decides what to do with it.
    pub fn step_with_breakpoint<F>(&mut self, is_breakpoint: F) -> Result<StepOutcome, EmulatorError>
    where
        F: Fn(u16) -> bool,
    {
        self.control.wait_while_paused();
        if is_breakpoint(self.pc) {
            return Ok(StepOutcome::BreakpointHit { pc: self.pc });
        }
        self.step_inner().map(StepOutcome::Executed)
    }

    fn step_inner(&mut self) -> Result<u64, EmulatorError> {
        let mut total: u64 = 0;

        if let Some(kind) = self.control.take_interrupt(self.flag_i) {
            // Committed immediately: the vectoring happened even if the
            // handler's first opcode turns out to be invalid.
            let serviced = self.service_interrupt(kind);
            self.cycles += serviced;
            self.clock.advance(serviced);
            total += serviced;
        }

        let pc = self.pc;
        let opcode = self.fetch_byte();
        let entry = &OPCODE_TABLE[opcode as usize];

        if entry.instruction == Instruction::Illegal {
            return Err(EmulatorError::InvalidOpcode { pc, opcode });
        }

        if self.debug {
            log::trace!(
                "PC: ${:04X}  opcode: ${:02X} ({})  {}",
                pc,
                opcode,
                entry.mnemonic,
                self.snapshot_registers()
            );
        }

        let extra = self.execute(entry.instruction, entry.mode);
        let used = entry.base_cycles as u64 + extra as u64;
        total += used;

        self.cycles += used;
        if used > 1 {
            self.clock.advance(used - 1);
        }
        self.clock.wait_next_cycle();

        Ok(total)
    }

    /// Vectors into an interrupt handler: pushes `PC`, pushes the status
    /// with B clear and U set, sets I, and loads the handler address.
    /// Worth 7 cycles.
    fn service_interrupt(&mut self, kind: Interrupt) -> u64 {
        let pc = self.pc;
        self.push_word(pc);
        let status = self.status();
        self.push_byte(status);
        self.flag_i = true;

        let vector = match kind {
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq => IRQ_VECTOR,
        };
        self.pc = self.read_word(vector);

        if self.debug {
            log::trace!("servicing {:?}: ${:04X} -> ${:04X}", kind, pc, self.pc);
        }

        7
    }

    fn execute(&mut self, instruction: Instruction, mode: AddressingMode) -> u8 {
        use instructions::*;

        match instruction {
            Instruction::Adc => alu::adc(self, mode),
            Instruction::And => alu::and(self, mode),
            Instruction::Asl => shifts::asl(self, mode),
            Instruction::Bcc => branches::bcc(self, mode),
            Instruction::Bcs => branches::bcs(self, mode),
            Instruction::Beq => branches::beq(self, mode),
            Instruction::Bit => alu::bit(self, mode),
            Instruction::Bmi => branches::bmi(self, mode),
            Instruction::Bne => branches::bne(self, mode),
            Instruction::Bpl => branches::bpl(self, mode),
            Instruction::Brk => control::brk(self, mode),
            Instruction::Bvc => branches::bvc(self, mode),
            Instruction::Bvs => branches::bvs(self, mode),
            Instruction::Clc => flags::clc(self, mode),
            Instruction::Cld => flags::cld(self, mode),
            Instruction::Cli => flags::cli(self, mode),
            Instruction::Clv => flags::clv(self, mode),
            Instruction::Cmp => alu::cmp(self, mode),
            Instruction::Cpx => alu::cpx(self, mode),
            Instruction::Cpy => alu::cpy(self, mode),
            Instruction::Dec => inc_dec::dec(self, mode),
            Instruction::Dex => inc_dec::dex(self, mode),
            Instruction::Dey => inc_dec::dey(self, mode),
            Instruction::Eor => alu::eor(self, mode),
            Instruction::Inc => inc_dec::inc(self, mode),
            Instruction::Inx => inc_dec::inx(self, mode),
            Instruction::Iny => inc_dec::iny(self, mode),
            Instruction::Jmp => control::jmp(self, mode),
            Instruction::Jsr => control::jsr(self, mode),
            Instruction::Lda => load_store::lda(self, mode),
            Instruction::Ldx => load_store::ldx(self, mode),
            Instruction::Ldy => load_store::ldy(self, mode),
            Instruction::Lsr => shifts::lsr(self, mode),
            Instruction::Nop => control::nop(self, mode),
            Instruction::Ora => alu::ora(self, mode),
            Instruction::Pha => stack::pha(self, mode),
            Instruction::Php => stack::php(self, mode),
            Instruction::Pla => stack::pla(self, mode),
            Instruction::Plp => stack::plp(self, mode),
            Instruction::Rol => shifts::rol(self, mode),
            Instruction::Ror => shifts::ror(self, mode),
            Instruction::Rti => control::rti(self, mode),
            Instruction::Rts => control::rts(self, mode),
            Instruction::Sbc => alu::sbc(self, mode),
            Instruction::Sec => flags::sec(self, mode),
            Instruction::Sed => flags::sed(self, mode),
            Instruction::Sei => flags::sei(self, mode),
            Instruction::Sta => load_store::sta(self, mode),
            Instruction::Stx => load_store::stx(self, mode),
            Instruction::Sty => load_store::sty(self, mode),
            Instruction::Tax => transfer::tax(self, mode),
            Instruction::Tay => transfer::tay(self, mode),
            Instruction::Tsx => transfer::tsx(self, mode),
            Instruction::Txa => transfer::txa(self, mode),
            Instruction::Txs => transfer::txs(self, mode),
            Instruction::Tya => transfer::tya(self, mode),
            // Filtered out before dispatch.
            Instruction::Illegal => 0,
        }
    }

    // ========== Memory Access (with MMIO interception) ==========

    /// Reads one byte as the CPU would.
    ///
    /// A read of the serial input port dequeues from the input queue,
    /// returning `0x00` when no byte is waiting; the guest cannot tell
    /// "no key" from a null byte. Every other address goes to memory.
    pub fn read(&mut self, addr: u16) -> u8 {
        if addr == INPUT_ADDR {
            return self.input.dequeue().unwrap_or(0x00);
        }
        self.memory.read(addr)
    }

    /// Writes one byte as the CPU would.
    ///
    /// A write to the serial output port enqueues on the output queue and
    /// leaves memory untouched, so the backing byte at that address never
    /// goes stale with host data. When the host is not draining fast
    /// enough the byte is dropped; backpressure is invisible to the guest.
    pub fn write(&mut self, addr: u16, value: u8) {
        if addr == OUTPUT_ADDR {
            if self.output.enqueue(value).is_err() {
                log::warn!("output queue full, dropping serial byte 0x{:02X}", value);
            }
            return;
        }
        self.memory.write(addr, value);
    }

    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let byte = self.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    pub(crate) fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub(crate) fn push_byte(&mut self, value: u8) {
        let addr = 0x0100 | self.sp as u16;
        self.write(addr, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pull_byte(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.read(0x0100 | self.sp as u16)
    }

    /// Pushes high byte first so the word reads back little-endian.
    pub(crate) fn push_word(&mut self, value: u16) {
        self.push_byte((value >> 8) as u8);
        self.push_byte((value & 0xFF) as u8);
    }

    pub(crate) fn pull_word(&mut self) -> u16 {
        let lo = self.pull_byte() as u16;
        let hi = self.pull_byte() as u16;
        (hi << 8) | lo
    }

    // ========== Host Control Surface ==========

    /// Latches a maskable interrupt; observed at the next step entry.
    pub fn inject_irq(&self) {
        self.control.inject_irq();
    }

    /// Latches a non-maskable interrupt; observed at the next step entry.
    pub fn inject_nmi(&self) {
        self.control.inject_nmi();
    }

    /// Changes the nominal clock frequency, restarting the pacing
    /// timeline.
    pub fn set_frequency(&mut self, frequency: f64) -> Result<(), EmulatorError> {
        self.clock.set_frequency(frequency)
    }

    /// The nominal clock frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.clock.frequency()
    }

    /// Enables or disables per-instruction trace logging.
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// A handle for steering this CPU from other threads (interrupt
    /// injection, pause/resume, shutdown).
    pub fn control(&self) -> Arc<CpuControl> {
        Arc::clone(&self.control)
    }

    /// The host-to-guest serial queue.
    pub fn input_queue(&self) -> Arc<ByteQueue> {
        Arc::clone(&self.input)
    }

    /// The guest-to-host serial queue.
    pub fn output_queue(&self) -> Arc<ByteQueue> {
        Arc::clone(&self.output)
    }

    /// Offers one byte to the guest's serial input.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::QueueFull`] when the guest has not consumed the
    /// backlog; the producer decides whether to retry.
    pub fn push_input(&self, byte: u8) -> Result<(), EmulatorError> {
        self.input.enqueue(byte)
    }

    /// Takes one byte of guest serial output, if any.
    pub fn pop_output(&self) -> Option<u8> {
        self.output.dequeue()
    }

    /// A copy of the register file for host display.
    pub fn snapshot_registers(&self) -> Registers {
        Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            pc: self.pc,
            sp: self.sp,
            status: self.status(),
        }
    }

    // ========== Register and Flag Access ==========

    /// Accumulator value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Stack pointer value.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Total cycles executed since power-on or the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The status register packed as `NV-BDIZC`.
    ///
    /// Bit 5 (U) always reads as 1. Bit 4 (B) always reads as 0 here; it
    /// is set only on copies pushed by PHP and BRK.
    pub fn status(&self) -> u8 {
        let mut p = 0b0010_0000;

        if self.flag_n {
            p |= 0b1000_0000;
        }
        if self.flag_v {
            p |= 0b0100_0000;
        }
        if self.flag_d {
            p |= 0b0000_1000;
        }
        if self.flag_i {
            p |= 0b0000_0100;
        }
        if self.flag_z {
            p |= 0b0000_0010;
        }
        if self.flag_c {
            p |= 0b0000_0001;
        }

        p
    }

    /// Unpacks a status byte into the live flags. Bits 4 and 5 are
    /// ignored: B is never stored and U always reads as set.
    pub fn set_status(&mut self, value: u8) {
        self.flag_n = (value & 0b1000_0000) != 0;
        self.flag_v = (value & 0b0100_0000) != 0;
        self.flag_d = (value & 0b0000_1000) != 0;
        self.flag_i = (value & 0b0000_0100) != 0;
        self.flag_z = (value & 0b0000_0010) != 0;
        self.flag_c = (value & 0b0000_0001) != 0;
    }

    pub(crate) fn set_zn(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = (value & 0x80) != 0;
    }

    /// Negative flag.
    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    /// Overflow flag.
    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    /// Decimal mode flag.
    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    /// Interrupt disable flag.
    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    /// Zero flag.
    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    /// Carry flag.
    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    /// Sets the accumulator.
    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    /// Sets the X index register.
    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    /// Sets the Y index register.
    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Sets the stack pointer.
    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Sets the carry flag.
    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }

    /// Sets the zero flag.
    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }

    /// Sets the interrupt disable flag.
    pub fn set_flag_i(&mut self, value: bool) {
        self.flag_i = value;
    }

    /// Sets the decimal mode flag.
    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    /// Sets the overflow flag.
    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }

    /// Sets the negative flag.
    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }

    /// Shared access to the memory behind the MMIO intercept.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable access to the memory, e.g. for test setup.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}
