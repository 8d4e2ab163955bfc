//! CARDIAC execution engine.
//!
//! Implements the fetch-decode-execute cycle and the run/pause/step/halt
//! lifecycle. Every operation is total: arithmetic truncation and
//! modulo reduction are defined numeric rules, not error paths, so
//! executing an instruction can never fail.

use crate::cpu::decode::{self, Instruction};
use crate::cpu::memory::{Memory, Word, MEMORY_SIZE};

/// Accumulator digit budget: four decimal digits plus sign.
const ACC_MODULUS: i64 = 10_000;

/// Memory word digit budget: three decimal digits plus sign.
const WORD_MODULUS: Word = 1_000;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    /// Executing one instruction per tick.
    Running,
    /// Stopped by a HLT instruction; leaves only via reset or a step.
    Halted,
    /// Suspended by the operator; resumable.
    Paused,
    /// Armed for exactly one instruction, after which the CPU pauses.
    Step,
}

/// The CARDIAC CPU: accumulator, instruction pointer, memory, and the
/// run lifecycle.
#[derive(Clone)]
pub struct Cpu {
    /// The accumulator: a signed four-digit decimal register.
    pub accumulator: Word,
    /// Address of the next instruction (0-99).
    pub ip: u8,
    /// Main memory.
    pub mem: Memory,
    /// Current execution state.
    pub state: CpuState,
    /// Last value written by an OUT instruction; `None` until one runs.
    pub output: Option<Word>,
    /// Instruction count since the last hard reset.
    pub cycles: u64,
}

impl Cpu {
    /// Create a new CPU, hard-reset to the factory image.
    pub fn new() -> Self {
        let mut cpu = Self {
            accumulator: 0,
            ip: 0,
            mem: Memory::new(),
            state: CpuState::Running,
            output: None,
            cycles: 0,
        };

        cpu.hard_reset();

        cpu
    }

    /// Soft reset: rewind the instruction pointer and resume running.
    /// Accumulator and memory are untouched.
    pub fn soft_reset(&mut self) {
        self.ip = 0;
        self.state = CpuState::Running;
    }

    /// Hard reset: clear every register and restore the factory
    /// bootstrap image to memory.
    pub fn hard_reset(&mut self) {
        self.accumulator = 0;
        self.ip = 0;
        self.state = CpuState::Running;
        self.output = None;
        self.cycles = 0;
        self.mem.restore_bootstrap();
    }

    /// Suspend execution. No-op unless running.
    pub fn pause(&mut self) {
        if self.state == CpuState::Running {
            self.state = CpuState::Paused;
        }
    }

    /// Resume execution. No-op unless paused.
    pub fn resume(&mut self) {
        if self.state == CpuState::Paused {
            self.state = CpuState::Running;
        }
    }

    /// Arm a single instruction step. No-op unless paused or halted.
    ///
    /// The next [`execute_current`](Self::execute_current) call executes
    /// exactly one instruction and then drops the CPU back to `Paused`
    /// (unless that instruction was a HLT, which wins).
    pub fn request_step(&mut self) {
        if matches!(self.state, CpuState::Paused | CpuState::Halted) {
            self.state = CpuState::Step;
        }
    }

    /// Execute the instruction at the current pointer.
    ///
    /// Does nothing unless the state is `Running` or `Step`. A negative
    /// or otherwise non-instruction word is skipped with a pointer
    /// advance. Returns the executed instruction, or `None` when the CPU
    /// was not runnable or the word was skipped.
    pub fn execute_current(&mut self) -> Option<Instruction> {
        if self.state != CpuState::Running && self.state != CpuState::Step {
            return None;
        }

        let word = self.mem.read(self.ip as usize);
        let executed = match decode::decode(word) {
            Some(instr) => {
                self.execute(instr);
                Some(instr)
            }
            None => {
                // Blank cell: not an instruction, skip over it.
                self.advance();
                None
            }
        };
        self.cycles += 1;

        // An armed step is consumed by exactly one call, executed or
        // skipped. HLT has already overwritten the state by now, so a
        // stepped halt stays halted.
        if self.state == CpuState::Step {
            self.state = CpuState::Paused;
        }

        executed
    }

    fn execute(&mut self, instr: Instruction) {
        match instr {
            Instruction::Nop => {
                // Unassigned opcode: advance past it.
                self.advance();
            }
            Instruction::Cla { addr } => {
                self.accumulator = self.mem.read(addr as usize);
                self.advance();
            }
            Instruction::Add { addr } => {
                self.accumulator = self.accumulator.wrapping_add(self.mem.read(addr as usize));
                self.advance();
            }
            Instruction::Tac { addr } => {
                if self.accumulator < 0 {
                    self.ip = addr;
                } else {
                    self.advance();
                }
            }
            Instruction::Sft { left, right } => {
                let mut acc = self.accumulator as i64;
                acc *= 10i64.pow(left as u32);
                acc /= 10i64.pow(right as u32);
                while acc.abs() > ACC_MODULUS - 1 {
                    acc %= ACC_MODULUS;
                }
                self.accumulator = acc as Word;
                self.advance();
            }
            Instruction::Out { addr } => {
                self.output = Some(self.mem.read(addr as usize));
                self.advance();
            }
            Instruction::Sto { addr } => {
                // Truncation toward zero: sign is preserved.
                self.mem.write(addr as usize, self.accumulator % WORD_MODULUS);
                self.advance();
            }
            Instruction::Sub { addr } => {
                self.accumulator = self.accumulator.wrapping_sub(self.mem.read(addr as usize));
                self.advance();
            }
            Instruction::Jmp { addr } => {
                // Link word: a JMP back to the call site's successor.
                self.mem.write(99, self.ip as Word + 801);
                self.ip = addr;
            }
            Instruction::Hlt => {
                self.soft_reset();
                self.state = CpuState::Halted;
            }
        }
    }

    /// Patch a single memory word, as the image restore collaborator does.
    ///
    /// # Panics
    /// Panics if address is out of range.
    pub fn set_memory(&mut self, addr: usize, value: Word) {
        self.mem.write(addr, value);
    }

    /// Check if the CPU is running (will execute on the next tick).
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Advance the instruction pointer, wrapping past the top of memory.
    fn advance(&mut self) {
        self.ip = if self.ip as usize + 1 == MEMORY_SIZE {
            0
        } else {
            self.ip + 1
        };
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("accumulator", &self.accumulator)
            .field("ip", &self.ip)
            .field("output", &self.output)
            .field("cycles", &self.cycles)
            .finish()
    }
}
