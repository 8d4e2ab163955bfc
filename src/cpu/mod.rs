//! CPU emulation for the CARDIAC computer.
//!
//! This module implements the complete CARDIAC architecture:
//! - 100 signed three-digit decimal memory cells
//! - One four-digit accumulator and an instruction pointer
//! - 10-opcode instruction set with single-address instructions
//! - A run/pause/step/halt lifecycle driven one instruction at a time

pub mod memory;
pub mod decode;
pub mod execute;

pub use memory::{Memory, Word, MEMORY_SIZE};
pub use decode::{decode, disassemble, encode, Instruction};
pub use execute::{Cpu, CpuState};
