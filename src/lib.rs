//! # CARDIAC Emulator
//!
//! An emulator of the CARDIAC (Cardboard Illustrative Aid to Computation),
//! Bell Labs' 1968 cardboard teaching computer: 100 decimal memory words,
//! one accumulator, and a 10-opcode instruction set.
//!
//! The machine core knows nothing about screens or files; it exposes its
//! state and a single execute-one-instruction operation. The terminal
//! front panel and the memory image files are thin collaborators on top.

pub mod cpu;
pub mod image;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types
pub use cpu::{Cpu, CpuState, Instruction, Memory, Word, MEMORY_SIZE};
pub use image::{load_image, save_image, ImageError, MemoryImage};

#[cfg(feature = "tui")]
pub use tui::run_console;
