//! Terminal front panel for the CARDIAC emulator.
//!
//! Renders the registers, output, and the full 100-word memory grid,
//! and routes the operator keys:
//! - Run control: p (pause), r (resume / soft reset), h (hard reset), s (step)
//! - Memory image: F6 (dump to file), F7 (restore from file)
//!
//! The panel owns the machine from a single event loop, so every
//! mutation (ticks, key-triggered resets, image restores) is
//! serialized by construction.

mod app;
mod ui;

pub use app::{run_console, ConsoleApp};
