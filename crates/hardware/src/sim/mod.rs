//! Simulation driver and program loading.
//!
//! Provides the loader that turns executables into process layouts and the
//! `Simulator` that steps the CPU and hands exceptions to the kernel.

/// Program images and process layout.
pub mod loader;

/// Top-level simulator.
pub mod simulator;

pub use loader::{LoadError, ProgramImage, Section};
pub use simulator::{RunOutcome, Simulator};
