//! Simulated hardware devices.
//!
//! Devices run on host threads and reach the CPU only through interrupt lines.

/// Periodic scheduling timer.
pub mod timer;

pub use timer::Timer;
