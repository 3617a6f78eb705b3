//! System-on-Chip (SoC) Components.
//!
//! This module organizes the hardware around the CPU: physical memory, the
//! interrupt controller, and the devices that raise interrupts.

/// Simulated hardware devices.
pub mod devices;

/// Interrupt lines, controller, and acknowledgement handshake.
pub mod interrupt;

/// Physical memory.
pub mod memory;

pub use interrupt::{Interrupt, InterruptController, InterruptLine, InterruptSource};
pub use memory::PhysicalMemory;
