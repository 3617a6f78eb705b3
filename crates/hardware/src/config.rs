//! Configuration system for the MIPS simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline machine constants (frame counts, quantum, timer period).
//! 2. **Structures:** Hierarchical config for general, memory, kernel and hardware settings.
//! 3. **Enums:** Scheduler and page replacement policy selection.
//! 4. **Validation:** Rejection of configurations the kernel cannot run under.
//!
//! Configuration is supplied as JSON via [`Config::from_json`], or use `Config::default()`.

use serde::Deserialize;
use thiserror::Error;

/// Default configuration constants for the simulator.
mod defaults {
    /// Number of physical page frames.
    pub const NUM_PHYS_PAGES: usize = 4;

    /// Number of virtual pages in each process address space.
    pub const NUM_VIRTUAL_PAGES: usize = 32;

    /// Pages reserved for each user stack.
    pub const STACK_PAGES: usize = 8;

    /// Timer ticks a process may run before the scheduler reconsiders dispatch.
    pub const QUANTUM: u32 = 10;

    /// Capacity of the process table, idle process included.
    pub const MAX_PROCESSES: usize = 256;

    /// Period of the hardware timer in milliseconds.
    pub const SWITCH_TIME_MS: u64 = 5;
}

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but describes an unusable machine.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Process scheduling algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SchedulerKind {
    /// Round-robin over all processes with quantum-based preemption.
    #[default]
    #[serde(alias = "RR")]
    RoundRobin,
}

/// Physical page replacement algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ReplacementKind {
    /// Clock (second-chance) replacement.
    ///
    /// Scans frames from a rotating hand, clearing used bits, and evicts the
    /// first frame whose page has not been used since the hand last passed.
    #[default]
    Clock,
    /// First available frame only.
    ///
    /// Never evicts. Allocation fails once every frame is taken.
    #[serde(alias = "First")]
    FirstFit,
}

/// Root configuration structure for the simulator.
///
/// # Examples
///
/// ```
/// use mipsim_core::config::{Config, ReplacementKind};
///
/// let json = r#"{
///     "general": { "trace_instructions": true },
///     "memory": { "num_phys_pages": 8 },
///     "kernel": { "quantum": 4, "replacement": "FirstFit" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.memory.num_phys_pages, 8);
/// assert_eq!(config.memory.num_virtual_pages, 32);
/// assert_eq!(config.kernel.replacement, ReplacementKind::FirstFit);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Physical and virtual memory geometry
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Scheduler and paging policy settings
    #[serde(default)]
    pub kernel: KernelConfig,
    /// Simulated hardware devices
    #[serde(default)]
    pub hardware: HardwareConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Arguments
    ///
    /// * `json` - The configuration document.
    ///
    /// # Returns
    ///
    /// The validated configuration, or a [`ConfigError`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a runnable machine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.num_phys_pages == 0 {
            return Err(ConfigError::Invalid("num_phys_pages must be non-zero".into()));
        }
        if self.memory.num_virtual_pages < self.memory.stack_pages + 2 {
            return Err(ConfigError::Invalid(format!(
                "num_virtual_pages ({}) must leave room for {} stack pages, code and arguments",
                self.memory.num_virtual_pages, self.memory.stack_pages
            )));
        }
        if self.kernel.quantum == 0 {
            return Err(ConfigError::Invalid("quantum must be non-zero".into()));
        }
        if self.kernel.max_processes == 0 {
            return Err(ConfigError::Invalid("max_processes must be non-zero".into()));
        }
        Ok(())
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit a `trace!` event with the disassembly of every executed instruction
    #[serde(default)]
    pub trace_instructions: bool,
}

/// Physical and virtual memory geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Number of physical page frames
    #[serde(default = "MemoryConfig::default_num_phys_pages")]
    pub num_phys_pages: usize,

    /// Number of virtual pages per process
    #[serde(default = "MemoryConfig::default_num_virtual_pages")]
    pub num_virtual_pages: usize,

    /// Translate through per-process page tables. When false, virtual addresses are physical.
    #[serde(default = "MemoryConfig::default_vm_enabled")]
    pub vm_enabled: bool,

    /// Pages reserved for each user stack
    #[serde(default = "MemoryConfig::default_stack_pages")]
    pub stack_pages: usize,
}

impl MemoryConfig {
    fn default_num_phys_pages() -> usize {
        defaults::NUM_PHYS_PAGES
    }

    fn default_num_virtual_pages() -> usize {
        defaults::NUM_VIRTUAL_PAGES
    }

    fn default_vm_enabled() -> bool {
        true
    }

    fn default_stack_pages() -> usize {
        defaults::STACK_PAGES
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            num_phys_pages: defaults::NUM_PHYS_PAGES,
            num_virtual_pages: defaults::NUM_VIRTUAL_PAGES,
            vm_enabled: true,
            stack_pages: defaults::STACK_PAGES,
        }
    }
}

/// Scheduler and paging policy settings.
#[derive(Debug, Clone, Deserialize)]
pub struct KernelConfig {
    /// Timer ticks per scheduling quantum
    #[serde(default = "KernelConfig::default_quantum")]
    pub quantum: u32,

    /// Capacity of the process table
    #[serde(default = "KernelConfig::default_max_processes")]
    pub max_processes: usize,

    /// Scheduling algorithm
    #[serde(default)]
    pub scheduler: SchedulerKind,

    /// Page replacement algorithm
    #[serde(default)]
    pub replacement: ReplacementKind,
}

impl KernelConfig {
    fn default_quantum() -> u32 {
        defaults::QUANTUM
    }

    fn default_max_processes() -> usize {
        defaults::MAX_PROCESSES
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            quantum: defaults::QUANTUM,
            max_processes: defaults::MAX_PROCESSES,
            scheduler: SchedulerKind::default(),
            replacement: ReplacementKind::default(),
        }
    }
}

/// Simulated hardware device settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HardwareConfig {
    /// Timer interrupt period in milliseconds
    #[serde(default = "HardwareConfig::default_switch_time_ms")]
    pub switch_time_ms: u64,
}

impl HardwareConfig {
    fn default_switch_time_ms() -> u64 {
        defaults::SWITCH_TIME_MS
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            switch_time_ms: defaults::SWITCH_TIME_MS,
        }
    }
}
