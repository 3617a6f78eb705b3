//! Simulator: owns the CPU and the kernel side-by-side.
//!
//! The kernel never holds a reference to the CPU. Every kernel entry point takes
//! the CPU by `&mut`, so the borrow of the machine state is explicit at each
//! exception.

use std::io;
use std::time::Duration;

use tracing::info;

use crate::common::Pid;
use crate::common::constants::STATUS_UPDATE_INTERVAL;
use crate::config::Config;
use crate::core::Cpu;
use crate::kernel::{Control, Kernel, KernelError};
use crate::sim::loader::ProgramImage;
use crate::soc::devices::Timer;
use crate::soc::interrupt::InterruptSource;
use crate::storage::BackingStore;

/// Priority of the scheduling timer; device lines use larger values.
pub const TIMER_PRIORITY: u8 = 0;

/// Why [`Simulator::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// A process executed the halt syscall.
    Halted,
    /// Every process other than the idle process has exited.
    AllExited,
    /// The instruction budget ran out.
    InstructionLimit,
}

/// Top-level simulator: CPU state plus the kernel running on it.
#[derive(Debug)]
pub struct Simulator {
    /// CPU architectural state (registers, MMU, physical memory, stats).
    pub cpu: Cpu,
    /// Kernel (processes, scheduler, paging, swap).
    pub kernel: Kernel,
    switch_time: Duration,
    timer: Option<Timer>,
}

impl Simulator {
    /// Creates a simulator for `config` with swap space on `store`.
    pub fn new(config: &Config, store: Box<dyn BackingStore>) -> Result<Self, KernelError> {
        let kernel = Kernel::new(config, store)?;
        Ok(Self {
            cpu: Cpu::new(config),
            kernel,
            switch_time: Duration::from_millis(config.hardware.switch_time_ms),
            timer: None,
        })
    }

    /// Creates a top-level process running `image`.
    pub fn spawn(&mut self, name: &str, image: &ProgramImage, args: &[&str]) -> Result<Pid, KernelError> {
        self.kernel.spawn(&mut self.cpu, name, image, args, None)
    }

    /// Starts the hardware timer on the CPU's interrupt controller.
    ///
    /// Does nothing if a timer is already running.
    pub fn attach_timer(&mut self) -> io::Result<()> {
        if self.timer.as_ref().is_some_and(Timer::is_running) {
            return Ok(());
        }
        let line = self
            .cpu
            .interrupt_controller()
            .line(InterruptSource::Timer, TIMER_PRIORITY);
        self.timer = Some(Timer::start(line, self.switch_time)?);
        Ok(())
    }

    /// Stops the hardware timer, if one is running.
    pub fn detach_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
    }

    /// Executes one instruction and handles any exception it raised.
    ///
    /// Dispatches a process first if none is running.
    pub fn tick(&mut self) -> Result<Control, KernelError> {
        if self.kernel.current().is_none() {
            let _ = self.kernel.dispatch(&mut self.cpu)?;
        }
        match self.cpu.step() {
            Ok(()) => Ok(Control::Continue),
            Err(e) => self.kernel.handle_exception(&mut self.cpu, e),
        }
    }

    /// Runs until a halt, until every user process has exited, or until
    /// `max_instructions` more instructions have retired.
    ///
    /// The idle process only gives up the CPU on a timer tick, so without an
    /// attached timer a run that dispatches it ends at the instruction budget.
    ///
    /// # Arguments
    ///
    /// * `max_instructions` - Instruction budget for this call.
    ///
    /// # Returns
    ///
    /// Why the run stopped, or a kernel-fatal error.
    pub fn run(&mut self, max_instructions: u64) -> Result<RunOutcome, KernelError> {
        let limit = self
            .cpu
            .stats
            .instructions_retired
            .saturating_add(max_instructions);
        let mut last_status = self.cpu.stats.instructions_retired;

        loop {
            if self.kernel.user_processes() == 0 {
                return Ok(RunOutcome::AllExited);
            }
            if self.cpu.stats.instructions_retired >= limit {
                return Ok(RunOutcome::InstructionLimit);
            }
            if self.tick()? == Control::Halt {
                return Ok(RunOutcome::Halted);
            }

            let retired = self.cpu.stats.instructions_retired;
            if self.cpu.trace && retired - last_status >= STATUS_UPDATE_INTERVAL {
                last_status = retired;
                info!(
                    instructions = retired,
                    pid = ?self.kernel.current(),
                    processes = self.kernel.user_processes(),
                    "status"
                );
            }
        }
    }
}
