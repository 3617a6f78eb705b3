//! Operating System Kernel.
//!
//! This module implements the kernel that runs user processes on the CPU. It provides:
//! 1. **Process Lifecycle:** Spawning from program images, exit, join, and sleep.
//! 2. **Scheduling:** Quantum accounting on timer ticks and context switches.
//! 3. **Demand Paging:** Page fault handling through a replacement policy and swap space.
//! 4. **Exception Dispatch:** Routing every exception returned by `Cpu::step` by cause.
//!
//! Process id 0 is the idle process, a one-page `j 0; nop` loop that is always
//! ready, so the scheduler always has something to dispatch.

/// Page fault handling and page-in.
pub mod fault;

/// Process control blocks and the process table.
pub mod process;

/// Page replacement policies.
pub mod replacement;

/// Process schedulers.
pub mod scheduler;

/// System call dispatch.
pub mod syscall;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::{Cause, Exception, Pid, VirtAddr};
use crate::config::{Config, ConfigError};
use crate::core::Cpu;
use crate::core::units::mmu::page::{Page, PageKey, PageTable};
use crate::isa::abi;
use crate::sim::loader::{LoadError, ProgramImage, Section};
use crate::soc::interrupt::InterruptSource;
use crate::storage::{BackingStore, StorageError, SwapSpace};

use self::process::{ExitStatus, PendingStatus, ProcessContext, ProcessState, ProcessTable};
use self::replacement::PageReplacement;
use self::scheduler::Scheduler;

/// Pid of the idle process.
pub const IDLE_PID: Pid = 0;

/// Machine code of the idle loop: `j 0` followed by its delay-slot `nop`.
const IDLE_PROGRAM: [u32; 2] = [0x0800_0000, 0x0000_0000];

/// Errors raised by the kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    /// No known process is ready, not even the idle process.
    #[error("no process is ready to run")]
    NothingToRun,

    /// No process is dispatched.
    #[error("no process is running")]
    NoCurrentProcess,

    /// Every physical frame is taken and the policy does not evict.
    #[error("out of physical memory")]
    OutOfMemory,

    /// Every process slot is taken.
    #[error("process table full")]
    ProcessTableFull,

    /// The pid names no live process.
    #[error("no process with pid {0}")]
    UnknownPid(Pid),

    /// The page lies outside its process's address space.
    #[error("page {} of process {} does not exist", .0.vpn, .0.pid)]
    InvalidPage(PageKey),

    /// A frame number outside physical memory.
    #[error("frame {0} does not exist")]
    InvalidFrame(usize),

    /// A process raised an exception the kernel does not recover from.
    #[error("process raised {0}")]
    Fault(Exception),

    /// Swap I/O failed.
    #[error("swap I/O failed: {0}")]
    Swap(#[from] StorageError),

    /// Saving an evicted page of `victim` failed; its contents are lost.
    #[error("swap-out of a page of process {victim} failed: {source}")]
    Evict {
        /// Owner of the page that could not be saved.
        victim: Pid,
        /// Underlying storage error.
        source: StorageError,
    },

    /// The program image could not be laid out.
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    /// The kernel runs processes in separate address spaces only.
    #[error("the kernel requires virtual memory to be enabled")]
    VirtualMemoryDisabled,

    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl KernelError {
    /// Returns `true` if the error ends the process that caused it rather than the kernel.
    pub const fn is_process_fatal(&self) -> bool {
        matches!(
            self,
            Self::OutOfMemory
                | Self::InvalidPage(_)
                | Self::Fault(_)
                | Self::Swap(_)
                | Self::Evict { .. }
        )
    }

    /// Returns the cause reported for a process ended by this error.
    pub const fn cause(&self) -> Cause {
        match self {
            Self::Fault(e) => e.cause(),
            _ => Cause::PageFault,
        }
    }
}

/// What the simulator should do after an exception has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Keep stepping.
    Continue,
    /// A process asked the machine to halt.
    Halt,
}

/// The kernel: process table, scheduler, replacement policy and swap space.
#[derive(Debug)]
pub struct Kernel {
    processes: ProcessTable,
    current: Option<Pid>,
    scheduler: Box<dyn Scheduler>,
    replacer: Box<dyn PageReplacement>,
    swap: SwapSpace,
    quantum: u32,
    stack_pages: usize,
    num_virtual_pages: usize,
}

impl Kernel {
    /// Builds a kernel for `config` with swap space on `store`, and creates the idle process.
    ///
    /// # Arguments
    ///
    /// * `config` - Simulator configuration; selects scheduler and replacement policy.
    /// * `store` - Backing store holding swap files.
    ///
    /// # Returns
    ///
    /// The kernel, or an error if the configuration is invalid, virtual memory
    /// is disabled, or the idle process cannot be created.
    pub fn new(config: &Config, store: Box<dyn BackingStore>) -> Result<Self, KernelError> {
        Self::with_policies(
            config,
            scheduler::build(&config.kernel),
            replacement::build(config.kernel.replacement, config.memory.num_phys_pages),
            store,
        )
    }

    /// Builds a kernel with caller-supplied scheduling and replacement policies.
    ///
    /// The `scheduler` and `replacement` selections in `config` are ignored.
    pub fn with_policies(
        config: &Config,
        scheduler: Box<dyn Scheduler>,
        replacer: Box<dyn PageReplacement>,
        store: Box<dyn BackingStore>,
    ) -> Result<Self, KernelError> {
        config.validate()?;
        if !config.memory.vm_enabled {
            return Err(KernelError::VirtualMemoryDisabled);
        }

        let mut kernel = Self {
            processes: ProcessTable::new(config.kernel.max_processes),
            current: None,
            scheduler,
            replacer,
            swap: SwapSpace::new(store),
            quantum: config.kernel.quantum,
            stack_pages: config.memory.stack_pages,
            num_virtual_pages: config.memory.num_virtual_pages,
        };

        let code = IDLE_PROGRAM.iter().flat_map(|w| w.to_le_bytes()).collect();
        let idle = ProgramImage::new(0, vec![Section::new(".idle", 0, code, true)])?;
        let pid = kernel.create("idle", &idle, &[], None)?;
        debug_assert_eq!(pid, IDLE_PID);
        Ok(kernel)
    }

    /// Returns the running process.
    pub const fn current(&self) -> Option<Pid> {
        self.current
    }

    /// Returns a process control block.
    pub fn process(&self, pid: Pid) -> Option<&ProcessContext> {
        self.processes.get(pid)
    }

    /// Returns the process table.
    pub const fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    /// Returns the number of live processes other than the idle process.
    pub fn user_processes(&self) -> usize {
        self.processes.iter().filter(|p| p.pid != IDLE_PID).count()
    }

    /// Returns the page replacement policy.
    pub fn replacer(&self) -> &dyn PageReplacement {
        self.replacer.as_ref()
    }

    /// Returns the swap space.
    pub fn swap_mut(&mut self) -> &mut SwapSpace {
        &mut self.swap
    }

    /// Returns the scheduling quantum in timer ticks.
    pub const fn quantum(&self) -> u32 {
        self.quantum
    }

    /// Creates a ready process running `image` and counts it in `cpu.stats`.
    ///
    /// Every initial page is written to swap and left non-resident, so the
    /// process's first touch of each page is a page fault. Stack pages are
    /// created on first touch.
    ///
    /// # Arguments
    ///
    /// * `cpu` - The CPU whose statistics record the new process.
    /// * `name` - Program name; names the swap file.
    /// * `image` - Validated program image.
    /// * `args` - Argument strings placed in the argument page.
    /// * `parent` - Process that may join the new one.
    ///
    /// # Returns
    ///
    /// The new pid. Fails with [`KernelError::OutOfMemory`] under a non-evicting
    /// policy when no frame is free.
    pub fn spawn(
        &mut self,
        cpu: &mut Cpu,
        name: &str,
        image: &ProgramImage,
        args: &[&str],
        parent: Option<Pid>,
    ) -> Result<Pid, KernelError> {
        let pid = self.create(name, image, args, parent)?;
        cpu.stats.processes_spawned += 1;
        Ok(pid)
    }

    fn create(
        &mut self,
        name: &str,
        image: &ProgramImage,
        args: &[&str],
        parent: Option<Pid>,
    ) -> Result<Pid, KernelError> {
        if !self.replacer.evicts() && self.replacer.free_frames() == 0 {
            return Err(KernelError::OutOfMemory);
        }

        let layout = image.layout(args, self.stack_pages)?;
        if layout.pages_spanned() > self.num_virtual_pages {
            return Err(LoadError::TooLarge {
                pages: layout.pages_spanned(),
                limit: self.num_virtual_pages,
            }
            .into());
        }

        let pid = self
            .processes
            .next_pid()
            .ok_or(KernelError::ProcessTableFull)?;

        let mut table = PageTable::new(self.num_virtual_pages);
        let mut populate = || -> Result<(), KernelError> {
            for loaded in &layout.pages {
                let mut page = Page::new(pid, loaded.vpn, loaded.read_only);
                page.data.copy_from_slice(&loaded.data);
                self.swap.save(name, &page)?;
                page.saved = true;
                let _ = table
                    .insert(page)
                    .map_err(|p| KernelError::InvalidPage(p.key()))?;
            }
            Ok(())
        };
        if let Err(e) = populate() {
            let _ = self.swap.discard(pid, name);
            return Err(e);
        }

        let mut ctx = ProcessContext::new(pid, name, parent, table);
        ctx.regs.write(abi::REG_PC, layout.initial_pc as i32);
        ctx.regs.write(
            abi::REG_NEXT_PC,
            layout.initial_pc.wrapping_add(INSTRUCTION_SIZE) as i32,
        );
        ctx.regs.write(abi::REG_SP, layout.initial_sp as i32);
        ctx.regs.write(abi::REG_A0, layout.argc as i32);
        ctx.regs.write(abi::REG_A1, layout.argv as i32);

        let _ = self.processes.insert_with(|_| ctx);
        self.scheduler.add_process(pid);
        info!(pid, name, pages = layout.pages.len(), ?parent, "process created");
        Ok(pid)
    }

    /// Handles an exception returned by [`Cpu::step`], then reschedules if needed.
    ///
    /// Syscalls are serviced and stepped past; page faults are resolved so the
    /// faulting instruction is retried by the next `step`; interrupts drive
    /// tick accounting and are acknowledged. Every other cause, and any
    /// process-fatal kernel error, terminates the current process with status -1.
    ///
    /// # Arguments
    ///
    /// * `cpu` - The CPU that raised `exception`.
    /// * `exception` - The exception to handle.
    ///
    /// # Returns
    ///
    /// Whether to keep running, or a kernel-fatal error.
    pub fn handle_exception(
        &mut self,
        cpu: &mut Cpu,
        exception: Exception,
    ) -> Result<Control, KernelError> {
        let result = match exception {
            Exception::Syscall => self.syscall(cpu),
            Exception::PageFault(addr) => self.handle_page_fault(cpu, addr).map(|()| Control::Continue),
            Exception::Interrupt => {
                self.interrupt(cpu);
                Ok(Control::Continue)
            }
            fatal => Err(KernelError::Fault(fatal)),
        };

        let control = match result {
            Ok(control) => control,
            Err(e) if e.is_process_fatal() => {
                self.kill_current(cpu, &e)?;
                Control::Continue
            }
            Err(e) => return Err(e),
        };

        if control == Control::Halt {
            return Ok(control);
        }
        self.reschedule(cpu)?;
        Ok(control)
    }

    /// Terminates the current process after a process-fatal error.
    fn kill_current(&mut self, cpu: &mut Cpu, error: &KernelError) -> Result<(), KernelError> {
        let pid = self.current.ok_or(KernelError::NoCurrentProcess)?;
        let cause = error.cause();
        warn!(pid, cause = cause.name(), pc = cpu.pc(), %error, "terminating process");
        cpu.regs.dump();

        if let KernelError::Evict { victim, .. } = error {
            if *victim != pid && self.processes.contains(*victim) {
                warn!(pid = victim, "terminating process whose page was lost");
                self.terminate(cpu, *victim, ExitStatus::Faulted(Cause::PageFault))?;
            }
        }
        self.terminate(cpu, pid, ExitStatus::Faulted(cause))
    }

    /// Takes the parked interrupt, services it and acknowledges it.
    fn interrupt(&mut self, cpu: &mut Cpu) {
        let Some(irq) = cpu.take_interrupt() else {
            return;
        };
        match irq.source() {
            InterruptSource::Timer => {
                cpu.stats.timer_ticks += 1;
                self.tick();
            }
            InterruptSource::Device(id) => debug!(device = id, "device completion"),
        }
        irq.acknowledge();
    }

    /// Accounts one timer tick.
    ///
    /// The running process's tick count grows by one; every sleeping process
    /// counts down, becoming ready when its countdown reaches zero.
    pub fn tick(&mut self) {
        if let Some(p) = self.current.and_then(|pid| self.processes.get_mut(pid)) {
            p.ticks += 1;
        }
        for p in self.processes.iter_mut() {
            if p.state == ProcessState::Waiting && p.wait_ticks > 0 {
                p.wait_ticks -= 1;
                if p.wait_ticks == 0 {
                    p.state = ProcessState::Ready;
                }
            }
        }
    }

    /// Puts the running process to sleep for `ticks` timer ticks.
    pub fn sleep_current(&mut self, ticks: u32) -> Result<(), KernelError> {
        let pid = self.current.ok_or(KernelError::NoCurrentProcess)?;
        if ticks == 0 {
            return Ok(());
        }
        let p = self
            .processes
            .get_mut(pid)
            .ok_or(KernelError::UnknownPid(pid))?;
        p.state = ProcessState::Waiting;
        p.wait_ticks = ticks;
        Ok(())
    }

    /// Dispatches another process if the current one is no longer running or
    /// has used up its quantum. A running process within its quantum keeps the CPU.
    pub fn reschedule(&mut self, cpu: &mut Cpu) -> Result<(), KernelError> {
        let keep = self
            .current
            .and_then(|pid| self.processes.get(pid))
            .is_some_and(|p| p.state == ProcessState::Running && p.ticks < self.quantum);
        if keep {
            return Ok(());
        }
        let _ = self.dispatch(cpu)?;
        Ok(())
    }

    /// Performs a context switch to the process the scheduler selects.
    ///
    /// The displaced process, if still live, has its registers and page table
    /// saved and becomes ready if it was running. The incoming process has its
    /// registers and page table installed, its tick count reset, and any status
    /// word owed to it from a join written into its memory.
    ///
    /// # Returns
    ///
    /// The dispatched pid, or [`KernelError::NothingToRun`].
    pub fn dispatch(&mut self, cpu: &mut Cpu) -> Result<Pid, KernelError> {
        let previous = self.current.take();
        if let Some(p) = previous.and_then(|pid| self.processes.get_mut(pid)) {
            if p.state == ProcessState::Running {
                p.state = ProcessState::Ready;
            }
            p.regs = cpu.regs.clone();
            p.table = cpu.mmu.take_table();
        }

        loop {
            let next = self
                .scheduler
                .schedule(&self.processes)
                .ok_or(KernelError::NothingToRun)?;
            let p = self
                .processes
                .get_mut(next)
                .ok_or(KernelError::UnknownPid(next))?;

            p.state = ProcessState::Running;
            p.ticks = 0;
            cpu.regs = p.regs.clone();
            let _ = cpu.mmu.install(std::mem::take(&mut p.table));
            let pending = p.pending_status.take();
            self.current = Some(next);

            if previous != Some(next) {
                cpu.stats.context_switches += 1;
                debug!(from = ?previous, to = next, "context switch");
            }

            if let Some(PendingStatus { addr, status }) = pending {
                if let Err(e) = self.write_user_word(cpu, addr, status as u32) {
                    self.kill_current(cpu, &e)?;
                    continue;
                }
            }
            return Ok(next);
        }
    }

    /// Ends process `pid`.
    ///
    /// Its frames are released, its swap file discarded, and it leaves the
    /// scheduler. A parent blocked joining it is woken with 1 (normal exit) or 0
    /// in `v0` and the status owed to its pointer; otherwise the status is kept
    /// for a later join. Children of the process are orphaned.
    pub fn terminate(&mut self, cpu: &mut Cpu, pid: Pid, status: ExitStatus) -> Result<(), KernelError> {
        let ctx = self
            .processes
            .remove(pid)
            .ok_or(KernelError::UnknownPid(pid))?;
        let frames = self.replacer.remove_process(pid);
        self.scheduler.remove_process(pid);
        if self.current == Some(pid) {
            drop(cpu.mmu.take_table());
            self.current = None;
        }
        cpu.stats.processes_exited += 1;
        info!(pid, name = %ctx.name, ?status, frames, "process exited");

        if let Some(parent) = ctx.parent.and_then(|pp| self.processes.get_mut(pp)) {
            if parent.joining == Some(pid) {
                parent.joining = None;
                parent.state = ProcessState::Ready;
                parent.regs.write(abi::REG_V0, i32::from(status.is_normal()));
                if parent.status_addr != 0 {
                    parent.pending_status = Some(PendingStatus {
                        addr: parent.status_addr,
                        status: status.code(),
                    });
                }
            } else {
                parent.exited_children.push((pid, status));
            }
        }

        for child in self.processes.iter_mut().filter(|c| c.parent == Some(pid)) {
            child.parent = None;
        }

        self.swap.discard(pid, &ctx.name)?;
        Ok(())
    }

    /// Writes a word into the running process's memory, paging in as needed.
    ///
    /// # Arguments
    ///
    /// * `cpu` - The CPU whose active address space is written.
    /// * `vaddr` - Word-aligned user address.
    /// * `value` - Word to store.
    pub fn write_user_word(&mut self, cpu: &mut Cpu, vaddr: u32, value: u32) -> Result<(), KernelError> {
        let pid = self.current.ok_or(KernelError::NoCurrentProcess)?;
        let addr = VirtAddr::new(vaddr);
        match cpu.write_mem(addr, 4, value) {
            Ok(()) => return Ok(()),
            Err(Exception::PageFault(_)) => self.page_in(cpu, PageKey::new(pid, addr.vpn()))?,
            Err(e) => return Err(KernelError::Fault(e)),
        }
        cpu.write_mem(addr, 4, value).map_err(KernelError::Fault)
    }
}
