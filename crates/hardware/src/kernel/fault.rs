//! Page Fault Handling.
//!
//! Brings a page into physical memory. The replacement policy picks a frame;
//! if that frame's page is evicted, its bytes go to the page's private buffer
//! and, when dirty or never saved, to swap. The incoming page is then filled
//! from swap if it was ever saved and zero-filled otherwise, so no bytes of a
//! previous owner leak into it.
//!
//! Pages of the running process live in the MMU's active table; pages of every
//! other process live in the process table. [`Directory`] spans both.

use tracing::debug;

use super::replacement::{PageDirectory, Replacement};
use super::{Kernel, KernelError};
use crate::common::{Pid, VirtAddr};
use crate::core::Cpu;
use crate::core::units::mmu::page::{Page, PageKey, PageTable};
use crate::kernel::process::ProcessTable;
use crate::soc::memory::PhysicalMemory;
use crate::stats::SimStats;
use crate::storage::SwapSpace;

/// Page lookup across the active table and the process table.
struct Directory<'a> {
    active: Option<Pid>,
    table: &'a mut PageTable,
    processes: &'a mut ProcessTable,
}

impl Directory<'_> {
    fn table_of(&mut self, pid: Pid) -> Option<&mut PageTable> {
        if self.active == Some(pid) {
            Some(&mut *self.table)
        } else {
            self.processes.get_mut(pid).map(|p| &mut p.table)
        }
    }

    fn name_of(&self, pid: Pid) -> Result<String, KernelError> {
        self.processes
            .get(pid)
            .map(|p| p.name.clone())
            .ok_or(KernelError::UnknownPid(pid))
    }
}

impl PageDirectory for Directory<'_> {
    fn page_mut(&mut self, key: PageKey) -> Option<&mut Page> {
        self.table_of(key.pid)?.get_mut(key.vpn)
    }
}

impl Kernel {
    /// Resolves a page fault of the running process at `addr`.
    ///
    /// The faulting instruction is not retried here; the next `step` re-issues it.
    pub fn handle_page_fault(&mut self, cpu: &mut Cpu, addr: u32) -> Result<(), KernelError> {
        let pid = self.current.ok_or(KernelError::NoCurrentProcess)?;
        self.page_in(cpu, PageKey::new(pid, VirtAddr::new(addr).vpn()))
    }

    /// Makes page `key` resident, creating it if it does not exist yet.
    ///
    /// Does nothing if the page is already present.
    ///
    /// # Arguments
    ///
    /// * `cpu` - The CPU whose MMU holds physical memory and the active table.
    /// * `key` - The page to bring in; any live process.
    ///
    /// # Returns
    ///
    /// [`KernelError::InvalidPage`] if the page lies outside the address space,
    /// [`KernelError::OutOfMemory`] if the policy finds no frame, and swap errors.
    pub fn page_in(&mut self, cpu: &mut Cpu, key: PageKey) -> Result<(), KernelError> {
        let (table, memory) = cpu.mmu.parts_mut();
        let mut dir = Directory {
            active: self.current,
            table,
            processes: &mut self.processes,
        };

        let page = dir
            .table_of(key.pid)
            .ok_or(KernelError::UnknownPid(key.pid))?
            .get_or_create(key.pid, key.vpn)
            .ok_or(KernelError::InvalidPage(key))?;
        if page.present {
            return Ok(());
        }

        let Replacement { frame, evicted } = self.replacer.replace(key, &mut dir)?;
        let filled = fill(&mut dir, memory, &mut self.swap, &mut cpu.stats, key, frame, evicted);
        if filled.is_err() {
            self.replacer.release(frame);
        }
        filled
    }
}

/// Moves `evicted` out of `frame` and `key` into it.
fn fill(
    dir: &mut Directory<'_>,
    memory: &mut PhysicalMemory,
    swap: &mut SwapSpace,
    stats: &mut SimStats,
    key: PageKey,
    frame: usize,
    evicted: Option<PageKey>,
) -> Result<(), KernelError> {
    if let Some(victim) = evicted {
        let name = dir.name_of(victim.pid)?;
        let page = dir
            .page_mut(victim)
            .ok_or(KernelError::InvalidPage(victim))?;
        debug!(pid = victim.pid, vpn = victim.vpn, frame, dirty = page.dirty, "evict");
        stats.page_evictions += 1;

        let saved = if page.needs_save() {
            let bytes = memory.frame(frame).ok_or(KernelError::InvalidFrame(frame))?;
            page.data.copy_from_slice(bytes);
            let result = swap.save(&name, page);
            page.saved = page.saved || result.is_ok();
            Some(result)
        } else {
            None
        };
        page.unmap();

        if let Some(result) = saved {
            result.map_err(|source| KernelError::Evict {
                victim: victim.pid,
                source,
            })?;
            stats.page_saves += 1;
        }
    }

    let name = dir.name_of(key.pid)?;
    let page = dir.page_mut(key).ok_or(KernelError::InvalidPage(key))?;
    if page.saved {
        swap.load(&name, page)?;
        memory
            .frame_mut(frame)
            .ok_or(KernelError::InvalidFrame(frame))?
            .copy_from_slice(&page.data);
        stats.page_loads += 1;
    } else {
        memory.zero_frame(frame);
        stats.zero_fills += 1;
    }
    page.map(frame);
    debug!(pid = key.pid, vpn = key.vpn, frame, "page in");
    Ok(())
}
