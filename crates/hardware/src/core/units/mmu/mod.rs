//! Memory Management Unit (MMU).
//!
//! This module implements virtual-to-physical address translation. It provides:
//! 1. **Paged Translation:** Lookup through the active process's page table, with
//!    page fault, read-only and bus error detection.
//! 2. **Identity Translation:** Virtual addresses used directly as physical ones when
//!    virtual memory is disabled.
//! 3. **Reference Bits:** Every successful translation sets the page's used bit, and
//!    writes set its dirty bit. Nothing else sets them.
//! 4. **Memory Access:** Sized loads and stores through translation.

/// Pages, page keys and page tables.
pub mod page;

use crate::common::{AccessType, Exception, PhysAddr, TranslationResult, VirtAddr};
use crate::soc::memory::PhysicalMemory;

use self::page::PageTable;

/// Memory Management Unit owning physical memory and the active page table.
///
/// The page table of the running process is moved into the MMU on dispatch and
/// moved back out on a context switch, so exactly one address space is live.
#[derive(Debug)]
pub struct Mmu {
    memory: PhysicalMemory,
    table: PageTable,
    vm_enabled: bool,
}

impl Mmu {
    /// Creates an MMU over `memory` with an empty active page table.
    ///
    /// # Arguments
    ///
    /// * `memory` - Physical memory to translate into.
    /// * `vm_enabled` - When false, translation is the identity mapping.
    pub fn new(memory: PhysicalMemory, vm_enabled: bool) -> Self {
        Self {
            memory,
            table: PageTable::default(),
            vm_enabled,
        }
    }

    /// Returns `true` if translation goes through page tables.
    pub const fn vm_enabled(&self) -> bool {
        self.vm_enabled
    }

    /// Returns physical memory.
    pub const fn memory(&self) -> &PhysicalMemory {
        &self.memory
    }

    /// Returns physical memory mutably, bypassing translation.
    pub fn memory_mut(&mut self) -> &mut PhysicalMemory {
        &mut self.memory
    }

    /// Returns the active page table.
    pub const fn table(&self) -> &PageTable {
        &self.table
    }

    /// Returns the active page table mutably.
    pub fn table_mut(&mut self) -> &mut PageTable {
        &mut self.table
    }

    /// Splits the MMU into its active page table and physical memory.
    pub fn parts_mut(&mut self) -> (&mut PageTable, &mut PhysicalMemory) {
        (&mut self.table, &mut self.memory)
    }

    /// Installs `table` as the active page table.
    ///
    /// # Returns
    ///
    /// The previously active table.
    pub fn install(&mut self, table: PageTable) -> PageTable {
        std::mem::replace(&mut self.table, table)
    }

    /// Removes the active page table, leaving an empty one in its place.
    pub fn take_table(&mut self) -> PageTable {
        std::mem::take(&mut self.table)
    }

    /// Translates a virtual address to a physical address.
    ///
    /// Checks, in order: alignment, then (paged mode) page presence, write
    /// permission, and frame range, or (identity mode) frame range alone.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual address to translate.
    /// * `size` - Access width in bytes (1, 2, or 4).
    /// * `access` - Type of access; only writes are checked against read-only pages.
    ///
    /// # Returns
    ///
    /// The physical address, or the exception the access raises.
    pub fn translate(&mut self, vaddr: VirtAddr, size: u32, access: AccessType) -> TranslationResult {
        if !vaddr.is_aligned(size) {
            return Err(Exception::AddressError(vaddr.val()));
        }

        let frames = self.memory.num_frames();

        if !self.vm_enabled {
            if vaddr.vpn() >= frames {
                return Err(Exception::BusError(vaddr.val()));
            }
            return Ok(PhysAddr::new(vaddr.val()));
        }

        let page = match self.table.get_mut(vaddr.vpn()) {
            Some(page) if page.present => page,
            _ => return Err(Exception::PageFault(vaddr.val())),
        };

        let writing = access.is_write();
        if page.read_only && writing {
            return Err(Exception::ReadOnly(vaddr.val()));
        }

        let ppn = match page.ppn {
            Some(ppn) if ppn < frames => ppn,
            _ => return Err(Exception::BusError(vaddr.val())),
        };

        page.used = true;
        if writing {
            page.dirty = true;
        }

        Ok(PhysAddr::from_parts(ppn, vaddr.page_offset()))
    }

    /// Reads `size` bytes at a virtual address, zero-extended.
    pub fn read(&mut self, vaddr: VirtAddr, size: u32) -> Result<u32, Exception> {
        let paddr = self.translate(vaddr, size, AccessType::Read)?;
        Ok(self.memory.read(paddr, size))
    }

    /// Fetches the instruction word at `pc`.
    pub fn fetch(&mut self, pc: VirtAddr) -> Result<u32, Exception> {
        let paddr = self.translate(pc, 4, AccessType::Fetch)?;
        Ok(self.memory.read(paddr, 4))
    }

    /// Writes the low `size` bytes of `value` at a virtual address.
    pub fn write(&mut self, vaddr: VirtAddr, size: u32, value: u32) -> Result<(), Exception> {
        let paddr = self.translate(vaddr, size, AccessType::Write)?;
        self.memory.write(paddr, size, value);
        Ok(())
    }
}
