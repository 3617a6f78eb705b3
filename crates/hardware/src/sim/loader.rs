//! Program Loader.
//!
//! This module turns executables into the initial page contents of a process. It performs:
//! 1. **Validation:** Sections must start on page boundaries and cover the address space
//!    contiguously from virtual page 0.
//! 2. **ELF parsing:** 32-bit little-endian MIPS ELF files are read through `object`.
//! 3. **Layout:** Code and data pages, then the stack, then one page of arguments.

use object::{Architecture, Object, ObjectSection, SectionKind};
use thiserror::Error;

use crate::common::constants::PAGE_SIZE;

/// Errors raised while loading a program. None of these occur at run time.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The ELF container could not be parsed.
    #[error("malformed executable: {0}")]
    Elf(#[from] object::read::Error),

    /// The executable is not a 32-bit little-endian MIPS program.
    #[error("unsupported executable: {0}")]
    Unsupported(String),

    /// The program has no loadable sections.
    #[error("program has no loadable sections")]
    Empty,

    /// A section does not start on a page boundary.
    #[error("section {name} at {address:#x} is not page aligned")]
    Misaligned {
        /// Section name.
        name: String,
        /// Section start address.
        address: u64,
    },

    /// Sections leave a gap or overlap.
    #[error("section {name} starts at page {vpn}, expected page {expected}")]
    NotContiguous {
        /// Section name.
        name: String,
        /// First page of the section.
        vpn: usize,
        /// First page after the previous section.
        expected: usize,
    },

    /// The program, stack and argument page exceed the address space.
    #[error("program needs {pages} virtual pages, only {limit} available")]
    TooLarge {
        /// Pages needed.
        pages: usize,
        /// Pages in an address space.
        limit: usize,
    },

    /// The argument vector does not fit in one page.
    #[error("arguments need {bytes} bytes, only {limit} available")]
    ArgsTooLarge {
        /// Bytes needed.
        bytes: usize,
        /// Bytes in the argument page.
        limit: usize,
    },
}

/// One loadable section of a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Section name, for diagnostics.
    pub name: String,
    /// First virtual page of the section.
    pub vpn: usize,
    /// Section contents. The last page is zero-padded.
    pub data: Vec<u8>,
    /// Pages of this section reject stores.
    pub read_only: bool,
}

impl Section {
    /// Creates a section starting at page `vpn`.
    pub fn new(name: impl Into<String>, vpn: usize, data: Vec<u8>, read_only: bool) -> Self {
        Self {
            name: name.into(),
            vpn,
            data,
            read_only,
        }
    }

    /// Returns the number of pages the section occupies. Empty sections occupy none.
    pub fn pages(&self) -> usize {
        self.data.len().div_ceil(PAGE_SIZE as usize)
    }
}

/// A validated program: an entry point and contiguous sections from page 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramImage {
    /// Initial program counter.
    pub entry: u32,
    sections: Vec<Section>,
}

/// Initial contents of one page of a new process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedPage {
    /// Virtual page number.
    pub vpn: usize,
    /// The page rejects stores.
    pub read_only: bool,
    /// Exactly one page of bytes.
    pub data: Box<[u8]>,
}

/// Address space layout of a new process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessLayout {
    /// Pages with initial contents: code, data, and the argument page.
    pub pages: Vec<LoadedPage>,
    /// Initial program counter.
    pub initial_pc: u32,
    /// Initial stack pointer, just past the top stack page.
    pub initial_sp: u32,
    /// Number of arguments.
    pub argc: u32,
    /// Address of the argument pointer array.
    pub argv: u32,
    /// Page holding the argument vector.
    pub arg_page: usize,
}

impl ProgramImage {
    /// Validates `sections` and builds an image.
    ///
    /// Sections are sorted by start page; empty ones are dropped.
    ///
    /// # Arguments
    ///
    /// * `entry` - Initial program counter.
    /// * `sections` - Loadable sections.
    ///
    /// # Returns
    ///
    /// The image, or a [`LoadError`] if the sections leave a gap, overlap or do
    /// not start at page 0.
    pub fn new(entry: u32, mut sections: Vec<Section>) -> Result<Self, LoadError> {
        sections.retain(|s| !s.data.is_empty());
        sections.sort_by_key(|s| s.vpn);
        if sections.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut expected = 0;
        for section in &sections {
            if section.vpn != expected {
                return Err(LoadError::NotContiguous {
                    name: section.name.clone(),
                    vpn: section.vpn,
                    expected,
                });
            }
            expected += section.pages();
        }

        Ok(Self { entry, sections })
    }

    /// Parses a 32-bit little-endian MIPS ELF executable.
    ///
    /// Text and read-only sections become read-only pages; uninitialized data is
    /// zero-filled. Non-allocated sections are ignored.
    pub fn from_elf(bytes: &[u8]) -> Result<Self, LoadError> {
        let file = object::File::parse(bytes)?;
        if file.architecture() != Architecture::Mips || file.is_64() || !file.is_little_endian() {
            return Err(LoadError::Unsupported(format!(
                "{:?}, {}-bit, {}",
                file.architecture(),
                if file.is_64() { 64 } else { 32 },
                if file.is_little_endian() { "little-endian" } else { "big-endian" },
            )));
        }

        let mut sections = Vec::new();
        for section in file.sections() {
            let read_only = match section.kind() {
                SectionKind::Text
                | SectionKind::ReadOnlyData
                | SectionKind::ReadOnlyDataWithRel
                | SectionKind::ReadOnlyString => true,
                SectionKind::Data | SectionKind::UninitializedData => false,
                _ => continue,
            };
            if section.size() == 0 {
                continue;
            }

            let name = section.name().unwrap_or("?").to_owned();
            let address = section.address();
            if address % u64::from(PAGE_SIZE) != 0 {
                return Err(LoadError::Misaligned { name, address });
            }

            let data = if section.kind() == SectionKind::UninitializedData {
                vec![0; section.size() as usize]
            } else {
                section.data()?.to_vec()
            };
            let vpn = (address / u64::from(PAGE_SIZE)) as usize;
            tracing::debug!(section = %name, vpn, bytes = data.len(), "loadable section");
            sections.push(Section::new(name, vpn, data, read_only));
        }

        Self::new(file.entry() as u32, sections)
    }

    /// Returns the sections in page order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the number of code and data pages.
    pub fn code_pages(&self) -> usize {
        self.sections.iter().map(Section::pages).sum()
    }

    /// Lays out a process running this image.
    ///
    /// The argument page holds `args.len()` little-endian string pointers followed
    /// by the NUL-terminated strings they point to.
    ///
    /// # Arguments
    ///
    /// * `args` - Program arguments.
    /// * `stack_pages` - Pages reserved for the stack between code and arguments.
    pub fn layout(&self, args: &[&str], stack_pages: usize) -> Result<ProcessLayout, LoadError> {
        let page_size = PAGE_SIZE as usize;
        let code_pages = self.code_pages();
        let arg_page = code_pages + stack_pages;
        let argv = (arg_page * page_size) as u32;

        let needed = args.len() * 4 + args.iter().map(|a| a.len() + 1).sum::<usize>();
        if needed > page_size {
            return Err(LoadError::ArgsTooLarge {
                bytes: needed,
                limit: page_size,
            });
        }

        let mut pages = Vec::with_capacity(code_pages + 1);
        for section in &self.sections {
            for (i, chunk) in section.data.chunks(page_size).enumerate() {
                let mut data = vec![0; page_size];
                data[..chunk.len()].copy_from_slice(chunk);
                pages.push(LoadedPage {
                    vpn: section.vpn + i,
                    read_only: section.read_only,
                    data: data.into_boxed_slice(),
                });
            }
        }

        let mut arg_data = vec![0; page_size];
        let mut string_offset = args.len() * 4;
        for (i, arg) in args.iter().enumerate() {
            let ptr = argv + string_offset as u32;
            arg_data[i * 4..i * 4 + 4].copy_from_slice(&ptr.to_le_bytes());
            arg_data[string_offset..string_offset + arg.len()].copy_from_slice(arg.as_bytes());
            string_offset += arg.len() + 1;
        }
        pages.push(LoadedPage {
            vpn: arg_page,
            read_only: false,
            data: arg_data.into_boxed_slice(),
        });

        Ok(ProcessLayout {
            pages,
            initial_pc: self.entry,
            initial_sp: (arg_page * page_size) as u32,
            argc: args.len() as u32,
            argv,
            arg_page,
        })
    }
}

impl ProcessLayout {
    /// Returns the number of virtual pages the layout spans, argument page included.
    pub const fn pages_spanned(&self) -> usize {
        self.arg_page + 1
    }
}
