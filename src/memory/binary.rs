// Tue Jan 13 2026 - Alex

use crate::memory::{
    Address, Endianness, MemoryError, MemorySnapshot, PointerWidth, RegionKind,
    DEFAULT_REGION_SIZE_LIMIT,
};
use goblin::elf::header::{EM_386, EM_AARCH64, EM_ARM, EM_X86_64};
use goblin::elf::reloc::*;
use goblin::elf::section_header::{SHF_ALLOC, SHF_EXECINSTR, SHF_WRITE, SHN_UNDEF, SHT_NOBITS};
use goblin::elf::Elf;
use goblin::Object;
use log::{debug, warn};
use memmap2::Mmap;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

const EXTERN_REGION_ALIGNMENT: usize = 0x1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySymbol {
    pub name: String,
    pub address: Address,
    pub size: u64,
    pub is_import: bool,
}

/// An ELF file captured into a [`MemorySnapshot`] together with its symbols.
pub struct BinaryImage {
    path: PathBuf,
    snapshot: MemorySnapshot,
    symbols: Vec<BinarySymbol>,
}

struct PendingSection {
    name: String,
    kind: RegionKind,
    addr: u64,
    size: u64,
    bytes: Vec<u8>,
}

impl PendingSection {
    fn end(&self) -> u64 {
        self.addr.saturating_add(self.size)
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingReloc {
    offset: u64,
    r_type: u32,
    sym: usize,
    addend: Option<i64>,
}

impl From<Reloc> for PendingReloc {
    fn from(reloc: Reloc) -> Self {
        Self {
            offset: reloc.r_offset,
            r_type: reloc.r_type,
            sym: reloc.r_sym,
            addend: reloc.r_addend,
        }
    }
}

#[derive(Debug)]
enum RelocAction {
    Relative,
    Absolute,
    Ignore,
}

impl BinaryImage {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MemoryError> {
        Self::load_with_limit(path, DEFAULT_REGION_SIZE_LIMIT)
    }

    pub fn load_with_limit<P: AsRef<Path>>(path: P, size_limit: u64) -> Result<Self, MemoryError> {
        let file = File::open(path.as_ref())?;
        // SAFETY: the mapping is read-only and only lives for the duration of the parse.
        let map = unsafe { Mmap::map(&file)? };
        let mut image = Self::parse(&map, size_limit)?;
        image.path = path.as_ref().to_path_buf();
        Ok(image)
    }

    pub fn parse(data: &[u8], size_limit: u64) -> Result<Self, MemoryError> {
        let object = Object::parse(data)
            .map_err(|e| MemoryError::BinaryParseError(format!("Failed to parse binary: {}", e)))?;

        match object {
            Object::Elf(elf) => Self::from_elf(data, &elf, size_limit),
            Object::Mach(_) => Err(MemoryError::UnsupportedFormat("Mach-O".to_string())),
            Object::PE(_) => Err(MemoryError::UnsupportedFormat("PE".to_string())),
            _ => Err(MemoryError::UnsupportedFormat("unknown".to_string())),
        }
    }

    fn from_elf(data: &[u8], elf: &Elf, size_limit: u64) -> Result<Self, MemoryError> {
        let width = if elf.is_64 { PointerWidth::Bits64 } else { PointerWidth::Bits32 };
        let endian = if elf.little_endian { Endianness::Little } else { Endianness::Big };

        let mut sections = Self::collect_sections(data, elf, size_limit);

        let highest = sections.iter().map(PendingSection::end).max().unwrap_or(0);
        let extern_base = Address::new(highest).align_up(EXTERN_REGION_ALIGNMENT);
        let undefined = elf.dynsyms.iter().enumerate().filter_map(|(index, sym)| {
            if sym.st_shndx != SHN_UNDEF as usize || sym.st_name == 0 {
                return None;
            }
            elf.dynstrtab.get_at(sym.st_name).map(|name| (index, name))
        });
        let (imports, import_slots) = Self::allocate_imports(undefined, extern_base, width);

        let relocs: Vec<PendingReloc> = elf
            .dynrelas
            .iter()
            .chain(elf.dynrels.iter())
            .chain(elf.pltrelocs.iter())
            .map(PendingReloc::from)
            .collect();
        let symbol_address = |index: usize| -> Option<u64> {
            if let Some(&slot) = import_slots.get(&index) {
                return Some(slot);
            }
            elf.dynsyms
                .get(index)
                .filter(|sym| sym.st_shndx != SHN_UNDEF as usize)
                .map(|sym| sym.st_value)
        };
        let applied = Self::apply_relocations(
            elf.header.e_machine,
            &mut sections,
            &relocs,
            symbol_address,
            width,
            endian,
        );
        debug!("Applied {} of {} relocations", applied, relocs.len());

        let snapshot =
            Self::build_snapshot(sections, extern_base, imports.len(), width, endian, size_limit)?;

        let mut symbols = Self::collect_defined_symbols(elf);
        symbols.extend(imports);

        Ok(Self {
            path: PathBuf::new(),
            snapshot,
            symbols,
        })
    }

    fn section_kind(flags: u64) -> RegionKind {
        if flags & SHF_EXECINSTR as u64 != 0 {
            RegionKind::Code
        } else if flags & SHF_WRITE as u64 != 0 {
            RegionKind::Data
        } else {
            RegionKind::Const
        }
    }

    fn collect_sections(data: &[u8], elf: &Elf, size_limit: u64) -> Vec<PendingSection> {
        let mut sections = Vec::new();
        for header in &elf.section_headers {
            if header.sh_flags & SHF_ALLOC as u64 == 0
                || header.sh_type == SHT_NOBITS
                || header.sh_addr == 0
                || header.sh_size == 0
            {
                continue;
            }

            let name = elf.shdr_strtab.get_at(header.sh_name).unwrap_or("").to_string();
            let kind = Self::section_kind(header.sh_flags);

            // Oversized sections keep an empty buffer; the snapshot builder refuses them.
            let bytes = if header.sh_size > size_limit {
                Vec::new()
            } else {
                let start = header.sh_offset as usize;
                let end = start.saturating_add(header.sh_size as usize);
                match data.get(start..end) {
                    Some(bytes) => bytes.to_vec(),
                    None => {
                        warn!("Section {} lies outside the file, skipping", name);
                        continue;
                    }
                }
            };

            sections.push(PendingSection {
                name,
                kind,
                addr: header.sh_addr,
                size: header.sh_size,
                bytes,
            });
        }
        sections
    }

    /// Gives each undefined symbol its own pointer-sized slot starting at `base`.
    fn allocate_imports<'n>(
        undefined: impl IntoIterator<Item = (usize, &'n str)>,
        base: Address,
        width: PointerWidth,
    ) -> (Vec<BinarySymbol>, HashMap<usize, u64>) {
        let mut imports = Vec::new();
        let mut slots = HashMap::new();

        for (index, name) in undefined {
            let address = base + imports.len() as u64 * width.bytes_u64();
            slots.insert(index, address.as_u64());
            imports.push(BinarySymbol {
                name: name.to_string(),
                address,
                size: width.bytes_u64(),
                is_import: true,
            });
        }

        (imports, slots)
    }

    /// Defined symbols from both tables. A name defined at several addresses is kept once per address.
    fn collect_defined_symbols(elf: &Elf) -> Vec<BinarySymbol> {
        let tables = [(&elf.syms, &elf.strtab), (&elf.dynsyms, &elf.dynstrtab)];
        let mut seen = HashSet::new();
        let mut symbols = Vec::new();

        for (syms, strtab) in tables {
            for sym in syms.iter() {
                if sym.st_shndx == SHN_UNDEF as usize || sym.st_value == 0 || sym.st_name == 0 {
                    continue;
                }
                let Some(name) = strtab.get_at(sym.st_name) else {
                    continue;
                };
                if !seen.insert((name.to_string(), sym.st_value)) {
                    continue;
                }
                symbols.push(BinarySymbol {
                    name: name.to_string(),
                    address: Address::new(sym.st_value),
                    size: sym.st_size,
                    is_import: false,
                });
            }
        }

        symbols
    }

    fn classify_relocation(machine: u16, r_type: u32) -> RelocAction {
        match (machine, r_type) {
            (EM_X86_64, R_X86_64_RELATIVE)
            | (EM_AARCH64, R_AARCH64_RELATIVE)
            | (EM_386, R_386_RELATIVE)
            | (EM_ARM, R_ARM_RELATIVE) => RelocAction::Relative,
            (EM_X86_64, R_X86_64_64)
            | (EM_X86_64, R_X86_64_GLOB_DAT)
            | (EM_AARCH64, R_AARCH64_ABS64)
            | (EM_AARCH64, R_AARCH64_GLOB_DAT)
            | (EM_386, R_386_32)
            | (EM_386, R_386_GLOB_DAT)
            | (EM_ARM, R_ARM_ABS32)
            | (EM_ARM, R_ARM_GLOB_DAT) => RelocAction::Absolute,
            _ => RelocAction::Ignore,
        }
    }

    /// Applies load-time relocations so data pointers read as the loader would see them.
    /// Returns how many were written.
    fn apply_relocations(
        machine: u16,
        sections: &mut [PendingSection],
        relocs: &[PendingReloc],
        symbol_address: impl Fn(usize) -> Option<u64>,
        width: PointerWidth,
        endian: Endianness,
    ) -> usize {
        let mut applied = 0usize;
        for reloc in relocs {
            let Some(reloc_end) = reloc.offset.checked_add(width.bytes_u64()) else {
                continue;
            };
            let Some(section) = sections
                .iter_mut()
                .find(|s| reloc.offset >= s.addr && reloc_end <= s.end())
            else {
                continue;
            };
            let offset = (reloc.offset - section.addr) as usize;
            let Some(slot) = section.bytes.get_mut(offset..offset.saturating_add(width.bytes())) else {
                continue;
            };
            let implicit = endian.read_word(slot, width).unwrap_or(0);

            let value = match Self::classify_relocation(machine, reloc.r_type) {
                RelocAction::Relative => match reloc.addend {
                    Some(addend) => addend as u64,
                    None => implicit,
                },
                RelocAction::Absolute => match symbol_address(reloc.sym) {
                    Some(base) => {
                        let addend = reloc.addend.map_or(implicit, |a| a as u64);
                        base.wrapping_add(addend)
                    }
                    None => continue,
                },
                RelocAction::Ignore => continue,
            };

            slot.copy_from_slice(&endian.encode_word(value, width));
            applied += 1;
        }
        applied
    }

    /// Captures the sections plus one extern region of `import_count` slots.
    /// Sections the builder refuses are logged and left out.
    fn build_snapshot(
        sections: Vec<PendingSection>,
        extern_base: Address,
        import_count: usize,
        width: PointerWidth,
        endian: Endianness,
        size_limit: u64,
    ) -> Result<MemorySnapshot, MemoryError> {
        let mut builder = MemorySnapshot::builder(width, endian).with_size_limit(size_limit);
        for section in sections {
            match builder.add_region(
                &section.name,
                section.kind,
                Address::new(section.addr),
                section.size,
                section.bytes,
            ) {
                Ok(_) => {}
                Err(e @ MemoryError::RegionTooLarge { .. })
                | Err(e @ MemoryError::OverlappingRegions(_))
                | Err(e @ MemoryError::InvalidRange) => {
                    warn!("Skipping region {}: {}", section.name, e)
                }
                Err(e) => return Err(e),
            }
        }
        if import_count > 0 {
            let size = import_count as u64 * width.bytes_u64();
            builder.add_region("extern", RegionKind::Extern, extern_base, size, Vec::new())?;
        }
        Ok(builder.build())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> &MemorySnapshot {
        &self.snapshot
    }

    pub fn symbols(&self) -> &[BinarySymbol] {
        &self.symbols
    }

    pub fn into_parts(self) -> (MemorySnapshot, Vec<BinarySymbol>) {
        (self.snapshot, self.symbols)
    }
}
