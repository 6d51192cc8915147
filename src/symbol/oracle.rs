// Wed Jan 15 2026 - Alex

use crate::memory::{Address, MemoryImage, RegionKind, WordScanner};
use crate::symbol::{demangle, StringTable, SymbolError, SymbolTable, DEFAULT_MIN_STRING_LENGTH};
use log::debug;

/// How a recovered record field should be typed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Plain pointer.
    Pointer,
    /// Vtable pointer; the referenced address sits two words into the vtable.
    VtablePointer,
    /// 32-bit integer.
    Dword,
    /// Pointer-sized integer.
    Word,
}

/// Naming, lookup and demangling services the recovery engine consumes.
pub trait SymbolOracle {
    fn find_string_literal(&self, text: &str) -> Option<Address>;

    /// Non-code references to `address`. More than one is an error unless `allow_many`.
    fn find_references_to(&self, address: Address, allow_many: bool) -> Result<Vec<Address>, SymbolError>;

    fn resolve_name(&self, name: &str) -> Option<Address>;
    fn name_at(&self, address: Address) -> Option<String>;
    fn assign_name(&mut self, address: Address, name: &str) -> bool;

    fn define_field(&mut self, _address: Address, _kind: FieldKind) {}

    fn demangle(&self, mangled: &str) -> Option<String> {
        demangle::demangle(mangled)
    }
}

/// Oracle backed by a captured image, its symbol table and its string list.
pub struct ImageOracle<'a> {
    image: &'a dyn MemoryImage,
    table: SymbolTable,
    strings: StringTable,
    scanner: WordScanner,
}

impl<'a> ImageOracle<'a> {
    pub fn new(image: &'a dyn MemoryImage, table: SymbolTable) -> Self {
        Self {
            image,
            table,
            strings: StringTable::scan(image, DEFAULT_MIN_STRING_LENGTH),
            scanner: WordScanner::for_image(image),
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn into_table(self) -> SymbolTable {
        self.table
    }

    /// Raw search for `text` as a whole NUL-terminated literal, used when the
    /// string list missed it. The match must start a region or follow a NUL.
    fn search_literal(&self, text: &str) -> Option<Address> {
        let mut needle = text.as_bytes().to_vec();
        needle.push(0);
        self.image.scan_regions().into_iter().find_map(|region| {
            let data = region.data();
            data.windows(needle.len())
                .enumerate()
                .find(|&(offset, window)| {
                    window == needle.as_slice() && (offset == 0 || data[offset - 1] == 0)
                })
                .map(|(offset, _)| region.start() + offset as u64)
        })
    }
}

impl SymbolOracle for ImageOracle<'_> {
    fn find_string_literal(&self, text: &str) -> Option<Address> {
        self.strings.find(text).or_else(|| self.search_literal(text))
    }

    fn find_references_to(&self, address: Address, allow_many: bool) -> Result<Vec<Address>, SymbolError> {
        let found: Vec<Address> = self
            .image
            .regions()
            .iter()
            .filter(|region| region.kind() != RegionKind::Extern)
            .flat_map(|region| self.scanner.find_word(region, address.as_u64()))
            .filter(|&reference| !self.image.is_code(reference))
            .collect();

        if found.len() > 1 && !allow_many {
            debug!("Too many xrefs to {} ({})", address, found.len());
            return Err(SymbolError::AmbiguousReference {
                address,
                count: found.len(),
            });
        }

        Ok(found)
    }

    fn resolve_name(&self, name: &str) -> Option<Address> {
        self.table.resolve(name)
    }

    fn name_at(&self, address: Address) -> Option<String> {
        self.table.name_at(address).map(str::to_string)
    }

    fn assign_name(&mut self, address: Address, name: &str) -> bool {
        let assigned = self.table.insert(address, name);
        if !assigned {
            debug!("Name {} already in use, not assigning it to {}", name, address);
        }
        assigned
    }

    fn define_field(&mut self, address: Address, kind: FieldKind) {
        self.table.define_field(address, kind);
    }
}
