// Fri Jan 16 2026 - Alex

use crate::memory::Address;
use crate::rtti::{HierarchyParser, RttiError, TypeInfoKind};
use crate::symbol::FieldKind;
use log::{debug, info};

/// Locates the runtime's own type_info records through their name strings,
/// which names the vtables the class walker later starts from.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeInfoScanner;

impl TypeInfoScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan(&self, parser: &mut HierarchyParser<'_>, kind: TypeInfoKind) -> Result<Address, RttiError> {
        let image = parser.image();
        let name = kind.mangled_name();

        let literal = parser
            .oracle()
            .find_string_literal(name)
            .ok_or_else(|| RttiError::NotFound(format!("string {}", name)))?;
        let references = parser.oracle().find_references_to(literal, false)?;
        let reference = references
            .first()
            .copied()
            .ok_or_else(|| RttiError::NotFound(format!("reference to {}", literal)))?;

        let record = reference - image.pointer_size();
        if image.is_bad_address(record) {
            return Err(RttiError::BadAddress(record));
        }

        info!("found {} at {}", kind, record);
        let next = parser.format_type_info(record)?;
        if kind.has_trailing_pointer() {
            parser.format_struct(next, &[FieldKind::Pointer]);
        }
        Ok(record)
    }

    /// Runs every kind; failures only mean that kind stays unnamed.
    pub fn scan_all(&self, parser: &mut HierarchyParser<'_>) -> usize {
        let mut found = 0;
        for kind in TypeInfoKind::ALL {
            match self.scan(parser, kind) {
                Ok(_) => found += 1,
                Err(err) => debug!("Skipping {}: {}", kind, err),
            }
        }
        parser.stats_mut().type_infos_found += found;
        found
    }
}
