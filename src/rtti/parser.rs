// Fri Jan 16 2026 - Alex

use crate::memory::{Address, MemoryImage};
use crate::rtti::{
    BaseRef, ClassId, ClassRegistry, RecordLayout, RecoveryStats, RttiError, VTableLocator,
};
use crate::symbol::{FieldKind, SymbolOracle};
use crate::utils::sign_extend_24;
use log::{debug, info, warn};

pub const DEFAULT_MAX_NAME_LENGTH: usize = 1000;
pub const DEFAULT_MAX_BASE_COUNT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_name_length: usize,
    pub max_base_count: u32,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_base_count: DEFAULT_MAX_BASE_COUNT,
        }
    }
}

/// Decodes type_info records into the class registry.
///
/// Every `format_*` method returns the address just past the record it
/// decoded. Fields are reported to the oracle as they are consumed.
pub struct HierarchyParser<'a> {
    image: &'a dyn MemoryImage,
    oracle: &'a mut dyn SymbolOracle,
    registry: &'a mut ClassRegistry,
    locator: VTableLocator<'a>,
    limits: ParseLimits,
    stats: RecoveryStats,
}

impl<'a> HierarchyParser<'a> {
    pub fn new(
        image: &'a dyn MemoryImage,
        oracle: &'a mut dyn SymbolOracle,
        registry: &'a mut ClassRegistry,
        limits: ParseLimits,
    ) -> Self {
        Self {
            image,
            oracle,
            registry,
            locator: VTableLocator::new(image),
            limits,
            stats: RecoveryStats::default(),
        }
    }

    pub fn image(&self) -> &'a dyn MemoryImage {
        self.image
    }

    pub fn oracle(&self) -> &dyn SymbolOracle {
        &*self.oracle
    }

    pub fn registry(&self) -> &ClassRegistry {
        self.registry
    }

    pub fn limits(&self) -> ParseLimits {
        self.limits
    }

    pub fn stats(&self) -> &RecoveryStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut RecoveryStats {
        &mut self.stats
    }

    pub fn into_stats(self) -> RecoveryStats {
        self.stats
    }

    /// Types consecutive fields starting at `address`.
    pub fn format_struct(&mut self, address: Address, fields: &[FieldKind]) -> Address {
        let ptr = self.image.pointer_size();
        fields.iter().fold(address, |cursor, &field| {
            self.oracle.define_field(cursor, field);
            let size = match field {
                FieldKind::Dword => 4,
                FieldKind::Pointer | FieldKind::VtablePointer | FieldKind::Word => ptr,
            };
            cursor + size
        })
    }

    pub fn format(&mut self, layout: RecordLayout, address: Address) -> Result<Address, RttiError> {
        let result = match layout {
            RecordLayout::NoBase => self.format_type_info(address),
            RecordLayout::SingleBase => self.format_si_type_info(address),
            RecordLayout::MultiBase => self.format_vmi_type_info(address),
        };
        if result.is_ok() {
            self.stats.record_layout(layout);
        }
        result
    }

    /// Decodes the `{vtable, name}` head shared by every type_info record,
    /// names the record, and names its vtable when one can be found.
    ///
    /// The class keeps its name even when the vtable lookup fails.
    pub fn format_type_info(&mut self, address: Address) -> Result<Address, RttiError> {
        let ptr = self.image.pointer_size();
        let name_ptr = self.image.read_pointer(address + ptr)?;
        if self.image.is_bad_address(name_ptr) {
            return Err(RttiError::BadAddress(name_ptr));
        }

        let raw = self
            .image
            .read_bounded_string(name_ptr, self.limits.max_name_length);
        let raw = String::from_utf8_lossy(&raw).into_owned();
        let proper = raw.strip_prefix('*').unwrap_or(raw.as_str()).to_string();
        if proper.is_empty() {
            return Err(RttiError::NotFound(format!("type name at {}", name_ptr)));
        }

        let next = self.format_struct(address, &[FieldKind::VtablePointer, FieldKind::Pointer]);
        self.oracle.assign_name(name_ptr, &format!("_ZTS{}", proper));
        self.oracle.assign_name(address, &format!("_ZTI{}", proper));

        let display = self
            .oracle
            .demangle(&format!("_Z{}", proper))
            .unwrap_or_else(|| proper.clone());
        let id = self.registry.get_or_create(address);
        self.registry.set_name(id, display);

        let Some(slot) = self.locator.locate(address) else {
            debug!("No vtable found for {} ({})", proper, address);
            self.stats.missing_vtables += 1;
            return Err(RttiError::NotFound(format!("vtable for {}", proper)));
        };

        let vtable = slot - ptr;
        info!("vtable for {} at {}", proper, vtable);
        self.format_struct(slot, &[FieldKind::Pointer, FieldKind::Pointer]);
        self.oracle.assign_name(vtable, &format!("_ZTV{}", proper));
        if let Some(class) = self.registry.get_mut(id) {
            class.vtable = Some(vtable);
        }

        Ok(next)
    }

    pub fn format_si_type_info(&mut self, address: Address) -> Result<Address, RttiError> {
        let next = self.format_type_info(address)?;
        let owner = self.registry.get_or_create(address);
        let target = self.base_target(next);
        self.registry.add_base(owner, BaseRef::single(target));
        Ok(self.format_struct(next, &[FieldKind::Pointer]))
    }

    pub fn format_vmi_type_info(&mut self, address: Address) -> Result<Address, RttiError> {
        let ptr = self.image.pointer_size();
        let next = self.format_type_info(address)?;
        let mut cursor = self.format_struct(next, &[FieldKind::Dword, FieldKind::Dword]);

        let count_address = cursor - 4;
        let base_count = self.image.read_u32(count_address)?;
        if base_count > self.limits.max_base_count {
            warn!(
                "{}: over {} base classes ({}) ({})",
                address, self.limits.max_base_count, base_count, count_address
            );
            self.stats.malformed_records += 1;
            return Err(RttiError::MalformedRecord {
                address,
                count_address,
                base_count,
                limit: self.limits.max_base_count,
            });
        }

        // All entries are read before any edge is recorded.
        let mut entries = Vec::with_capacity(base_count as usize);
        for index in 0..base_count as u64 {
            let entry = cursor + index * 2 * ptr;
            entries.push((entry, self.image.read_pointer(entry + ptr)?.as_u64()));
        }

        let owner = self.registry.get_or_create(address);
        for (entry, offset_flags) in entries {
            let target = self.base_target(entry);
            let base = BaseRef::new(
                target,
                sign_extend_24(offset_flags >> 8),
                (offset_flags & 0xff) as u8,
            );
            self.registry.add_base(owner, base);
            cursor = self.format_struct(entry, &[FieldKind::Pointer, FieldKind::Word]);
        }

        Ok(cursor)
    }

    /// Names classes that were only ever seen as bases from their
    /// `_ZTI` symbols.
    pub fn name_unresolved_classes(&mut self) -> usize {
        let unnamed: Vec<(ClassId, Address)> = self
            .registry
            .iter()
            .filter(|class| !class.is_named())
            .map(|class| (class.id(), class.address()))
            .collect();

        let mut named = 0;
        for (id, address) in unnamed {
            let Some(symbol) = self.oracle.name_at(address) else {
                continue;
            };
            let Some(mangled) = symbol
                .strip_prefix("__ZTI")
                .or_else(|| symbol.strip_prefix("_ZTI"))
            else {
                continue;
            };
            let display = self
                .oracle
                .demangle(&format!("_Z{}", mangled))
                .unwrap_or_else(|| mangled.to_string());
            debug!("Named {} from symbol {}", address, symbol);
            self.registry.set_name(id, display);
            named += 1;
        }

        self.stats.named_from_symbols += named;
        named
    }

    /// Class referenced by the base pointer at `field`.
    fn base_target(&mut self, field: Address) -> Option<ClassId> {
        match self.image.read_pointer(field) {
            Ok(base) if !base.is_null() && !base.is_bad() => Some(self.registry.get_or_create(base)),
            Ok(_) => None,
            Err(err) => {
                debug!("Unreadable base pointer at {}: {}", field, err);
                None
            }
        }
    }
}
