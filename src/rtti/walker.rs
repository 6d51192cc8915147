// Fri Jan 16 2026 - Alex

use crate::memory::{Address, MemoryImage, WordScanner};
use crate::rtti::{HierarchyParser, TypeInfoKind};
use log::{debug, info, warn};
use std::collections::HashSet;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub vtables: usize,
    pub candidates: usize,
    pub formatted: usize,
    pub failed: usize,
}

/// Finds every class record built on one of the runtime type_info vtables.
///
/// Class records start with a pointer two words into their kind's vtable,
/// followed by a pointer to the mangled class name. Duplicate vtables
/// emitted as `<symbol>_0`, `<symbol>_1`, ... are walked in turn.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassVTableWalker;

impl ClassVTableWalker {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_classes(&self, parser: &mut HierarchyParser<'_>, kind: TypeInfoKind) -> WalkSummary {
        let mut summary = WalkSummary::default();
        let Some(layout) = kind.layout() else {
            return summary;
        };

        let Some((name, mut vtable)) = self.resolve_vtable(parser, kind) else {
            warn!("Could not find vtable for {}", kind.mangled_name());
            return summary;
        };

        let mut handled: HashSet<Address> = HashSet::new();
        let mut suffix = 0usize;
        loop {
            info!("Looking for refs to vtable {} ({})", name, vtable);
            summary.vtables += 1;

            for candidate in self.candidates(parser, vtable) {
                if parser.image().is_bad_address(candidate) || !handled.insert(candidate) {
                    continue;
                }
                summary.candidates += 1;
                info!("found {} at {}", kind, candidate);
                match parser.format(layout, candidate) {
                    Ok(_) => summary.formatted += 1,
                    Err(err) => {
                        debug!("Could not format {} at {}: {}", kind, candidate, err);
                        summary.failed += 1;
                    }
                }
            }

            let next = format!("{}_{}", name, suffix);
            suffix += 1;
            match parser.oracle().resolve_name(&next) {
                Some(address) => vtable = address,
                None => break,
            }
        }

        parser.stats_mut().vtables_walked += summary.vtables;
        summary
    }

    fn resolve_vtable(&self, parser: &HierarchyParser<'_>, kind: TypeInfoKind) -> Option<(String, Address)> {
        let doubled = kind.vtable_symbol();
        let plain = doubled[1..].to_string();
        [plain, doubled]
            .into_iter()
            .find_map(|name| parser.oracle().resolve_name(&name).map(|address| (name, address)))
    }

    /// Record addresses built on `vtable`, in scan order.
    fn candidates(&self, parser: &HierarchyParser<'_>, vtable: Address) -> Vec<Address> {
        let image = parser.image();
        let mut candidates = Vec::new();

        if image.is_special(vtable) {
            match parser.oracle().find_references_to(vtable, true) {
                Ok(references) => candidates.extend(references),
                Err(err) => debug!("No references to import {}: {}", vtable, err),
            }
        }

        let entry = (vtable + 2 * image.pointer_size()).as_u64();
        let scanner = WordScanner::for_image(image);
        for region in image.scan_regions() {
            for (address, first, second) in scanner.word_pairs(region) {
                if first != entry || image.is_code(address) {
                    continue;
                }
                if self.has_class_name(parser, image, Address::new(second)) {
                    candidates.push(address);
                }
            }
        }

        candidates
    }

    fn has_class_name(&self, parser: &HierarchyParser<'_>, image: &dyn MemoryImage, name_ptr: Address) -> bool {
        if image.is_code(name_ptr) {
            return false;
        }
        let raw = image.read_bounded_string(name_ptr, parser.limits().max_name_length);
        match raw.first() {
            None | Some(0xFF) => return false,
            Some(_) => {}
        }
        let raw = raw.strip_prefix(b"*").unwrap_or(raw.as_slice());
        let Ok(text) = std::str::from_utf8(raw) else {
            return false;
        };
        parser.oracle().demangle(&format!("_ZTV{}", text)).is_some()
    }
}
