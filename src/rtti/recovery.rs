// Fri Jan 16 2026 - Alex

use crate::memory::MemoryImage;
use crate::rtti::{
    ClassRegistry, ClassVTableWalker, HierarchyParser, ParseLimits, RecordLayout, TypeInfoKind,
    TypeInfoScanner,
};
use crate::symbol::{ImageOracle, SymbolOracle, SymbolTable};
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryStats {
    pub type_infos_found: usize,
    pub vtables_walked: usize,
    pub no_base: usize,
    pub single_base: usize,
    pub multi_base: usize,
    pub malformed_records: usize,
    pub missing_vtables: usize,
    pub named_from_symbols: usize,
}

impl RecoveryStats {
    pub fn record_layout(&mut self, layout: RecordLayout) {
        match layout {
            RecordLayout::NoBase => self.no_base += 1,
            RecordLayout::SingleBase => self.single_base += 1,
            RecordLayout::MultiBase => self.multi_base += 1,
        }
    }

    pub fn records_formatted(&self) -> usize {
        self.no_base + self.single_base + self.multi_base
    }
}

#[derive(Debug, Clone)]
pub struct RecoveryReport {
    pub registry: ClassRegistry,
    pub stats: RecoveryStats,
}

impl RecoveryReport {
    pub fn class_count(&self) -> usize {
        self.registry.len()
    }
}

/// One recovery run over an image: runtime type_info discovery, then a
/// walk over every class record kind, then naming of classes that were
/// only reached as bases.
pub struct RttiRecovery<'a> {
    image: &'a dyn MemoryImage,
    oracle: &'a mut dyn SymbolOracle,
    limits: ParseLimits,
}

impl<'a> RttiRecovery<'a> {
    pub fn new(image: &'a dyn MemoryImage, oracle: &'a mut dyn SymbolOracle) -> Self {
        Self {
            image,
            oracle,
            limits: ParseLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn run(self) -> RecoveryReport {
        let mut registry = ClassRegistry::new();
        let stats = {
            let mut parser = HierarchyParser::new(self.image, self.oracle, &mut registry, self.limits);

            info!("Looking for standard type info classes");
            TypeInfoScanner::new().scan_all(&mut parser);

            let walker = ClassVTableWalker::new();
            for kind in TypeInfoKind::CLASS_KINDS {
                info!("Looking for {} classes", kind);
                walker.handle_classes(&mut parser, kind);
            }

            parser.name_unresolved_classes();
            parser.into_stats()
        };

        info!("Success, found {} classes.", registry.len());
        RecoveryReport { registry, stats }
    }
}

/// Runs recovery with an oracle built over `image` and hands back the
/// symbol table with every name assigned along the way.
pub fn recover(image: &dyn MemoryImage, table: SymbolTable, limits: ParseLimits) -> (RecoveryReport, SymbolTable) {
    let mut oracle = ImageOracle::new(image, table);
    let report = RttiRecovery::new(image, &mut oracle).with_limits(limits).run();
    (report, oracle.into_table())
}
