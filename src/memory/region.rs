// Tue Jan 13 2026 - Alex

use crate::memory::{Address, MemoryRange};
use std::fmt;
use std::sync::Arc;

/// What a region holds, as far as the RTTI scan cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Code,
    Data,
    Const,
    /// Synthetic slots for imported symbols.
    Extern,
}

impl RegionKind {
    pub fn is_scanned(&self) -> bool {
        matches!(self, RegionKind::Data | RegionKind::Const)
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionKind::Code => "CODE",
            RegionKind::Data => "DATA",
            RegionKind::Const => "CONST",
            RegionKind::Extern => "XTRN",
        };
        write!(f, "{}", name)
    }
}

/// One captured segment. The bytes never change after capture.
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    range: MemoryRange,
    kind: RegionKind,
    name: String,
    data: Arc<[u8]>,
}

impl MemoryRegion {
    pub fn new(range: MemoryRange, kind: RegionKind, name: String, data: Vec<u8>) -> Self {
        let mut data = data;
        data.resize(range.size() as usize, 0);
        Self {
            range,
            kind,
            name,
            data: data.into(),
        }
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Address {
        self.range.start()
    }

    pub fn end(&self) -> Address {
        self.range.end()
    }

    pub fn size(&self) -> u64 {
        self.range.size()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.range.contains(addr)
    }

    pub fn is_code(&self) -> bool {
        self.kind == RegionKind::Code
    }

    /// Bytes from `addr` to the end of the region.
    pub fn slice_from(&self, addr: Address) -> Option<&[u8]> {
        if !self.contains(addr) {
            return None;
        }
        let offset = (addr.as_u64() - self.start().as_u64()) as usize;
        self.data.get(offset..)
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.kind, self.range)
    }
}
