// Wed Jan 14 2026 - Alex

use crate::memory::{
    Address, Endianness, MemoryError, MemoryImage, MemoryRange, MemoryRegion, PointerWidth,
    RegionKind,
};

pub const DEFAULT_REGION_SIZE_LIMIT: u64 = 100 * 1024 * 1024;

/// Immutable copy of the interesting parts of an image, taken once per run.
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    width: PointerWidth,
    endian: Endianness,
    regions: Vec<MemoryRegion>,
}

impl MemorySnapshot {
    pub fn builder(width: PointerWidth, endian: Endianness) -> SnapshotBuilder {
        SnapshotBuilder {
            width,
            endian,
            size_limit: DEFAULT_REGION_SIZE_LIMIT,
            regions: Vec::new(),
        }
    }

    pub fn total_size(&self) -> u64 {
        self.regions.iter().map(|r| r.size()).sum()
    }

    fn span(&self, addr: Address, len: usize) -> Result<&[u8], MemoryError> {
        let region = self
            .region_containing(addr)
            .ok_or(MemoryError::OutOfBounds(addr))?;
        if !region.range().contains_span(addr, len as u64) {
            return Err(MemoryError::OutOfBounds(addr));
        }
        region
            .slice_from(addr)
            .and_then(|bytes| bytes.get(..len))
            .ok_or(MemoryError::OutOfBounds(addr))
    }
}

impl MemoryImage for MemorySnapshot {
    fn pointer_width(&self) -> PointerWidth {
        self.width
    }

    fn endianness(&self) -> Endianness {
        self.endian
    }

    fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    fn read_pointer(&self, addr: Address) -> Result<Address, MemoryError> {
        let bytes = self.span(addr, self.width.bytes())?;
        self.endian
            .read_word(bytes, self.width)
            .map(Address::new)
            .ok_or(MemoryError::OutOfBounds(addr))
    }

    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        let bytes = self.span(addr, 4)?;
        self.endian
            .read_u32(bytes)
            .ok_or(MemoryError::OutOfBounds(addr))
    }

    fn read_bounded_string(&self, addr: Address, max_len: usize) -> Vec<u8> {
        let Some(bytes) = self.region_containing(addr).and_then(|r| r.slice_from(addr)) else {
            return Vec::new();
        };
        bytes
            .iter()
            .take(max_len)
            .take_while(|&&b| b != 0)
            .copied()
            .collect()
    }

    fn is_code(&self, addr: Address) -> bool {
        self.region_containing(addr).map_or(false, |r| r.is_code())
    }

    fn is_loaded(&self, addr: Address) -> bool {
        self.region_containing(addr).is_some()
    }

    fn is_special(&self, addr: Address) -> bool {
        self.region_containing(addr)
            .map_or(false, |r| r.kind() == RegionKind::Extern)
    }

    fn region_containing(&self, addr: Address) -> Option<&MemoryRegion> {
        let index = self.regions.partition_point(|r| r.end() <= addr);
        self.regions.get(index).filter(|r| r.contains(addr))
    }
}

#[derive(Debug)]
pub struct SnapshotBuilder {
    width: PointerWidth,
    endian: Endianness,
    size_limit: u64,
    regions: Vec<MemoryRegion>,
}

impl SnapshotBuilder {
    pub fn with_size_limit(mut self, limit: u64) -> Self {
        self.size_limit = limit;
        self
    }

    /// Captures one region. Oversized regions are refused whole, never truncated.
    pub fn add_region(
        &mut self,
        name: &str,
        kind: RegionKind,
        start: Address,
        size: u64,
        data: Vec<u8>,
    ) -> Result<&mut Self, MemoryError> {
        let range = MemoryRange::from_start_size(start, size)?;
        if size > self.size_limit {
            return Err(MemoryError::RegionTooLarge {
                name: name.to_string(),
                size,
                limit: self.size_limit,
            });
        }
        if self.regions.iter().any(|r| r.range().overlaps(&range)) {
            return Err(MemoryError::OverlappingRegions(name.to_string()));
        }
        self.regions
            .push(MemoryRegion::new(range, kind, name.to_string(), data));
        Ok(self)
    }

    pub fn region(mut self, name: &str, kind: RegionKind, start: Address, data: Vec<u8>) -> Result<Self, MemoryError> {
        let size = data.len() as u64;
        self.add_region(name, kind, start, size, data)?;
        Ok(self)
    }

    pub fn build(mut self) -> MemorySnapshot {
        self.regions.sort_by_key(|r| r.start());
        MemorySnapshot {
            width: self.width,
            endian: self.endian,
            regions: self.regions,
        }
    }
}
