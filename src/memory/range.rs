// Tue Jan 13 2026 - Alex

use crate::memory::{Address, MemoryError};
use std::fmt;

/// Half-open address range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRange {
    start: Address,
    end: Address,
}

impl MemoryRange {
    pub fn new(start: Address, end: Address) -> Result<Self, MemoryError> {
        if end.as_u64() <= start.as_u64() {
            return Err(MemoryError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn from_start_size(start: Address, size: u64) -> Result<Self, MemoryError> {
        let end = start
            .as_u64()
            .checked_add(size)
            .ok_or(MemoryError::InvalidRange)?;
        Self::new(start, Address::new(end))
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn size(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.is_within_range(self.start, self.end)
    }

    /// Whether `len` bytes starting at `addr` lie inside the range.
    pub fn contains_span(&self, addr: Address, len: u64) -> bool {
        self.contains(addr)
            && addr
                .as_u64()
                .checked_add(len)
                .map_or(false, |end| end <= self.end.as_u64())
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.as_u64() < other.end.as_u64() && self.end.as_u64() > other.start.as_u64()
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}
