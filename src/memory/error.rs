// Tue Jan 13 2026 - Alex

use crate::memory::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Out of bounds: address {0} not in any loaded region")]
    OutOfBounds(Address),
    #[error("Binary parse error: {0}")]
    BinaryParseError(String),
    #[error("Unsupported binary format: {0}")]
    UnsupportedFormat(String),
    #[error("Region {name} is {size} bytes, exceeding the limit of {limit} bytes")]
    RegionTooLarge { name: String, size: u64, limit: u64 },
    #[error("Region {0} overlaps an already captured region")]
    OverlappingRegions(String),
    #[error("Invalid memory range")]
    InvalidRange,
}
