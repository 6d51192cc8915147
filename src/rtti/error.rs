// Fri Jan 16 2026 - Alex

use crate::memory::{Address, MemoryError};
use crate::symbol::SymbolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RttiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad address {0}")]
    BadAddress(Address),
    #[error("Too many references to {address} ({count})")]
    AmbiguousReference { address: Address, count: usize },
    #[error("{address}: over {limit} base classes ({base_count}) ({count_address})")]
    MalformedRecord {
        address: Address,
        count_address: Address,
        base_count: u32,
        limit: u32,
    },
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}

impl From<SymbolError> for RttiError {
    fn from(err: SymbolError) -> Self {
        match err {
            SymbolError::NotFound(what) => RttiError::NotFound(what),
            SymbolError::AmbiguousReference { address, count } => {
                RttiError::AmbiguousReference { address, count }
            }
        }
    }
}
