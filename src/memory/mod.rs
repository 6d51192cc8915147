// Tue Jan 13 2026 - Alex

pub mod address;
pub mod binary;
pub mod error;
pub mod layout;
pub mod range;
pub mod region;
pub mod scanner;
pub mod snapshot;
pub mod traits;

pub use address::Address;
pub use binary::{BinaryImage, BinarySymbol};
pub use error::MemoryError;
pub use layout::{Endianness, PointerWidth};
pub use range::MemoryRange;
pub use region::{MemoryRegion, RegionKind};
pub use scanner::WordScanner;
pub use snapshot::{MemorySnapshot, SnapshotBuilder, DEFAULT_REGION_SIZE_LIMIT};
pub use traits::MemoryImage;
