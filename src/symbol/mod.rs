// Tue Jan 13 2026 - Alex

pub mod demangle;
pub mod error;
pub mod oracle;
pub mod strings;
pub mod table;

pub use error::SymbolError;
pub use oracle::{FieldKind, ImageOracle, SymbolOracle};
pub use strings::{StringEntry, StringTable, DEFAULT_MIN_STRING_LENGTH};
pub use table::SymbolTable;
