// Tue Jan 15 2026 - Alex

pub mod config;
pub mod graph;
pub mod memory;
pub mod rtti;
pub mod symbol;
pub mod utils;

pub use config::{Config, ConfigError, GraphFormat};
pub use graph::{DotExporter, GraphError, GraphFilter, JsonExporter};
pub use memory::{BinaryImage, MemoryImage, MemorySnapshot};
pub use rtti::{recover, ClassRegistry, RecoveryReport, RttiError, RttiRecovery};
pub use symbol::{ImageOracle, SymbolOracle, SymbolTable};
