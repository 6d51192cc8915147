// Mon Jan 19 2026 - Alex

pub mod dot;
pub mod error;
pub mod filter;
pub mod json;

pub use dot::{escape_label, DotExporter};
pub use error::GraphError;
pub use filter::{parse_prefix_list, GraphFilter, DEFAULT_IGNORED_PREFIXES};
pub use json::JsonExporter;
