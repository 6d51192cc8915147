// Fri Jan 16 2026 - Alex

pub mod class;
pub mod error;
pub mod kind;
pub mod parser;
pub mod recovery;
pub mod registry;
pub mod typeinfo;
pub mod vtable;
pub mod walker;

pub use class::{BaseFlags, BaseRef, ClassId, ClassInfo};
pub use error::RttiError;
pub use kind::{RecordLayout, TypeInfoKind};
pub use parser::{HierarchyParser, ParseLimits, DEFAULT_MAX_BASE_COUNT, DEFAULT_MAX_NAME_LENGTH};
pub use recovery::{recover, RecoveryReport, RecoveryStats, RttiRecovery};
pub use registry::ClassRegistry;
pub use typeinfo::TypeInfoScanner;
pub use vtable::VTableLocator;
pub use walker::{ClassVTableWalker, WalkSummary};
