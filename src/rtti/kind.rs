// Fri Jan 16 2026 - Alex

use std::fmt;

/// The four type_info classes of the Itanium C++ ABI runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeInfoKind {
    /// `std::type_info`
    TypeInfo,
    /// `__cxxabiv1::__class_type_info`
    Class,
    /// `__cxxabiv1::__si_class_type_info`
    SiClass,
    /// `__cxxabiv1::__vmi_class_type_info`
    VmiClass,
}

impl TypeInfoKind {
    pub const ALL: [TypeInfoKind; 4] = [
        TypeInfoKind::TypeInfo,
        TypeInfoKind::Class,
        TypeInfoKind::SiClass,
        TypeInfoKind::VmiClass,
    ];

    pub const CLASS_KINDS: [TypeInfoKind; 3] = [
        TypeInfoKind::Class,
        TypeInfoKind::SiClass,
        TypeInfoKind::VmiClass,
    ];

    pub fn mangled_name(&self) -> &'static str {
        match self {
            TypeInfoKind::TypeInfo => "St9type_info",
            TypeInfoKind::Class => "N10__cxxabiv117__class_type_infoE",
            TypeInfoKind::SiClass => "N10__cxxabiv120__si_class_type_infoE",
            TypeInfoKind::VmiClass => "N10__cxxabiv121__vmi_class_type_infoE",
        }
    }

    /// Vtable symbol in its doubly prefixed spelling; dropping the first
    /// character gives the plain ELF spelling.
    pub fn vtable_symbol(&self) -> String {
        format!("__ZTV{}", self.mangled_name())
    }

    /// Class records carry one more pointer after the name.
    pub fn has_trailing_pointer(&self) -> bool {
        *self >= TypeInfoKind::Class
    }

    /// Record layout used by the classes whose type_info has this kind.
    pub fn layout(&self) -> Option<RecordLayout> {
        match self {
            TypeInfoKind::TypeInfo => None,
            TypeInfoKind::Class => Some(RecordLayout::NoBase),
            TypeInfoKind::SiClass => Some(RecordLayout::SingleBase),
            TypeInfoKind::VmiClass => Some(RecordLayout::MultiBase),
        }
    }
}

impl fmt::Display for TypeInfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeInfoKind::TypeInfo => "type_info",
            TypeInfoKind::Class => "class_type_info",
            TypeInfoKind::SiClass => "si_class_type_info",
            TypeInfoKind::VmiClass => "vmi_class_type_info",
        };
        write!(f, "{}", name)
    }
}

/// Shape of a class type_info record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordLayout {
    NoBase,
    SingleBase,
    MultiBase,
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordLayout::NoBase => "simple",
            RecordLayout::SingleBase => "single-inheritance",
            RecordLayout::MultiBase => "multiple-inheritance",
        };
        write!(f, "{}", name)
    }
}
