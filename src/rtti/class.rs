// Fri Jan 16 2026 - Alex

use crate::memory::Address;
use bitflags::bitflags;
use serde::Serialize;
use std::fmt;

/// Dense index of a class in the registry, assigned in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(usize);

impl ClassId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags! {
    /// Low byte of `__base_class_type_info::__offset_flags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BaseFlags: u8 {
        const PUBLIC = 0x01;
        const VIRTUAL = 0x02;
    }
}

/// One inheritance edge, derived to base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRef {
    /// `None` when the base type_info pointer could not be followed.
    pub target: Option<ClassId>,
    pub offset: i64,
    pub flags: u8,
}

impl BaseRef {
    pub fn new(target: Option<ClassId>, offset: i64, flags: u8) -> Self {
        Self { target, offset, flags }
    }

    pub fn single(target: Option<ClassId>) -> Self {
        Self::new(target, 0, 0)
    }

    pub fn base_flags(&self) -> BaseFlags {
        BaseFlags::from_bits_retain(self.flags)
    }

    pub fn is_public(&self) -> bool {
        self.base_flags().contains(BaseFlags::PUBLIC)
    }

    pub fn is_virtual(&self) -> bool {
        self.base_flags().contains(BaseFlags::VIRTUAL)
    }
}

/// A recovered C++ class, keyed by the address of its type_info record.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    address: Address,
    id: ClassId,
    pub name: String,
    pub bases: Vec<BaseRef>,
    pub visible: bool,
    pub vtable: Option<Address>,
}

impl ClassInfo {
    pub(crate) fn new(address: Address, id: ClassId) -> Self {
        Self {
            address,
            id,
            name: String::new(),
            bases: Vec::new(),
            visible: false,
            vtable: None,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.bases.is_empty()
    }
}

impl fmt::Display for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)?;
        if !self.bases.is_empty() {
            write!(f, " [{} bases]", self.bases.len())?;
        }
        Ok(())
    }
}
