// Tue Jan 13 2026 - Alex

use crate::memory::{Address, BinarySymbol};
use crate::symbol::FieldKind;
use std::collections::{BTreeMap, HashMap};

/// Names known for the image, both loaded from the binary and assigned during recovery.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    by_name: HashMap<String, Address>,
    by_address: BTreeMap<Address, String>,
    fields: BTreeMap<Address, FieldKind>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_symbols(symbols: &[BinarySymbol]) -> Self {
        let mut table = Self::new();
        for symbol in symbols {
            table.insert_numbered(symbol.address, &symbol.name);
        }
        table
    }

    /// Binds a loaded definition. Further definitions of a bound name become
    /// `<name>_0`, `<name>_1`, ... in load order. Returns the name actually bound.
    pub fn insert_numbered(&mut self, address: Address, name: &str) -> String {
        if self.insert(address, name) {
            return name.to_string();
        }
        let mut suffix = 0usize;
        loop {
            let numbered = format!("{}_{}", name, suffix);
            if self.insert(address, &numbered) {
                return numbered;
            }
            suffix += 1;
        }
    }

    /// Binds `name` to `address`. A name already bound elsewhere is left alone.
    pub fn insert(&mut self, address: Address, name: &str) -> bool {
        match self.by_name.get(name) {
            Some(&existing) if existing != address => false,
            _ => {
                self.by_name.insert(name.to_string(), address);
                self.by_address.insert(address, name.to_string());
                true
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Option<Address> {
        self.by_name.get(name).copied()
    }

    pub fn name_at(&self, address: Address) -> Option<&str> {
        self.by_address.get(&address).map(String::as_str)
    }

    pub fn define_field(&mut self, address: Address, kind: FieldKind) {
        self.fields.insert(address, kind);
    }

    pub fn field_at(&self, address: Address) -> Option<FieldKind> {
        self.fields.get(&address).copied()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
