// Fri Jan 16 2026 - Alex

use crate::memory::Address;
use crate::rtti::{BaseRef, ClassId, ClassInfo};
use indexmap::IndexMap;

/// Every class recovered during one run, in discovery order.
///
/// The map index doubles as the class id, so ids are dense, start at zero
/// and never change once handed out.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: IndexMap<Address, ClassInfo>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, address: Address) -> ClassId {
        let next = ClassId::new(self.classes.len());
        self.classes
            .entry(address)
            .or_insert_with(|| ClassInfo::new(address, next))
            .id()
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassInfo> {
        self.classes.get_index(id.index()).map(|(_, class)| class)
    }

    pub fn get_mut(&mut self, id: ClassId) -> Option<&mut ClassInfo> {
        self.classes.get_index_mut(id.index()).map(|(_, class)| class)
    }

    pub fn find(&self, address: Address) -> Option<&ClassInfo> {
        self.classes.get(&address)
    }

    pub fn id_of(&self, address: Address) -> Option<ClassId> {
        self.classes.get(&address).map(ClassInfo::id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.values().find(|class| class.name == name)
    }

    pub fn set_name(&mut self, id: ClassId, name: String) {
        if let Some(class) = self.get_mut(id) {
            class.name = name;
        }
    }

    pub fn add_base(&mut self, owner: ClassId, base: BaseRef) {
        if let Some(class) = self.get_mut(owner) {
            class.bases.push(base);
        }
    }

    /// Classes ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ClassInfo> {
        self.classes.values_mut()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.iter().filter(|class| class.visible).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = ClassRegistry::new();
        let first = registry.get_or_create(Address::new(0x1000));
        let again = registry.get_or_create(Address::new(0x1000));
        assert_eq!(first, again);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(first).unwrap().address(), Address::new(0x1000));
    }

    #[test]
    fn test_ids_follow_discovery_order() {
        let mut registry = ClassRegistry::new();
        let addresses = [0x3000, 0x1000, 0x2000, 0x1000, 0x4000, 0x3000];
        let ids: Vec<usize> = addresses
            .iter()
            .map(|&a| registry.get_or_create(Address::new(a)).index())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 1, 3, 0]);

        let ordered: Vec<usize> = registry.iter().map(|c| c.id().index()).collect();
        assert_eq!(ordered, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_lazy_creation_keeps_identity_after_naming() {
        let mut registry = ClassRegistry::new();
        let base = registry.get_or_create(Address::new(0x2000));
        let derived = registry.get_or_create(Address::new(0x1000));
        registry.add_base(derived, BaseRef::single(Some(base)));

        assert!(!registry.get(base).unwrap().is_named());
        registry.set_name(base, "Base".to_string());
        registry.set_name(base, "app::Base".to_string());

        assert_eq!(registry.get_or_create(Address::new(0x2000)), base);
        assert_eq!(registry.find(Address::new(0x2000)).unwrap().name, "app::Base");
        assert_eq!(registry.find_by_name("app::Base").unwrap().id(), base);
        assert_eq!(registry.get(derived).unwrap().bases[0].target, Some(base));
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut registry = ClassRegistry::new();
        registry.set_name(ClassId::new(7), "ghost".to_string());
        registry.add_base(ClassId::new(7), BaseRef::single(None));
        assert!(registry.is_empty());
        assert!(registry.id_of(Address::new(0x1000)).is_none());
    }
}
