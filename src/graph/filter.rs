// Mon Jan 19 2026 - Alex

use crate::rtti::{ClassId, ClassRegistry};
use log::debug;
use std::collections::HashSet;

pub const DEFAULT_IGNORED_PREFIXES: [&str; 2] = ["std", "type_info"];

/// Splits newline separated input into prefixes, dropping blank lines.
pub fn parse_prefix_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decides which classes end up in the exported graph.
///
/// A class is shown when its name matches none of the ignored prefixes, or
/// when it is a (transitive) base of a shown class.
#[derive(Debug, Clone)]
pub struct GraphFilter {
    prefixes: Vec<String>,
}

impl Default for GraphFilter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED_PREFIXES.iter().map(|p| p.to_string()))
    }
}

impl GraphFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(parse_prefix_list(text))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Recomputes every `visible` flag and returns how many are set.
    pub fn apply(&self, registry: &mut ClassRegistry) -> usize {
        let mut pending: Vec<ClassId> = Vec::new();
        for class in registry.iter_mut() {
            class.visible = !self.is_ignored(&class.name);
            if class.visible {
                pending.push(class.id());
            }
        }

        let mut visited: HashSet<ClassId> = pending.iter().copied().collect();
        while let Some(id) = pending.pop() {
            let Some(class) = registry.get(id) else {
                continue;
            };
            for target in class.bases.iter().filter_map(|base| base.target) {
                if visited.insert(target) {
                    pending.push(target);
                }
            }
        }

        for &id in &visited {
            if let Some(class) = registry.get_mut(id) {
                class.visible = true;
            }
        }

        debug!("{} of {} classes visible", visited.len(), registry.len());
        visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Address;
    use crate::rtti::BaseRef;

    fn registry(classes: &[(&str, &[usize])]) -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        let ids: Vec<ClassId> = (0..classes.len())
            .map(|i| registry.get_or_create(Address::new(0x1000 + i as u64 * 0x10)))
            .collect();
        for (i, (name, bases)) in classes.iter().enumerate() {
            registry.set_name(ids[i], name.to_string());
            for &base in bases.iter() {
                registry.add_base(ids[i], BaseRef::single(Some(ids[base])));
            }
        }
        registry
    }

    fn visible(registry: &ClassRegistry) -> Vec<String> {
        registry
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.name.clone())
            .collect()
    }

    #[test]
    fn test_parse_prefix_list() {
        assert_eq!(parse_prefix_list("std\ntype_info"), vec!["std", "type_info"]);
        assert_eq!(parse_prefix_list("std\n\n boost\r\n"), vec!["std", " boost"]);
        assert!(parse_prefix_list("").is_empty());
        assert!(parse_prefix_list("\n\n").is_empty());
    }

    #[test]
    fn test_default_prefixes() {
        let filter = GraphFilter::default();
        assert_eq!(filter.prefixes(), &["std".to_string(), "type_info".to_string()]);
        assert!(filter.is_ignored("std::exception"));
        assert!(filter.is_ignored("type_info"));
        assert!(!filter.is_ignored("app::Error"));
    }

    #[test]
    fn test_empty_prefixes_are_skipped() {
        let filter = GraphFilter::new(vec!["", "std"]);
        assert_eq!(filter.prefixes().len(), 1);
        assert!(!filter.is_ignored("app::Error"));
    }

    #[test]
    fn test_ignored_bases_of_visible_classes_are_shown() {
        let mut registry = registry(&[
            ("std::exception", &[]),
            ("std::runtime_error", &[0]),
            ("app::Error", &[1]),
            ("std::bad_alloc", &[0]),
        ]);
        let count = GraphFilter::default().apply(&mut registry);
        assert_eq!(count, 3);
        assert_eq!(
            visible(&registry),
            vec!["std::exception", "std::runtime_error", "app::Error"]
        );
    }

    #[test]
    fn test_apply_resets_previous_flags() {
        let mut registry = registry(&[("A", &[]), ("B", &[0])]);
        GraphFilter::new(Vec::<String>::new()).apply(&mut registry);
        assert_eq!(registry.visible_count(), 2);

        GraphFilter::new(vec!["A", "B"]).apply(&mut registry);
        assert_eq!(registry.visible_count(), 0);
    }

    #[test]
    fn test_cycles_terminate() {
        let mut registry = registry(&[("A", &[1]), ("B", &[0]), ("C", &[0])]);
        let count = GraphFilter::new(vec!["A", "B"]).apply(&mut registry);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_dangling_bases_are_ignored() {
        let mut registry = registry(&[("A", &[])]);
        let id = registry.get_or_create(Address::new(0x9000));
        registry.set_name(id, "B".to_string());
        registry.add_base(id, BaseRef::single(None));
        GraphFilter::new(vec!["A"]).apply(&mut registry);
        assert_eq!(visible(&registry), vec!["B"]);
    }
}
