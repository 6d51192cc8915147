// Mon Jan 19 2026 - Alex

use crate::graph::GraphError;
use crate::rtti::{ClassInfo, ClassRegistry};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the visible part of a class registry as a GraphViz digraph.
///
/// Nodes come first, then edges from derived to base, both in id order.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotExporter;

impl DotExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn to_dot(&self, registry: &ClassRegistry) -> String {
        let mut dot = String::new();
        dot.push_str("digraph G {\n");
        dot.push_str("graph [overlap=scale]; node [fontname=Courier]; rankdir=\"LR\";\n\n");

        for class in registry.iter().filter(|c| c.visible) {
            dot.push_str(&format!(
                " a{} [shape=box, label = \"{}\", color=\"blue\", tooltip=\"{}\"]\n",
                class.id(),
                escape_label(&class.name),
                class.address()
            ));
        }

        for class in registry.iter().filter(|c| c.visible) {
            for target in visible_bases(registry, class) {
                dot.push_str(&format!(" a{} -> a{} [style = bold]\n", class.id(), target.id()));
            }
        }

        dot.push_str("}\n");
        dot
    }

    pub fn write_to<W: Write>(&self, registry: &ClassRegistry, writer: &mut W) -> Result<(), GraphError> {
        writer.write_all(self.to_dot(registry).as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn export_to_file<P: AsRef<Path>>(&self, registry: &ClassRegistry, path: P) -> Result<(), GraphError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(registry, &mut writer)?;
        info!("Graph written to {}", path.display());
        Ok(())
    }
}

fn visible_bases<'r>(registry: &'r ClassRegistry, class: &'r ClassInfo) -> impl Iterator<Item = &'r ClassInfo> + 'r {
    class
        .bases
        .iter()
        .filter_map(move |base| base.target.and_then(|id| registry.get(id)))
        .filter(|target| target.visible)
}

pub fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphFilter;
    use crate::memory::Address;
    use crate::rtti::{recover, BaseRef, ParseLimits, TypeInfoKind};
    use crate::utils::testing::ImageBuilder;

    const HEADER: &str = "digraph G {\ngraph [overlap=scale]; node [fontname=Courier]; rankdir=\"LR\";\n\n";

    fn scenario() -> (ClassRegistry, [Address; 3]) {
        let mut builder = ImageBuilder::new();
        let class_kind = builder.kind_vtable(TypeInfoKind::Class);
        let si_kind = builder.kind_vtable(TypeInfoKind::SiClass);
        let vmi_kind = builder.kind_vtable(TypeInfoKind::VmiClass);
        let a = builder.class(class_kind, "1A");
        let b = builder.si_class(si_kind, "1B", a);
        let c = builder.vmi_class(vmi_kind, "1C", &[(a, 0x001), (b, 0x800)]);
        let (snapshot, table) = builder.build();
        let (report, _) = recover(&snapshot, table, ParseLimits::default());
        (report.registry, [a, b, c])
    }

    #[test]
    fn test_three_class_hierarchy() {
        let (mut registry, [a, b, c]) = scenario();
        GraphFilter::new(Vec::<String>::new()).apply(&mut registry);

        let expected = format!(
            "{HEADER} a0 [shape=box, label = \"A\", color=\"blue\", tooltip=\"{a}\"]\n \
             a1 [shape=box, label = \"B\", color=\"blue\", tooltip=\"{b}\"]\n \
             a2 [shape=box, label = \"C\", color=\"blue\", tooltip=\"{c}\"]\n \
             a1 -> a0 [style = bold]\n \
             a2 -> a0 [style = bold]\n \
             a2 -> a1 [style = bold]\n}}\n"
        );
        assert_eq!(DotExporter::new().to_dot(&registry), expected);
    }

    #[test]
    fn test_ignored_class_without_visible_derived() {
        let mut registry = ClassRegistry::new();
        let a = registry.get_or_create(Address::new(0x1000));
        registry.set_name(a, "A".to_string());
        let b = registry.get_or_create(Address::new(0x2000));
        registry.set_name(b, "B".to_string());
        registry.add_base(b, BaseRef::single(None));

        GraphFilter::new(vec!["A"]).apply(&mut registry);
        let dot = DotExporter::new().to_dot(&registry);
        assert_eq!(
            dot,
            format!("{HEADER} a1 [shape=box, label = \"B\", color=\"blue\", tooltip=\"0x2000\"]\n}}\n")
        );
    }

    #[test]
    fn test_edges_to_hidden_targets_are_skipped() {
        let (mut registry, _) = scenario();
        for class in registry.iter_mut() {
            class.visible = class.name != "A";
        }
        let dot = DotExporter::new().to_dot(&registry);
        assert!(!dot.contains("-> a0"));
        assert!(dot.contains(" a2 -> a1 [style = bold]\n"));
    }

    #[test]
    fn test_labels_are_escaped() {
        assert_eq!(escape_label("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_label("a\\b"), "a\\\\b");
        assert_eq!(escape_label("ns::Foo<int>"), "ns::Foo<int>");
    }

    #[test]
    fn test_export_to_file() {
        let (mut registry, _) = scenario();
        GraphFilter::default().apply(&mut registry);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.dot");
        DotExporter::new().export_to_file(&registry, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, DotExporter::new().to_dot(&registry));
    }

    #[test]
    fn test_unwritable_path() {
        let registry = ClassRegistry::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("classes.dot");
        let err = DotExporter::new().export_to_file(&registry, &path).unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}
