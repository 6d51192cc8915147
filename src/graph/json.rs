// Mon Jan 19 2026 - Alex

use crate::graph::GraphError;
use crate::rtti::{ClassInfo, ClassRegistry, RecoveryStats};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct JsonBase {
    target: Option<usize>,
    offset: i64,
    flags: u8,
    public: bool,
    #[serde(rename = "virtual")]
    is_virtual: bool,
}

#[derive(Debug, Serialize)]
struct JsonClass {
    id: usize,
    address: String,
    name: String,
    vtable: Option<String>,
    bases: Vec<JsonBase>,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a RecoveryStats>,
    classes: Vec<JsonClass>,
}

impl From<&ClassInfo> for JsonClass {
    fn from(class: &ClassInfo) -> Self {
        Self {
            id: class.id().index(),
            address: class.address().to_string(),
            name: class.name.clone(),
            vtable: class.vtable.map(|v| v.to_string()),
            bases: class
                .bases
                .iter()
                .map(|base| JsonBase {
                    target: base.target.map(|id| id.index()),
                    offset: base.offset,
                    flags: base.flags,
                    public: base.is_public(),
                    is_virtual: base.is_virtual(),
                })
                .collect(),
        }
    }
}

pub struct JsonExporter {
    pretty_print: bool,
    visible_only: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self {
            pretty_print: true,
            visible_only: true,
        }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }

    pub fn to_json(&self, registry: &ClassRegistry, stats: Option<&RecoveryStats>) -> Result<String, GraphError> {
        let document = JsonDocument {
            stats,
            classes: registry
                .iter()
                .filter(|class| class.visible || !self.visible_only)
                .map(JsonClass::from)
                .collect(),
        };

        let text = if self.pretty_print {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(text)
    }

    pub fn write_to<W: Write>(
        &self,
        registry: &ClassRegistry,
        stats: Option<&RecoveryStats>,
        writer: &mut W,
    ) -> Result<(), GraphError> {
        writer.write_all(self.to_json(registry, stats)?.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn export_to_file<P: AsRef<Path>>(
        &self,
        registry: &ClassRegistry,
        stats: Option<&RecoveryStats>,
        path: P,
    ) -> Result<(), GraphError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(registry, stats, &mut writer)?;
        info!("Class list written to {}", path.display());
        Ok(())
    }
}
