//! Document loading, write-back and edit collection for spartan

use anyhow::{Context, Result};
use parking_lot::Mutex;
use spartan_core::{Event, EventId, Listener, NodeDocument, SyntaxTree};
use spartan_engine::CompilationUnit;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::output::EditInfo;

/// A parsed tree document, named after its path
pub struct LoadedUnit {
    pub unit: CompilationUnit,
    /// Rendered source before any pass ran
    pub old_source: String,
}

/// Read and parse a single JSON tree document
pub fn load_unit(path: &Path) -> Result<LoadedUnit> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let document: NodeDocument = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse tree document: {}", path.display()))?;

    let tree = SyntaxTree::from_document(&document);
    let old_source = tree.render_root();
    Ok(LoadedUnit {
        unit: CompilationUnit::new(path.display().to_string(), tree),
        old_source,
    })
}

/// Serialize a unit's tree back to its document
pub fn write_unit(path: &Path, unit: &CompilationUnit) -> Result<()> {
    let document = unit
        .tree()
        .to_document()
        .with_context(|| format!("Tree of {} has no root", unit.name()))?;
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Records committed edits per unit for the reporter
#[derive(Debug, Default)]
pub struct EditCollector {
    pass: AtomicUsize,
    edits: Mutex<HashMap<String, Vec<EditInfo>>>,
}

impl EditCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the edits recorded for `unit`, in commit order
    pub fn take(&self, unit: &str) -> Vec<EditInfo> {
        self.edits.lock().remove(unit).unwrap_or_default()
    }
}

impl Listener for EditCollector {
    fn notify(&self, _id: EventId, event: &Event<'_>) {
        match event {
            Event::PassStarted { pass, .. } => self.pass.store(*pass, Ordering::Relaxed),
            Event::EditCommitted {
                unit,
                tipper,
                target,
                message,
            } => {
                let info = EditInfo {
                    tipper: tipper.to_string(),
                    pass: self.pass.load(Ordering::Relaxed),
                    node: target.index(),
                    message: message.to_string(),
                };
                self.edits.lock().entry(unit.to_string()).or_default().push(info);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spartan_core::EventSink;
    use spartan_engine::{run_to_fixed_point, DriverConfig, NeverCancel};
    use spartan_tippers::{Enablement, TipperRegistry};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const STRAY_SEMICOLONS: &str = r#"{
        "kind": "block",
        "statements": [
            { "kind": "empty_statement" },
            { "kind": "return", "expression": { "kind": "name", "identifier": "x", "type": "int" } },
            { "kind": "empty_statement" }
        ]
    }"#;

    #[test]
    fn test_load_renders_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("unit.json");
        fs::write(&path, STRAY_SEMICOLONS).unwrap();

        let loaded = load_unit(&path).unwrap();
        assert_eq!(loaded.old_source, "{\n    ;\n    return x;\n    ;\n}\n");
        assert_eq!(loaded.unit.name(), path.display().to_string());
        assert!(loaded.unit.is_live());
    }

    #[test]
    fn test_load_rejects_malformed_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, r#"{ "kind": "spaceship" }"#).unwrap();

        let err = load_unit(&path).err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to parse tree document"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_unit(&temp.path().join("absent.json")).err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to read file"));
    }

    #[test]
    fn test_fixed_unit_is_written_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("unit.json");
        fs::write(&path, STRAY_SEMICOLONS).unwrap();

        let mut units = vec![load_unit(&path).unwrap().unit];
        let registry = TipperRegistry::new();
        run_to_fixed_point(
            &mut units,
            &registry,
            &Enablement::all(),
            DriverConfig::default(),
            &NeverCancel,
            &EventSink::new(),
        )
        .unwrap();
        write_unit(&path, &units[0]).unwrap();

        let reloaded = load_unit(&path).unwrap();
        assert_eq!(reloaded.old_source, "{\n    return x;\n}\n");
    }

    #[test]
    fn test_collector_groups_edits_by_unit() {
        let collector = Arc::new(EditCollector::new());
        let sink = EventSink::with(collector.clone());
        let mut tree = SyntaxTree::new();
        let target = tree.empty_statement();

        sink.fire(Event::PassStarted { pass: 1, live_units: 2 });
        sink.fire(Event::EditCommitted {
            unit: "a.json",
            tipper: "remove_empty_statement",
            target,
            message: "Remove empty statement",
        });
        sink.fire(Event::PassStarted { pass: 2, live_units: 1 });
        sink.fire(Event::EditCommitted {
            unit: "a.json",
            tipper: "prefix_double_negation",
            target,
            message: "Remove double negation",
        });

        let edits = collector.take("a.json");
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].pass, 1);
        assert_eq!(edits[1].tipper, "prefix_double_negation");
        assert_eq!(edits[1].pass, 2);
        assert!(collector.take("a.json").is_empty());
        assert!(collector.take("b.json").is_empty());
    }
}
