//! Rewrite Applicator: one pre-order walk per pass
//!
//! Each visited node gets at most one edit, committed immediately. When the
//! edit replaced the visited node the walk does not descend into it; the
//! next pass sees the new shape. Nodes detached by an earlier edit in the
//! same walk are skipped together with their subtrees.

use spartan_core::{Edit, Event, EventSink, NodeId, SyntaxTree, TreeError};
use spartan_tippers::{Enablement, TipperRegistry};
use thiserror::Error;

use crate::unit::CompilationUnit;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplyError {
    #[error("{unit}: tipper '{tipper}' proposed an edit at {target} that cannot be committed")]
    InvalidEdit {
        unit: String,
        tipper: &'static str,
        target: NodeId,
        #[source]
        source: TreeError,
    },

    #[error("{0}: unit has no tree")]
    EmptyUnit(String),
}

/// Outcome of one walk
struct Walk {
    edits: usize,
    /// The node now standing where the walk started
    start: Option<NodeId>,
}

#[derive(Clone, Copy)]
pub struct Applicator<'r> {
    registry: &'r TipperRegistry,
    enablement: &'r Enablement,
}

impl<'r> Applicator<'r> {
    pub fn new(registry: &'r TipperRegistry, enablement: &'r Enablement) -> Self {
        Self { registry, enablement }
    }

    pub fn registry(&self) -> &'r TipperRegistry {
        self.registry
    }

    pub fn enablement(&self) -> &'r Enablement {
        self.enablement
    }

    /// Walk the unit once and commit what the dispatcher proposes
    ///
    /// Returns the number of committed edits, which is also recorded on the
    /// unit. A unit whose scope was deleted makes no edits.
    pub fn apply_one_pass(&self, unit: &mut CompilationUnit, sink: &EventSink) -> Result<usize, ApplyError> {
        if unit.tree().root().is_none() {
            return Err(ApplyError::EmptyUnit(unit.name().to_string()));
        }
        let Some(start) = unit.start() else {
            unit.record_pass(0);
            return Ok(0);
        };

        let (name, tree) = unit.split_mut();
        let walk = self.walk(name, tree, start, sink)?;
        if let Some(new_start) = walk.start.filter(|s| *s != start) {
            unit.rescope(start, new_start);
        }
        unit.record_pass(walk.edits);
        Ok(walk.edits)
    }

    fn walk(&self, unit: &str, tree: &mut SyntaxTree, start: NodeId, sink: &EventSink) -> Result<Walk, ApplyError> {
        let mut edits = 0;
        let mut current_start = Some(start);
        let mut pending = vec![start];

        while let Some(node) = pending.pop() {
            if !tree.is_attached(node) {
                tracing::trace!(unit, %node, "skipping detached node");
                continue;
            }
            tracing::trace!(unit, %node, kind = %tree.kind(node), "visit");

            if let Some(edit) = self.registry.dispatch(tree, node, self.enablement) {
                let noop = edit.is_noop(tree);
                match edit.commit(tree) {
                    Ok(replacement) => {
                        edits += 1;
                        if noop {
                            tracing::warn!(
                                unit,
                                tipper = edit.tipper,
                                target = %edit.target,
                                "tipper committed a replacement identical to its target"
                            );
                        }
                        sink.fire(Event::EditCommitted {
                            unit,
                            tipper: edit.tipper,
                            target: edit.target,
                            message: &edit.message,
                        });
                        if current_start == Some(edit.target) {
                            current_start = replacement;
                        }
                        if edit.target == node || !tree.is_attached(node) {
                            continue;
                        }
                    }
                    Err(err @ TreeError::Stale(_)) => self.skip(unit, &edit, err, sink),
                    Err(source) => {
                        return Err(ApplyError::InvalidEdit {
                            unit: unit.to_string(),
                            tipper: edit.tipper,
                            target: edit.target,
                            source,
                        })
                    }
                }
            }

            pending.extend(tree.children(node).into_iter().rev());
        }

        Ok(Walk {
            edits,
            start: current_start,
        })
    }

    fn skip(&self, unit: &str, edit: &Edit, err: TreeError, sink: &EventSink) {
        tracing::warn!(unit, tipper = edit.tipper, target = %edit.target, "skipping stale edit");
        sink.fire(Event::EditSkipped {
            unit,
            tipper: edit.tipper,
            target: edit.target,
            reason: err.to_string(),
        });
    }

    /// Every edit the dispatcher would propose in the subtree at `from`,
    /// without committing any
    pub fn tips(&self, tree: &SyntaxTree, from: NodeId) -> Vec<Edit> {
        tree.descendants(from)
            .into_iter()
            .filter_map(|node| self.registry.dispatch(tree, node, self.enablement))
            .collect()
    }

    pub fn count_tips(&self, unit: &CompilationUnit) -> usize {
        unit.start()
            .map(|start| self.tips(unit.tree(), start).len())
            .unwrap_or(0)
    }

    /// Whether another pass would commit anything
    pub fn has_tips(&self, unit: &CompilationUnit) -> bool {
        let Some(start) = unit.start() else {
            return false;
        };
        let tree = unit.tree();
        tree.descendants(start)
            .into_iter()
            .any(|node| self.registry.dispatch(tree, node, self.enablement).is_some())
    }
}
