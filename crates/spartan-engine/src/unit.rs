//! Compilation units: one tree plus its live/dead bookkeeping

use spartan_core::{NodeId, SyntaxTree};

/// Whether further passes may still change a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitStatus {
    #[default]
    Live,
    /// A pass committed nothing; absorbing
    Dead,
}

#[derive(Debug, Clone)]
pub struct CompilationUnit {
    name: String,
    tree: SyntaxTree,
    scope: Option<NodeId>,
    status: UnitStatus,
    pass_edits: usize,
    total_edits: usize,
}

impl CompilationUnit {
    pub fn new(name: impl Into<String>, tree: SyntaxTree) -> Self {
        Self {
            name: name.into(),
            tree,
            scope: None,
            status: UnitStatus::Live,
            pass_edits: 0,
            total_edits: 0,
        }
    }

    /// Restrict passes to the subtree at `scope`
    pub fn with_scope(mut self, scope: NodeId) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn into_tree(self) -> SyntaxTree {
        self.tree
    }

    /// Where a pass starts: the scope while it is attached, else the root
    pub fn start(&self) -> Option<NodeId> {
        match self.scope {
            Some(scope) if self.tree.is_attached(scope) => Some(scope),
            Some(_) => None,
            None => self.tree.root(),
        }
    }

    pub fn scope(&self) -> Option<NodeId> {
        self.scope
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    pub fn is_live(&self) -> bool {
        self.status == UnitStatus::Live
    }

    /// Edits committed by the most recent pass
    pub fn pass_edits(&self) -> usize {
        self.pass_edits
    }

    pub fn total_edits(&self) -> usize {
        self.total_edits
    }

    pub fn is_modified(&self) -> bool {
        self.total_edits > 0
    }

    pub(crate) fn split_mut(&mut self) -> (&str, &mut SyntaxTree) {
        (&self.name, &mut self.tree)
    }

    /// Follow the scope node when an edit replaces it
    pub(crate) fn rescope(&mut self, old: NodeId, new: NodeId) {
        if self.scope == Some(old) {
            self.scope = Some(new);
        }
    }

    pub(crate) fn record_pass(&mut self, edits: usize) {
        self.pass_edits = edits;
        self.total_edits += edits;
    }

    pub(crate) fn retire(&mut self) {
        self.status = UnitStatus::Dead;
    }
}
