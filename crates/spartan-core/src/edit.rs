//! Tree edits proposed by tippers and committed by the applicator

use crate::node::NodeId;
use crate::tree::{Subtree, SyntaxTree, TreeError, Wrapper};

/// What to do with the target node
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// Put a new subtree in the target's slot
    Replace(Subtree),
    /// Drop the target from its parent
    Delete,
    /// Enclose the target
    Wrap(Wrapper),
}

/// A single structural change with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    /// The node whose slot changes
    pub target: NodeId,
    pub action: EditAction,
    /// Name of the tipper that produced the edit
    pub tipper: &'static str,
    /// Human-readable description of the edit
    pub message: String,
}

impl Edit {
    pub fn replace(target: NodeId, replacement: Subtree, tipper: &'static str, message: impl Into<String>) -> Self {
        Self {
            target,
            action: EditAction::Replace(replacement),
            tipper,
            message: message.into(),
        }
    }

    pub fn delete(target: NodeId, tipper: &'static str, message: impl Into<String>) -> Self {
        Self {
            target,
            action: EditAction::Delete,
            tipper,
            message: message.into(),
        }
    }

    pub fn wrap(target: NodeId, wrapper: Wrapper, tipper: &'static str, message: impl Into<String>) -> Self {
        Self {
            target,
            action: EditAction::Wrap(wrapper),
            tipper,
            message: message.into(),
        }
    }

    /// True when committing would leave the tree structurally unchanged
    pub fn is_noop(&self, tree: &SyntaxTree) -> bool {
        match &self.action {
            EditAction::Replace(replacement) => tree.matches_template(replacement, self.target),
            EditAction::Delete | EditAction::Wrap(_) => false,
        }
    }

    /// Apply to `tree`; returns the node now holding the target's slot,
    /// `None` after a deletion
    pub fn commit(&self, tree: &mut SyntaxTree) -> Result<Option<NodeId>, TreeError> {
        tracing::debug!(tipper = self.tipper, target = %self.target, "{}", self.message);
        match &self.action {
            EditAction::Replace(replacement) => tree.replace(self.target, replacement).map(Some),
            EditAction::Delete => tree.delete(self.target).map(|()| None),
            EditAction::Wrap(wrapper) => tree.wrap(self.target, *wrapper).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{InfixOperator, NodeKind, Type};

    fn sum_tree() -> (SyntaxTree, NodeId) {
        let mut tree = SyntaxTree::new();
        let a = tree.name("a", Type::Int);
        let b = tree.name("b", Type::Int);
        let sum = tree.infix(InfixOperator::Plus, vec![a, b]);
        let stmt = tree.expression_statement(sum);
        tree.set_root(stmt);
        (tree, sum)
    }

    #[test]
    fn test_identical_replacement_is_noop() {
        let (tree, sum) = sum_tree();
        let operands = tree.children(sum).into_iter().map(Subtree::graft).collect();
        let edit = Edit::replace(sum, Subtree::infix(InfixOperator::Plus, operands), "test", "same");
        assert!(edit.is_noop(&tree));
    }

    #[test]
    fn test_commit_replace() {
        let (mut tree, sum) = sum_tree();
        let operands: Vec<Subtree> = tree.children(sum).into_iter().rev().map(Subtree::graft).collect();
        let edit = Edit::replace(sum, Subtree::infix(InfixOperator::Plus, operands), "test", "swap");
        assert!(!edit.is_noop(&tree));

        let new_id = edit.commit(&mut tree).unwrap().unwrap();
        assert_eq!(tree.render(new_id), "b + a");
    }

    #[test]
    fn test_commit_wrap() {
        let (mut tree, sum) = sum_tree();
        let edit = Edit::wrap(sum, Wrapper::Parentheses, "test", "wrap");
        let wrapper = edit.commit(&mut tree).unwrap().unwrap();
        assert_eq!(tree.kind(wrapper), NodeKind::Parenthesized);
        assert_eq!(tree.render_root(), "(a + b);\n");

        let a = tree.children(sum)[0];
        let replaced = Edit::replace(a, Subtree::graft(a), "test", "noop");
        assert_eq!(replaced.commit(&mut tree), Ok(Some(a)));

        let delete = Edit::delete(sum, "test", "drop");
        assert!(matches!(delete.commit(&mut tree), Err(TreeError::NotDeletable { .. })));
    }
}
