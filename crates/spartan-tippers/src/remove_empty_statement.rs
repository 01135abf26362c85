//! Tipper: Delete empty statements
//!
//! Transformations:
//! - `{ a(); ; b(); }` → `{ a(); b(); }`
//! - `if (c) a(); else ;` → `if (c) a();`
//!
//! An empty statement that is the body of an `if` or `while` is left alone.

use spartan_core::{Edit, NodeData, NodeId, NodeKind, SyntaxTree};

use crate::registry::{Category, Tipper};

const NAME: &str = "remove_empty_statement";

fn is_removable(tree: &SyntaxTree, node: NodeId) -> bool {
    if tree.kind(node) != NodeKind::EmptyStatement {
        return false;
    }
    match tree.parent(node).map(|p| tree.data(p)) {
        Some(NodeData::Block { .. }) => true,
        Some(NodeData::If { else_branch, .. }) => *else_branch == Some(node),
        _ => false,
    }
}

pub struct RemoveEmptyStatementTipper;

impl Tipper for RemoveEmptyStatementTipper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Remove empty statements"
    }

    fn category(&self) -> Category {
        Category::InVain
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::EmptyStatement]
    }

    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit> {
        is_removable(tree, node).then(|| Edit::delete(node, NAME, "Remove empty statement"))
    }
}
