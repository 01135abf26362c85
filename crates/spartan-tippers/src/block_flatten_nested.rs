//! Tipper: Splice bare nested blocks into their enclosing block
//!
//! Transformations:
//! - `{ a(); { b(); c(); } d(); }` → `{ a(); b(); c(); d(); }`
//! - `{ {} }` → `{}`

use spartan_core::{Edit, NodeData, NodeId, NodeKind, Subtree, SyntaxTree};

use crate::registry::{Category, Tipper};

const NAME: &str = "block_flatten_nested";

fn try_flatten(tree: &SyntaxTree, node: NodeId) -> Option<Subtree> {
    let NodeData::Block { statements } = tree.data(node) else {
        return None;
    };
    if !statements.iter().any(|s| tree.kind(*s) == NodeKind::Block) {
        return None;
    }

    let mut spliced = Vec::new();
    for &statement in statements {
        match tree.data(statement) {
            NodeData::Block { statements: inner } => spliced.extend(inner.iter().copied().map(Subtree::graft)),
            _ => spliced.push(Subtree::graft(statement)),
        }
    }
    Some(Subtree::block(spliced))
}

pub struct BlockFlattenNestedTipper;

impl Tipper for BlockFlattenNestedTipper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Flatten blocks nested directly inside blocks"
    }

    fn category(&self) -> Category {
        Category::SyntacticBaggage
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Block]
    }

    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit> {
        let replacement = try_flatten(tree, node)?;
        Some(Edit::replace(node, replacement, NAME, "Flatten nested block"))
    }
}
