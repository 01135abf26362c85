//! Tipper: Remove braces around a single-statement body
//!
//! Transformations:
//! - `if (c) { f(); }` → `if (c) f();`
//! - `if (c) { f(); } else { g(); }` → `if (c) f(); else g();`
//! - `while (c) { f(); }` → `while (c) f();`
//!
//! A body whose statement ends in an `if` without `else` keeps its braces,
//! since an enclosing `else` would otherwise bind to the inner `if`.

use spartan_core::{Edit, NodeData, NodeId, NodeKind, Subtree, SyntaxTree};

use crate::registry::{Category, Tipper};

const NAME: &str = "remove_redundant_braces";

/// The braced body's only statement, when the braces can go
fn unbraced(tree: &SyntaxTree, body: NodeId) -> Option<NodeId> {
    match tree.data(body) {
        NodeData::Block { statements } => match statements.as_slice() {
            [only] if !ends_in_open_if(tree, *only) => Some(*only),
            _ => None,
        },
        _ => None,
    }
}

/// True when the statement ends with an `if` that has no `else`
fn ends_in_open_if(tree: &SyntaxTree, statement: NodeId) -> bool {
    match tree.data(statement) {
        NodeData::If {
            else_branch: None, ..
        } => true,
        NodeData::If {
            else_branch: Some(else_branch),
            ..
        } => ends_in_open_if(tree, *else_branch),
        NodeData::While { body, .. } => ends_in_open_if(tree, *body),
        _ => false,
    }
}

fn body(tree: &SyntaxTree, id: NodeId) -> (Subtree, bool) {
    match unbraced(tree, id) {
        Some(only) => (Subtree::graft(only), true),
        None => (Subtree::graft(id), false),
    }
}

fn try_remove_braces(tree: &SyntaxTree, node: NodeId) -> Option<Subtree> {
    match tree.data(node) {
        NodeData::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let (then_branch, then_changed) = body(tree, *then_branch);
            let (else_branch, else_changed) = match else_branch {
                Some(else_branch) => {
                    let (branch, changed) = body(tree, *else_branch);
                    (Some(branch), changed)
                }
                None => (None, false),
            };
            (then_changed || else_changed).then(|| {
                Subtree::build(NodeData::If {
                    condition: Subtree::graft(*condition),
                    then_branch,
                    else_branch,
                })
            })
        }
        NodeData::While { condition, body } => {
            let only = unbraced(tree, *body)?;
            Some(Subtree::build(NodeData::While {
                condition: Subtree::graft(*condition),
                body: Subtree::graft(only),
            }))
        }
        _ => None,
    }
}

pub struct RemoveRedundantBracesTipper;

impl Tipper for RemoveRedundantBracesTipper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Remove braces around single-statement bodies"
    }

    fn category(&self) -> Category {
        Category::SyntacticBaggage
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::If, NodeKind::While]
    }

    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit> {
        let replacement = try_remove_braces(tree, node)?;
        Some(Edit::replace(node, replacement, NAME, "Remove redundant braces"))
    }
}
