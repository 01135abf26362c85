//! Read-only structural queries over the tree
//!
//! Every function is total: a node of the wrong shape yields `None` (or an
//! empty list), never a panic. Nested blocks are looked through; bodies of
//! control structures are not.

use crate::node::{NodeData, NodeId, NodeKind};
use crate::tree::SyntaxTree;

/// Non-empty statements embedded in `id`, flattening nested blocks
///
/// An `if` or `while` is returned as a single statement; its body is not
/// entered. Expressions yield an empty list.
pub fn statements(tree: &SyntaxTree, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    if tree.kind(id).is_statement() {
        statements_into(tree, id, &mut out);
    }
    out
}

fn statements_into(tree: &SyntaxTree, id: NodeId, out: &mut Vec<NodeId>) {
    match tree.data(id) {
        NodeData::EmptyStatement => {}
        NodeData::Block { statements } => {
            for statement in statements {
                statements_into(tree, *statement, out);
            }
        }
        _ => out.push(id),
    }
}

/// The only non-empty statement in `id`, or `id` itself if it is one
pub fn single_statement(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    match statements(tree, id).as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Expression carried by an expression statement, `return` or `throw`
pub fn expression(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    match tree.data(id) {
        NodeData::ExpressionStatement { expression } | NodeData::Throw { expression } => Some(*expression),
        NodeData::Return { expression } => *expression,
        _ => None,
    }
}

fn single_of_kind(tree: &SyntaxTree, id: NodeId, kind: NodeKind) -> Option<NodeId> {
    single_statement(tree, id).filter(|s| tree.kind(*s) == kind)
}

pub fn return_statement(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    single_of_kind(tree, id, NodeKind::Return)
}

/// Value of the single `return` embedded in `id`; `None` for a bare `return;`
pub fn return_expression(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    return_statement(tree, id).and_then(|r| expression(tree, r))
}

pub fn throw_statement(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    single_of_kind(tree, id, NodeKind::Throw)
}

pub fn throw_expression(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    throw_statement(tree, id).and_then(|t| expression(tree, t))
}

pub fn expression_statement(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    single_of_kind(tree, id, NodeKind::ExpressionStatement)
}

fn statement_expression_of_kind(tree: &SyntaxTree, id: NodeId, kind: NodeKind) -> Option<NodeId> {
    expression_statement(tree, id)
        .and_then(|s| expression(tree, s))
        .filter(|e| tree.kind(*e) == kind)
}

/// Invocation made by the single expression statement embedded in `id`
pub fn method_invocation(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    statement_expression_of_kind(tree, id, NodeKind::MethodInvocation)
}

/// Assignment made by the single expression statement embedded in `id`
pub fn assignment(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    statement_expression_of_kind(tree, id, NodeKind::Assignment)
}

/// The statement following `id` in its directly enclosing block
///
/// Empty statements are skipped. Statements not held by a block (an `if`
/// body, the root) have no next statement.
pub fn next_statement(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    let parent = tree.parent(id)?;
    let NodeData::Block { statements } = tree.data(parent) else {
        return None;
    };
    let position = statements.iter().position(|s| *s == id)?;
    statements[position + 1..]
        .iter()
        .copied()
        .find(|s| tree.kind(*s) != NodeKind::EmptyStatement)
}

pub fn next_return(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    next_statement(tree, id).filter(|s| tree.kind(*s) == NodeKind::Return)
}

/// Strip any number of enclosing parentheses
pub fn peel_parentheses(tree: &SyntaxTree, mut id: NodeId) -> NodeId {
    while let NodeData::Parenthesized { expression } = tree.data(id) {
        id = *expression;
    }
    id
}
