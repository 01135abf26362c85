//! Tipper: Merge an if-return with the return that follows it
//!
//! Transformations:
//! - `{ f(); if (c) return a; return b; }` → `{ f(); return c ? a : b; }`
//!
//! Only the first such pair in the block is merged per visit. Statements
//! after the trailing return are unreachable but are kept as they are.

use spartan_core::extract::{expression, next_return, return_expression};
use spartan_core::{Edit, NodeData, NodeId, NodeKind, Subtree, SyntaxTree};

use crate::conditional_operand;
use crate::registry::{Category, Tipper};

const NAME: &str = "block_if_return_then_return";

/// `(if, return)` positions of the first mergeable pair
fn find_pair(tree: &SyntaxTree, statements: &[NodeId]) -> Option<(usize, usize)> {
    statements.iter().enumerate().find_map(|(i, &statement)| {
        let NodeData::If {
            then_branch,
            else_branch: None,
            ..
        } = tree.data(statement)
        else {
            return None;
        };
        return_expression(tree, *then_branch)?;
        let following = next_return(tree, statement)?;
        expression(tree, following)?;
        let j = statements.iter().position(|s| *s == following)?;
        Some((i, j))
    })
}

fn try_merge(tree: &SyntaxTree, node: NodeId) -> Option<Subtree> {
    let NodeData::Block { statements } = tree.data(node) else {
        return None;
    };
    let (i, j) = find_pair(tree, statements)?;

    let NodeData::If {
        condition,
        then_branch,
        ..
    } = tree.data(statements[i])
    else {
        return None;
    };
    let then_value = return_expression(tree, *then_branch)?;
    let else_value = expression(tree, statements[j])?;

    let merged = Subtree::return_statement(Some(Subtree::conditional(
        conditional_operand(tree, *condition),
        conditional_operand(tree, then_value),
        conditional_operand(tree, else_value),
    )));

    let mut rewritten: Vec<Subtree> = statements[..i].iter().copied().map(Subtree::graft).collect();
    rewritten.push(merged);
    rewritten.extend(statements[j + 1..].iter().copied().map(Subtree::graft));
    Some(Subtree::block(rewritten))
}

pub struct BlockIfReturnThenReturnTipper;

impl Tipper for BlockIfReturnThenReturnTipper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Convert if-return followed by return into a conditional return"
    }

    fn category(&self) -> Category {
        Category::Ternarization
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Block]
    }

    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit> {
        let replacement = try_merge(tree, node)?;
        Some(Edit::replace(node, replacement, NAME, "Convert to conditional return"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rewrite;
    use spartan_core::Type;

    fn if_return(tree: &mut SyntaxTree, value: &str) -> NodeId {
        let c = tree.name("c", Type::Boolean);
        let v = tree.name(value, Type::Int);
        let ret = tree.return_statement(Some(v));
        tree.if_statement(c, ret, None)
    }

    fn ret(tree: &mut SyntaxTree, value: &str) -> NodeId {
        let v = tree.name(value, Type::Int);
        tree.return_statement(Some(v))
    }

    #[test]
    fn test_merge_after_other_statements() {
        let mut tree = SyntaxTree::new();
        let f = tree.invocation(None, "f", vec![]);
        let call = tree.expression_statement(f);
        let guard = if_return(&mut tree, "a");
        let last = ret(&mut tree, "b");
        let block = tree.block(vec![call, guard, last]);
        tree.set_root(block);
        assert_eq!(
            rewrite(&BlockIfReturnThenReturnTipper, &mut tree, block).as_deref(),
            Some("{\n    f();\n    return c ? a : b;\n}\n")
        );
    }

    #[test]
    fn test_empty_statement_between_is_dropped() {
        let mut tree = SyntaxTree::new();
        let guard = if_return(&mut tree, "a");
        let empty = tree.empty_statement();
        let last = ret(&mut tree, "b");
        let block = tree.block(vec![guard, empty, last]);
        tree.set_root(block);
        assert_eq!(
            rewrite(&BlockIfReturnThenReturnTipper, &mut tree, block).as_deref(),
            Some("{\n    return c ? a : b;\n}\n")
        );
    }

    #[test]
    fn test_merges_pair_adjacent_to_return() {
        let mut tree = SyntaxTree::new();
        let first = if_return(&mut tree, "a");
        let second = if_return(&mut tree, "b");
        let last = ret(&mut tree, "d");
        let block = tree.block(vec![first, second, last]);
        tree.set_root(block);
        assert_eq!(
            rewrite(&BlockIfReturnThenReturnTipper, &mut tree, block).as_deref(),
            Some("{\n    if (c)\n        return a;\n    return c ? b : d;\n}\n")
        );
    }

    #[test]
    fn test_statement_in_between_prevents_merge() {
        let mut tree = SyntaxTree::new();
        let guard = if_return(&mut tree, "a");
        let f = tree.invocation(None, "f", vec![]);
        let call = tree.expression_statement(f);
        let last = ret(&mut tree, "b");
        let block = tree.block(vec![guard, call, last]);
        tree.set_root(block);
        assert!(BlockIfReturnThenReturnTipper.replacement(&tree, block).is_none());
    }

    #[test]
    fn test_if_with_else_is_ignored() {
        let mut tree = SyntaxTree::new();
        let c = tree.name("c", Type::Boolean);
        let a = ret(&mut tree, "a");
        let e = tree.empty_statement();
        let stmt = tree.if_statement(c, a, Some(e));
        let last = ret(&mut tree, "b");
        let block = tree.block(vec![stmt, last]);
        tree.set_root(block);
        assert!(BlockIfReturnThenReturnTipper.replacement(&tree, block).is_none());
    }
}
