//! Tipper: Merge returning branches into one conditional return
//!
//! Transformations:
//! - `if (c) return a; else return b;` → `return c ? a : b;`
//! - `if (c) { return a; } else { return b; }` → `return c ? a : b;`
//!
//! Both branches must return a value; a bare `return;` is left alone.

use spartan_core::extract::return_expression;
use spartan_core::{Edit, NodeData, NodeId, NodeKind, Subtree, SyntaxTree};

use crate::conditional_operand;
use crate::registry::{Category, Tipper};

const NAME: &str = "if_return_else_return";

fn try_merge_returns(tree: &SyntaxTree, node: NodeId) -> Option<Subtree> {
    let NodeData::If {
        condition,
        then_branch,
        else_branch: Some(else_branch),
    } = tree.data(node)
    else {
        return None;
    };
    let then_value = return_expression(tree, *then_branch)?;
    let else_value = return_expression(tree, *else_branch)?;

    Some(Subtree::return_statement(Some(Subtree::conditional(
        conditional_operand(tree, *condition),
        conditional_operand(tree, then_value),
        conditional_operand(tree, else_value),
    ))))
}

pub struct IfReturnElseReturnTipper;

impl Tipper for IfReturnElseReturnTipper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Convert if-return-else-return into a conditional return"
    }

    fn category(&self) -> Category {
        Category::Ternarization
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::If]
    }

    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit> {
        let replacement = try_merge_returns(tree, node)?;
        Some(Edit::replace(node, replacement, NAME, "Convert to conditional return"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rewrite;
    use spartan_core::Type;

    fn if_else(braced: bool, else_value: bool) -> (SyntaxTree, NodeId) {
        let mut tree = SyntaxTree::new();
        let c = tree.name("c", Type::Boolean);
        let a = tree.name("a", Type::Int);
        let mut then_branch = tree.return_statement(Some(a));
        let b = else_value.then(|| tree.name("b", Type::Int));
        let mut else_branch = tree.return_statement(b);
        if braced {
            then_branch = tree.block(vec![then_branch]);
            else_branch = tree.block(vec![else_branch]);
        }
        let stmt = tree.if_statement(c, then_branch, Some(else_branch));
        let body = tree.block(vec![stmt]);
        tree.set_root(body);
        (tree, stmt)
    }

    #[test]
    fn test_unbraced_branches() {
        let (mut tree, stmt) = if_else(false, true);
        assert_eq!(
            rewrite(&IfReturnElseReturnTipper, &mut tree, stmt).as_deref(),
            Some("{\n    return c ? a : b;\n}\n")
        );
    }

    #[test]
    fn test_braced_branches() {
        let (mut tree, stmt) = if_else(true, true);
        assert_eq!(
            rewrite(&IfReturnElseReturnTipper, &mut tree, stmt).as_deref(),
            Some("{\n    return c ? a : b;\n}\n")
        );
    }

    #[test]
    fn test_bare_return_is_none() {
        let (tree, stmt) = if_else(false, false);
        assert!(IfReturnElseReturnTipper.replacement(&tree, stmt).is_none());
    }

    #[test]
    fn test_missing_else_is_none() {
        let mut tree = SyntaxTree::new();
        let c = tree.name("c", Type::Boolean);
        let a = tree.name("a", Type::Int);
        let ret = tree.return_statement(Some(a));
        let stmt = tree.if_statement(c, ret, None);
        assert!(IfReturnElseReturnTipper.replacement(&tree, stmt).is_none());
    }

    #[test]
    fn test_nested_conditional_branch_is_parenthesized() {
        let mut tree = SyntaxTree::new();
        let c = tree.name("c", Type::Boolean);
        let d = tree.name("d", Type::Boolean);
        let one = tree.int(1);
        let two = tree.int(2);
        let three = tree.int(3);
        let inner = tree.conditional(d, one, two);
        let then_ret = tree.return_statement(Some(inner));
        let else_ret = tree.return_statement(Some(three));
        let stmt = tree.if_statement(c, then_ret, Some(else_ret));
        tree.set_root(stmt);
        assert_eq!(
            rewrite(&IfReturnElseReturnTipper, &mut tree, stmt).as_deref(),
            Some("return c ? (d ? 1 : 2) : 3;\n")
        );
    }
}
