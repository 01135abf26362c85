//! Tipper: Remove double logical negation
//!
//! Transformations:
//! - `!!e` → `e`
//! - `!(!e)` → `e`
//! - `!!!e` → `!e` (the outer pair goes first)

use spartan_core::extract::peel_parentheses;
use spartan_core::{Edit, NodeData, NodeId, NodeKind, PrefixOperator, Subtree, SyntaxTree};

use crate::registry::{Category, Tipper};

const NAME: &str = "prefix_double_negation";

/// The expression under two negations, if `node` is `!!e`
fn doubly_negated(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    let NodeData::Prefix {
        operator: PrefixOperator::Not,
        operand,
    } = tree.data(node)
    else {
        return None;
    };
    match tree.data(peel_parentheses(tree, *operand)) {
        NodeData::Prefix {
            operator: PrefixOperator::Not,
            operand,
        } => Some(*operand),
        _ => None,
    }
}

pub struct PrefixDoubleNegationTipper;

impl Tipper for PrefixDoubleNegationTipper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Remove double negation (!!)"
    }

    fn category(&self) -> Category {
        Category::Simplification
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Prefix]
    }

    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit> {
        let inner = doubly_negated(tree, node)?;
        Some(Edit::replace(node, Subtree::graft(inner), NAME, "Remove double negation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rewrite;
    use spartan_core::{InfixOperator, Type};

    fn negate(tree: &mut SyntaxTree, times: usize, operand: NodeId) -> NodeId {
        (0..times).fold(operand, |acc, _| tree.prefix(PrefixOperator::Not, acc))
    }

    fn rooted(tree: &mut SyntaxTree, expression: NodeId) {
        let stmt = tree.expression_statement(expression);
        tree.set_root(stmt);
    }

    #[test]
    fn test_double_negation() {
        let mut tree = SyntaxTree::new();
        let x = tree.name("x", Type::Boolean);
        let not = negate(&mut tree, 2, x);
        rooted(&mut tree, not);
        assert_eq!(rewrite(&PrefixDoubleNegationTipper, &mut tree, not).as_deref(), Some("x;\n"));
    }

    #[test]
    fn test_triple_negation() {
        let mut tree = SyntaxTree::new();
        let x = tree.name("x", Type::Boolean);
        let not = negate(&mut tree, 3, x);
        rooted(&mut tree, not);
        assert_eq!(rewrite(&PrefixDoubleNegationTipper, &mut tree, not).as_deref(), Some("!x;\n"));
    }

    #[test]
    fn test_parenthesized_inner_negation() {
        let mut tree = SyntaxTree::new();
        let x = tree.name("x", Type::Boolean);
        let inner = tree.prefix(PrefixOperator::Not, x);
        let paren = tree.parenthesized(inner);
        let outer = tree.prefix(PrefixOperator::Not, paren);
        rooted(&mut tree, outer);
        assert_eq!(rewrite(&PrefixDoubleNegationTipper, &mut tree, outer).as_deref(), Some("x;\n"));
    }

    #[test]
    fn test_compound_operand_keeps_its_parentheses() {
        let mut tree = SyntaxTree::new();
        let a = tree.name("a", Type::Boolean);
        let b = tree.name("b", Type::Boolean);
        let and = tree.infix(InfixOperator::And, vec![a, b]);
        let paren = tree.parenthesized(and);
        let not = negate(&mut tree, 2, paren);
        rooted(&mut tree, not);
        assert_eq!(
            rewrite(&PrefixDoubleNegationTipper, &mut tree, not).as_deref(),
            Some("(a && b);\n")
        );
    }

    #[test]
    fn test_single_negation_is_none() {
        let mut tree = SyntaxTree::new();
        let x = tree.name("x", Type::Boolean);
        let not = negate(&mut tree, 1, x);
        assert!(PrefixDoubleNegationTipper.replacement(&tree, not).is_none());

        let y = tree.name("y", Type::Int);
        let minus = tree.prefix(PrefixOperator::Minus, y);
        let not_minus = tree.prefix(PrefixOperator::Not, minus);
        assert!(PrefixDoubleNegationTipper.replacement(&tree, not_minus).is_none());
    }
}
