//! Tipper: Compare to a boolean literal
//!
//! Transformations:
//! - `e == true` → `e`
//! - `e == false` → `!e`
//! - `e != true` → `!e`
//! - `e != false` → `e`
//! - `true == e` → `e` (the literal may be on either side)

use spartan_core::{Edit, InfixOperator, Literal, NodeData, NodeId, NodeKind, Subtree, SyntaxTree};

use crate::negation_operand;
use crate::registry::{Category, Tipper};

const NAME: &str = "infix_comparison_boolean_literal";

fn boolean_literal(tree: &SyntaxTree, id: NodeId) -> Option<bool> {
    match tree.data(id) {
        NodeData::Literal {
            value: Literal::Boolean(b),
        } => Some(*b),
        _ => None,
    }
}

fn try_simplify_comparison(tree: &SyntaxTree, node: NodeId) -> Option<Subtree> {
    let NodeData::Infix { operator, operands } = tree.data(node) else {
        return None;
    };
    let equals = match operator {
        InfixOperator::Equals => true,
        InfixOperator::NotEquals => false,
        _ => return None,
    };
    let [left, right] = operands.as_slice() else {
        return None;
    };

    let (expression, literal) = match (boolean_literal(tree, *left), boolean_literal(tree, *right)) {
        (_, Some(literal)) => (*left, literal),
        (Some(literal), None) => (*right, literal),
        (None, None) => return None,
    };

    if literal == equals {
        Some(Subtree::graft(expression))
    } else {
        Some(Subtree::not(negation_operand(tree, expression)))
    }
}

pub struct InfixComparisonBooleanLiteralTipper;

impl Tipper for InfixComparisonBooleanLiteralTipper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Eliminate comparison with a boolean literal"
    }

    fn category(&self) -> Category {
        Category::Simplification
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Infix]
    }

    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit> {
        let replacement = try_simplify_comparison(tree, node)?;
        Some(Edit::replace(
            node,
            replacement,
            NAME,
            "Eliminate comparison with boolean literal",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rewrite;
    use spartan_core::Type;

    fn comparison(operator: InfixOperator, flip: bool, literal: bool) -> (SyntaxTree, NodeId) {
        let mut tree = SyntaxTree::new();
        let e = tree.name("e", Type::Boolean);
        let b = tree.boolean(literal);
        let operands = if flip { vec![b, e] } else { vec![e, b] };
        let cmp = tree.infix(operator, operands);
        let ret = tree.return_statement(Some(cmp));
        tree.set_root(ret);
        (tree, cmp)
    }

    fn transform(operator: InfixOperator, flip: bool, literal: bool) -> Option<String> {
        let (mut tree, cmp) = comparison(operator, flip, literal);
        rewrite(&InfixComparisonBooleanLiteralTipper, &mut tree, cmp)
    }

    #[test]
    fn test_equals_true() {
        assert_eq!(transform(InfixOperator::Equals, false, true).as_deref(), Some("return e;\n"));
    }

    #[test]
    fn test_equals_false() {
        assert_eq!(transform(InfixOperator::Equals, false, false).as_deref(), Some("return !e;\n"));
    }

    #[test]
    fn test_not_equals() {
        assert_eq!(transform(InfixOperator::NotEquals, false, true).as_deref(), Some("return !e;\n"));
        assert_eq!(transform(InfixOperator::NotEquals, false, false).as_deref(), Some("return e;\n"));
    }

    #[test]
    fn test_literal_on_the_left() {
        assert_eq!(transform(InfixOperator::Equals, true, true).as_deref(), Some("return e;\n"));
        assert_eq!(transform(InfixOperator::Equals, true, false).as_deref(), Some("return !e;\n"));
    }

    #[test]
    fn test_negated_compound_gets_parentheses() {
        let mut tree = SyntaxTree::new();
        let a = tree.name("a", Type::Int);
        let b = tree.name("b", Type::Int);
        let less = tree.infix(InfixOperator::Less, vec![a, b]);
        let f = tree.boolean(false);
        let cmp = tree.infix(InfixOperator::Equals, vec![less, f]);
        let ret = tree.return_statement(Some(cmp));
        tree.set_root(ret);
        assert_eq!(
            rewrite(&InfixComparisonBooleanLiteralTipper, &mut tree, cmp).as_deref(),
            Some("return !(a < b);\n")
        );
    }

    #[test]
    fn test_other_comparisons_ignored() {
        let (tree, cmp) = comparison(InfixOperator::Less, false, true);
        assert!(InfixComparisonBooleanLiteralTipper.replacement(&tree, cmp).is_none());

        let mut tree = SyntaxTree::new();
        let a = tree.name("a", Type::Boolean);
        let b = tree.name("b", Type::Boolean);
        let cmp = tree.infix(InfixOperator::Equals, vec![a, b]);
        assert!(InfixComparisonBooleanLiteralTipper.replacement(&tree, cmp).is_none());
    }
}
