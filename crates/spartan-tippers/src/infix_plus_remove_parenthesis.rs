//! Tipper: Remove parentheses around operands of `+` that carry no meaning
//!
//! Parentheses inside a concatenation are only meaningful when the operand
//! would otherwise bind to a string on its left, or when it binds looser
//! than `+` altogether.
//!
//! Transformations:
//! - `x + "" + (4)` → `x + "" + 4`
//! - `(a - b) + c` → `a - b + c` (left operand, left associative)
//! - `s + (a * b)` → `s + a * b` (multiplication binds tighter)
//! - `s + ((a + b))` → `s + (a + b)` (nested parentheses collapse)
//!
//! Kept:
//! - `s + (a + b)` when `s` may be a string and `a + b` is not a pure string sum
//! - `a + (b ? c : d)`, `a + (b == c)`, `a + (x = y)`

use spartan_core::extract::peel_parentheses;
use spartan_core::types::{is_not_string, type_of};
use spartan_core::{Edit, InfixOperator, NodeData, NodeId, NodeKind, Subtree, SyntaxTree, Type};

use crate::registry::{Category, Tipper};

const NAME: &str = "infix_plus_remove_parenthesis";

/// Compute the operands of the rewritten `+`, or `None` if nothing changes
fn try_remove_parentheses(tree: &SyntaxTree, node: NodeId) -> Option<Vec<Subtree>> {
    let NodeData::Infix {
        operator: InfixOperator::Plus,
        operands,
    } = tree.data(node)
    else {
        return None;
    };

    let mut changed = false;
    let mut rewritten = Vec::with_capacity(operands.len());
    for (i, &operand) in operands.iter().enumerate() {
        if tree.kind(operand) != NodeKind::Parenthesized {
            rewritten.push(Subtree::graft(operand));
            continue;
        }

        let inner = peel_parentheses(tree, operand);
        let prior_may_be_string = operands[..i].iter().any(|o| !is_not_string(type_of(tree, *o)));

        if must_keep(tree, inner, i, prior_may_be_string) {
            if tree.kind(tree.children(operand)[0]) == NodeKind::Parenthesized {
                changed = true;
                rewritten.push(Subtree::parenthesized(Subtree::graft(inner)));
            } else {
                rewritten.push(Subtree::graft(operand));
            }
        } else {
            changed = true;
            rewritten.push(Subtree::graft(inner));
        }
    }

    changed.then_some(rewritten)
}

fn must_keep(tree: &SyntaxTree, inner: NodeId, position: usize, prior_may_be_string: bool) -> bool {
    match tree.data(inner) {
        NodeData::Conditional { .. } | NodeData::Assignment { .. } | NodeData::Lambda { .. } => true,
        NodeData::Infix { operator, .. } if operator.precedence() < InfixOperator::Plus.precedence() => true,
        NodeData::Infix { .. } => position != 0 && prior_may_be_string && !can_remove(tree, inner),
        _ => false,
    }
}

/// True when the inner infix evaluates the same with or without parentheses
/// after a string on its left
fn can_remove(tree: &SyntaxTree, inner: NodeId) -> bool {
    match tree.data(inner) {
        NodeData::Infix { operator, .. } if operator.is_multiplicative() => true,
        NodeData::Infix {
            operator: InfixOperator::Plus,
            operands,
        } => operands.iter().all(|o| type_of(tree, *o) == Type::String),
        _ => false,
    }
}

pub struct InfixPlusRemoveParenthesisTipper;

impl Tipper for InfixPlusRemoveParenthesisTipper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Remove redundant parentheses from operands of +"
    }

    fn category(&self) -> Category {
        Category::SyntacticBaggage
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Infix]
    }

    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit> {
        let operands = try_remove_parentheses(tree, node)?;
        Some(Edit::replace(
            node,
            Subtree::infix(InfixOperator::Plus, operands),
            NAME,
            "Remove redundant parentheses",
        ))
    }
}
