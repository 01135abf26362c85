//! spartan-tippers: simplification rules and the registry that dispatches them
//!
//! Built-in tippers, in dispatch order:
//! - infix_plus_remove_parenthesis: `x + "" + (4)` to `x + "" + 4`
//! - infix_comparison_boolean_literal: `e == true` to `e`, `e == false` to `!e`
//! - prefix_double_negation: `!!e` to `e`
//! - remove_redundant_braces: `if (c) { f(); }` to `if (c) f();`
//! - if_return_else_return: `if (c) return a; else return b;` to `return c ? a : b;`
//! - block_if_return_then_return: `if (c) return a; return b;` to `return c ? a : b;`
//! - block_flatten_nested: `{ a(); { b(); } }` to `{ a(); b(); }`
//! - remove_empty_statement: drop `;` from blocks

pub mod block_flatten_nested;
pub mod block_if_return_then_return;
pub mod if_return_else_return;
pub mod infix_comparison_boolean_literal;
pub mod infix_plus_remove_parenthesis;
pub mod prefix_double_negation;
pub mod registry;
pub mod remove_empty_statement;
pub mod remove_redundant_braces;

pub use block_flatten_nested::BlockFlattenNestedTipper;
pub use block_if_return_then_return::BlockIfReturnThenReturnTipper;
pub use if_return_else_return::IfReturnElseReturnTipper;
pub use infix_comparison_boolean_literal::InfixComparisonBooleanLiteralTipper;
pub use infix_plus_remove_parenthesis::InfixPlusRemoveParenthesisTipper;
pub use prefix_double_negation::PrefixDoubleNegationTipper;
pub use registry::{Category, Enablement, RegistryError, Tipper, TipperInfo, TipperRegistry};
pub use remove_empty_statement::RemoveEmptyStatementTipper;
pub use remove_redundant_braces::RemoveRedundantBracesTipper;

use spartan_core::{NodeId, NodeKind, Subtree, SyntaxTree};
use std::sync::Arc;

/// All built-in tippers in registration order
pub fn builtin_tippers() -> Vec<Arc<dyn Tipper>> {
    vec![
        Arc::new(InfixPlusRemoveParenthesisTipper),
        Arc::new(InfixComparisonBooleanLiteralTipper),
        Arc::new(PrefixDoubleNegationTipper),
        Arc::new(RemoveRedundantBracesTipper),
        Arc::new(IfReturnElseReturnTipper),
        Arc::new(BlockIfReturnThenReturnTipper),
        Arc::new(BlockFlattenNestedTipper),
        Arc::new(RemoveEmptyStatementTipper),
    ]
}

/// Graft `id` as the operand of `!`
pub(crate) fn negation_operand(tree: &SyntaxTree, id: NodeId) -> Subtree {
    match tree.kind(id) {
        NodeKind::Infix | NodeKind::Conditional | NodeKind::Assignment | NodeKind::Lambda => {
            Subtree::parenthesized(Subtree::graft(id))
        }
        _ => Subtree::graft(id),
    }
}

/// Graft `id` as one of the three operands of `?:`
pub(crate) fn conditional_operand(tree: &SyntaxTree, id: NodeId) -> Subtree {
    match tree.kind(id) {
        NodeKind::Conditional | NodeKind::Assignment | NodeKind::Lambda => {
            Subtree::parenthesized(Subtree::graft(id))
        }
        _ => Subtree::graft(id),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Tipper;
    use spartan_core::{NodeId, SyntaxTree};

    /// Commit the tipper's edit at `node`; rendered root afterwards
    pub fn rewrite(tipper: &dyn Tipper, tree: &mut SyntaxTree, node: NodeId) -> Option<String> {
        let edit = tipper.replacement(tree, node)?;
        assert_eq!(edit.tipper, tipper.name());
        assert!(!edit.is_noop(tree), "tipper proposed a no-op");
        edit.commit(tree).expect("edit commits");
        Some(tree.render_root())
    }
}
