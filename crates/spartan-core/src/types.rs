//! Best-effort static typing of expressions

use crate::node::{InfixOperator, Literal, NodeData, NodeId, PrefixOperator, Type};
use crate::tree::SyntaxTree;

/// Type of the expression at `id`, [`Type::Unknown`] when undecidable
pub fn type_of(tree: &SyntaxTree, id: NodeId) -> Type {
    match tree.data(id) {
        NodeData::Literal { value } => match value {
            Literal::Int(_) => Type::Int,
            Literal::Double(_) => Type::Double,
            Literal::Char(_) => Type::Char,
            Literal::String(_) => Type::String,
            Literal::Boolean(_) => Type::Boolean,
            Literal::Null => Type::Null,
        },
        NodeData::Name { ty, .. } => *ty,
        NodeData::Parenthesized { expression } => type_of(tree, *expression),
        NodeData::Assignment { target, .. } => type_of(tree, *target),
        NodeData::Prefix { operator, operand } => match operator {
            PrefixOperator::Not => Type::Boolean,
            _ => type_of(tree, *operand),
        },
        NodeData::Conditional {
            then_expression,
            else_expression,
            ..
        } => {
            let then_type = type_of(tree, *then_expression);
            if then_type == type_of(tree, *else_expression) {
                then_type
            } else {
                Type::Unknown
            }
        }
        NodeData::Infix { operator, operands } => infix_type(tree, *operator, operands),
        _ => Type::Unknown,
    }
}

fn infix_type(tree: &SyntaxTree, operator: InfixOperator, operands: &[NodeId]) -> Type {
    if operator.is_boolean_valued() {
        return Type::Boolean;
    }
    let types: Vec<Type> = operands.iter().map(|o| type_of(tree, *o)).collect();
    if operator == InfixOperator::Plus && types.contains(&Type::String) {
        return Type::String;
    }
    if matches!(
        operator,
        InfixOperator::BitAnd | InfixOperator::BitOr | InfixOperator::BitXor
    ) && types.iter().all(|t| *t == Type::Boolean)
    {
        return Type::Boolean;
    }
    types
        .into_iter()
        .try_fold(Type::Char, |acc, t| widen(acc, t))
        .map(|t| if t == Type::Char { Type::Int } else { t })
        .unwrap_or(Type::Unknown)
}

/// Binary numeric promotion; `None` when either side is not numeric
fn widen(a: Type, b: Type) -> Option<Type> {
    fn rank(t: Type) -> Option<u8> {
        match t {
            Type::Char => Some(0),
            Type::Int => Some(1),
            Type::Long => Some(2),
            Type::Double => Some(3),
            _ => None,
        }
    }
    Some(if rank(a)? >= rank(b)? { a } else { b })
}

/// True when the type certainly is not `String`
pub fn is_not_string(ty: Type) -> bool {
    matches!(
        ty,
        Type::Boolean | Type::Char | Type::Int | Type::Long | Type::Double
    )
}

pub fn is_numeric(ty: Type) -> bool {
    matches!(ty, Type::Char | Type::Int | Type::Long | Type::Double)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_name_types() {
        let mut tree = SyntaxTree::new();
        let s = tree.string("a");
        let n = tree.name("count", Type::Long);
        let u = tree.name("obj", Type::Unknown);
        assert_eq!(type_of(&tree, s), Type::String);
        assert_eq!(type_of(&tree, n), Type::Long);
        assert_eq!(type_of(&tree, u), Type::Unknown);
    }

    #[test]
    fn test_plus_with_string_is_string() {
        let mut tree = SyntaxTree::new();
        let one = tree.int(1);
        let s = tree.string("x");
        let plus = tree.infix(InfixOperator::Plus, vec![one, s]);
        assert_eq!(type_of(&tree, plus), Type::String);
    }

    #[test]
    fn test_arithmetic_widening() {
        let mut tree = SyntaxTree::new();
        let one = tree.int(1);
        let d = tree.name("d", Type::Double);
        let times = tree.infix(InfixOperator::Times, vec![one, d]);
        assert_eq!(type_of(&tree, times), Type::Double);

        let c = tree.literal(Literal::Char('a'));
        let c2 = tree.literal(Literal::Char('b'));
        let sum = tree.infix(InfixOperator::Plus, vec![c, c2]);
        assert_eq!(type_of(&tree, sum), Type::Int);
    }

    #[test]
    fn test_unknown_operand_poisons_arithmetic() {
        let mut tree = SyntaxTree::new();
        let one = tree.int(1);
        let o = tree.name("o", Type::Unknown);
        let plus = tree.infix(InfixOperator::Plus, vec![one, o]);
        assert_eq!(type_of(&tree, plus), Type::Unknown);
    }

    #[test]
    fn test_comparison_and_negation_are_boolean() {
        let mut tree = SyntaxTree::new();
        let a = tree.name("a", Type::Int);
        let b = tree.name("b", Type::Int);
        let less = tree.infix(InfixOperator::Less, vec![a, b]);
        let paren = tree.parenthesized(less);
        let not = tree.prefix(PrefixOperator::Not, paren);
        assert_eq!(type_of(&tree, less), Type::Boolean);
        assert_eq!(type_of(&tree, not), Type::Boolean);
    }

    #[test]
    fn test_is_not_string() {
        assert!(is_not_string(Type::Int));
        assert!(!is_not_string(Type::String));
        assert!(!is_not_string(Type::Unknown));
        assert!(!is_not_string(Type::Null));
    }
}
