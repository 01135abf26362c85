//! Node kinds, operators and payloads of the syntax tree
//!
//! `NodeData` is generic over the child handle so one definition serves
//! arena nodes (`NodeId`), replacement templates (`Subtree`) and
//! serialized documents (`NodeDocument`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside a [`SyntaxTree`](crate::SyntaxTree) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of node kinds; tippers are indexed by these tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Block,
    EmptyStatement,
    ExpressionStatement,
    Return,
    Throw,
    If,
    While,
    Infix,
    Prefix,
    Parenthesized,
    Conditional,
    Assignment,
    MethodInvocation,
    Lambda,
    Name,
    Literal,
}

impl NodeKind {
    pub const ALL: [NodeKind; 16] = [
        NodeKind::Block,
        NodeKind::EmptyStatement,
        NodeKind::ExpressionStatement,
        NodeKind::Return,
        NodeKind::Throw,
        NodeKind::If,
        NodeKind::While,
        NodeKind::Infix,
        NodeKind::Prefix,
        NodeKind::Parenthesized,
        NodeKind::Conditional,
        NodeKind::Assignment,
        NodeKind::MethodInvocation,
        NodeKind::Lambda,
        NodeKind::Name,
        NodeKind::Literal,
    ];

    /// Statements can live in block statement lists
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Block
                | NodeKind::EmptyStatement
                | NodeKind::ExpressionStatement
                | NodeKind::Return
                | NodeKind::Throw
                | NodeKind::If
                | NodeKind::While
        )
    }

    pub fn is_expression(self) -> bool {
        !self.is_statement()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Binary (n-ary, left associative) operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfixOperator {
    Times,
    Divide,
    Remainder,
    Plus,
    Minus,
    LeftShift,
    RightShift,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    Equals,
    NotEquals,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl InfixOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            InfixOperator::Times => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Remainder => "%",
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::LeftShift => "<<",
            InfixOperator::RightShift => ">>",
            InfixOperator::Less => "<",
            InfixOperator::Greater => ">",
            InfixOperator::LessEquals => "<=",
            InfixOperator::GreaterEquals => ">=",
            InfixOperator::Equals => "==",
            InfixOperator::NotEquals => "!=",
            InfixOperator::BitAnd => "&",
            InfixOperator::BitXor => "^",
            InfixOperator::BitOr => "|",
            InfixOperator::And => "&&",
            InfixOperator::Or => "||",
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            InfixOperator::Times | InfixOperator::Divide | InfixOperator::Remainder => 11,
            InfixOperator::Plus | InfixOperator::Minus => 10,
            InfixOperator::LeftShift | InfixOperator::RightShift => 9,
            InfixOperator::Less
            | InfixOperator::Greater
            | InfixOperator::LessEquals
            | InfixOperator::GreaterEquals => 8,
            InfixOperator::Equals | InfixOperator::NotEquals => 7,
            InfixOperator::BitAnd => 6,
            InfixOperator::BitXor => 5,
            InfixOperator::BitOr => 4,
            InfixOperator::And => 3,
            InfixOperator::Or => 2,
        }
    }

    pub fn is_multiplicative(self) -> bool {
        self.precedence() == 11
    }

    pub fn is_additive(self) -> bool {
        self.precedence() == 10
    }

    /// Operators whose result is always boolean
    pub fn is_boolean_valued(self) -> bool {
        matches!(self.precedence(), 7 | 8) || matches!(self, InfixOperator::And | InfixOperator::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixOperator {
    Not,
    Minus,
    Plus,
    Complement,
    Increment,
    Decrement,
}

impl PrefixOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOperator::Not => "!",
            PrefixOperator::Minus => "-",
            PrefixOperator::Plus => "+",
            PrefixOperator::Complement => "~",
            PrefixOperator::Increment => "++",
            PrefixOperator::Decrement => "--",
        }
    }
}

/// Static type of an expression, as far as the tree can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Boolean,
    Char,
    Int,
    Long,
    Double,
    String,
    Null,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Double(f64),
    Char(char),
    String(String),
    Boolean(bool),
    Null,
}

/// Kind-specific payload of a node; `C` is the child handle type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", bound(deserialize = "C: Deserialize<'de>"))]
pub enum NodeData<C = NodeId> {
    Block {
        statements: Vec<C>,
    },
    EmptyStatement,
    ExpressionStatement {
        expression: C,
    },
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expression: Option<C>,
    },
    Throw {
        expression: C,
    },
    If {
        condition: C,
        then_branch: C,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_branch: Option<C>,
    },
    While {
        condition: C,
        body: C,
    },
    Infix {
        operator: InfixOperator,
        operands: Vec<C>,
    },
    Prefix {
        operator: PrefixOperator,
        operand: C,
    },
    Parenthesized {
        expression: C,
    },
    Conditional {
        condition: C,
        then_expression: C,
        else_expression: C,
    },
    Assignment {
        target: C,
        value: C,
    },
    MethodInvocation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<C>,
        name: String,
        #[serde(default)]
        arguments: Vec<C>,
    },
    Lambda {
        parameters: Vec<String>,
        body: C,
    },
    Name {
        identifier: String,
        #[serde(default, rename = "type")]
        ty: Type,
    },
    Literal {
        value: Literal,
    },
}

impl<C> NodeData<C> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Block { .. } => NodeKind::Block,
            NodeData::EmptyStatement => NodeKind::EmptyStatement,
            NodeData::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            NodeData::Return { .. } => NodeKind::Return,
            NodeData::Throw { .. } => NodeKind::Throw,
            NodeData::If { .. } => NodeKind::If,
            NodeData::While { .. } => NodeKind::While,
            NodeData::Infix { .. } => NodeKind::Infix,
            NodeData::Prefix { .. } => NodeKind::Prefix,
            NodeData::Parenthesized { .. } => NodeKind::Parenthesized,
            NodeData::Conditional { .. } => NodeKind::Conditional,
            NodeData::Assignment { .. } => NodeKind::Assignment,
            NodeData::MethodInvocation { .. } => NodeKind::MethodInvocation,
            NodeData::Lambda { .. } => NodeKind::Lambda,
            NodeData::Name { .. } => NodeKind::Name,
            NodeData::Literal { .. } => NodeKind::Literal,
        }
    }

    /// Children in source order
    pub fn children(&self) -> Vec<&C> {
        match self {
            NodeData::Block { statements } => statements.iter().collect(),
            NodeData::EmptyStatement | NodeData::Name { .. } | NodeData::Literal { .. } => Vec::new(),
            NodeData::ExpressionStatement { expression }
            | NodeData::Throw { expression }
            | NodeData::Parenthesized { expression } => vec![expression],
            NodeData::Return { expression } => expression.iter().collect(),
            NodeData::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![condition, then_branch];
                children.extend(else_branch.iter());
                children
            }
            NodeData::While { condition, body } => vec![condition, body],
            NodeData::Infix { operands, .. } => operands.iter().collect(),
            NodeData::Prefix { operand, .. } => vec![operand],
            NodeData::Conditional {
                condition,
                then_expression,
                else_expression,
            } => vec![condition, then_expression, else_expression],
            NodeData::Assignment { target, value } => vec![target, value],
            NodeData::MethodInvocation {
                receiver,
                arguments,
                ..
            } => receiver.iter().chain(arguments.iter()).collect(),
            NodeData::Lambda { body, .. } => vec![body],
        }
    }

    fn children_mut(&mut self) -> Vec<&mut C> {
        match self {
            NodeData::Block { statements } => statements.iter_mut().collect(),
            NodeData::EmptyStatement | NodeData::Name { .. } | NodeData::Literal { .. } => Vec::new(),
            NodeData::ExpressionStatement { expression }
            | NodeData::Throw { expression }
            | NodeData::Parenthesized { expression } => vec![expression],
            NodeData::Return { expression } => expression.iter_mut().collect(),
            NodeData::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![condition, then_branch];
                children.extend(else_branch.iter_mut());
                children
            }
            NodeData::While { condition, body } => vec![condition, body],
            NodeData::Infix { operands, .. } => operands.iter_mut().collect(),
            NodeData::Prefix { operand, .. } => vec![operand],
            NodeData::Conditional {
                condition,
                then_expression,
                else_expression,
            } => vec![condition, then_expression, else_expression],
            NodeData::Assignment { target, value } => vec![target, value],
            NodeData::MethodInvocation {
                receiver,
                arguments,
                ..
            } => receiver.iter_mut().chain(arguments.iter_mut()).collect(),
            NodeData::Lambda { body, .. } => vec![body],
        }
    }

    /// Rebuild the payload with every child handle converted by `f`
    pub fn map_ref<D>(&self, mut f: impl FnMut(&C) -> D) -> NodeData<D> {
        match self {
            NodeData::Block { statements } => NodeData::Block {
                statements: statements.iter().map(&mut f).collect(),
            },
            NodeData::EmptyStatement => NodeData::EmptyStatement,
            NodeData::ExpressionStatement { expression } => NodeData::ExpressionStatement {
                expression: f(expression),
            },
            NodeData::Return { expression } => NodeData::Return {
                expression: expression.as_ref().map(f),
            },
            NodeData::Throw { expression } => NodeData::Throw {
                expression: f(expression),
            },
            NodeData::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = f(condition);
                let then_branch = f(then_branch);
                NodeData::If {
                    condition,
                    then_branch,
                    else_branch: else_branch.as_ref().map(f),
                }
            }
            NodeData::While { condition, body } => {
                let condition = f(condition);
                NodeData::While {
                    condition,
                    body: f(body),
                }
            }
            NodeData::Infix { operator, operands } => NodeData::Infix {
                operator: *operator,
                operands: operands.iter().map(&mut f).collect(),
            },
            NodeData::Prefix { operator, operand } => NodeData::Prefix {
                operator: *operator,
                operand: f(operand),
            },
            NodeData::Parenthesized { expression } => NodeData::Parenthesized {
                expression: f(expression),
            },
            NodeData::Conditional {
                condition,
                then_expression,
                else_expression,
            } => {
                let condition = f(condition);
                let then_expression = f(then_expression);
                NodeData::Conditional {
                    condition,
                    then_expression,
                    else_expression: f(else_expression),
                }
            }
            NodeData::Assignment { target, value } => {
                let target = f(target);
                NodeData::Assignment {
                    target,
                    value: f(value),
                }
            }
            NodeData::MethodInvocation {
                receiver,
                name,
                arguments,
            } => {
                let receiver = receiver.as_ref().map(&mut f);
                NodeData::MethodInvocation {
                    receiver,
                    name: name.clone(),
                    arguments: arguments.iter().map(&mut f).collect(),
                }
            }
            NodeData::Lambda { parameters, body } => NodeData::Lambda {
                parameters: parameters.clone(),
                body: f(body),
            },
            NodeData::Name { identifier, ty } => NodeData::Name {
                identifier: identifier.clone(),
                ty: *ty,
            },
            NodeData::Literal { value } => NodeData::Literal {
                value: value.clone(),
            },
        }
    }

    /// Equality of kind and payload, ignoring what the children are
    pub fn shallow_eq<D>(&self, other: &NodeData<D>) -> bool {
        self.map_ref(|_| ()) == other.map_ref(|_| ())
    }
}

impl<C: PartialEq> NodeData<C> {
    /// Point the slot holding `old` at `new`; false if no slot holds `old`
    pub(crate) fn replace_child(&mut self, old: &C, new: C) -> bool {
        match self.children_mut().into_iter().find(|child| **child == *old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains_child(&self, child: &C) -> bool {
        self.children().into_iter().any(|c| c == child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_in_source_order() {
        let data: NodeData<u32> = NodeData::If {
            condition: 1,
            then_branch: 2,
            else_branch: Some(3),
        };
        assert_eq!(data.children(), vec![&1, &2, &3]);

        let call: NodeData<u32> = NodeData::MethodInvocation {
            receiver: Some(7),
            name: "f".to_string(),
            arguments: vec![8, 9],
        };
        assert_eq!(call.children(), vec![&7, &8, &9]);
    }

    #[test]
    fn test_shallow_eq_ignores_children() {
        let a: NodeData<u32> = NodeData::Infix {
            operator: InfixOperator::Plus,
            operands: vec![1, 2],
        };
        let b: NodeData<&str> = NodeData::Infix {
            operator: InfixOperator::Plus,
            operands: vec!["x", "y"],
        };
        let c: NodeData<u32> = NodeData::Infix {
            operator: InfixOperator::Minus,
            operands: vec![1, 2],
        };
        assert!(a.shallow_eq(&b));
        assert!(!a.shallow_eq(&c));
    }

    #[test]
    fn test_shallow_eq_compares_arity() {
        let two: NodeData<u32> = NodeData::Block { statements: vec![1, 2] };
        let three: NodeData<u32> = NodeData::Block { statements: vec![1, 2, 3] };
        assert!(!two.shallow_eq(&three));
    }

    #[test]
    fn test_replace_child() {
        let mut data: NodeData<u32> = NodeData::While { condition: 4, body: 5 };
        assert!(data.replace_child(&5, 6));
        assert_eq!(data, NodeData::While { condition: 4, body: 6 });
        assert!(!data.replace_child(&5, 7));
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(InfixOperator::Times.precedence() > InfixOperator::Plus.precedence());
        assert!(InfixOperator::Plus.precedence() > InfixOperator::Equals.precedence());
        assert!(InfixOperator::Equals.is_boolean_valued());
        assert!(!InfixOperator::BitAnd.is_boolean_valued());
    }
}
