//! Java-like source rendering of a subtree
//!
//! Output is deterministic and purely structural: parentheses appear only
//! where a `Parenthesized` node exists.

use std::fmt::Write;

use crate::node::{Literal, NodeData, NodeId};
use crate::tree::SyntaxTree;

const INDENT: &str = "    ";

impl SyntaxTree {
    /// Render the subtree at `id`
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        if self.kind(id).is_statement() {
            self.render_statement(id, 0, &mut out);
        } else {
            self.render_expression(id, &mut out);
        }
        out
    }

    /// Render the whole tree, empty string when there is no root
    pub fn render_root(&self) -> String {
        self.root().map(|root| self.render(root)).unwrap_or_default()
    }

    fn render_statement(&self, id: NodeId, depth: usize, out: &mut String) {
        let pad = INDENT.repeat(depth);
        match self.data(id) {
            NodeData::Block { statements } => {
                out.push_str(&pad);
                self.render_block_body(statements, depth, out);
                out.push('\n');
            }
            NodeData::EmptyStatement => {
                let _ = writeln!(out, "{};", pad);
            }
            NodeData::ExpressionStatement { expression } => {
                out.push_str(&pad);
                self.render_expression(*expression, out);
                out.push_str(";\n");
            }
            NodeData::Return { expression } => {
                out.push_str(&pad);
                out.push_str("return");
                if let Some(expression) = expression {
                    out.push(' ');
                    self.render_expression(*expression, out);
                }
                out.push_str(";\n");
            }
            NodeData::Throw { expression } => {
                out.push_str(&pad);
                out.push_str("throw ");
                self.render_expression(*expression, out);
                out.push_str(";\n");
            }
            NodeData::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push_str(&pad);
                out.push_str("if (");
                self.render_expression(*condition, out);
                out.push(')');
                self.render_body(*then_branch, depth, out);
                if let Some(else_branch) = else_branch {
                    out.push_str(&pad);
                    out.push_str("else");
                    self.render_body(*else_branch, depth, out);
                }
            }
            NodeData::While { condition, body } => {
                out.push_str(&pad);
                out.push_str("while (");
                self.render_expression(*condition, out);
                out.push(')');
                self.render_body(*body, depth, out);
            }
            _ => {
                out.push_str(&pad);
                self.render_expression(id, out);
                out.push('\n');
            }
        }
    }

    /// Body of a control structure: a block stays on the header line
    fn render_body(&self, body: NodeId, depth: usize, out: &mut String) {
        match self.data(body) {
            NodeData::Block { statements } => {
                out.push(' ');
                self.render_block_body(statements, depth, out);
                out.push('\n');
            }
            _ => {
                out.push('\n');
                self.render_statement(body, depth + 1, out);
            }
        }
    }

    fn render_block_body(&self, statements: &[NodeId], depth: usize, out: &mut String) {
        out.push_str("{\n");
        for statement in statements {
            self.render_statement(*statement, depth + 1, out);
        }
        out.push_str(&INDENT.repeat(depth));
        out.push('}');
    }

    fn render_expression(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Infix { operator, operands } => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        let _ = write!(out, " {} ", operator.symbol());
                    }
                    self.render_expression(*operand, out);
                }
            }
            NodeData::Prefix { operator, operand } => {
                out.push_str(operator.symbol());
                self.render_expression(*operand, out);
            }
            NodeData::Parenthesized { expression } => {
                out.push('(');
                self.render_expression(*expression, out);
                out.push(')');
            }
            NodeData::Conditional {
                condition,
                then_expression,
                else_expression,
            } => {
                self.render_expression(*condition, out);
                out.push_str(" ? ");
                self.render_expression(*then_expression, out);
                out.push_str(" : ");
                self.render_expression(*else_expression, out);
            }
            NodeData::Assignment { target, value } => {
                self.render_expression(*target, out);
                out.push_str(" = ");
                self.render_expression(*value, out);
            }
            NodeData::MethodInvocation {
                receiver,
                name,
                arguments,
            } => {
                if let Some(receiver) = receiver {
                    self.render_expression(*receiver, out);
                    out.push('.');
                }
                out.push_str(name);
                out.push('(');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.render_expression(*argument, out);
                }
                out.push(')');
            }
            NodeData::Lambda { parameters, body } => {
                let _ = write!(out, "({}) -> ", parameters.join(", "));
                if self.kind(*body).is_statement() {
                    let mut nested = String::new();
                    self.render_statement(*body, 0, &mut nested);
                    out.push_str(nested.trim_end());
                } else {
                    self.render_expression(*body, out);
                }
            }
            NodeData::Name { identifier, .. } => out.push_str(identifier),
            NodeData::Literal { value } => render_literal(value, out),
            // Statements in expression position only happen in malformed input
            _ => {
                let mut nested = String::new();
                self.render_statement(id, 0, &mut nested);
                out.push_str(nested.trim_end());
            }
        }
    }
}

fn render_literal(value: &Literal, out: &mut String) {
    let _ = match value {
        Literal::Int(v) => write!(out, "{}", v),
        Literal::Double(v) => write!(out, "{:?}", v),
        Literal::Char(c) => write!(out, "'{}'", c.escape_default()),
        Literal::String(s) => write!(out, "\"{}\"", s.escape_default()),
        Literal::Boolean(b) => write!(out, "{}", b),
        Literal::Null => write!(out, "null"),
    };
}
