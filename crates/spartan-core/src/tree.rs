//! Arena-backed syntax tree with parent back-references
//!
//! Nodes are addressed by [`NodeId`] and never freed before the tree is
//! dropped. Replacing a subtree relinks the parent slot to the new node and
//! orphans the old one, so stale handles can be detected instead of
//! dangling.

use std::collections::HashSet;
use thiserror::Error;

use crate::node::{InfixOperator, Literal, NodeData, NodeId, NodeKind, PrefixOperator, Type};

/// Errors reported by tree mutation primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} is no longer attached to the tree")]
    Stale(NodeId),

    #[error("node {node} ({kind}) sits in a slot that cannot be emptied")]
    NotDeletable { node: NodeId, kind: NodeKind },

    #[error("replacement grafts node {graft} from outside the replaced subtree {target}")]
    ForeignGraft { graft: NodeId, target: NodeId },

    #[error("replacement grafts node {0} more than once")]
    DuplicateGraft(NodeId),

    #[error("replacement grafts node {inner} together with its ancestor {outer}")]
    OverlappingGraft { inner: NodeId, outer: NodeId },

    #[error("tree has no root")]
    EmptyTree,
}

/// A replacement described without touching the arena
///
/// `Graft` reuses an existing node (and its whole subtree) of the tree the
/// template is committed to; `Build` describes a fresh node.
#[derive(Debug, Clone, PartialEq)]
pub enum Subtree {
    Graft(NodeId),
    Build(Box<NodeData<Subtree>>),
}

impl Subtree {
    pub fn graft(id: NodeId) -> Self {
        Subtree::Graft(id)
    }

    pub fn build(data: NodeData<Subtree>) -> Self {
        Subtree::Build(Box::new(data))
    }

    pub fn parenthesized(expression: Subtree) -> Self {
        Subtree::build(NodeData::Parenthesized { expression })
    }

    pub fn not(operand: Subtree) -> Self {
        Subtree::build(NodeData::Prefix {
            operator: PrefixOperator::Not,
            operand,
        })
    }

    pub fn infix(operator: InfixOperator, operands: Vec<Subtree>) -> Self {
        Subtree::build(NodeData::Infix { operator, operands })
    }

    pub fn conditional(condition: Subtree, then_expression: Subtree, else_expression: Subtree) -> Self {
        Subtree::build(NodeData::Conditional {
            condition,
            then_expression,
            else_expression,
        })
    }

    pub fn return_statement(expression: Option<Subtree>) -> Self {
        Subtree::build(NodeData::Return { expression })
    }

    pub fn block(statements: Vec<Subtree>) -> Self {
        Subtree::build(NodeData::Block { statements })
    }

    fn collect_grafts(&self, into: &mut Vec<NodeId>) {
        match self {
            Subtree::Graft(id) => into.push(*id),
            Subtree::Build(data) => {
                for child in data.children() {
                    child.collect_grafts(into);
                }
            }
        }
    }
}

/// How [`SyntaxTree::wrap`] encloses a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    Parentheses,
    Block,
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node; its children are re-parented under it
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in data.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(Node { data, parent: None });
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.nodes[id.index()].parent = None;
        self.root = Some(id);
    }

    /// Number of arena slots, orphaned nodes included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].data.kind()
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.data(id).children().into_iter().copied().collect()
    }

    /// True when `id` reaches the root through parents that still hold it
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            match self.parent(current) {
                Some(parent) => {
                    if !self.data(parent).contains_child(&current) {
                        return false;
                    }
                    current = parent;
                }
                None => return self.root == Some(current),
            }
        }
    }

    /// True when `ancestor` is `id` or lies on its parent chain
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Pre-order listing of the subtree rooted at `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).into_iter().rev());
        }
        out
    }

    /// Structural equality of two subtrees of this tree
    pub fn same(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }
        let (left, right) = (self.data(a), self.data(b));
        left.shallow_eq(right)
            && left
                .children()
                .into_iter()
                .zip(right.children())
                .all(|(x, y)| self.same(*x, *y))
    }

    /// Structural equality of a template and an arena subtree
    pub fn matches_template(&self, template: &Subtree, id: NodeId) -> bool {
        match template {
            Subtree::Graft(graft) => self.same(*graft, id),
            Subtree::Build(data) => {
                let node = self.data(id);
                data.shallow_eq(node)
                    && data
                        .children()
                        .into_iter()
                        .zip(node.children())
                        .all(|(t, child)| self.matches_template(t, *child))
            }
        }
    }

    /// Materialize a template into fresh arena nodes, reusing grafts
    pub fn instantiate(&mut self, template: &Subtree) -> NodeId {
        match template {
            Subtree::Graft(id) => *id,
            Subtree::Build(data) => {
                let data = data.map_ref(|child| self.instantiate(child));
                self.alloc(data)
            }
        }
    }

    /// Atomically replace the subtree at `target` with `replacement`
    ///
    /// Returns the id of the node now occupying the slot. Fails with
    /// [`TreeError::Stale`] when `target` is no longer linked into the tree.
    pub fn replace(&mut self, target: NodeId, replacement: &Subtree) -> Result<NodeId, TreeError> {
        self.ensure_attached(target)?;

        let mut grafts = Vec::new();
        replacement.collect_grafts(&mut grafts);
        let mut seen = HashSet::new();
        for graft in &grafts {
            if !seen.insert(*graft) {
                return Err(TreeError::DuplicateGraft(*graft));
            }
            if !self.is_within(*graft, target) {
                return Err(TreeError::ForeignGraft {
                    graft: *graft,
                    target,
                });
            }
        }
        for &inner in &grafts {
            if let Some(&outer) = grafts.iter().find(|&&outer| outer != inner && self.is_within(inner, outer)) {
                return Err(TreeError::OverlappingGraft { inner, outer });
            }
        }

        let parent = self.parent(target);
        let new_id = self.instantiate(replacement);
        if new_id == target {
            return Ok(target);
        }
        if !seen.contains(&target) {
            self.nodes[target.index()].parent = None;
        }

        match parent {
            Some(parent) => {
                self.nodes[parent.index()].data.replace_child(&target, new_id);
                self.nodes[new_id.index()].parent = Some(parent);
            }
            None => self.set_root(new_id),
        }
        Ok(new_id)
    }

    /// Remove `target` from its parent
    ///
    /// Block statements are dropped from the list and an `else` branch is
    /// cleared; any other slot cannot be emptied.
    pub fn delete(&mut self, target: NodeId) -> Result<(), TreeError> {
        self.ensure_attached(target)?;
        let kind = self.kind(target);
        let parent = self
            .parent(target)
            .ok_or(TreeError::NotDeletable { node: target, kind })?;

        match &mut self.nodes[parent.index()].data {
            NodeData::Block { statements } => statements.retain(|s| *s != target),
            NodeData::If { else_branch, .. } if *else_branch == Some(target) => *else_branch = None,
            _ => return Err(TreeError::NotDeletable { node: target, kind }),
        }
        self.nodes[target.index()].parent = None;
        Ok(())
    }

    /// Enclose `target` in parentheses or a block
    pub fn wrap(&mut self, target: NodeId, wrapper: Wrapper) -> Result<NodeId, TreeError> {
        let template = match wrapper {
            Wrapper::Parentheses => Subtree::parenthesized(Subtree::graft(target)),
            Wrapper::Block => Subtree::block(vec![Subtree::graft(target)]),
        };
        self.replace(target, &template)
    }

    fn ensure_attached(&self, target: NodeId) -> Result<(), TreeError> {
        if self.root.is_none() {
            return Err(TreeError::EmptyTree);
        }
        if target.index() >= self.nodes.len() || !self.is_attached(target) {
            return Err(TreeError::Stale(target));
        }
        Ok(())
    }

    // Convenience constructors

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.alloc(NodeData::Block { statements })
    }

    pub fn empty_statement(&mut self) -> NodeId {
        self.alloc(NodeData::EmptyStatement)
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.alloc(NodeData::ExpressionStatement { expression })
    }

    pub fn return_statement(&mut self, expression: Option<NodeId>) -> NodeId {
        self.alloc(NodeData::Return { expression })
    }

    pub fn throw_statement(&mut self, expression: NodeId) -> NodeId {
        self.alloc(NodeData::Throw { expression })
    }

    pub fn if_statement(&mut self, condition: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) -> NodeId {
        self.alloc(NodeData::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn while_statement(&mut self, condition: NodeId, body: NodeId) -> NodeId {
        self.alloc(NodeData::While { condition, body })
    }

    pub fn infix(&mut self, operator: InfixOperator, operands: Vec<NodeId>) -> NodeId {
        self.alloc(NodeData::Infix { operator, operands })
    }

    pub fn prefix(&mut self, operator: PrefixOperator, operand: NodeId) -> NodeId {
        self.alloc(NodeData::Prefix { operator, operand })
    }

    pub fn parenthesized(&mut self, expression: NodeId) -> NodeId {
        self.alloc(NodeData::Parenthesized { expression })
    }

    pub fn conditional(&mut self, condition: NodeId, then_expression: NodeId, else_expression: NodeId) -> NodeId {
        self.alloc(NodeData::Conditional {
            condition,
            then_expression,
            else_expression,
        })
    }

    pub fn assignment(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.alloc(NodeData::Assignment { target, value })
    }

    pub fn invocation(&mut self, receiver: Option<NodeId>, name: &str, arguments: Vec<NodeId>) -> NodeId {
        self.alloc(NodeData::MethodInvocation {
            receiver,
            name: name.to_string(),
            arguments,
        })
    }

    pub fn lambda(&mut self, parameters: &[&str], body: NodeId) -> NodeId {
        self.alloc(NodeData::Lambda {
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            body,
        })
    }

    pub fn name(&mut self, identifier: &str, ty: Type) -> NodeId {
        self.alloc(NodeData::Name {
            identifier: identifier.to_string(),
            ty,
        })
    }

    pub fn literal(&mut self, value: Literal) -> NodeId {
        self.alloc(NodeData::Literal { value })
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.literal(Literal::Int(value))
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.literal(Literal::String(value.to_string()))
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.literal(Literal::Boolean(value))
    }
}
