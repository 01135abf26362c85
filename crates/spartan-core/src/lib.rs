//! spartan-core: syntax tree and edit primitives for spartanization
//!
//! This crate provides:
//! - `SyntaxTree`: an arena of nodes with parent back-references
//! - `NodeKind` / `NodeData`: the closed set of node kinds and their payloads
//! - `Subtree`: replacement templates that graft existing nodes
//! - `Edit`: a replace/delete/wrap change tagged with its tipper
//! - `extract`: read-only navigation queries
//! - `types`: best-effort expression typing
//! - `EventSink` / `Listener`: lifecycle observation
//! - `NodeDocument`: the serialized form of a tree

mod document;
mod edit;
pub mod extract;
pub mod listener;
mod node;
mod printer;
mod tree;
pub mod types;

pub use document::NodeDocument;
pub use edit::{Edit, EditAction};
pub use listener::{Event, EventId, EventSink, Listener, RecordingListener, TracingListener};
pub use node::{InfixOperator, Literal, NodeData, NodeId, NodeKind, PrefixOperator, Type};
pub use tree::{Subtree, SyntaxTree, TreeError, Wrapper};
