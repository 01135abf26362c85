//! Serialized (JSON) form of a tree
//!
//! A document is the nested payload itself, tagged by `kind`:
//!
//! ```json
//! { "kind": "infix", "operator": "plus", "operands": [
//!     { "kind": "name", "identifier": "x", "type": "string" },
//!     { "kind": "literal", "value": { "type": "int", "value": 4 } } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::node::{NodeData, NodeId};
use crate::tree::{Subtree, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeDocument(pub Box<NodeData<NodeDocument>>);

impl NodeDocument {
    pub fn new(data: NodeData<NodeDocument>) -> Self {
        NodeDocument(Box::new(data))
    }

    fn to_template(&self) -> Subtree {
        Subtree::build(self.0.map_ref(NodeDocument::to_template))
    }
}

impl SyntaxTree {
    /// Build a tree whose root is the document's top node
    pub fn from_document(document: &NodeDocument) -> Self {
        let mut tree = SyntaxTree::new();
        let root = tree.instantiate(&document.to_template());
        tree.set_root(root);
        tree
    }

    pub fn document_of(&self, id: NodeId) -> NodeDocument {
        NodeDocument::new(self.data(id).map_ref(|child| self.document_of(*child)))
    }

    pub fn to_document(&self) -> Option<NodeDocument> {
        self.root().map(|root| self.document_of(root))
    }
}
