//! Tipper trait, categories and the kind-indexed registry

use serde::{Deserialize, Serialize};
use spartan_core::{Edit, NodeId, NodeKind, SyntaxTree};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown tipper category '{0}'")]
    UnknownCategory(String),

    #[error("a tipper named '{0}' is already registered")]
    DuplicateName(&'static str),
}

/// Groups of tippers that are switched on and off together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Punctuation and nesting that carries no meaning
    SyntacticBaggage,
    /// Boolean and string algebra
    Simplification,
    /// Collapsing branches into conditional expressions
    Ternarization,
    /// Code that does nothing
    InVain,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::SyntacticBaggage,
        Category::Simplification,
        Category::Ternarization,
        Category::InVain,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::SyntacticBaggage => "syntactic_baggage",
            Category::Simplification => "simplification",
            Category::Ternarization => "ternarization",
            Category::InVain => "in_vain",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::SyntacticBaggage => "Remove syntactic baggage",
            Category::Simplification => "Simplify boolean and string expressions",
            Category::Ternarization => "Convert branches into conditional expressions",
            Category::InVain => "Remove statements that do nothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| RegistryError::UnknownCategory(s.to_string()))
    }
}

/// Which categories may fire; everything is enabled unless switched off
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enablement {
    disabled: HashSet<Category>,
}

impl Enablement {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn none() -> Self {
        Self {
            disabled: Category::ALL.into_iter().collect(),
        }
    }

    /// Only the given categories
    pub fn only(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut enablement = Self::none();
        for category in categories {
            enablement.set(category, true);
        }
        enablement
    }

    /// Build from a `category name -> enabled` mapping
    pub fn from_map<'a>(map: impl IntoIterator<Item = (&'a String, &'a bool)>) -> Result<Self, RegistryError> {
        let mut enablement = Self::all();
        for (name, enabled) in map {
            enablement.set(name.parse()?, *enabled);
        }
        Ok(enablement)
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        if enabled {
            self.disabled.remove(&category);
        } else {
            self.disabled.insert(category);
        }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        !self.disabled.contains(&category)
    }

    pub fn enabled(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }
}

/// A simplification rule bound to one or more node kinds
///
/// `replacement` must be a pure function of the node's current subtree and
/// must return `None` both when the rule does not apply and when its result
/// would be structurally identical to the input.
pub trait Tipper: Send + Sync {
    /// The unique identifier for this tipper (e.g., "remove_empty_statement")
    fn name(&self) -> &'static str;

    /// A short description of what this tipper does
    fn description(&self) -> &'static str;

    fn category(&self) -> Category;

    /// Node kinds this tipper is indexed under
    fn kinds(&self) -> &'static [NodeKind];

    fn matches(&self, kind: NodeKind) -> bool {
        self.kinds().contains(&kind)
    }

    /// Propose an edit for `node`, or `None`
    fn replacement(&self, tree: &SyntaxTree, node: NodeId) -> Option<Edit>;
}

/// Information about a registered tipper (for --list-tippers)
#[derive(Debug, Clone, Serialize)]
pub struct TipperInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub kinds: Vec<String>,
}

/// Registry of tippers, indexed by the node kinds they target
///
/// Candidates for a kind keep registration order; dispatch applies the
/// first enabled candidate that proposes an edit.
pub struct TipperRegistry {
    tippers: Vec<Arc<dyn Tipper>>,
    by_kind: HashMap<NodeKind, Vec<usize>>,
    by_name: HashMap<&'static str, usize>,
}

impl TipperRegistry {
    /// Create a new registry with all built-in tippers
    pub fn new() -> Self {
        Self::with_builtin_tippers()
    }

    pub fn empty() -> Self {
        Self {
            tippers: Vec::new(),
            by_kind: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn with_builtin_tippers() -> Self {
        let mut registry = Self::empty();
        for tipper in crate::builtin_tippers() {
            // Built-in names are unique
            let _ = registry.register(tipper);
        }
        registry
    }

    /// Register a tipper after all previously registered ones
    pub fn register(&mut self, tipper: Arc<dyn Tipper>) -> Result<(), RegistryError> {
        let name = tipper.name();
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName(name));
        }
        let idx = self.tippers.len();
        for kind in NodeKind::ALL.into_iter().filter(|k| tipper.matches(*k)) {
            self.by_kind.entry(kind).or_default().push(idx);
        }
        self.by_name.insert(name, idx);
        self.tippers.push(tipper);
        Ok(())
    }

    /// Candidate tippers for a node kind, in registration order
    pub fn candidates_for(&self, kind: NodeKind) -> impl Iterator<Item = &dyn Tipper> + '_ {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&idx| self.tippers[idx].as_ref())
    }

    /// First edit proposed for `node` by an enabled candidate
    pub fn dispatch(&self, tree: &SyntaxTree, node: NodeId, enablement: &Enablement) -> Option<Edit> {
        self.candidates_for(tree.kind(node))
            .filter(|tipper| enablement.is_enabled(tipper.category()))
            .find_map(|tipper| {
                let edit = tipper.replacement(tree, node);
                if edit.is_some() {
                    tracing::trace!(tipper = tipper.name(), %node, "tipper applies");
                }
                edit
            })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tipper>> {
        self.by_name.get(name).map(|&idx| &self.tippers[idx])
    }

    pub fn all(&self) -> &[Arc<dyn Tipper>] {
        &self.tippers
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tippers.iter().map(|t| t.name()).collect()
    }

    pub fn list(&self) -> Vec<TipperInfo> {
        self.tippers
            .iter()
            .map(|t| TipperInfo {
                name: t.name(),
                description: t.description(),
                category: t.category(),
                kinds: t.kinds().iter().map(|k| k.to_string()).collect(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tippers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tippers.is_empty()
    }
}

impl Default for TipperRegistry {
    fn default() -> Self {
        Self::new()
    }
}
