//! Hierarchical symbol tree mirroring nested class and function bodies.
//!
//! Nodes live in an arena and refer to each other by [`SymbolId`], so parent
//! links are plain indices that stay valid however the tree grows.

use crate::ast::Function;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Function,
    Variable,
}

impl SymbolKind {
    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNode {
    pub name: String,
    pub kind: SymbolKind,
    pub parent: Option<SymbolId>,
    pub children: BTreeMap<String, SymbolId>,
    /// Present exactly when `kind` is [`SymbolKind::Function`].
    pub function: Option<Function>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Name \"{name}\" has already been used by another class, function or variable in the current scope")]
pub struct NameCollision {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTree {
    nodes: Vec<SymbolNode>,
}

impl SymbolTree {
    /// Creates a tree whose root is the module's implicit entry function.
    pub fn new(module_name: &str) -> Self {
        Self {
            nodes: vec![SymbolNode {
                name: module_name.to_string(),
                kind: SymbolKind::Function,
                parent: None,
                children: BTreeMap::new(),
                function: Some(Function::default()),
            }],
        }
    }

    pub fn root(&self) -> SymbolId {
        SymbolId(0)
    }

    pub fn get(&self, id: SymbolId) -> &SymbolNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut SymbolNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id).parent
    }

    pub fn is_used(&self, scope: SymbolId, name: &str) -> bool {
        self.get(scope).children.contains_key(name)
    }

    /// Declares `name` as a direct child of `scope`.
    pub fn declare(
        &mut self,
        scope: SymbolId,
        name: &str,
        kind: SymbolKind,
    ) -> Result<SymbolId, NameCollision> {
        if self.is_used(scope, name) {
            return Err(NameCollision {
                name: name.to_string(),
            });
        }

        let id = SymbolId(self.nodes.len());
        self.nodes.push(SymbolNode {
            name: name.to_string(),
            kind,
            parent: Some(scope),
            children: BTreeMap::new(),
            function: (kind == SymbolKind::Function).then(Function::default),
        });
        self.get_mut(scope).children.insert(name.to_string(), id);
        Ok(id)
    }

    /// Direct child of `scope` called `name`.
    pub fn lookup(&self, scope: SymbolId, name: &str) -> Option<SymbolId> {
        self.get(scope).children.get(name).copied()
    }

    /// Resolves a dot-separated name as seen from `scope`: the first segment
    /// is searched in `scope` and then in each enclosing scope, the rest
    /// descend from there.
    pub fn resolve(&self, scope: SymbolId, qualified_name: &str) -> Option<SymbolId> {
        let mut segments = qualified_name.split('.');
        let first = segments.next()?;

        let mut found = None;
        let mut search = Some(scope);
        while let Some(current) = search {
            if let Some(id) = self.lookup(current, first) {
                found = Some(id);
                break;
            }
            search = self.parent(current);
        }

        segments.try_fold(found?, |id, segment| self.lookup(id, segment))
    }

    /// Dot-joined path from the root to `id`, the root's own name included.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let mut names = vec![self.get(id).name.as_str()];
        let mut current = self.parent(id);
        while let Some(parent) = current {
            names.push(self.get(parent).name.as_str());
            current = self.parent(parent);
        }
        names.reverse();
        names.join(".")
    }

    pub fn function(&self, id: SymbolId) -> Option<&Function> {
        self.get(id).function.as_ref()
    }

    pub fn function_mut(&mut self, id: SymbolId) -> Option<&mut Function> {
        self.get_mut(id).function.as_mut()
    }

    /// Children of `id` in name order.
    pub fn children(&self, id: SymbolId) -> impl Iterator<Item = (&str, SymbolId)> + '_ {
        self.get(id)
            .children
            .iter()
            .map(|(name, child)| (name.as_str(), *child))
    }
}
