//! Template definitions and how the translator finds them.
//!
//! The translator never owns templates. It asks a [`TemplateSource`] for a
//! definition by name whenever an entry instruction or a `{{template}}` node
//! refers to one. Two flavors are provided: [`TemplateSet`], which hands out
//! definitions as registered, and [`Escaped`], which runs a [`Rewriter`]
//! over each definition the first time it is requested.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ast::{Arg, Command, List, Node};

/// A named template body.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// Canonical name; specializations are keyed on it.
    pub name: String,
    pub root: List,
}

impl Definition {
    pub fn new(name: impl Into<String>, root: List) -> Self {
        Definition {
            name: name.into(),
            root,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// No definition is registered under the name.
    NotFound(String),
    /// The escaping rewrite rejected the definition.
    Rewrite { name: String, message: String },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound(name) => write!(f, "no template named {:?}", name),
            LookupError::Rewrite { name, message } => {
                write!(f, "escaping template {:?}: {}", name, message)
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Resolves template names to definitions.
pub trait TemplateSource {
    fn lookup(&mut self, name: &str) -> Result<Arc<Definition>, LookupError>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for &mut T {
    fn lookup(&mut self, name: &str) -> Result<Arc<Definition>, LookupError> {
        (**self).lookup(name)
    }
}

impl<T: TemplateSource + ?Sized> TemplateSource for Box<T> {
    fn lookup(&mut self, name: &str) -> Result<Arc<Definition>, LookupError> {
        (**self).lookup(name)
    }
}

/// A plain collection of definitions.
#[derive(Clone, Debug, Default)]
pub struct TemplateSet {
    defs: FxHashMap<String, Arc<Definition>>,
}

impl TemplateSet {
    pub fn new() -> Self {
        TemplateSet::default()
    }

    /// Register `root` under `name`, replacing any earlier definition.
    pub fn define(&mut self, name: impl Into<String>, root: List) -> &mut Self {
        let def = Definition::new(name, root);
        self.defs.insert(def.name.clone(), Arc::new(def));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Definition>> {
        self.defs.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.defs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl TemplateSource for TemplateSet {
    fn lookup(&mut self, name: &str) -> Result<Arc<Definition>, LookupError> {
        self.defs
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

/// A contextual rewrite applied to a definition before translation, such as
/// injecting escaper calls around output actions.
pub trait Rewriter {
    fn rewrite(&self, def: &Definition) -> Result<List, String>;
}

/// The escaping flavor: every definition handed out has been through the
/// rewriter exactly once.
#[derive(Debug)]
pub struct Escaped<S, R> {
    inner: S,
    rewriter: R,
    rewritten: FxHashMap<String, Arc<Definition>>,
}

impl<S: TemplateSource, R: Rewriter> Escaped<S, R> {
    pub fn new(inner: S, rewriter: R) -> Self {
        Escaped {
            inner,
            rewriter,
            rewritten: FxHashMap::default(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TemplateSource, R: Rewriter> TemplateSource for Escaped<S, R> {
    fn lookup(&mut self, name: &str) -> Result<Arc<Definition>, LookupError> {
        if let Some(def) = self.rewritten.get(name) {
            return Ok(def.clone());
        }
        let original = self.inner.lookup(name)?;
        let root = self
            .rewriter
            .rewrite(&original)
            .map_err(|message| LookupError::Rewrite {
                name: name.to_string(),
                message,
            })?;
        let def = Arc::new(Definition::new(original.name.clone(), root));
        self.rewritten.insert(name.to_string(), def.clone());
        Ok(def)
    }
}

/// Pipes every output action through one function, regardless of context.
///
/// Actions that declare a variable produce no output and are left alone.
#[derive(Clone, Debug)]
pub struct EscapeAll {
    pub func: String,
}

impl EscapeAll {
    pub fn new(func: impl Into<String>) -> Self {
        EscapeAll { func: func.into() }
    }

    fn rewrite_list(&self, list: &List) -> List {
        List {
            nodes: list.nodes.iter().map(|n| self.rewrite_node(n)).collect(),
            span: list.span,
        }
    }

    fn rewrite_node(&self, node: &Node) -> Node {
        match node {
            Node::Action(pipe) if pipe.decl.is_empty() => {
                let mut pipe = pipe.clone();
                pipe.cmds.push(Command {
                    args: vec![Arg::Identifier(self.func.clone())],
                    span: pipe.span,
                });
                Node::Action(pipe)
            }
            Node::If(b) | Node::Range(b) | Node::With(b) => {
                let mut b = b.clone();
                b.list = self.rewrite_list(&b.list);
                b.else_list = b.else_list.as_ref().map(|l| self.rewrite_list(l));
                match node {
                    Node::If(_) => Node::If(b),
                    Node::Range(_) => Node::Range(b),
                    _ => Node::With(b),
                }
            }
            other => other.clone(),
        }
    }
}

impl Rewriter for EscapeAll {
    fn rewrite(&self, def: &Definition) -> Result<List, String> {
        Ok(self.rewrite_list(&def.root))
    }
}
