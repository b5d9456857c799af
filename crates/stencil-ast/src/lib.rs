//! Template syntax tree and template lookup for the stencil compiler.

pub mod ast;
pub mod build;
pub mod source;

pub use ast::{Arg, BranchNode, Command, List, Node, Number, NumberValue, Pipe};
pub use source::{
    Definition, EscapeAll, Escaped, LookupError, Rewriter, TemplateSet, TemplateSource,
};
