//! The template syntax tree.
//!
//! Trees are produced by an external template parser (or by the builders in
//! [`crate::build`]) and are immutable afterwards. The shape follows the
//! action language: a `List` of nodes, where actions carry a `Pipe` of
//! `Command`s and every command is a non-empty sequence of `Arg`s whose first
//! element is the operation and the rest are its arguments.

use std::fmt;

use stencil_common::Span;

/// An ordered sequence of nodes. A definition's root is a `List`, as are
/// the bodies and else-branches of `if`, `range`, and `with`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct List {
    pub nodes: Vec<Node>,
    pub span: Span,
}

impl List {
    pub fn new(nodes: Vec<Node>) -> Self {
        List {
            nodes,
            span: Span::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A statement-level node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Literal text, written out byte for byte.
    Text { text: String, span: Span },
    /// `{{ pipeline }}` or `{{ $x := pipeline }}`.
    Action(Pipe),
    /// `{{ if pipeline }} list {{ else }} list {{ end }}`.
    If(BranchNode),
    /// `{{ range pipeline }} list {{ else }} list {{ end }}`.
    Range(BranchNode),
    /// `{{ with pipeline }} list {{ else }} list {{ end }}`.
    With(BranchNode),
    /// `{{ template "name" pipeline }}`.
    Template {
        name: String,
        pipe: Option<Pipe>,
        span: Span,
    },
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Text { span, .. } | Node::Template { span, .. } => *span,
            Node::Action(pipe) => pipe.span,
            Node::If(branch) | Node::Range(branch) | Node::With(branch) => branch.span,
        }
    }
}

/// The shared shape of `if`, `range`, and `with`.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchNode {
    pub pipe: Pipe,
    pub list: List,
    pub else_list: Option<List>,
    pub span: Span,
}

/// A pipeline, optionally declaring variables.
///
/// `decl` holds the declared names without their `$` sigil. Commands are
/// chained left to right: each command's result is passed as the final
/// argument of the next.
#[derive(Clone, Debug, PartialEq)]
pub struct Pipe {
    pub decl: Vec<String>,
    pub cmds: Vec<Command>,
    pub span: Span,
}

impl Pipe {
    pub fn new(cmds: Vec<Command>) -> Self {
        Pipe {
            decl: Vec::new(),
            cmds,
            span: Span::default(),
        }
    }

    pub fn declaring(mut self, names: &[&str]) -> Self {
        self.decl = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

/// One command of a pipeline: the operation followed by its arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    pub args: Vec<Arg>,
    pub span: Span,
}

impl Command {
    pub fn new(args: Vec<Arg>) -> Self {
        Command {
            args,
            span: Span::default(),
        }
    }
}

/// A numeric literal. The variant is chosen by lexical form.
#[derive(Clone, Debug, PartialEq)]
pub enum NumberValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Number {
    /// The literal exactly as written.
    pub text: String,
    pub value: NumberValue,
}

/// An operand: either the operation of a command or one of its arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// `.A.B`: a field/method chain starting at dot.
    Field(Vec<String>),
    /// `(operand).A.B`: a chain starting at an arbitrary operand.
    Chain { node: Box<Arg>, fields: Vec<String> },
    /// A function name.
    Identifier(String),
    /// A parenthesized pipeline.
    Pipe(Box<Pipe>),
    /// `$x.A.B`. `name` excludes the sigil.
    Variable { name: String, fields: Vec<String> },
    Bool(bool),
    Dot,
    Nil,
    Number(Number),
    String(String),
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text { text, .. } => write!(f, "{}", text),
            Node::Action(pipe) => write!(f, "{{{{{}}}}}", pipe),
            Node::If(b) => write_branch(f, "if", b),
            Node::Range(b) => write_branch(f, "range", b),
            Node::With(b) => write_branch(f, "with", b),
            Node::Template { name, pipe, .. } => match pipe {
                Some(pipe) => write!(f, "{{{{template {:?} {}}}}}", name, pipe),
                None => write!(f, "{{{{template {:?}}}}}", name),
            },
        }
    }
}

fn write_branch(f: &mut fmt::Formatter<'_>, keyword: &str, b: &BranchNode) -> fmt::Result {
    write!(f, "{{{{{} {}}}}}{}", keyword, b.pipe, b.list)?;
    if let Some(else_list) = &b.else_list {
        write!(f, "{{{{else}}}}{}", else_list)?;
    }
    write!(f, "{{{{end}}}}")
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.decl.is_empty() {
            for (i, name) in self.decl.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "${}", name)?;
            }
            write!(f, " := ")?;
        }
        for (i, cmd) in self.cmds.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", cmd)?;
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", arg)?;
        }
        Ok(())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Field(fields) => write_fields(f, fields),
            Arg::Chain { node, fields } => {
                match node.as_ref() {
                    Arg::Pipe(pipe) => write!(f, "({})", pipe)?,
                    other => write!(f, "{}", other)?,
                }
                write_fields(f, fields)
            }
            Arg::Identifier(name) => write!(f, "{}", name),
            Arg::Pipe(pipe) => write!(f, "({})", pipe),
            Arg::Variable { name, fields } => {
                write!(f, "${}", name)?;
                write_fields(f, fields)
            }
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Dot => write!(f, "."),
            Arg::Nil => write!(f, "nil"),
            Arg::Number(n) => write!(f, "{}", n.text),
            Arg::String(s) => write!(f, "{:?}", s),
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[String]) -> fmt::Result {
    for field in fields {
        write!(f, ".{}", field)?;
    }
    Ok(())
}
