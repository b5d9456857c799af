//! Terse constructors for syntax trees.
//!
//! Parsing template text is the job of an external component; these helpers
//! let embedders and tests assemble trees directly.

use stencil_common::Span;

use crate::ast::{Arg, BranchNode, Command, List, Node, Number, NumberValue, Pipe};

pub fn list(nodes: Vec<Node>) -> List {
    List::new(nodes)
}

pub fn text(text: &str) -> Node {
    Node::Text {
        text: text.to_string(),
        span: Span::default(),
    }
}

pub fn action(pipe: Pipe) -> Node {
    Node::Action(pipe)
}

fn branch(pipe: Pipe, list: List, else_list: Option<List>) -> BranchNode {
    BranchNode {
        pipe,
        list,
        else_list,
        span: Span::default(),
    }
}

pub fn if_(pipe: Pipe, list: List, else_list: Option<List>) -> Node {
    Node::If(branch(pipe, list, else_list))
}

pub fn range(pipe: Pipe, list: List, else_list: Option<List>) -> Node {
    Node::Range(branch(pipe, list, else_list))
}

pub fn with(pipe: Pipe, list: List, else_list: Option<List>) -> Node {
    Node::With(branch(pipe, list, else_list))
}

pub fn template(name: &str, pipe: Option<Pipe>) -> Node {
    Node::Template {
        name: name.to_string(),
        pipe,
        span: Span::default(),
    }
}

pub fn pipe(cmds: Vec<Command>) -> Pipe {
    Pipe::new(cmds)
}

pub fn cmd(args: Vec<Arg>) -> Command {
    Command::new(args)
}

/// A pipeline made of one command.
pub fn single(args: Vec<Arg>) -> Pipe {
    Pipe::new(vec![Command::new(args)])
}

pub fn field(names: &[&str]) -> Arg {
    Arg::Field(names.iter().map(|n| n.to_string()).collect())
}

pub fn chain(node: Arg, names: &[&str]) -> Arg {
    Arg::Chain {
        node: Box::new(node),
        fields: names.iter().map(|n| n.to_string()).collect(),
    }
}

pub fn ident(name: &str) -> Arg {
    Arg::Identifier(name.to_string())
}

pub fn nested(pipe: Pipe) -> Arg {
    Arg::Pipe(Box::new(pipe))
}

pub fn var(name: &str, fields: &[&str]) -> Arg {
    Arg::Variable {
        name: name.to_string(),
        fields: fields.iter().map(|n| n.to_string()).collect(),
    }
}

pub fn boolean(value: bool) -> Arg {
    Arg::Bool(value)
}

pub fn dot() -> Arg {
    Arg::Dot
}

pub fn nil() -> Arg {
    Arg::Nil
}

pub fn int(value: i64) -> Arg {
    Arg::Number(Number {
        text: value.to_string(),
        value: NumberValue::Int(value),
    })
}

pub fn uint(value: u64) -> Arg {
    Arg::Number(Number {
        text: value.to_string(),
        value: NumberValue::Uint(value),
    })
}

pub fn float(value: f64) -> Arg {
    Arg::Number(Number {
        text: format!("{:?}", value),
        value: NumberValue::Float(value),
    })
}

pub fn complex(re: f64, im: f64) -> Arg {
    Arg::Number(Number {
        text: format!("{:?}+{:?}i", re, im),
        value: NumberValue::Complex(re, im),
    })
}

pub fn string(value: &str) -> Arg {
    Arg::String(value.to_string())
}
