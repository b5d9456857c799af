//! Translation errors.
//!
//! Every error aborts the whole run: no partial output is produced. Each
//! error carries the name of the template being specialized and the span of
//! the offending node when one is known, so it can be rendered against the
//! template source (see [`crate::diagnostics`]).

use std::fmt;

use stencil_common::Span;
use stencil_types::Ty;

/// What went wrong.
#[derive(Clone, Debug, PartialEq)]
pub enum TranslateErrorKind {
    /// The template source has no definition under the name (or its
    /// escaping rewrite failed).
    UnknownTemplate { name: String, message: String },
    /// Neither a method nor a field `name` exists on `ty`.
    UnknownMember { name: String, ty: Ty },
    /// A method or function returns something other than one value or a
    /// `Result`.
    UnsupportedArity { name: String, arity: usize },
    /// A call supplies the wrong number of arguments.
    ArgumentCount {
        name: String,
        expected: usize,
        variadic: bool,
        found: usize,
    },
    /// A field was given arguments as if it were a method.
    NotAMethod { name: String },
    /// `range` declares more than two variables.
    TooManyRangeVariables { count: usize },
    /// `if` or `with` declares more than one variable.
    TooManyDeclarations { count: usize },
    /// An action declares more than one variable.
    MalformedAssignment { count: usize },
    /// `range` over something other than a slice, array, or channel.
    NotIterable { ty: Ty },
    UndefinedVariable { name: String },
    UnknownFunction { name: String },
    /// No truthiness rule exists for values of `ty`.
    UndecidableTruth { ty: Ty },
    /// `nil` used as a command.
    NilCommand,
    /// `nil` passed where the parameter type has no nil value.
    NilArgument { ty: Ty },
    /// A literal or nested pipeline was given arguments or a piped value.
    UnexpectedArguments { operand: String },
    /// A variable with trailing fields was given arguments.
    CallVariable { name: String },
    /// A parenthesized pipeline declares a variable.
    InlineAssignment,
    EmptyPipeline,
    InvalidEntryName { name: String, reason: &'static str },
    DuplicateEntry { name: String },
    /// The assembled output failed to parse as Rust.
    Format { source: String, message: String },
    /// A numeric literal has no exact value of the parameter's type.
    ConstantMismatch { constant: String, ty: Ty },
}

/// A translation failure, located where possible.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslateError {
    pub kind: TranslateErrorKind,
    /// The template whose specialization failed.
    pub template: Option<String>,
    pub span: Option<Span>,
}

impl TranslateError {
    pub fn new(kind: TranslateErrorKind) -> Self {
        TranslateError {
            kind,
            template: None,
            span: None,
        }
    }

    /// Attach a span unless a more precise one is already set.
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_empty() {
            self.span = Some(span);
        }
        self
    }

    /// Attach the template name unless an inner template already claimed it.
    pub fn in_template(mut self, name: &str) -> Self {
        if self.template.is_none() {
            self.template = Some(name.to_string());
        }
        self
    }
}

impl From<TranslateErrorKind> for TranslateError {
    fn from(kind: TranslateErrorKind) -> Self {
        TranslateError::new(kind)
    }
}

impl fmt::Display for TranslateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateErrorKind::UnknownTemplate { message, .. } => write!(f, "{}", message),
            TranslateErrorKind::UnknownMember { name, ty } => {
                write!(f, "unknown member {} on type {}", name, ty)
            }
            TranslateErrorKind::UnsupportedArity { name, arity } => write!(
                f,
                "{} returns {} values; only a value or a Result is supported",
                name, arity
            ),
            TranslateErrorKind::ArgumentCount {
                name,
                expected,
                variadic,
                found,
            } => {
                let at_least = if *variadic { "at least " } else { "" };
                write!(
                    f,
                    "wrong number of arguments for {}: want {}{}, got {}",
                    name, at_least, expected, found
                )
            }
            TranslateErrorKind::NotAMethod { name } => {
                write!(f, "{} is not a method but has arguments", name)
            }
            TranslateErrorKind::TooManyRangeVariables { count } => {
                write!(f, "too many declarations for range: {}", count)
            }
            TranslateErrorKind::TooManyDeclarations { count } => {
                write!(f, "too many declarations: {}", count)
            }
            TranslateErrorKind::MalformedAssignment { count } => {
                write!(f, "only one variable can be assigned, found {}", count)
            }
            TranslateErrorKind::NotIterable { ty } => {
                write!(f, "range can't iterate over value of type {}", ty)
            }
            TranslateErrorKind::UndefinedVariable { name } => {
                write!(f, "undefined variable ${}", name)
            }
            TranslateErrorKind::UnknownFunction { name } => {
                write!(f, "function {:?} not defined", name)
            }
            TranslateErrorKind::UndecidableTruth { ty } => {
                write!(f, "can't decide truth of value of type {}", ty)
            }
            TranslateErrorKind::NilCommand => write!(f, "nil is not a command"),
            TranslateErrorKind::NilArgument { ty } => {
                write!(f, "nil is not a valid argument of type {}", ty)
            }
            TranslateErrorKind::UnexpectedArguments { operand } => {
                write!(f, "can't give argument to non-function {}", operand)
            }
            TranslateErrorKind::CallVariable { name } => {
                write!(f, "can't call variable ${} with fields", name)
            }
            TranslateErrorKind::InlineAssignment => {
                write!(f, "inline variable assignment is not supported")
            }
            TranslateErrorKind::EmptyPipeline => write!(f, "empty pipeline"),
            TranslateErrorKind::InvalidEntryName { name, reason } => {
                write!(f, "invalid function name {:?}: {}", name, reason)
            }
            TranslateErrorKind::DuplicateEntry { name } => {
                write!(f, "function {} is requested more than once", name)
            }
            TranslateErrorKind::Format { message, .. } => {
                write!(f, "generated code does not parse: {}", message)
            }
            TranslateErrorKind::ConstantMismatch { constant, ty } => {
                write!(f, "constant {} can't be used as a value of type {}", constant, ty)
            }
        }
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.template {
            Some(template) => write!(f, "template {:?}: {}", template, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for TranslateError {}
