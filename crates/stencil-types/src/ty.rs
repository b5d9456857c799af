//! Type descriptors for template dot values.
//!
//! A `Ty` names one concrete Rust type that a template may be specialized
//! for. Descriptors are plain values: two descriptors are equal exactly when
//! they denote the same concrete type, which is what the specialization and
//! error-wrapper caches key on.

use std::fmt;

use stencil_common::ModulePath;

/// A reference to a named (struct) type, resolved through a
/// [`TypeUniverse`](crate::TypeUniverse).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedRef {
    /// Module that owns the type (`app::model`).
    pub module: ModulePath,
    /// The type's identifier inside that module (`Page`).
    pub name: String,
}

impl NamedRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        NamedRef {
            module: ModulePath::new(module),
            name: name.into(),
        }
    }
}

impl fmt::Display for NamedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// Numeric variants. Integer and float literals pick `I64`, `U64`, `F64`,
/// or `Complex128` by lexical form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Complex128,
}

impl NumKind {
    pub fn is_float(self) -> bool {
        matches!(self, NumKind::F32 | NumKind::F64)
    }

    pub fn is_complex(self) -> bool {
        self == NumKind::Complex128
    }

    pub fn is_integer(self) -> bool {
        !self.is_float() && !self.is_complex()
    }

    /// The Rust primitive spelling, or `None` for kinds that live in the
    /// runtime library.
    pub fn primitive_name(self) -> Option<&'static str> {
        Some(match self {
            NumKind::I8 => "i8",
            NumKind::I16 => "i16",
            NumKind::I32 => "i32",
            NumKind::I64 => "i64",
            NumKind::Isize => "isize",
            NumKind::U8 => "u8",
            NumKind::U16 => "u16",
            NumKind::U32 => "u32",
            NumKind::U64 => "u64",
            NumKind::Usize => "usize",
            NumKind::F32 => "f32",
            NumKind::F64 => "f64",
            NumKind::Complex128 => return None,
        })
    }
}

/// A callable's shape: fixed parameters, an optional variadic tail, and its
/// results.
///
/// Result arity is the number of entries in `results`. Templates accept
/// arity 1 (a plain value) and arity 2 (a value plus a failure, i.e. a Rust
/// `Result<T, E>`); anything else is rejected at translation time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<Ty>,
    pub variadic: Option<Ty>,
    pub results: Vec<Ty>,
}

impl Signature {
    pub fn new(params: Vec<Ty>, results: Vec<Ty>) -> Self {
        Signature {
            params,
            variadic: None,
            results,
        }
    }

    /// A signature returning a single value.
    pub fn returning(params: Vec<Ty>, result: Ty) -> Self {
        Signature::new(params, vec![result])
    }

    /// A signature returning `Result<value, error>`.
    pub fn fallible(params: Vec<Ty>, value: Ty, error: Ty) -> Self {
        Signature::new(params, vec![value, error])
    }

    /// Accept any number of trailing arguments of type `ty`.
    pub fn with_variadic(mut self, ty: Ty) -> Self {
        self.variadic = Some(ty);
        self
    }

    pub fn arity(&self) -> usize {
        self.results.len()
    }

    /// The first result, which is the value a call evaluates to.
    pub fn value_type(&self) -> Option<&Ty> {
        self.results.first()
    }

    /// Whether `count` arguments satisfy this signature.
    pub fn accepts(&self, count: usize) -> bool {
        if self.variadic.is_some() {
            count >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// The declared type of the argument at `index`.
    pub fn param(&self, index: usize) -> Option<&Ty> {
        self.params.get(index).or(self.variadic.as_ref())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        if let Some(variadic) = &self.variadic {
            if !self.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...{}", variadic)?;
        }
        write!(f, ")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [value] => write!(f, " -> {}", value),
            [value, error] => write!(f, " -> Result<{}, {}>", value, error),
            many => {
                write!(f, " -> (")?;
                for (i, r) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", r)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// The coarse classification every kind-dispatch site switches on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    NoValue,
    Bool,
    Num(NumKind),
    Str,
    Ptr,
    Slice,
    Array,
    Map,
    Chan,
    Struct,
    Func,
    Dynamic,
}

/// A concrete type.
///
/// - `NoValue`: the dot of a sub-template invoked without an argument
/// - `Ptr`: a nullable owning pointer (`Option<Box<T>>`)
/// - `Chan`: the receiving half of a channel
/// - `Named`: a struct, with fields and methods in the type universe
/// - `Dynamic`: the runtime library's dynamically typed `Value`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    NoValue,
    Bool,
    Num(NumKind),
    Str,
    Ptr(Box<Ty>),
    Slice(Box<Ty>),
    Array(usize, Box<Ty>),
    Map(Box<Ty>, Box<Ty>),
    Chan(Box<Ty>),
    Named(NamedRef),
    Func(Box<Signature>),
    Dynamic,
}

impl Ty {
    pub fn int() -> Ty {
        Ty::Num(NumKind::I64)
    }

    pub fn uint() -> Ty {
        Ty::Num(NumKind::U64)
    }

    pub fn float() -> Ty {
        Ty::Num(NumKind::F64)
    }

    pub fn complex() -> Ty {
        Ty::Num(NumKind::Complex128)
    }

    pub fn ptr(inner: Ty) -> Ty {
        Ty::Ptr(Box::new(inner))
    }

    pub fn slice(elem: Ty) -> Ty {
        Ty::Slice(Box::new(elem))
    }

    pub fn array(len: usize, elem: Ty) -> Ty {
        Ty::Array(len, Box::new(elem))
    }

    pub fn map(key: Ty, value: Ty) -> Ty {
        Ty::Map(Box::new(key), Box::new(value))
    }

    pub fn chan(elem: Ty) -> Ty {
        Ty::Chan(Box::new(elem))
    }

    pub fn named(module: impl Into<String>, name: impl Into<String>) -> Ty {
        Ty::Named(NamedRef::new(module, name))
    }

    pub fn func(sig: Signature) -> Ty {
        Ty::Func(Box::new(sig))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Ty::NoValue => Kind::NoValue,
            Ty::Bool => Kind::Bool,
            Ty::Num(n) => Kind::Num(*n),
            Ty::Str => Kind::Str,
            Ty::Ptr(_) => Kind::Ptr,
            Ty::Slice(_) => Kind::Slice,
            Ty::Array(..) => Kind::Array,
            Ty::Map(..) => Kind::Map,
            Ty::Chan(_) => Kind::Chan,
            Ty::Named(_) => Kind::Struct,
            Ty::Func(_) => Kind::Func,
            Ty::Dynamic => Kind::Dynamic,
        }
    }

    /// The element type of a pointer, slice, array, map, or channel.
    pub fn elem(&self) -> Option<&Ty> {
        match self {
            Ty::Ptr(elem) | Ty::Slice(elem) | Ty::Array(_, elem) | Ty::Chan(elem) => Some(elem),
            Ty::Map(_, value) => Some(value),
            _ => None,
        }
    }

    /// Whether values of this type are `Copy` scalars, passed by value.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Ty::Bool | Ty::Num(_))
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::NoValue => write!(f, "no value"),
            Ty::Bool => write!(f, "bool"),
            Ty::Num(NumKind::Complex128) => write!(f, "complex128"),
            Ty::Num(n) => write!(f, "{}", n.primitive_name().unwrap_or("number")),
            Ty::Str => write!(f, "String"),
            Ty::Ptr(inner) => write!(f, "Option<Box<{}>>", inner),
            Ty::Slice(elem) => write!(f, "Vec<{}>", elem),
            Ty::Array(len, elem) => write!(f, "[{}; {}]", elem, len),
            Ty::Map(key, value) => write!(f, "HashMap<{}, {}>", key, value),
            Ty::Chan(elem) => write!(f, "Receiver<{}>", elem),
            Ty::Named(named) => write!(f, "{}", named),
            Ty::Func(sig) => write!(f, "{}", sig),
            Ty::Dynamic => write!(f, "Value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        assert_eq!(Ty::slice(Ty::Str), Ty::slice(Ty::Str));
        assert_ne!(Ty::slice(Ty::Str), Ty::array(2, Ty::Str));
        assert_eq!(Ty::named("app", "Page"), Ty::named("app", "Page"));
        assert_ne!(Ty::named("app", "Page"), Ty::named("other", "Page"));
    }

    #[test]
    fn kind_of_named_is_struct() {
        assert_eq!(Ty::named("app", "Page").kind(), Kind::Struct);
        assert_eq!(Ty::ptr(Ty::named("app", "Page")).kind(), Kind::Ptr);
    }

    #[test]
    fn display_uses_rust_spelling() {
        assert_eq!(Ty::map(Ty::Str, Ty::int()).to_string(), "HashMap<String, i64>");
        assert_eq!(Ty::ptr(Ty::named("app::model", "User")).to_string(), "Option<Box<app::model::User>>");
        assert_eq!(Ty::complex().to_string(), "complex128");
        assert_eq!(Ty::NoValue.to_string(), "no value");
    }

    #[test]
    fn signature_accepts_variadic_tail() {
        let sig = Signature::returning(vec![Ty::Str], Ty::Str).with_variadic(Ty::Dynamic);
        assert!(!sig.accepts(0));
        assert!(sig.accepts(1));
        assert!(sig.accepts(4));
        assert_eq!(sig.param(0), Some(&Ty::Str));
        assert_eq!(sig.param(3), Some(&Ty::Dynamic));
        assert_eq!(sig.to_string(), "fn(String, ...Value) -> String");
    }

    #[test]
    fn signature_fixed_arity() {
        let sig = Signature::fallible(vec![], Ty::int(), Ty::Dynamic);
        assert!(sig.accepts(0));
        assert!(!sig.accepts(1));
        assert_eq!(sig.arity(), 2);
        assert_eq!(sig.value_type(), Some(&Ty::int()));
        assert_eq!(sig.param(0), None);
    }
}
