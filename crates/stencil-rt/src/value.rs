//! Dynamically typed values.
//!
//! Builtins such as `index`, `and`, or `printf` accept operands of any type.
//! Generated code converts each such operand with `Value::from(&operand)`;
//! any type implementing [`ToValue`] can be passed.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::print::format_float;

/// A complex number with `f64` parts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Complex128 {
    pub const fn new(re: f64, im: f64) -> Self {
        Complex128 { re, im }
    }

    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}

impl fmt::Display for Complex128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let im = format_float(self.im);
        if im.starts_with('-') || im.starts_with('+') {
            write!(f, "({}{}i)", format_float(self.re), im)
        } else {
            write!(f, "({}+{}i)", format_float(self.re), im)
        }
    }
}

/// A callable stored in a [`Value`].
pub type Func = Arc<dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync>;

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex128),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Func(Func),
}

impl Value {
    /// Wrap a closure so templates can invoke it with `call`.
    pub fn func<F>(f: F) -> Value
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Value::Func(Arc::new(f))
    }

    /// Template truthiness: false, zero, nil, and empty values are false.
    pub fn truth(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Uint(u) => *u != 0,
            Value::Float(x) => *x != 0.0,
            Value::Complex(c) => !c.is_zero(),
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Func(_) => true,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The type name used in diagnostics and `%!verb(type=value)` output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "<nil>",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float64",
            Value::Complex(_) => "complex128",
            Value::Str(_) => "string",
            Value::List(_) => "[]interface {}",
            Value::Map(_) => "map[string]interface {}",
            Value::Func(_) => "func",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({:?})", b),
            Value::Int(i) => write!(f, "Int({:?})", i),
            Value::Uint(u) => write!(f, "Uint({:?})", u),
            Value::Float(x) => write!(f, "Float({:?})", x),
            Value::Complex(c) => write!(f, "Complex({:?})", c),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::List(l) => f.debug_tuple("List").field(l).finish(),
            Value::Map(m) => f.debug_tuple("Map").field(m).finish(),
            Value::Func(_) => write!(f, "Func(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Formats the way the template engine's `%v` does: lists as `[a b]`, maps
/// as `map[k:v]` in key order, nil as `<nil>`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "<nil>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Complex(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                write!(f, "]")
            }
            Value::Func(_) => write!(f, "<func>"),
        }
    }
}

/// Conversion into a dynamic [`Value`].
///
/// Implemented for the scalar and container types generated code works
/// with. Implement it for your own types to pass them to builtins that take
/// operands of any type.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl<T: ToValue + ?Sized> From<&T> for Value {
    fn from(value: &T) -> Value {
        value.to_value()
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Nil
    }
}

/// The dot of a template invoked without an argument.
impl ToValue for dyn Any {
    fn to_value(&self) -> Value {
        match self.downcast_ref::<Value>() {
            Some(value) => value.clone(),
            None => Value::Nil,
        }
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! signed_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Int(*self as i64)
            }
        })*
    };
}

macro_rules! unsigned_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Uint(*self as u64)
            }
        })*
    };
}

signed_to_value!(i8, i16, i32, i64, isize);
unsigned_to_value!(u8, u16, u32, u64, usize);

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for Complex128 {
    fn to_value(&self) -> Value {
        Value::Complex(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Nil,
        }
    }
}

impl<K: fmt::Display, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: fmt::Display, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_matching_variant() {
        assert_eq!(Value::from(&3i32), Value::Int(3));
        assert_eq!(Value::from(&3u8), Value::Uint(3));
        assert_eq!(Value::from("hi"), Value::Str("hi".to_string()));
        assert_eq!(
            Value::from(&vec!["a".to_string()]),
            Value::List(vec![Value::Str("a".to_string())])
        );
        let none: Option<Box<i64>> = None;
        assert_eq!(Value::from(&none), Value::Nil);
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.truth());
        assert!(!Value::Int(0).truth());
        assert!(Value::Uint(2).truth());
        assert!(!Value::Str(String::new()).truth());
        assert!(Value::List(vec![Value::Nil]).truth());
        assert!(!Value::Complex(Complex128::new(0.0, 0.0)).truth());
    }

    #[test]
    fn display_of_containers() {
        let mut map = HashMap::new();
        map.insert("b", 2i64);
        map.insert("a", 1i64);
        assert_eq!(Value::from(&map).to_string(), "map[a:1 b:2]");
        assert_eq!(Value::from(&[1i64, 2, 3]).to_string(), "[1 2 3]");
        assert_eq!(Value::Nil.to_string(), "<nil>");
    }

    #[test]
    fn complex_display() {
        assert_eq!(Complex128::new(1.0, 2.0).to_string(), "(1+2i)");
        assert_eq!(Complex128::new(1.5, -2.0).to_string(), "(1.5-2i)");
    }
}
