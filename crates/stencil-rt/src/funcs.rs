//! Logical, comparison, and container builtins.
//!
//! Operands arrive as [`Value`]s. Comparisons only accept basic kinds and
//! report mixed or unordered operands as errors, which generated code routes
//! through its error-wrapper helpers.

use std::cmp::Ordering;

use crate::error::Error;
use crate::value::Value;

/// The first falsy operand, or the last operand if all are truthy.
pub fn and(first: Value, rest: &[Value]) -> Value {
    let mut current = first;
    for next in rest {
        if !current.truth() {
            return current;
        }
        current = next.clone();
    }
    current
}

/// The first truthy operand, or the last operand if none is.
pub fn or(first: Value, rest: &[Value]) -> Value {
    let mut current = first;
    for next in rest {
        if current.truth() {
            return current;
        }
        current = next.clone();
    }
    current
}

pub fn not(arg: Value) -> bool {
    !arg.truth()
}

/// Whether `first` equals any of `rest`.
pub fn eq(first: Value, rest: &[Value]) -> Result<bool, Error> {
    if rest.is_empty() {
        return Err(Error::msg("missing argument for comparison"));
    }
    for other in rest {
        if equal(&first, other)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn ne(a: Value, b: Value) -> Result<bool, Error> {
    Ok(!equal(&a, &b)?)
}

pub fn lt(a: Value, b: Value) -> Result<bool, Error> {
    Ok(compare(&a, &b)? == Ordering::Less)
}

pub fn le(a: Value, b: Value) -> Result<bool, Error> {
    Ok(compare(&a, &b)? != Ordering::Greater)
}

pub fn gt(a: Value, b: Value) -> Result<bool, Error> {
    Ok(compare(&a, &b)? == Ordering::Greater)
}

pub fn ge(a: Value, b: Value) -> Result<bool, Error> {
    Ok(compare(&a, &b)? != Ordering::Less)
}

fn is_comparable(v: &Value) -> bool {
    !matches!(v, Value::List(_) | Value::Map(_) | Value::Func(_))
}

fn equal(a: &Value, b: &Value) -> Result<bool, Error> {
    if !is_comparable(a) || !is_comparable(b) {
        return Err(Error::msg("non-comparable type for comparison"));
    }
    Ok(match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Nil, _) | (_, Value::Nil) => false,
        (Value::Int(i), Value::Uint(u)) | (Value::Uint(u), Value::Int(i)) => {
            *i >= 0 && *i as u64 == *u
        }
        (Value::Bool(_), Value::Bool(_))
        | (Value::Int(_), Value::Int(_))
        | (Value::Uint(_), Value::Uint(_))
        | (Value::Float(_), Value::Float(_))
        | (Value::Complex(_), Value::Complex(_))
        | (Value::Str(_), Value::Str(_)) => a == b,
        _ => return Err(Error::msg("incompatible types for comparison")),
    })
}

fn is_ordered(v: &Value) -> bool {
    matches!(
        v,
        Value::Int(_) | Value::Uint(_) | Value::Float(_) | Value::Str(_)
    )
}

fn compare(a: &Value, b: &Value) -> Result<Ordering, Error> {
    if !is_ordered(a) || !is_ordered(b) {
        return Err(Error::msg("invalid type for comparison"));
    }
    let ordering = match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Uint(x), Value::Uint(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Greater),
        (Value::Int(i), Value::Uint(u)) => {
            if *i < 0 {
                Ordering::Less
            } else {
                (*i as u64).cmp(u)
            }
        }
        (Value::Uint(u), Value::Int(i)) => {
            if *i < 0 {
                Ordering::Greater
            } else {
                u.cmp(&(*i as u64))
            }
        }
        _ => return Err(Error::msg("incompatible types for comparison")),
    };
    Ok(ordering)
}

/// `index x 1 2` is `x[1][2]`. Lists and strings take integer indices, maps
/// take keys; a missing map key yields nil.
pub fn index(item: Value, indices: &[Value]) -> Result<Value, Error> {
    let mut current = item;
    for idx in indices {
        current = match current {
            Value::List(items) => {
                let i = position(idx, items.len())?;
                items[i].clone()
            }
            Value::Str(s) => {
                let i = position(idx, s.len())?;
                Value::Uint(s.as_bytes()[i] as u64)
            }
            Value::Map(mut entries) => {
                let key = match idx {
                    Value::Str(key) => key.clone(),
                    other => other.to_string(),
                };
                entries.remove(&key).unwrap_or(Value::Nil)
            }
            Value::Nil => return Err(Error::msg("index of untyped nil")),
            other => {
                return Err(Error::msg(format!(
                    "can't index item of type {}",
                    other.type_name()
                )))
            }
        };
    }
    Ok(current)
}

fn position(idx: &Value, len: usize) -> Result<usize, Error> {
    let i = match idx {
        Value::Int(i) => *i,
        Value::Uint(u) => i64::try_from(*u).unwrap_or(i64::MAX),
        Value::Nil => return Err(Error::msg("cannot index slice/array with nil")),
        other => {
            return Err(Error::msg(format!(
                "cannot index slice/array with type {}",
                other.type_name()
            )))
        }
    };
    if i < 0 || i as u64 >= len as u64 {
        return Err(Error::msg(format!("index out of range: {}", i)));
    }
    Ok(i as usize)
}

pub fn len(item: Value) -> Result<i64, Error> {
    let n = match &item {
        Value::Str(s) => s.len(),
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        Value::Nil => return Err(Error::msg("len of nil pointer")),
        other => {
            return Err(Error::msg(format!(
                "len of type {}",
                other.type_name()
            )))
        }
    };
    Ok(n as i64)
}

/// Invoke a function value with the remaining operands.
pub fn call(func: Value, args: &[Value]) -> Result<Value, Error> {
    match func {
        Value::Func(f) => f(args),
        Value::Nil => Err(Error::msg("call of nil")),
        other => Err(Error::msg(format!(
            "non-function of type {}",
            other.type_name()
        ))),
    }
}
