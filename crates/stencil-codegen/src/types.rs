//! `Ty` to Rust type mapping.
//!
//! The same descriptor renders differently depending on where it appears.
//! Behind a reference (the `dot` parameter of a specialization) unsized forms
//! are used; in value position (wrapper results, map values, vector elements)
//! owned forms are used.
//!
//! | Ty             | Borrowed               | Owned                  |
//! |----------------|------------------------|------------------------|
//! | NoValue        | `dyn any::Any`         | `()`                   |
//! | Str            | `str`                  | `String`               |
//! | Slice(T)       | `[T]`                  | `Vec<T>`               |
//! | Ptr(T)         | `Option<Box<T>>`       | `Option<Box<T>>`       |
//! | Array(N, T)    | `[T; N]`               | `[T; N]`               |
//! | Map(K, V)      | `collections::HashMap<K, V>` | same             |
//! | Chan(T)        | `mpsc::Receiver<T>`    | same                   |
//! | Named          | `alias::Name`          | same                   |
//! | Dynamic        | `rt::Value`            | same                   |
//!
//! Type arguments nested inside another type are always owned.

use std::fmt::Write;

use stencil_types::{NumKind, Signature, Ty};

use crate::imports::{self, ImportTable};

/// Where a rendered type appears.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Position {
    /// Behind `&`: unsized forms allowed.
    Borrowed,
    /// As a value.
    Owned,
}

/// Render `ty` as Rust source, importing whatever modules it mentions.
pub fn rust_type(ty: &Ty, position: Position, table: &mut ImportTable, next_id: &mut usize) -> String {
    match ty {
        Ty::NoValue => match position {
            Position::Borrowed => {
                let any = table.std(imports::ANY, next_id);
                format!("dyn {}::Any", any)
            }
            Position::Owned => "()".to_string(),
        },
        Ty::Bool => "bool".to_string(),
        Ty::Num(NumKind::Complex128) => {
            let rt = table.runtime(next_id);
            format!("{}::Complex128", rt)
        }
        Ty::Num(n) => n.primitive_name().unwrap_or("f64").to_string(),
        Ty::Str => match position {
            Position::Borrowed => "str".to_string(),
            Position::Owned => "String".to_string(),
        },
        Ty::Ptr(inner) => format!("Option<Box<{}>>", rust_type(inner, Position::Owned, table, next_id)),
        Ty::Slice(elem) => {
            let elem = rust_type(elem, Position::Owned, table, next_id);
            match position {
                Position::Borrowed => format!("[{}]", elem),
                Position::Owned => format!("Vec<{}>", elem),
            }
        }
        Ty::Array(len, elem) => format!("[{}; {}]", rust_type(elem, Position::Owned, table, next_id), len),
        Ty::Map(key, value) => {
            let collections = table.std(imports::COLLECTIONS, next_id);
            let key = rust_type(key, Position::Owned, table, next_id);
            let value = rust_type(value, Position::Owned, table, next_id);
            format!("{}::HashMap<{}, {}>", collections, key, value)
        }
        Ty::Chan(elem) => {
            let mpsc = table.std(imports::MPSC, next_id);
            format!("{}::Receiver<{}>", mpsc, rust_type(elem, Position::Owned, table, next_id))
        }
        Ty::Named(named) => {
            if named.module.as_str().is_empty() {
                named.name.clone()
            } else {
                let alias = table.import(&named.module, next_id);
                format!("{}::{}", alias, named.name)
            }
        }
        Ty::Func(sig) => fn_pointer(sig, table, next_id),
        Ty::Dynamic => {
            let rt = table.runtime(next_id);
            format!("{}::Value", rt)
        }
    }
}

fn fn_pointer(sig: &Signature, table: &mut ImportTable, next_id: &mut usize) -> String {
    let mut out = String::from("fn(");
    for (i, param) in sig.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&rust_type(param, Position::Owned, table, next_id));
    }
    if let Some(variadic) = &sig.variadic {
        if !sig.params.is_empty() {
            out.push_str(", ");
        }
        let _ = write!(out, "&[{}]", rust_type(variadic, Position::Owned, table, next_id));
    }
    out.push(')');
    match sig.results.as_slice() {
        [] => {}
        [value] => {
            let _ = write!(out, " -> {}", rust_type(value, Position::Owned, table, next_id));
        }
        [value, error, ..] => {
            let value = rust_type(value, Position::Owned, table, next_id);
            let error = rust_type(error, Position::Owned, table, next_id);
            let _ = write!(out, " -> Result<{}, {}>", value, error);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use stencil_common::ModulePath;

    use super::*;

    fn render(ty: &Ty, position: Position) -> (String, String) {
        let mut next = 0;
        let mut table = ImportTable::new(ModulePath::new("stencil_rt"));
        let code = rust_type(ty, position, &mut table, &mut next);
        (code, table.render())
    }

    #[test]
    fn strings_and_slices_depend_on_position() {
        assert_eq!(render(&Ty::Str, Position::Borrowed).0, "str");
        assert_eq!(render(&Ty::Str, Position::Owned).0, "String");
        assert_eq!(render(&Ty::slice(Ty::Str), Position::Borrowed).0, "[String]");
        assert_eq!(render(&Ty::slice(Ty::Str), Position::Owned).0, "Vec<String>");
    }

    #[test]
    fn no_value_is_any_behind_a_reference() {
        let (code, imports) = render(&Ty::NoValue, Position::Borrowed);
        assert_eq!(code, "dyn any::Any");
        assert_eq!(imports, "use std::any;\n");
        assert_eq!(render(&Ty::NoValue, Position::Owned).0, "()");
    }

    #[test]
    fn named_types_import_their_module() {
        let (code, imports) = render(&Ty::ptr(Ty::named("app::model", "User")), Position::Borrowed);
        assert_eq!(code, "Option<Box<pkg0::User>>");
        assert_eq!(imports, "use app::model as pkg0;\n");
    }

    #[test]
    fn named_types_without_a_module_stay_bare() {
        let (code, imports) = render(&Ty::named("", "Local"), Position::Owned);
        assert_eq!(code, "Local");
        assert!(imports.is_empty());
    }

    #[test]
    fn containers_nest_owned_forms() {
        let (code, _) = render(&Ty::map(Ty::Str, Ty::slice(Ty::Dynamic)), Position::Borrowed);
        assert_eq!(code, "collections::HashMap<String, Vec<rt::Value>>");
        let (code, _) = render(&Ty::chan(Ty::complex()), Position::Borrowed);
        assert_eq!(code, "mpsc::Receiver<rt::Complex128>");
        assert_eq!(render(&Ty::array(3, Ty::uint()), Position::Borrowed).0, "[u64; 3]");
    }

    #[test]
    fn functions_render_as_pointers() {
        let sig = Signature::fallible(vec![Ty::Str], Ty::int(), Ty::named("stencil_rt", "Error"))
            .with_variadic(Ty::Dynamic);
        let (code, _) = render(&Ty::func(sig), Position::Owned);
        assert_eq!(code, "fn(String, &[rt::Value]) -> Result<i64, rt::Error>");
    }
}
