//! Function registries.
//!
//! Identifiers in a pipeline (`{{ len .Items }}`) resolve against two
//! tables: the caller's custom [`FuncTable`] first, then the [`Builtins`]
//! registry. Builtins are implemented by the runtime crate; custom functions
//! live in whatever module the caller names.

use rustc_hash::FxHashMap;

use stencil_common::ModulePath;
use stencil_types::{NamedRef, Signature, Ty};

/// A builtin implemented in the runtime crate.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltinDef {
    /// The function's name inside the runtime crate.
    pub ident: String,
    pub signature: Signature,
}

/// The registry of builtin functions, keyed by template name.
///
/// Constructed once and shared between translators; nothing mutates it
/// during translation.
#[derive(Clone, Debug, Default)]
pub struct Builtins {
    funcs: FxHashMap<String, BuiltinDef>,
}

/// Result type of fallible builtins. Only its presence matters: the error
/// half of a `Result` is never rendered.
fn runtime_error() -> Ty {
    Ty::Named(NamedRef::new("stencil_rt", "Error"))
}

impl Builtins {
    /// An empty registry.
    pub fn new() -> Self {
        Builtins::default()
    }

    /// The standard set: logic, comparison, indexing, printing, and the
    /// escaping functions.
    pub fn standard() -> Self {
        let any = || Ty::Dynamic;
        let mut b = Builtins::new();

        // ── Logic ──────────────────────────────────────────────────────
        b.register("and", "and", Signature::returning(vec![any()], any()).with_variadic(any()));
        b.register("or", "or", Signature::returning(vec![any()], any()).with_variadic(any()));
        b.register("not", "not", Signature::returning(vec![any()], Ty::Bool));

        // ── Comparison ─────────────────────────────────────────────────
        b.register(
            "eq",
            "eq",
            Signature::fallible(vec![any()], Ty::Bool, runtime_error()).with_variadic(any()),
        );
        for name in ["ne", "lt", "le", "gt", "ge"] {
            b.register(
                name,
                name,
                Signature::fallible(vec![any(), any()], Ty::Bool, runtime_error()),
            );
        }

        // ── Containers ─────────────────────────────────────────────────
        b.register(
            "index",
            "index",
            Signature::fallible(vec![any()], any(), runtime_error()).with_variadic(any()),
        );
        b.register(
            "len",
            "len",
            Signature::fallible(vec![any()], Ty::int(), runtime_error()),
        );
        b.register(
            "call",
            "call",
            Signature::fallible(vec![any()], any(), runtime_error()).with_variadic(any()),
        );

        // ── Printing ───────────────────────────────────────────────────
        b.register("print", "print", Signature::returning(vec![], Ty::Str).with_variadic(any()));
        b.register("println", "println", Signature::returning(vec![], Ty::Str).with_variadic(any()));
        b.register(
            "printf",
            "printf",
            Signature::returning(vec![Ty::Str], Ty::Str).with_variadic(any()),
        );

        // ── Escaping ───────────────────────────────────────────────────
        for (name, ident) in [
            ("html", "html"),
            ("js", "js"),
            ("urlquery", "urlquery"),
            ("_html_template_attrescaper", "attr_escaper"),
            ("_html_template_commentescaper", "comment_escaper"),
            ("_html_template_cssescaper", "css_escaper"),
            ("_html_template_cssvaluefilter", "css_value_filter"),
            ("_html_template_htmlnamefilter", "html_name_filter"),
            ("_html_template_htmlescaper", "html_escaper"),
            ("_html_template_jsregexpescaper", "js_regexp_escaper"),
            ("_html_template_jsstrescaper", "js_str_escaper"),
            ("_html_template_jsvalescaper", "js_val_escaper"),
            ("_html_template_nospaceescaper", "html_nospace_escaper"),
            ("_html_template_rcdataescaper", "rcdata_escaper"),
            ("_html_template_urlescaper", "url_escaper"),
            ("_html_template_urlfilter", "url_filter"),
            ("_html_template_urlnormalizer", "url_normalizer"),
        ] {
            b.register(name, ident, Signature::returning(vec![], Ty::Str).with_variadic(any()));
        }

        b
    }

    /// Add or replace a builtin.
    pub fn register(&mut self, name: &str, ident: &str, signature: Signature) {
        self.funcs.insert(
            name.to_string(),
            BuiltinDef {
                ident: ident.to_string(),
                signature,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinDef> {
        self.funcs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// A caller-supplied function: `module::ident` with the given signature.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    pub module: ModulePath,
    pub ident: String,
    pub signature: Signature,
}

/// Custom functions, consulted before the builtins so callers can override
/// them.
#[derive(Clone, Debug, Default)]
pub struct FuncTable {
    funcs: FxHashMap<String, FuncDef>,
}

impl FuncTable {
    pub fn new() -> Self {
        FuncTable::default()
    }

    pub fn define(
        &mut self,
        name: &str,
        module: impl Into<String>,
        ident: &str,
        signature: Signature,
    ) -> &mut Self {
        self.funcs.insert(
            name.to_string(),
            FuncDef {
                module: ModulePath::new(module),
                ident: ident.to_string(),
                signature,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&FuncDef> {
        self.funcs.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_template_builtins() {
        let builtins = Builtins::standard();
        for name in [
            "and", "or", "not", "eq", "ne", "lt", "le", "gt", "ge", "index", "len", "call",
            "html", "js", "urlquery", "print", "printf", "println",
        ] {
            assert!(builtins.contains(name), "missing builtin {}", name);
        }
        assert_eq!(builtins.names().iter().filter(|n| n.starts_with("_html_template_")).count(), 14);
    }

    #[test]
    fn fallible_builtins_have_two_results() {
        let builtins = Builtins::standard();
        assert_eq!(builtins.get("eq").unwrap().signature.arity(), 2);
        assert_eq!(builtins.get("len").unwrap().signature.value_type(), Some(&Ty::int()));
        assert_eq!(builtins.get("html").unwrap().signature.arity(), 1);
    }

    #[test]
    fn escaper_names_map_to_runtime_functions() {
        let builtins = Builtins::standard();
        assert_eq!(
            builtins.get("_html_template_nospaceescaper").unwrap().ident,
            "html_nospace_escaper"
        );
    }
}
