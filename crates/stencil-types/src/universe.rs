//! Member introspection for named types.
//!
//! Rust has no runtime reflection, so the fields and methods of every named
//! type a template touches are described up front in a `TypeUniverse`. This
//! is the lookup table the translator consults to resolve `.Field` and
//! `.Method` segments.

use rustc_hash::FxHashMap;

use crate::ty::{NamedRef, Signature, Ty};

/// A struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Ty,
}

/// A method callable on values of the type (or a pointer to it).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub sig: Signature,
}

/// The description of one named type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedDef {
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

impl NamedDef {
    pub fn new() -> Self {
        NamedDef::default()
    }

    pub fn field(mut self, name: impl Into<String>, ty: Ty) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn method(mut self, name: impl Into<String>, sig: Signature) -> Self {
        self.methods.push(Method {
            name: name.into(),
            sig,
        });
        self
    }

    pub fn lookup_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn lookup_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// What a member name resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind<'u> {
    Method(&'u Signature),
    Field(&'u Ty),
}

/// A resolved member, plus whether reaching it went through a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Member<'u> {
    pub kind: MemberKind<'u>,
    /// The receiver was `Ptr(Named)` and must be dereferenced first.
    pub through_pointer: bool,
}

/// The table of every named type known to a translation run.
#[derive(Clone, Debug, Default)]
pub struct TypeUniverse {
    named: FxHashMap<NamedRef, NamedDef>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        TypeUniverse::default()
    }

    /// Register (or replace) a named type.
    pub fn define(&mut self, named: NamedRef, def: NamedDef) -> &mut Self {
        self.named.insert(named, def);
        self
    }

    /// Add one method to an already registered type. Useful for types whose
    /// methods mention the type itself.
    pub fn add_method(&mut self, named: &NamedRef, name: impl Into<String>, sig: Signature) {
        let def = self.named.entry(named.clone()).or_default();
        def.methods.push(Method {
            name: name.into(),
            sig,
        });
    }

    pub fn get(&self, named: &NamedRef) -> Option<&NamedDef> {
        self.named.get(named)
    }

    pub fn contains(&self, named: &NamedRef) -> bool {
        self.named.contains_key(named)
    }

    /// Resolve `name` on a value of type `ty`.
    ///
    /// Methods win over fields. A pointer to a named type exposes the
    /// pointee's members. Every other kind has no members.
    pub fn lookup_member<'u>(&'u self, ty: &Ty, name: &str) -> Option<Member<'u>> {
        let (named, through_pointer) = match ty {
            Ty::Named(named) => (named, false),
            Ty::Ptr(inner) => match inner.as_ref() {
                Ty::Named(named) => (named, true),
                _ => return None,
            },
            _ => return None,
        };
        let def = self.named.get(named)?;
        if let Some(method) = def.lookup_method(name) {
            return Some(Member {
                kind: MemberKind::Method(&method.sig),
                through_pointer,
            });
        }
        def.lookup_field(name).map(|field| Member {
            kind: MemberKind::Field(&field.ty),
            through_pointer,
        })
    }
}
