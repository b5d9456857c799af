//! Type descriptors for the stencil template compiler.
//!
//! - [`ty`]: the `Ty` descriptor, its `Kind`, numeric variants, and callable
//!   `Signature`s
//! - [`universe`]: the `TypeUniverse` introspection table for named types

pub mod ty;
pub mod universe;

pub use ty::{Kind, NamedRef, NumKind, Signature, Ty};
pub use universe::{Field, Member, MemberKind, Method, NamedDef, TypeUniverse};
