//! Shared types for the stencil template compiler.
//!
//! - [`span`]: byte ranges into template source, used by diagnostics
//! - [`path`]: module locators for named types and functions

pub mod path;
pub mod span;

pub use path::ModulePath;
pub use span::Span;
