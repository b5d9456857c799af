//! Specializing template-to-Rust translator.
//!
//! Takes a [`TemplateSource`], a [`TypeUniverse`] describing the named types
//! templates may touch, and a list of [`Instruction`]s naming which
//! templates to export for which dot types. Produces one formatted Rust
//! source file in which every (template, dot type) pair reachable from the
//! instructions is specialized exactly once.
//!
//! ## Pipeline
//!
//! 1. Each instruction's template is specialized ([`mono`]), which
//!    translates its tree node by node ([`node`]), evaluating pipelines
//!    with static types ([`expr`])
//! 2. Methods and functions returning `Result` are routed through per-type
//!    error wrappers ([`wrapper`])
//! 3. The entries, imports, and generated functions are assembled and
//!    pretty-printed ([`assemble`])

pub mod builtins;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod imports;
pub mod scope;
pub mod types;

mod assemble;
mod expr;
mod mono;
mod node;
mod truthiness;
mod wrapper;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use stencil_ast::TemplateSource;
use stencil_common::ModulePath;
use stencil_types::{Ty, TypeUniverse};

pub use builtins::{BuiltinDef, Builtins, FuncDef, FuncTable};
pub use config::{Config, ConfigError};
pub use diagnostics::{render_diagnostic, DiagnosticOptions};
pub use error::{TranslateError, TranslateErrorKind};

use crate::imports::ImportTable;
use crate::scope::Scopes;
use crate::types::Position;

/// One exported function: render `template_name` for values of type `dot`
/// under the public name `function_name`.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub function_name: String,
    pub template_name: String,
    pub dot: Ty,
}

impl Instruction {
    pub fn new(function_name: impl Into<String>, template_name: impl Into<String>, dot: Ty) -> Self {
        Instruction {
            function_name: function_name.into(),
            template_name: template_name.into(),
            dot,
        }
    }
}

/// The state of one translation run.
///
/// A translator is consumed by [`Translator::translate`]; the caches, the
/// import table, and the id counter all belong to the one output file it
/// produces.
pub struct Translator<'a, S: TemplateSource> {
    source: S,
    universe: &'a TypeUniverse,
    builtins: Arc<Builtins>,
    funcs: FuncTable,
    config: Config,

    /// Shared by specialization names, wrapper names, and import aliases.
    next_id: usize,
    imports: ImportTable,
    scopes: Scopes,
    /// (template name, dot type) -> function name.
    specializations: FxHashMap<(String, Ty), String>,
    /// Result value type -> wrapper name.
    wrappers: FxHashMap<Ty, String>,
    /// Generated functions and helpers, in first-generated order.
    generated: Vec<String>,
    /// Templates being specialized, innermost last.
    templates: Vec<String>,
}

impl<'a, S: TemplateSource> Translator<'a, S> {
    /// A translator with the standard builtins and the default config.
    pub fn new(source: S, universe: &'a TypeUniverse) -> Self {
        let config = Config::default();
        Translator {
            source,
            universe,
            builtins: Arc::new(Builtins::standard()),
            funcs: FuncTable::new(),
            imports: ImportTable::new(ModulePath::new(config.runtime_crate.as_str())),
            config,
            next_id: 0,
            scopes: Scopes::new(),
            specializations: FxHashMap::default(),
            wrappers: FxHashMap::default(),
            generated: Vec::new(),
            templates: Vec::new(),
        }
    }

    pub fn with_builtins(mut self, builtins: Arc<Builtins>) -> Self {
        self.builtins = builtins;
        self
    }

    /// Custom functions, consulted before the builtins.
    pub fn with_funcs(mut self, funcs: FuncTable) -> Self {
        self.funcs = funcs;
        self
    }

    /// Replace the config after validating it.
    pub fn with_config(mut self, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        self.imports = ImportTable::new(ModulePath::new(config.runtime_crate.as_str()));
        self.config = config;
        Ok(self)
    }

    // ── Shared helpers ─────────────────────────────────────────────────

    fn fresh_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The runtime crate's alias, importing it on first use.
    fn rt(&mut self) -> String {
        self.imports.runtime(&mut self.next_id)
    }

    fn std_module(&mut self, path: &str) -> String {
        self.imports.std(path, &mut self.next_id)
    }

    fn import(&mut self, module: &ModulePath) -> String {
        self.imports.import(module, &mut self.next_id)
    }

    fn rust_type(&mut self, ty: &Ty, position: Position) -> String {
        types::rust_type(ty, position, &mut self.imports, &mut self.next_id)
    }

    /// The Rust identifier bound to template variable `$name`.
    fn var_ident(&self, name: &str) -> String {
        format!("{}{}", self.config.var_prefix, name)
    }
}

/// Translate `instructions` with the standard builtins and default config.
pub fn translate<S: TemplateSource>(
    source: S,
    universe: &TypeUniverse,
    instructions: &[Instruction],
) -> Result<String, TranslateError> {
    Translator::new(source, universe).translate(instructions)
}
