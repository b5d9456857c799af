//! The import table of one generated file.
//!
//! Every module the output refers to (the standard library modules the
//! generated code uses, the runtime crate, and the modules of named types and
//! custom functions) is imported once under an alias. Well-known modules get
//! fixed aliases; anything else gets `pkg<N>` from the run's shared id
//! counter, so aliases never collide with each other or with `fun<N>`.

use std::fmt::Write;

use rustc_hash::FxHashMap;
use stencil_common::ModulePath;
use tracing::debug;

pub const IO: &str = "std::io";
pub const PANIC: &str = "std::panic";
pub const ANY: &str = "std::any";
pub const COLLECTIONS: &str = "std::collections";
pub const MPSC: &str = "std::sync::mpsc";

/// Aliases that cannot be used as exported function names.
pub const RESERVED_ALIASES: &[&str] = &["io", "fmt", "panic", "any", "collections", "mpsc", "rt"];

pub struct ImportTable {
    runtime: ModulePath,
    aliases: FxHashMap<ModulePath, String>,
}

impl ImportTable {
    pub fn new(runtime: ModulePath) -> Self {
        ImportTable {
            runtime,
            aliases: FxHashMap::default(),
        }
    }

    fn well_known(&self, path: &ModulePath) -> Option<&'static str> {
        if *path == self.runtime {
            return Some("rt");
        }
        Some(match path.as_str() {
            "std::io" => "io",
            "std::fmt" => "fmt",
            "std::panic" => "panic",
            "std::any" => "any",
            "std::collections" => "collections",
            "std::sync::mpsc" => "mpsc",
            _ => return None,
        })
    }

    /// The alias for `path`, importing it on first use.
    pub fn import(&mut self, path: &ModulePath, next_id: &mut usize) -> String {
        if let Some(alias) = self.aliases.get(path) {
            return alias.clone();
        }
        let alias = match self.well_known(path) {
            Some(alias) => alias.to_string(),
            None => {
                let alias = format!("pkg{}", next_id);
                *next_id += 1;
                alias
            }
        };
        debug!(module = %path, alias = %alias, "import");
        self.aliases.insert(path.clone(), alias.clone());
        alias
    }

    /// Import the runtime crate; always aliased `rt`.
    pub fn runtime(&mut self, next_id: &mut usize) -> String {
        let runtime = self.runtime.clone();
        self.import(&runtime, next_id)
    }

    pub fn std(&mut self, path: &str, next_id: &mut usize) -> String {
        self.import(&ModulePath::new(path), next_id)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.aliases.contains_key(&ModulePath::new(path))
    }

    /// `use` lines in module-path order.
    pub fn render(&self) -> String {
        let mut entries: Vec<(&ModulePath, &String)> = self.aliases.iter().collect();
        entries.sort();
        let mut out = String::new();
        for (path, alias) in entries {
            if path.last_segment() == alias {
                let _ = writeln!(out, "use {};", path);
            } else {
                let _ = writeln!(out, "use {} as {};", path, alias);
            }
        }
        out
    }
}
