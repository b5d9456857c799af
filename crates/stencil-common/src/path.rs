use std::fmt;

use serde::Serialize;

/// A Rust module locator such as `std::io` or `app::model`.
///
/// Named types and callable functions are owned by a module; the output
/// assembler imports each distinct module once under a unique alias.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModulePath(String);

impl ModulePath {
    pub fn new(path: impl Into<String>) -> Self {
        ModulePath(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last `::`-separated segment (`io` for `std::io`).
    pub fn last_segment(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModulePath {
    fn from(path: &str) -> Self {
        ModulePath::new(path)
    }
}
