//! Translator configuration.
//!
//! Usually embedded in a build script, but also loadable from a TOML
//! table:
//!
//! ```toml
//! package = "views"
//! runtime_crate = "stencil_rt"
//! var_prefix = "_var_"
//! ```

use std::fmt;

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Named in the generated file's header.
    pub package: String,
    /// Path of the runtime crate as seen from the generated file. Imported
    /// as `rt`.
    pub runtime_crate: String,
    /// Prepended to template variable names to form Rust identifiers. Must
    /// contain an underscore: no name the translator generates does, so
    /// prefixed variables never collide with them.
    pub var_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            package: "templates".to_string(),
            runtime_crate: "stencil_rt".to_string(),
            var_prefix: "_var_".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    Invalid { field: &'static str, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "failed to parse config: {}", err),
            ConfigError::Invalid { field, message } => write!(f, "invalid {}: {}", field, message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl Config {
    /// Parse and validate a config. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.package.is_empty() || self.package.contains('\n') {
            return Err(ConfigError::Invalid {
                field: "package",
                message: format!("{:?} must be a non-empty single line", self.package),
            });
        }
        if syn::parse_str::<syn::Path>(&self.runtime_crate).is_err() {
            return Err(ConfigError::Invalid {
                field: "runtime_crate",
                message: format!("{:?} is not a Rust path", self.runtime_crate),
            });
        }
        if syn::parse_str::<syn::Ident>(&format!("{}x", self.var_prefix)).is_err() {
            return Err(ConfigError::Invalid {
                field: "var_prefix",
                message: format!("{:?} does not start a Rust identifier", self.var_prefix),
            });
        }
        if !self.var_prefix.contains('_') {
            return Err(ConfigError::Invalid {
                field: "var_prefix",
                message: format!(
                    "{:?} contains no underscore and could collide with generated names",
                    self.var_prefix
                ),
            });
        }
        Ok(())
    }
}
