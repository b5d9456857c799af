//! Error-wrapper cache.
//!
//! A method or function returning `Result<T, E>` is called through a helper
//! that unwraps the value or aborts rendering with the error. The helper is
//! generic over `E` and so depends only on `T`; one is emitted per distinct
//! value type.

use std::fmt::Write;

use stencil_ast::TemplateSource;
use stencil_types::Ty;
use tracing::debug;

use crate::imports;
use crate::types::Position;
use crate::Translator;

impl<S: TemplateSource> Translator<'_, S> {
    /// The helper unwrapping `Result<ty, _>`, generating it on first use.
    pub(crate) fn wrapper_for(&mut self, ty: &Ty) -> String {
        if let Some(existing) = self.wrappers.get(ty) {
            return existing.clone();
        }

        let name = format!("fun{}", self.fresh_id());
        let value = self.rust_type(ty, Position::Owned);
        let rt = self.rt();
        let panic = self.std_module(imports::PANIC);

        let mut code = String::new();
        let _ = writeln!(
            code,
            "fn {}<E: Into<{}::Error>>(result: Result<{}, E>) -> {} {{",
            name, rt, value, value
        );
        let _ = writeln!(code, "match result {{");
        let _ = writeln!(code, "Ok(value) => value,");
        let _ = writeln!(
            code,
            "Err(err) => {}::panic_any({}::Abort::new(err.into())),",
            panic, rt
        );
        code.push_str("}\n}\n");

        debug!(ty = %ty, wrapper = %name, "error wrapper");
        self.generated.push(code);
        self.wrappers.insert(ty.clone(), name.clone());
        name
    }
}
