//! Specialization cache.
//!
//! Each (template, dot type) pair becomes exactly one generated function.
//! The cache entry is recorded before the body is translated, so a template
//! that invokes itself with the same dot type resolves to the function being
//! generated instead of recursing forever.

use std::fmt::Write;

use stencil_ast::TemplateSource;
use stencil_types::Ty;
use tracing::debug;

use crate::error::{TranslateError, TranslateErrorKind};
use crate::expr::Expr;
use crate::imports;
use crate::scope::Scopes;
use crate::types::Position;
use crate::Translator;

impl<S: TemplateSource> Translator<'_, S> {
    /// The function rendering template `name` for dot values of type `dot`,
    /// generating it on first request.
    pub(crate) fn specialize(&mut self, name: &str, dot: &Ty) -> Result<String, TranslateError> {
        let def = self.source.lookup(name).map_err(|err| TranslateErrorKind::UnknownTemplate {
            name: name.to_string(),
            message: err.to_string(),
        })?;

        let key = (def.name.clone(), dot.clone());
        if let Some(existing) = self.specializations.get(&key) {
            debug!(template = %def.name, dot = %dot, function = %existing, "specialization cache hit");
            return Ok(existing.clone());
        }

        let function = format!("fun{}", self.fresh_id());
        debug!(
            template = %def.name,
            dot = %dot,
            function = %function,
            caller = self.templates.last().map(String::as_str).unwrap_or("<entry>"),
            "specializing"
        );
        self.specializations.insert(key.clone(), function.clone());

        let outer_scopes = std::mem::replace(&mut self.scopes, Scopes::new());
        self.templates.push(def.name.clone());
        let result = self.specialization(&function, &def.name, &def.root, dot);
        self.templates.pop();
        self.scopes = outer_scopes;

        match result {
            Ok(code) => {
                self.generated.push(code);
                Ok(function)
            }
            Err(err) => {
                self.specializations.remove(&key);
                Err(err.in_template(&def.name))
            }
        }
    }

    fn specialization(
        &mut self,
        function: &str,
        template: &str,
        root: &stencil_ast::List,
        dot: &Ty,
    ) -> Result<String, TranslateError> {
        let io = self.std_module(imports::IO);
        let rt = self.rt();
        let dot_type = self.rust_type(dot, Position::Borrowed);

        let mut body = String::new();
        self.list(root, &Expr::reference("dot", dot.clone()), &mut body)?;

        let mut code = String::new();
        let _ = writeln!(code, "/// {}({})", template.replace('\n', " "), dot);
        let _ = writeln!(code, "#[allow(unused_variables)]");
        let _ = writeln!(
            code,
            "fn {}(w: &mut dyn {}::Write, dot: &{}) -> Result<(), {}::Error> {{",
            function, io, dot_type, rt
        );
        code.push_str(&body);
        code.push_str("Ok(())\n}\n");
        Ok(code)
    }
}
