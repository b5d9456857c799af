//! Entry wrappers and output assembly.

use std::fmt::Write;

use rustc_hash::FxHashSet;
use stencil_ast::TemplateSource;
use tracing::{debug, info_span};

use crate::error::{TranslateError, TranslateErrorKind};
use crate::imports::{self, RESERVED_ALIASES};
use crate::types::Position;
use crate::{Instruction, Translator};

/// Whether `name` has the shape of an internal name such as `fun12`.
fn is_numbered(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn validate_entry_name(name: &str) -> Result<(), TranslateErrorKind> {
    let reason = if syn::parse_str::<syn::Ident>(name).is_err() {
        "not a Rust identifier"
    } else if is_numbered(name, "fun") || is_numbered(name, "pkg") {
        "reserved for generated functions"
    } else if RESERVED_ALIASES.contains(&name) {
        "reserved for an import alias"
    } else {
        return Ok(());
    };
    Err(TranslateErrorKind::InvalidEntryName {
        name: name.to_string(),
        reason,
    })
}

/// Parse the assembled text and pretty-print it.
fn format_source(raw: String) -> Result<String, TranslateError> {
    match syn::parse_file(&raw) {
        Ok(file) => Ok(prettyplease::unparse(&file)),
        Err(err) => Err(TranslateErrorKind::Format {
            message: err.to_string(),
            source: raw,
        }
        .into()),
    }
}

impl<S: TemplateSource> Translator<'_, S> {
    /// Translate every instruction into one Rust source file.
    ///
    /// Instructions share the specialization and wrapper caches, so a
    /// template exported twice for the same dot type is generated once.
    pub fn translate(mut self, instructions: &[Instruction]) -> Result<String, TranslateError> {
        let span = info_span!(
            "translate",
            package = %self.config.package,
            instructions = instructions.len()
        );
        let _enter = span.enter();

        let mut seen = FxHashSet::default();
        let mut entries = Vec::with_capacity(instructions.len());
        for instruction in instructions {
            let _instruction = info_span!(
                "instruction",
                function = %instruction.function_name,
                template = %instruction.template_name,
                dot = %instruction.dot
            )
            .entered();

            validate_entry_name(&instruction.function_name)?;
            if !seen.insert(instruction.function_name.as_str()) {
                return Err(TranslateErrorKind::DuplicateEntry {
                    name: instruction.function_name.clone(),
                }
                .into());
            }
            let function = self.specialize(&instruction.template_name, &instruction.dot)?;
            entries.push(self.entry(instruction, &function));
        }

        let raw = self.render(&entries);
        debug!(
            functions = self.generated.len(),
            specializations = self.specializations.len(),
            wrappers = self.wrappers.len(),
            "assembled output"
        );
        format_source(raw)
    }

    fn entry(&mut self, instruction: &Instruction, function: &str) -> String {
        let io = self.std_module(imports::IO);
        let panic = self.std_module(imports::PANIC);
        let rt = self.rt();
        let dot_type = self.rust_type(&instruction.dot, Position::Borrowed);

        let mut code = String::new();
        let _ = writeln!(
            code,
            "pub fn {}(w: &mut dyn {}::Write, dot: &{}) -> Result<(), {}::Error> {{",
            instruction.function_name, io, dot_type, rt
        );
        let _ = writeln!(
            code,
            "match {panic}::catch_unwind({panic}::AssertUnwindSafe(|| {function}(w, dot))) {{"
        );
        let _ = writeln!(code, "Ok(result) => result,");
        let _ = writeln!(code, "Err(payload) => match payload.downcast::<{rt}::Abort>() {{");
        let _ = writeln!(code, "Ok(abort) => Err(abort.into_error()),");
        let _ = writeln!(code, "Err(payload) => {panic}::resume_unwind(payload),");
        code.push_str("},\n}\n}\n");
        code
    }

    fn render(&self, entries: &[String]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "//! Package `{}`", self.config.package);
        let _ = writeln!(out, "//!");
        let _ = writeln!(out, "//! Code generated by stencil. DO NOT EDIT.");
        out.push('\n');
        out.push_str(&self.imports.render());
        for code in entries.iter().chain(&self.generated) {
            out.push('\n');
            out.push_str(code);
        }
        out
    }
}
