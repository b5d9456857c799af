//! Ariadne-based rendering of translation errors against template source.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::error::{TranslateError, TranslateErrorKind};

/// Rendering knobs.
#[derive(Clone, Debug)]
pub struct DiagnosticOptions {
    pub color: bool,
}

impl DiagnosticOptions {
    /// No ANSI escapes; used for snapshots.
    pub fn colorless() -> Self {
        DiagnosticOptions { color: false }
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions { color: true }
    }
}

// ── Error Codes ────────────────────────────────────────────────────────

fn error_code(kind: &TranslateErrorKind) -> &'static str {
    match kind {
        TranslateErrorKind::UnknownTemplate { .. } => "E0001",
        TranslateErrorKind::UnknownMember { .. } => "E0002",
        TranslateErrorKind::UnsupportedArity { .. } => "E0003",
        TranslateErrorKind::ArgumentCount { .. } => "E0004",
        TranslateErrorKind::NotAMethod { .. } => "E0005",
        TranslateErrorKind::TooManyRangeVariables { .. } => "E0006",
        TranslateErrorKind::TooManyDeclarations { .. } => "E0007",
        TranslateErrorKind::MalformedAssignment { .. } => "E0008",
        TranslateErrorKind::NotIterable { .. } => "E0009",
        TranslateErrorKind::UndefinedVariable { .. } => "E0010",
        TranslateErrorKind::UnknownFunction { .. } => "E0011",
        TranslateErrorKind::UndecidableTruth { .. } => "E0012",
        TranslateErrorKind::NilCommand => "E0013",
        TranslateErrorKind::NilArgument { .. } => "E0014",
        TranslateErrorKind::UnexpectedArguments { .. } => "E0015",
        TranslateErrorKind::CallVariable { .. } => "E0016",
        TranslateErrorKind::InlineAssignment => "E0017",
        TranslateErrorKind::EmptyPipeline => "E0018",
        TranslateErrorKind::InvalidEntryName { .. } => "E0019",
        TranslateErrorKind::DuplicateEntry { .. } => "E0020",
        TranslateErrorKind::Format { .. } => "E0021",
        TranslateErrorKind::ConstantMismatch { .. } => "E0022",
    }
}

/// A short note for the label, when something more specific than the
/// message can be said.
fn label_message(kind: &TranslateErrorKind) -> Option<String> {
    match kind {
        TranslateErrorKind::UnknownMember { ty, .. } => Some(format!("not a field or method of {}", ty)),
        TranslateErrorKind::UndefinedVariable { .. } => Some("not declared in any enclosing scope".to_string()),
        TranslateErrorKind::UnknownFunction { .. } => Some("not a builtin or custom function".to_string()),
        TranslateErrorKind::NotIterable { .. } => Some("expected a slice, array, or channel".to_string()),
        TranslateErrorKind::ArgumentCount { found, .. } => Some(format!("{} supplied here", found)),
        _ => None,
    }
}

/// Render `error` as a labeled diagnostic over `source`.
///
/// Errors without a location (entry-name and formatting errors, or errors
/// raised before any node was reached) render as a plain message.
pub fn render_diagnostic(
    error: &TranslateError,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    let Some(span) = error.span else {
        return format!("error[{}]: {}", error_code(&error.kind), error);
    };

    let source_len = source.len();
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        if s == e && e < source_len {
            s..e + 1
        } else if s == e {
            s.saturating_sub(1)..e
        } else {
            s..e
        }
    };
    let range = clamp(span.as_range());

    let mut builder = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_code(error_code(&error.kind))
        .with_message(error.to_string())
        .with_config(Config::default().with_color(options.color));
    let label = Label::new((filename, range))
        .with_message(label_message(&error.kind).unwrap_or_else(|| error.kind.to_string()))
        .with_color(Color::Red);
    builder.add_label(label);
    if let Some(template) = &error.template {
        builder.set_note(format!("while specializing template {:?}", template));
    }

    let mut buf = Vec::new();
    match builder
        .finish()
        .write((filename, Source::from(source)), &mut buf)
    {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => error.to_string(),
    }
}
