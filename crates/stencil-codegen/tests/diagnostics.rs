//! Rendering located translation errors against template source.

use stencil_ast::build::*;
use stencil_ast::{Command, List, Node, Pipe, TemplateSet};
use stencil_codegen::{render_diagnostic, translate, DiagnosticOptions, Instruction};
use stencil_common::Span;
use stencil_types::{NamedDef, NamedRef, Ty, TypeUniverse};

// ── Helpers ────────────────────────────────────────────────────────────

fn opts() -> DiagnosticOptions {
    DiagnosticOptions::colorless()
}

fn universe() -> TypeUniverse {
    let mut universe = TypeUniverse::new();
    universe.define(
        NamedRef::new("app::model", "User"),
        NamedDef::new().field("name", Ty::Str),
    );
    universe
}

/// `Hi {{.nmae}}!` with spans as a parser would record them.
fn misspelled() -> (&'static str, List) {
    let source = "Hi {{.nmae}}!";
    let pipe = Pipe {
        decl: Vec::new(),
        cmds: vec![Command {
            args: vec![field(&["nmae"])],
            span: Span::new(5, 10),
        }],
        span: Span::new(5, 10),
    };
    let root = List {
        nodes: vec![
            Node::Text {
                text: "Hi ".to_string(),
                span: Span::new(0, 3),
            },
            Node::Action(pipe),
            Node::Text {
                text: "!".to_string(),
                span: Span::new(12, 13),
            },
        ],
        span: Span::new(0, 13),
    };
    (source, root)
}

// ── Diagnostic Tests ───────────────────────────────────────────────────

#[test]
fn unknown_member_points_at_the_command() {
    let (source, root) = misspelled();
    let mut set = TemplateSet::new();
    set.define("page", root);
    let err = translate(
        set,
        &universe(),
        &[Instruction::new("page", "page", Ty::named("app::model", "User"))],
    )
    .unwrap_err();
    assert_eq!(err.span, Some(Span::new(5, 10)));

    let out = render_diagnostic(&err, source, "page.tmpl", &opts());
    assert!(out.contains("[E0002]"), "{}", out);
    assert!(
        out.contains("unknown member nmae on type app::model::User"),
        "{}",
        out
    );
    assert!(out.contains("not a field or method of app::model::User"), "{}", out);
    assert!(out.contains("page.tmpl"), "{}", out);
    assert!(out.contains("{{.nmae}}"), "{}", out);
    assert!(!out.contains('\u{1b}'), "colorless output has escapes: {}", out);
}

#[test]
fn spans_past_the_end_are_clamped() {
    let mut set = TemplateSet::new();
    set.define(
        "page",
        List {
            nodes: vec![template("missing", None)],
            span: Span::default(),
        },
    );
    let mut err = translate(set, &universe(), &[Instruction::new("page", "page", Ty::Str)])
        .unwrap_err()
        .at(Span::new(40, 60));
    assert_eq!(err.span, Some(Span::new(40, 60)));
    err.template = Some("page".to_string());

    let out = render_diagnostic(&err, "{{template \"missing\"}}", "page.tmpl", &opts());
    assert!(out.contains("[E0001]"), "{}", out);
    assert!(out.contains("no template named \"missing\""), "{}", out);
}

#[test]
fn unlocated_errors_are_single_lines() {
    let mut set = TemplateSet::new();
    set.define("page", list(vec![text("x")]));
    let err = translate(set, &universe(), &[Instruction::new("rt", "page", Ty::Str)]).unwrap_err();
    insta::assert_snapshot!(
        render_diagnostic(&err, "x", "page.tmpl", &opts()),
        @r#"error[E0019]: invalid function name "rt": reserved for an import alias"#
    );
}
