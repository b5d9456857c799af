//! End-to-end tests: translated templates are compiled against the runtime
//! crate and executed.
//!
//! Each test translates a template set into `src/views.rs` of a scratch
//! binary crate, builds and runs it with cargo, and checks what the entry
//! points wrote.

use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use stencil_ast::build::*;
use stencil_ast::TemplateSet;
use stencil_codegen::{translate, Instruction};
use stencil_types::{NamedDef, NamedRef, NumKind, Signature, Ty, TypeUniverse};

// ── Helpers ────────────────────────────────────────────────────────────

/// One entry point invocation: `views::<entry>(&mut out, <dot>)`.
struct Call {
    entry: &'static str,
    dot: &'static str,
}

fn runtime_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crate has a parent directory")
        .join("stencil-rt")
}

/// Build a scratch crate from the generated views and a model module, run
/// it, and return stdout. Each call prints one line: the entry's output, or
/// `error: <message>` when it returned `Err`.
fn compile_and_run(views: &str, model: &str, calls: &[Call]) -> String {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let project = temp_dir.path();
    let src = project.join("src");
    std::fs::create_dir_all(&src).expect("failed to create src dir");

    let manifest = format!(
        r#"[package]
name = "views-e2e"
version = "0.0.0"
edition = "2021"

[dependencies]
stencil-rt = {{ path = {:?} }}

[workspace]
"#,
        runtime_dir().display().to_string()
    );
    std::fs::write(project.join("Cargo.toml"), manifest).expect("failed to write Cargo.toml");

    let mut main = String::from(
        "#![allow(non_snake_case, dead_code)]\n\nmod model;\nmod views;\n\nfn main() {\n    stencil_rt::quiet_aborts();\n",
    );
    for call in calls {
        let _ = writeln!(
            main,
            r#"    {{
        let mut out: Vec<u8> = Vec::new();
        match views::{}(&mut out, {}) {{
            Ok(()) => println!("{{}}", String::from_utf8_lossy(&out)),
            Err(err) => println!("error: {{}}", err),
        }}
    }}"#,
            call.entry, call.dot
        );
    }
    main.push_str("}\n");
    std::fs::write(src.join("main.rs"), main).expect("failed to write main.rs");
    std::fs::write(src.join("model.rs"), model).expect("failed to write model.rs");
    std::fs::write(src.join("views.rs"), views).expect("failed to write views.rs");

    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let output = Command::new(cargo)
        .args(["run", "--quiet", "--offline"])
        .current_dir(project)
        .env("CARGO_TARGET_DIR", project.join("target"))
        .output()
        .expect("failed to invoke cargo");

    assert!(
        output.status.success(),
        "scratch crate failed:\nstderr: {}\n--- views.rs ---\n{}",
        String::from_utf8_lossy(&output.stderr),
        views
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn lines(stdout: &str) -> Vec<&str> {
    stdout.lines().collect()
}

const USER_MODEL: &str = r#"use std::io;

pub struct User {
    pub name: String,
    pub age: i64,
    pub tags: Vec<String>,
    pub friend: Option<Box<User>>,
}

impl User {
    pub fn Nickname(&self) -> Result<String, io::Error> {
        if self.name.is_empty() {
            Err(io::Error::new(io::ErrorKind::InvalidData, "no name"))
        } else {
            Ok(format!("{}y", self.name))
        }
    }

    pub fn Greet(&self, greeting: &str) -> String {
        format!("{}, {}", greeting, self.name)
    }
}

fn user(name: &str, age: i64, tags: &[&str], friend: Option<User>) -> User {
    User {
        name: name.to_string(),
        age,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        friend: friend.map(Box::new),
    }
}

pub fn alice() -> User {
    user("Al", 30, &["a", "b"], Some(user("Bo", 7, &[], None)))
}

pub fn loner() -> User {
    user("Cy", 41, &[], None)
}

pub fn nobody() -> User {
    user("", 0, &[], None)
}
"#;

fn user_ty() -> Ty {
    Ty::named("crate::model", "User")
}

fn user_universe() -> TypeUniverse {
    let mut universe = TypeUniverse::new();
    universe.define(
        NamedRef::new("crate::model", "User"),
        NamedDef::new()
            .field("name", Ty::Str)
            .field("age", Ty::int())
            .field("tags", Ty::slice(Ty::Str))
            .field("friend", Ty::ptr(user_ty()))
            .method(
                "Nickname",
                Signature::fallible(vec![], Ty::Str, Ty::named("std::io", "Error")),
            )
            .method("Greet", Signature::returning(vec![Ty::Str], Ty::Str)),
    );
    universe
}

// ── E2E Tests ──────────────────────────────────────────────────────────

#[test]
fn e2e_page_renders_and_aborts() {
    let mut set = TemplateSet::new();
    set.define(
        "page",
        list(vec![
            text("Hi "),
            action(single(vec![field(&["Nickname"])])),
            text(" "),
            action(single(vec![field(&["age"])])),
            text(" ["),
            range(
                single(vec![field(&["tags"])]).declaring(&["i", "t"]),
                list(vec![
                    action(single(vec![var("i", &[])])),
                    text("="),
                    action(single(vec![var("t", &[])])),
                    text(";"),
                ]),
                None,
            ),
            text("]"),
            with(
                single(vec![field(&["friend"])]),
                list(vec![text(" friend="), action(single(vec![field(&["name"])]))]),
                Some(list(vec![text(" alone")])),
            ),
            if_(
                single(vec![ident("eq"), field(&["age"]), int(30)]),
                list(vec![text(" thirty")]),
                Some(list(vec![text(" other")])),
            ),
            text(" "),
            action(single(vec![ident("printf"), string("%d%%"), field(&["age"])])),
            text(" "),
            action(single(vec![field(&["Greet"]), string("hi")])),
            template("footer", Some(single(vec![field(&["name"])]))),
        ]),
    )
    .define("footer", list(vec![text(" -- "), action(single(vec![dot()]))]))
    .define("friend_name", list(vec![action(single(vec![field(&["friend", "name"])]))]));

    let views = translate(
        set,
        &user_universe(),
        &[
            Instruction::new("page", "page", user_ty()),
            Instruction::new("friend_name", "friend_name", user_ty()),
        ],
    )
    .unwrap();

    let stdout = compile_and_run(
        &views,
        USER_MODEL,
        &[
            Call { entry: "page", dot: "&model::alice()" },
            Call { entry: "page", dot: "&model::loner()" },
            Call { entry: "page", dot: "&model::nobody()" },
            Call { entry: "friend_name", dot: "&model::alice()" },
            Call { entry: "friend_name", dot: "&model::loner()" },
        ],
    );
    let out = lines(&stdout);
    assert_eq!(out.len(), 5, "{}", stdout);
    assert_eq!(out[0], "Hi Aly 30 [0=a;1=b;] friend=Bo thirty 30% hi, Al -- Al");
    assert_eq!(out[1], "Hi Cyy 41 [] alone other 41% hi, Cy -- Cy");
    assert_eq!(out[2], "error: no name");
    assert_eq!(out[3], "Bo");
    assert!(out[4].starts_with("error: nil pointer evaluating"), "{}", out[4]);
}

#[test]
fn e2e_else_branch_variables_stay_inside() {
    let mut set = TemplateSet::new();
    set.define(
        "scoped",
        list(vec![
            if_(
                single(vec![boolean(false)]),
                list(vec![]),
                Some(list(vec![
                    action(single(vec![int(1)]).declaring(&["z"])),
                    action(single(vec![var("z", &[])])),
                ])),
            ),
            action(single(vec![string("after")]).declaring(&["z"])),
            action(single(vec![var("z", &[])])),
        ]),
    );
    let views = translate(
        set,
        &TypeUniverse::new(),
        &[Instruction::new("scoped", "scoped", Ty::Str)],
    )
    .unwrap();

    let stdout = compile_and_run(
        &views,
        "",
        &[Call { entry: "scoped", dot: "\"x\"" }],
    );
    assert_eq!(lines(&stdout), ["1after"]);
}

#[test]
fn e2e_numeric_constants_fit_narrow_parameters() {
    let calc_model = r#"pub struct Calc {
    pub base: i32,
}

impl Calc {
    pub fn Add(&self, n: i32) -> i64 {
        i64::from(self.base + n)
    }

    pub fn Scale(&self, factor: f32) -> f64 {
        f64::from(self.base as f32 * factor)
    }

    pub fn Shift(&self, by: u8) -> i64 {
        i64::from(by) + 1
    }

    pub fn Rotate(&self, c: stencil_rt::Complex128) -> f64 {
        c.re * 2.0
    }
}

pub fn ten() -> Calc {
    Calc { base: 10 }
}
"#;
    let calc = Ty::named("crate::model", "Calc");
    let mut universe = TypeUniverse::new();
    universe.define(
        NamedRef::new("crate::model", "Calc"),
        NamedDef::new()
            .field("base", Ty::Num(NumKind::I32))
            .method("Add", Signature::returning(vec![Ty::Num(NumKind::I32)], Ty::int()))
            .method("Scale", Signature::returning(vec![Ty::Num(NumKind::F32)], Ty::float()))
            .method("Shift", Signature::returning(vec![Ty::Num(NumKind::U8)], Ty::int()))
            .method("Rotate", Signature::returning(vec![Ty::complex()], Ty::float())),
    );

    let mut set = TemplateSet::new();
    set.define(
        "calc",
        list(vec![
            action(single(vec![field(&["Add"]), int(-7)])),
            text(" "),
            action(single(vec![field(&["Scale"]), int(2)])),
            text(" "),
            action(pipe(vec![cmd(vec![float(1.5)]), cmd(vec![field(&["Scale"])])])),
            text(" "),
            action(single(vec![field(&["Shift"]), uint(200)])),
            text(" "),
            action(single(vec![field(&["Rotate"]), int(3)])),
        ]),
    );
    let views = translate(set, &universe, &[Instruction::new("calc", "calc", calc)]).unwrap();

    let stdout = compile_and_run(
        &views,
        calc_model,
        &[Call { entry: "calc", dot: "&model::ten()" }],
    );
    assert_eq!(lines(&stdout), ["3 20 15 201 6"]);
}
