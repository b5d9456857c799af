//! Node translator: one template node to Rust statements.

use std::fmt::Write;

use stencil_ast::{BranchNode, List, Node, Pipe, TemplateSource};
use stencil_types::{Kind, Ty};
use tracing::debug;

use crate::error::{TranslateError, TranslateErrorKind};
use crate::expr::Expr;
use crate::truthiness::truth_test;
use crate::Translator;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Branch {
    If,
    With,
    Range,
}

impl<S: TemplateSource> Translator<'_, S> {
    pub(crate) fn list(&mut self, list: &List, dot: &Expr, out: &mut String) -> Result<(), TranslateError> {
        for node in &list.nodes {
            self.node(node, dot, out).map_err(|e| e.at(node.span()))?;
        }
        Ok(())
    }

    fn node(&mut self, node: &Node, dot: &Expr, out: &mut String) -> Result<(), TranslateError> {
        match node {
            Node::Text { text, .. } => {
                let _ = writeln!(out, "let _ = w.write_all({:?}.as_bytes());", text);
                Ok(())
            }
            Node::Action(pipe) => self.action(pipe, dot, out),
            Node::If(branch) => self.branch(Branch::If, branch, dot, out),
            Node::With(branch) => self.branch(Branch::With, branch, dot, out),
            Node::Range(branch) => self.branch(Branch::Range, branch, dot, out),
            Node::Template { name, pipe, .. } => {
                let (arg, ty) = match pipe {
                    Some(pipe) => {
                        let expr = self.pipeline(pipe, dot)?;
                        (expr.as_ref(), expr.ty)
                    }
                    None => ("&()".to_string(), Ty::NoValue),
                };
                let function = self.specialize(name, &ty)?;
                let _ = writeln!(out, "{}(w, {})?;", function, arg);
                Ok(())
            }
        }
    }

    fn action(&mut self, pipe: &Pipe, dot: &Expr, out: &mut String) -> Result<(), TranslateError> {
        match pipe.decl.as_slice() {
            [] => {
                let expr = self.pipeline(pipe, dot)?;
                self.write_value(&expr, out);
                Ok(())
            }
            [name] => {
                let reassign = self.scopes.in_current(name);
                let expr = self.pipeline(pipe, dot)?;
                let ident = self.var_ident(name);
                if reassign {
                    debug!(variable = %name, ty = %expr.ty, "reassigning variable");
                } else {
                    debug!(variable = %name, ty = %expr.ty, "declaring variable");
                }
                let _ = writeln!(out, "let {} = {};", ident, expr.as_ref());
                self.scopes.declare(name, expr.ty);
                Ok(())
            }
            names => Err(TranslateErrorKind::MalformedAssignment { count: names.len() }
                .into()),
        }
    }

    /// Emit the statement printing `expr`. Strings are written directly;
    /// other values go through `Display` or the runtime's `Value`.
    fn write_value(&mut self, expr: &Expr, out: &mut String) {
        match expr.ty.kind() {
            Kind::Str => {
                let _ = writeln!(out, "let _ = w.write_all({}.as_bytes());", expr.code);
            }
            Kind::Bool | Kind::Num(_) | Kind::Struct | Kind::Dynamic => {
                let _ = writeln!(out, "let _ = write!(w, \"{{}}\", {});", expr.code);
            }
            Kind::Slice | Kind::Array | Kind::Map | Kind::Ptr | Kind::NoValue => {
                let rt = self.rt();
                let _ = writeln!(
                    out,
                    "let _ = write!(w, \"{{}}\", {}::Value::from({}));",
                    rt,
                    expr.as_ref()
                );
            }
            Kind::Chan | Kind::Func => {
                let _ = writeln!(out, "let _ = write!(w, \"{{:p}}\", {});", expr.as_ref());
            }
        }
    }

    // ── if / with / range ──────────────────────────────────────────────

    fn branch(
        &mut self,
        kind: Branch,
        node: &BranchNode,
        dot: &Expr,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        let declared = node.pipe.decl.len();
        match kind {
            Branch::Range if declared > 2 => {
                return Err(TranslateErrorKind::TooManyRangeVariables { count: declared }.into())
            }
            Branch::If | Branch::With if declared > 1 => {
                return Err(TranslateErrorKind::TooManyDeclarations { count: declared }.into())
            }
            _ => {}
        }

        let value = self.pipeline(&node.pipe, dot)?;
        if kind == Branch::Range && !matches!(value.ty.kind(), Kind::Slice | Kind::Array | Kind::Chan) {
            return Err(TranslateErrorKind::NotIterable { ty: value.ty }.into());
        }
        let condition = truth_test(&value.ty)?;
        let eval = Expr::reference("eval", value.ty.clone());

        let _ = writeln!(out, "{{");
        let _ = writeln!(out, "let eval = {};", value.as_ref());
        let _ = writeln!(out, "if {} {{", condition);

        self.scopes.push();
        match kind {
            Branch::If => {
                self.bind(&node.pipe.decl, &eval, out);
                self.list(&node.list, dot, out)?;
            }
            Branch::With => {
                let _ = writeln!(out, "let dot = eval;");
                self.bind(&node.pipe.decl, &eval, out);
                self.list(&node.list, &Expr::reference("dot", value.ty.clone()), out)?;
            }
            Branch::Range => self.range_loop(&node.pipe.decl, &value.ty, &node.list, dot, out)?,
        }
        self.scopes.pop();

        let _ = writeln!(out, "}}");
        if let Some(else_list) = &node.else_list {
            let _ = writeln!(out, "else {{");
            self.scopes.push();
            self.list(else_list, dot, out)?;
            self.scopes.pop();
            let _ = writeln!(out, "}}");
        }
        let _ = writeln!(out, "}}");
        Ok(())
    }

    /// Bind the single variable an `if` or `with` may declare.
    fn bind(&mut self, decl: &[String], value: &Expr, out: &mut String) {
        if let Some(name) = decl.first() {
            let _ = writeln!(out, "let {} = {};", self.var_ident(name), value.as_ref());
            self.scopes.declare(name, value.ty.clone());
        }
    }

    fn range_loop(
        &mut self,
        decl: &[String],
        ty: &Ty,
        body: &List,
        dot: &Expr,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        let elem_ty = match ty.elem() {
            Some(elem) => elem.clone(),
            None => return Err(TranslateErrorKind::NotIterable { ty: ty.clone() }.into()),
        };
        // Receivers yield owned values; slices and arrays yield references.
        let elem = if ty.kind() == Kind::Chan { "&elem" } else { "elem" };

        match decl {
            [] | [_] => {
                let _ = writeln!(out, "for elem in eval.iter() {{");
                let _ = writeln!(out, "let dot = {};", elem);
                if let Some(name) = decl.first() {
                    let _ = writeln!(out, "let {} = {};", self.var_ident(name), elem);
                    self.scopes.declare(name, elem_ty.clone());
                }
                self.list(body, &Expr::reference("dot", elem_ty), out)?;
            }
            [index, name, ..] => {
                let _ = writeln!(out, "for (index, elem) in (0i64..).zip(eval.iter()) {{");
                let _ = writeln!(out, "let {} = &index;", self.var_ident(index));
                let _ = writeln!(out, "let {} = {};", self.var_ident(name), elem);
                self.scopes.declare(index, Ty::int());
                self.scopes.declare(name, elem_ty);
                self.list(body, dot, out)?;
            }
        }
        let _ = writeln!(out, "}}");
        Ok(())
    }
}
