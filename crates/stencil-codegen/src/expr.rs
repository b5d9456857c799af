//! Expression evaluator.
//!
//! Pipelines are evaluated statically: every command yields an [`Expr`], a
//! snippet of Rust together with the type of the value it produces. Nothing
//! is executed; the snippets are spliced into the statements the node
//! translator emits.

use stencil_ast::{Arg, Command, Number, NumberValue, Pipe, TemplateSource};
use stencil_types::{MemberKind, NumKind, Signature, Ty};

use crate::error::{TranslateError, TranslateErrorKind};
use crate::Translator;

/// Rust code producing a value of type `ty`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Expr {
    pub code: String,
    pub ty: Ty,
    /// `code` already evaluates to a reference (`dot`, a variable, `eval`,
    /// a string literal) rather than to a place or a temporary.
    pub by_ref: bool,
    /// The numeric literal `code` was rendered from. Such a constant takes
    /// on the type of whatever numeric parameter it is passed to.
    pub constant: Option<Number>,
}

impl Expr {
    pub fn reference(code: impl Into<String>, ty: Ty) -> Self {
        Expr {
            code: code.into(),
            ty,
            by_ref: true,
            constant: None,
        }
    }

    pub fn value(code: impl Into<String>, ty: Ty) -> Self {
        Expr {
            code: code.into(),
            ty,
            by_ref: false,
            constant: None,
        }
    }

    fn constant(code: String, ty: Ty, number: &Number) -> Self {
        Expr {
            constant: Some(number.clone()),
            ..Expr::value(code, ty)
        }
    }

    /// The code as a reference.
    pub fn as_ref(&self) -> String {
        if self.by_ref {
            self.code.clone()
        } else {
            format!("&{}", self.code)
        }
    }

    /// The code as a value; only meaningful for `Copy` types.
    pub fn as_value(&self) -> String {
        if self.by_ref {
            format!("*{}", self.code)
        } else {
            self.code.clone()
        }
    }
}

/// Rust literal for a float, including the non-finite values that have no
/// literal form.
fn float_literal(v: f64) -> String {
    typed_float(v, "f64")
}

fn typed_float(v: f64, ty: &str) -> String {
    if v.is_nan() {
        format!("{}::NAN", ty)
    } else if v == f64::INFINITY {
        format!("{}::INFINITY", ty)
    } else if v == f64::NEG_INFINITY {
        format!("{}::NEG_INFINITY", ty)
    } else {
        format!("{:?}{}", v, ty)
    }
}

/// The exact integer a constant denotes, if any.
fn integral(value: &NumberValue) -> Option<i128> {
    match *value {
        NumberValue::Int(v) => Some(v.into()),
        NumberValue::Uint(v) => Some(v.into()),
        NumberValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e20 => {
            Some(v as i128)
        }
        NumberValue::Float(_) | NumberValue::Complex(..) => None,
    }
}

fn fits(v: i128, kind: NumKind) -> bool {
    match kind {
        NumKind::I8 => i8::try_from(v).is_ok(),
        NumKind::I16 => i16::try_from(v).is_ok(),
        NumKind::I32 => i32::try_from(v).is_ok(),
        NumKind::I64 => i64::try_from(v).is_ok(),
        NumKind::Isize => isize::try_from(v).is_ok(),
        NumKind::U8 => u8::try_from(v).is_ok(),
        NumKind::U16 => u16::try_from(v).is_ok(),
        NumKind::U32 => u32::try_from(v).is_ok(),
        NumKind::U64 => u64::try_from(v).is_ok(),
        NumKind::Usize => usize::try_from(v).is_ok(),
        NumKind::F32 | NumKind::F64 | NumKind::Complex128 => true,
    }
}

impl<S: TemplateSource> Translator<'_, S> {
    // ── Pipelines ──────────────────────────────────────────────────────

    /// Evaluate a pipeline, ignoring any declaration it carries. Each
    /// command's result is piped into the next as its final argument.
    pub(crate) fn pipeline(&mut self, pipe: &Pipe, dot: &Expr) -> Result<Expr, TranslateError> {
        let mut piped: Option<Expr> = None;
        for cmd in &pipe.cmds {
            let result = self.command(cmd, piped.take(), dot).map_err(|e| e.at(cmd.span))?;
            piped = Some(result);
        }
        piped.ok_or_else(|| TranslateError::new(TranslateErrorKind::EmptyPipeline).at(pipe.span))
    }

    fn command(
        &mut self,
        cmd: &Command,
        piped: Option<Expr>,
        dot: &Expr,
    ) -> Result<Expr, TranslateError> {
        let Some((first, args)) = cmd.args.split_first() else {
            return Err(TranslateErrorKind::EmptyPipeline.into());
        };
        match first {
            Arg::Field(fields) => self.chain(dot.clone(), fields, args, piped, dot),
            Arg::Chain { node, fields } => {
                let base = self.operand(node, dot)?;
                self.chain(base, fields, args, piped, dot)
            }
            Arg::Identifier(name) => self.call_function(name, args, piped, dot),
            Arg::Pipe(inner) => {
                if !inner.decl.is_empty() {
                    return Err(TranslateErrorKind::InlineAssignment.into());
                }
                no_arguments(first, args, &piped)?;
                self.pipeline(inner, dot)
            }
            Arg::Variable { name, fields } => {
                let base = self.variable(name)?;
                if fields.is_empty() {
                    no_arguments(first, args, &piped)?;
                    return Ok(base);
                }
                if !args.is_empty() || piped.is_some() {
                    return Err(TranslateErrorKind::CallVariable { name: name.clone() }.into());
                }
                self.chain(base, fields, &[], None, dot)
            }
            Arg::Nil => Err(TranslateErrorKind::NilCommand.into()),
            literal => {
                no_arguments(first, args, &piped)?;
                self.literal(literal, dot)
            }
        }
    }

    /// Evaluate an argument or chain base: like a command, but with no
    /// arguments of its own.
    fn operand(&mut self, arg: &Arg, dot: &Expr) -> Result<Expr, TranslateError> {
        match arg {
            Arg::Field(fields) => self.chain(dot.clone(), fields, &[], None, dot),
            Arg::Chain { node, fields } => {
                let base = self.operand(node, dot)?;
                self.chain(base, fields, &[], None, dot)
            }
            Arg::Identifier(name) => self.call_function(name, &[], None, dot),
            Arg::Pipe(inner) => {
                if !inner.decl.is_empty() {
                    return Err(TranslateErrorKind::InlineAssignment.into());
                }
                self.pipeline(inner, dot).map_err(|e| e.at(inner.span))
            }
            Arg::Variable { name, fields } => {
                let base = self.variable(name)?;
                if fields.is_empty() {
                    Ok(base)
                } else {
                    self.chain(base, fields, &[], None, dot)
                }
            }
            Arg::Nil => Err(TranslateErrorKind::NilCommand.into()),
            literal => self.literal(literal, dot),
        }
    }

    fn variable(&self, name: &str) -> Result<Expr, TranslateError> {
        match self.scopes.lookup(name) {
            Some(ty) => Ok(Expr::reference(self.var_ident(name), ty.clone())),
            None => Err(TranslateErrorKind::UndefinedVariable {
                name: name.to_string(),
            }
            .into()),
        }
    }

    fn literal(&mut self, arg: &Arg, dot: &Expr) -> Result<Expr, TranslateError> {
        Ok(match arg {
            Arg::Bool(b) => Expr::value(b.to_string(), Ty::Bool),
            Arg::String(s) => Expr::reference(format!("{:?}", s), Ty::Str),
            Arg::Dot => dot.clone(),
            Arg::Number(number) => match number.value {
                NumberValue::Int(v) => Expr::constant(format!("{}i64", v), Ty::int(), number),
                NumberValue::Uint(v) => Expr::constant(format!("{}u64", v), Ty::uint(), number),
                NumberValue::Float(v) => Expr::constant(float_literal(v), Ty::float(), number),
                NumberValue::Complex(re, im) => {
                    let code = self.complex_literal(re, im);
                    Expr::constant(code, Ty::complex(), number)
                }
            },
            other => {
                return Err(TranslateErrorKind::UnexpectedArguments {
                    operand: other.to_string(),
                }
                .into())
            }
        })
    }

    // ── Chains ─────────────────────────────────────────────────────────

    /// Resolve `.A.B.C` on `base`. Only the last segment receives `args`
    /// and the piped value.
    fn chain(
        &mut self,
        base: Expr,
        fields: &[String],
        args: &[Arg],
        mut piped: Option<Expr>,
        dot: &Expr,
    ) -> Result<Expr, TranslateError> {
        let universe = self.universe;
        let mut current = base;
        for (i, name) in fields.iter().enumerate() {
            let last = i + 1 == fields.len();
            let member = universe.lookup_member(&current.ty, name).ok_or_else(|| {
                TranslateErrorKind::UnknownMember {
                    name: name.clone(),
                    ty: current.ty.clone(),
                }
            })?;
            let receiver = if member.through_pointer {
                let rt = self.rt();
                format!("{}::deref({})", rt, current.as_ref())
            } else {
                current.code.clone()
            };
            current = match member.kind {
                MemberKind::Field(ty) => {
                    if last && (!args.is_empty() || piped.is_some()) {
                        return Err(TranslateErrorKind::NotAMethod { name: name.clone() }.into());
                    }
                    Expr::value(format!("{}.{}", receiver, name), ty.clone())
                }
                MemberKind::Method(sig) => {
                    let callee = format!("{}.{}", receiver, name);
                    if last {
                        self.invoke(name, callee, sig, args, piped.take(), dot)?
                    } else {
                        self.invoke(name, callee, sig, &[], None, dot)?
                    }
                }
            };
        }
        Ok(current)
    }

    // ── Calls ──────────────────────────────────────────────────────────

    fn call_function(
        &mut self,
        name: &str,
        args: &[Arg],
        piped: Option<Expr>,
        dot: &Expr,
    ) -> Result<Expr, TranslateError> {
        let (callee, sig) = if let Some(def) = self.funcs.get(name).cloned() {
            let alias = self.import(&def.module);
            (format!("{}::{}", alias, def.ident), def.signature)
        } else if let Some(def) = self.builtins.get(name).cloned() {
            let rt = self.rt();
            (format!("{}::{}", rt, def.ident), def.signature)
        } else {
            return Err(TranslateErrorKind::UnknownFunction {
                name: name.to_string(),
            }
            .into());
        };
        self.invoke(name, callee, &sig, args, piped, dot)
    }

    /// Emit `callee(args)`, wrapping it when the signature returns a
    /// `Result`.
    fn invoke(
        &mut self,
        name: &str,
        callee: String,
        sig: &Signature,
        args: &[Arg],
        piped: Option<Expr>,
        dot: &Expr,
    ) -> Result<Expr, TranslateError> {
        let value_ty = match (sig.arity(), sig.value_type()) {
            (1 | 2, Some(ty)) => ty.clone(),
            (arity, _) => {
                return Err(TranslateErrorKind::UnsupportedArity {
                    name: name.to_string(),
                    arity,
                }
                .into())
            }
        };

        let found = args.len() + usize::from(piped.is_some());
        if !sig.accepts(found) {
            return Err(TranslateErrorKind::ArgumentCount {
                name: name.to_string(),
                expected: sig.params.len(),
                variadic: sig.variadic.is_some(),
                found,
            }
            .into());
        }

        let mut rendered = Vec::with_capacity(found);
        for (i, arg) in args.iter().enumerate() {
            let param = sig.param(i).cloned().unwrap_or(Ty::Dynamic);
            rendered.push(self.argument(arg, &param, dot)?);
        }
        if let Some(piped) = piped {
            let param = sig.param(args.len()).cloned().unwrap_or(Ty::Dynamic);
            rendered.push(self.pass(&piped, &param)?);
        }

        let fixed = sig.params.len().min(rendered.len());
        let mut list = rendered[..fixed].join(", ");
        if sig.variadic.is_some() {
            if !list.is_empty() {
                list.push_str(", ");
            }
            list.push_str(&format!("&[{}]", rendered[fixed..].join(", ")));
        }

        let call = format!("{}({})", callee, list);
        if sig.arity() == 2 {
            let wrapper = self.wrapper_for(&value_ty);
            Ok(Expr::value(format!("{}({})", wrapper, call), value_ty))
        } else {
            Ok(Expr::value(call, value_ty))
        }
    }

    fn argument(&mut self, arg: &Arg, param: &Ty, dot: &Expr) -> Result<String, TranslateError> {
        if let Arg::Nil = arg {
            return match param {
                Ty::Dynamic => {
                    let rt = self.rt();
                    Ok(format!("{}::Value::Nil", rt))
                }
                Ty::Ptr(_) => Ok("&None".to_string()),
                Ty::NoValue => Ok("&()".to_string()),
                other => Err(TranslateErrorKind::NilArgument { ty: other.clone() }.into()),
            };
        }
        let expr = self.operand(arg, dot)?;
        self.pass(&expr, param)
    }

    /// Render `expr` for a parameter of type `param`.
    fn pass(&mut self, expr: &Expr, param: &Ty) -> Result<String, TranslateError> {
        if let (Some(number), Ty::Num(kind)) = (&expr.constant, param) {
            return self.retyped_constant(number, *kind);
        }
        Ok(match param {
            Ty::Dynamic => {
                let rt = self.rt();
                format!("{}::Value::from({})", rt, expr.as_ref())
            }
            _ if param.is_scalar() => expr.as_value(),
            _ => expr.as_ref(),
        })
    }

    /// Render a numeric literal as a constant of `kind`.
    fn retyped_constant(&mut self, number: &Number, kind: NumKind) -> Result<String, TranslateError> {
        let mismatch = || TranslateErrorKind::ConstantMismatch {
            constant: number.text.clone(),
            ty: Ty::Num(kind),
        };
        let value = &number.value;
        match kind {
            NumKind::Complex128 => {
                let (re, im) = match *value {
                    NumberValue::Int(v) => (v as f64, 0.0),
                    NumberValue::Uint(v) => (v as f64, 0.0),
                    NumberValue::Float(v) => (v, 0.0),
                    NumberValue::Complex(re, im) => (re, im),
                };
                Ok(self.complex_literal(re, im))
            }
            NumKind::F32 | NumKind::F64 => {
                let v = match *value {
                    NumberValue::Int(v) => v as f64,
                    NumberValue::Uint(v) => v as f64,
                    NumberValue::Float(v) => v,
                    NumberValue::Complex(..) => return Err(mismatch().into()),
                };
                if kind == NumKind::F32 && v.is_finite() && (v as f32).is_infinite() {
                    return Err(mismatch().into());
                }
                let suffix = if kind == NumKind::F32 { "f32" } else { "f64" };
                Ok(typed_float(v, suffix))
            }
            _ => match (integral(value), kind.primitive_name()) {
                (Some(v), Some(suffix)) if fits(v, kind) => Ok(format!("{}{}", v, suffix)),
                _ => Err(mismatch().into()),
            },
        }
    }

    fn complex_literal(&mut self, re: f64, im: f64) -> String {
        let rt = self.rt();
        format!(
            "{}::Complex128::new({}, {})",
            rt,
            float_literal(re),
            float_literal(im)
        )
    }
}

fn no_arguments(operand: &Arg, args: &[Arg], piped: &Option<Expr>) -> Result<(), TranslateError> {
    if args.is_empty() && piped.is_none() {
        Ok(())
    } else {
        Err(TranslateErrorKind::UnexpectedArguments {
            operand: operand.to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_forms() {
        let dot = Expr::reference("dot", Ty::int());
        assert_eq!(dot.as_ref(), "dot");
        assert_eq!(dot.as_value(), "*dot");
        let field = Expr::value("dot.age", Ty::int());
        assert_eq!(field.as_ref(), "&dot.age");
        assert_eq!(field.as_value(), "dot.age");
    }

    #[test]
    fn float_literals() {
        assert_eq!(float_literal(1.0), "1.0f64");
        assert_eq!(float_literal(-2.5), "-2.5f64");
        assert_eq!(float_literal(1e300), "1e300f64");
        assert_eq!(float_literal(f64::INFINITY), "f64::INFINITY");
        assert_eq!(float_literal(f64::NAN), "f64::NAN");
    }

    #[test]
    fn constants_fit_by_exact_value() {
        assert_eq!(integral(&NumberValue::Float(3.0)), Some(3));
        assert_eq!(integral(&NumberValue::Float(3.5)), None);
        assert_eq!(integral(&NumberValue::Complex(1.0, 0.0)), None);
        assert!(fits(255, NumKind::U8));
        assert!(!fits(256, NumKind::U8));
        assert!(!fits(-1, NumKind::Usize));
        assert!(fits(-128, NumKind::I8));
        assert_eq!(typed_float(2.0, "f32"), "2.0f32");
        assert_eq!(typed_float(f64::NEG_INFINITY, "f32"), "f32::NEG_INFINITY");
    }
}
