use stencil_types::{Kind, Ty};

use crate::error::TranslateErrorKind;

/// The condition testing whether `eval`, a reference to a value of type
/// `ty`, is truthy.
pub(crate) fn truth_test(ty: &Ty) -> Result<&'static str, TranslateErrorKind> {
    Ok(match ty.kind() {
        Kind::NoValue => "!eval.is::<()>()",
        Kind::Str | Kind::Slice | Kind::Array | Kind::Map => "!eval.is_empty()",
        Kind::Ptr => "eval.is_some()",
        // Receivers are never null, and struct values are always present.
        Kind::Chan | Kind::Struct => "true",
        Kind::Num(n) if n.is_complex() => "!eval.is_zero()",
        Kind::Num(n) if n.is_float() => "*eval != 0.0",
        Kind::Num(_) => "*eval != 0",
        Kind::Bool => "*eval",
        Kind::Dynamic => "eval.truth()",
        Kind::Func => return Err(TranslateErrorKind::UndecidableTruth { ty: ty.clone() }),
    })
}

#[cfg(test)]
mod tests {
    use stencil_types::Signature;

    use super::*;

    #[test]
    fn emptiness_kinds() {
        for ty in [
            Ty::Str,
            Ty::slice(Ty::int()),
            Ty::array(2, Ty::Bool),
            Ty::map(Ty::Str, Ty::Str),
        ] {
            assert_eq!(truth_test(&ty), Ok("!eval.is_empty()"), "{}", ty);
        }
    }

    #[test]
    fn numeric_kinds() {
        assert_eq!(truth_test(&Ty::int()), Ok("*eval != 0"));
        assert_eq!(truth_test(&Ty::uint()), Ok("*eval != 0"));
        assert_eq!(truth_test(&Ty::float()), Ok("*eval != 0.0"));
        assert_eq!(truth_test(&Ty::complex()), Ok("!eval.is_zero()"));
    }

    #[test]
    fn remaining_kinds() {
        assert_eq!(truth_test(&Ty::NoValue), Ok("!eval.is::<()>()"));
        assert_eq!(truth_test(&Ty::ptr(Ty::Str)), Ok("eval.is_some()"));
        assert_eq!(truth_test(&Ty::chan(Ty::Str)), Ok("true"));
        assert_eq!(truth_test(&Ty::named("app", "Page")), Ok("true"));
        assert_eq!(truth_test(&Ty::Bool), Ok("*eval"));
        assert_eq!(truth_test(&Ty::Dynamic), Ok("eval.truth()"));
    }

    #[test]
    fn functions_have_no_truth() {
        let ty = Ty::func(Signature::returning(vec![], Ty::Str));
        assert_eq!(
            truth_test(&ty),
            Err(TranslateErrorKind::UndecidableTruth { ty: ty.clone() })
        );
    }
}
