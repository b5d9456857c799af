//! `print`, `println`, and `printf`.
//!
//! Output follows the template engine's formatting conventions rather than
//! Rust's: floats print in shortest form switching to `1e+06` style for
//! large and small magnitudes, and bad verbs render inline as
//! `%!d(string=x)` instead of failing.

use std::fmt::Write;

use crate::value::Value;

/// Shortest round-trip formatting of a float, `%v` style.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let sci = format!("{:e}", v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..6).contains(&exp) {
        return format!("{}", v);
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

/// Concatenate operands, adding a space between two operands when neither
/// is a string.
pub fn print(args: &[Value]) -> String {
    let mut out = String::new();
    let mut prev_string = false;
    for (i, arg) in args.iter().enumerate() {
        let is_string = matches!(arg, Value::Str(_));
        if i > 0 && !is_string && !prev_string {
            out.push(' ');
        }
        let _ = write!(out, "{}", arg);
        prev_string = is_string;
    }
    out
}

/// Operands separated by single spaces, followed by a newline.
pub fn println(args: &[Value]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", arg);
    }
    out.push('\n');
    out
}

#[derive(Default)]
struct Spec {
    minus: bool,
    plus: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Format `args` according to `format`.
///
/// Supported verbs: `%v %s %d %q %t %f %x %%`, with `-`, `+`, `0` flags,
/// width, and precision.
pub fn printf(format: &str, args: &[Value]) -> String {
    let mut out = String::new();
    let mut next = 0;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = digits(&mut chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(digits(&mut chars).unwrap_or(0));
        }
        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        let Some(arg) = args.get(next) else {
            let _ = write!(out, "%!{}(MISSING)", verb);
            continue;
        };
        next += 1;
        let text = format_verb(verb, arg, &spec);
        pad(&mut out, &text, &spec);
    }
    if next < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}={}", arg.type_name(), arg);
        }
        out.push(')');
    }
    out
}

fn digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    value
}

fn pad(out: &mut String, text: &str, spec: &Spec) {
    let len = text.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);
    if fill == 0 {
        out.push_str(text);
    } else if spec.minus {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.zero {
        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text),
        };
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(text);
    }
}

fn bad_verb(verb: char, arg: &Value) -> String {
    match arg {
        Value::Nil => format!("%!{}(<nil>)", verb),
        other => format!("%!{}({}={})", verb, other.type_name(), other),
    }
}

fn signed(value: String, spec: &Spec) -> String {
    if spec.plus && !value.starts_with('-') {
        format!("+{}", value)
    } else {
        value
    }
}

fn format_verb(verb: char, arg: &Value, spec: &Spec) -> String {
    match (verb, arg) {
        ('v', _) => arg.to_string(),
        ('s', Value::Str(s)) => match spec.precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.clone(),
        },
        ('s', Value::List(_) | Value::Map(_)) => arg.to_string(),
        ('d', Value::Int(i)) => signed(i.to_string(), spec),
        ('d', Value::Uint(u)) => signed(u.to_string(), spec),
        ('q', Value::Str(s)) => quote(s),
        ('q', Value::Int(i)) => match u32::try_from(*i).ok().and_then(char::from_u32) {
            Some(c) => format!("{:?}", c),
            None => bad_verb(verb, arg),
        },
        ('t', Value::Bool(b)) => b.to_string(),
        ('f' | 'F', Value::Float(x)) => {
            let p = spec.precision.unwrap_or(6);
            signed(format!("{:.*}", p, x), spec)
        }
        ('f' | 'F', Value::Complex(c)) => {
            let p = spec.precision.unwrap_or(6);
            format!("({:.*}{:+.*}i)", p, c.re, p, c.im)
        }
        ('x', Value::Int(i)) if *i < 0 => format!("-{:x}", i.unsigned_abs()),
        ('x', Value::Int(i)) => format!("{:x}", i),
        ('x', Value::Uint(u)) => format!("{:x}", u),
        ('x', Value::Str(s)) => s.bytes().map(|b| format!("{:02x}", b)).collect(),
        _ => bad_verb(verb, arg),
    }
}

/// Double-quoted with backslash escapes, the way `%q` renders strings.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::Str(v.to_string())
    }

    #[test]
    fn print_spaces_between_non_strings() {
        assert_eq!(print(&[Value::Int(1), Value::Int(2)]), "1 2");
        assert_eq!(print(&[s("a"), Value::Int(1), s("b")]), "a1b");
        assert_eq!(print(&[s("a"), s("b")]), "ab");
    }

    #[test]
    fn println_always_spaces() {
        assert_eq!(println(&[s("a"), s("b")]), "a b\n");
        assert_eq!(println(&[]), "\n");
    }

    #[test]
    fn printf_verbs() {
        assert_eq!(printf("%s=%d", &[s("n"), Value::Int(5)]), "n=5");
        assert_eq!(printf("%q", &[s("a\"b")]), "\"a\\\"b\"");
        assert_eq!(printf("%t %v", &[Value::Bool(true), Value::Nil]), "true <nil>");
        assert_eq!(printf("%.2f", &[Value::Float(3.14159)]), "3.14");
        assert_eq!(printf("%x %x", &[Value::Int(255), s("hi")]), "ff 6869");
        assert_eq!(printf("100%%", &[]), "100%");
    }

    #[test]
    fn printf_width_and_flags() {
        assert_eq!(printf("[%5d]", &[Value::Int(42)]), "[   42]");
        assert_eq!(printf("[%-5d]", &[Value::Int(42)]), "[42   ]");
        assert_eq!(printf("[%05d]", &[Value::Int(-42)]), "[-0042]");
        assert_eq!(printf("%+d", &[Value::Int(3)]), "+3");
    }

    #[test]
    fn printf_reports_mismatches_inline() {
        assert_eq!(printf("%d", &[s("x")]), "%!d(string=x)");
        assert_eq!(printf("%d %d", &[Value::Int(1)]), "1 %!d(MISSING)");
        assert_eq!(printf("%d", &[Value::Int(1), s("x")]), "1%!(EXTRA string=x)");
    }

    #[test]
    fn floats_switch_to_exponent_form() {
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(100000.0), "100000");
        assert_eq!(format_float(1000000.0), "1e+06");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
    }
}
