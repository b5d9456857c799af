//! Escaping builtins.
//!
//! `html`, `js`, and `urlquery` are the plain template functions. The
//! `*_escaper` and `*_filter` functions are the contextual set an escaping
//! rewrite injects, one per markup context. Filters replace unsafe input with
//! the sentinel `ZgotmplZ` instead of escaping it.

use std::borrow::Cow;
use std::fmt::Write;

use crate::print::print;
use crate::value::Value;

/// Substituted for values a filter rejects.
pub const FILTER_FAILSAFE: &str = "ZgotmplZ";

/// A single string operand is used as is; anything else prints like `print`.
fn stringify(args: &[Value]) -> Cow<'_, str> {
    match args {
        [Value::Str(s)] => Cow::Borrowed(s.as_str()),
        _ => Cow::Owned(print(args)),
    }
}

fn replace_with(s: &str, table: impl Fn(char) -> Option<&'static str>) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match table(c) {
            Some(rep) => out.push_str(rep),
            None => out.push(c),
        }
    }
    out
}

fn html_entity(c: char) -> Option<&'static str> {
    Some(match c {
        '\0' => "\u{FFFD}",
        '"' => "&#34;",
        '\'' => "&#39;",
        '&' => "&amp;",
        '<' => "&lt;",
        '>' => "&gt;",
        _ => return None,
    })
}

fn html_attr_entity(c: char) -> Option<&'static str> {
    match c {
        '+' => Some("&#43;"),
        c => html_entity(c),
    }
}

fn html_nospace_entity(c: char) -> Option<&'static str> {
    Some(match c {
        '\0' => "&#xfffd;",
        '\t' => "&#9;",
        '\n' => "&#10;",
        '\u{0B}' => "&#11;",
        '\u{0C}' => "&#12;",
        '\r' => "&#13;",
        ' ' => "&#32;",
        '=' => "&#61;",
        '`' => "&#96;",
        c => return html_attr_entity(c),
    })
}

/// HTML-escape the textual form of the operands.
pub fn html(args: &[Value]) -> String {
    replace_with(&stringify(args), html_entity)
}

/// JavaScript-escape the textual form of the operands.
pub fn js(args: &[Value]) -> String {
    let s = stringify(args);
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '<' => out.push_str("\\u003C"),
            '>' => out.push_str("\\u003E"),
            '&' => out.push_str("\\u0026"),
            '=' => out.push_str("\\u003D"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

/// Query-escape the textual form of the operands.
pub fn urlquery(args: &[Value]) -> String {
    let s = stringify(args);
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b' ' => out.push('+'),
            b if is_unreserved(b) => out.push(b as char),
            b => {
                let _ = write!(out, "%{:02X}", b);
            }
        }
    }
    out
}

pub fn html_escaper(args: &[Value]) -> String {
    replace_with(&stringify(args), html_attr_entity)
}

pub fn attr_escaper(args: &[Value]) -> String {
    replace_with(&stringify(args), html_attr_entity)
}

pub fn rcdata_escaper(args: &[Value]) -> String {
    replace_with(&stringify(args), html_attr_entity)
}

/// Escapes for an unquoted attribute value, where whitespace ends the value.
pub fn html_nospace_escaper(args: &[Value]) -> String {
    let s = stringify(args);
    if s.is_empty() {
        return FILTER_FAILSAFE.to_string();
    }
    replace_with(&s, html_nospace_entity)
}

/// Content inside HTML comments is dropped entirely.
pub fn comment_escaper(_args: &[Value]) -> String {
    String::new()
}

/// Accepts only plain alphanumeric attribute and element names.
pub fn html_name_filter(args: &[Value]) -> String {
    let s = stringify(args).to_ascii_lowercase();
    let risky = s.starts_with("on")
        || matches!(
            s.as_str(),
            "style" | "href" | "src" | "srcset" | "action" | "formaction" | "xmlns"
        );
    if s.is_empty() || risky || !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return FILTER_FAILSAFE.to_string();
    }
    s
}

fn css_escape(c: char) -> Option<&'static str> {
    Some(match c {
        '\0' => "\\0",
        '\t' => "\\9",
        '\n' => "\\a",
        '\u{0C}' => "\\c",
        '\r' => "\\d",
        '"' => "\\22",
        '&' => "\\26",
        '\'' => "\\27",
        '(' => "\\28",
        ')' => "\\29",
        '+' => "\\2b",
        '/' => "\\2f",
        ':' => "\\3a",
        ';' => "\\3b",
        '<' => "\\3c",
        '>' => "\\3e",
        '\\' => "\\\\",
        '{' => "\\7b",
        '}' => "\\7d",
        _ => return None,
    })
}

/// Escapes for CSS strings and identifiers.
pub fn css_escaper(args: &[Value]) -> String {
    let s = stringify(args);
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match css_escape(c) {
            Some(rep) => {
                out.push_str(rep);
                // A hex escape swallows a following hex digit or space.
                let hex_escape = rep != "\\\\";
                if hex_escape {
                    if let Some(&next) = chars.peek() {
                        if next.is_ascii_hexdigit() || next == ' ' {
                            out.push(' ');
                        }
                    }
                }
            }
            None => out.push(c),
        }
    }
    out
}

/// Passes CSS values that cannot break out of a property value.
pub fn css_value_filter(args: &[Value]) -> String {
    let s = stringify(args);
    let lower = s.to_ascii_lowercase();
    let forbidden = s.chars().any(|c| {
        matches!(
            c,
            '\0' | '"' | '\'' | '(' | ')' | '/' | ';' | '@' | '[' | '\\' | ']' | '`' | '{' | '}'
        )
    });
    if forbidden
        || lower.contains("<!--")
        || lower.contains("-->")
        || lower.contains("expression")
        || lower.contains("mozbinding")
    {
        return FILTER_FAILSAFE.to_string();
    }
    s.into_owned()
}

fn js_str_escape(c: char) -> Option<&'static str> {
    Some(match c {
        '\0' => "\\u0000",
        '\t' => "\\t",
        '\n' => "\\n",
        '\u{0B}' => "\\u000b",
        '\u{0C}' => "\\f",
        '\r' => "\\r",
        '"' => "\\u0022",
        '&' => "\\u0026",
        '\'' => "\\u0027",
        '+' => "\\u002b",
        '/' => "\\/",
        '<' => "\\u003c",
        '>' => "\\u003e",
        '\\' => "\\\\",
        '`' => "\\u0060",
        '\u{2028}' => "\\u2028",
        '\u{2029}' => "\\u2029",
        _ => return None,
    })
}

fn js_escape_into(out: &mut String, s: &str, table: fn(char) -> Option<&'static str>) {
    for c in s.chars() {
        match table(c) {
            Some(rep) => out.push_str(rep),
            None if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            None => out.push(c),
        }
    }
}

/// Escapes for the inside of a quoted JavaScript string.
pub fn js_str_escaper(args: &[Value]) -> String {
    let s = stringify(args);
    let mut out = String::with_capacity(s.len());
    js_escape_into(&mut out, &s, js_str_escape);
    out
}

fn js_regexp_escape(c: char) -> Option<&'static str> {
    Some(match c {
        '$' => "\\$",
        '(' => "\\(",
        ')' => "\\)",
        '*' => "\\*",
        '-' => "\\-",
        '.' => "\\.",
        '?' => "\\?",
        '[' => "\\[",
        ']' => "\\]",
        '^' => "\\^",
        '{' => "\\{",
        '|' => "\\|",
        '}' => "\\}",
        c => return js_str_escape(c),
    })
}

/// Escapes for the inside of a JavaScript regular expression literal.
pub fn js_regexp_escaper(args: &[Value]) -> String {
    let s = stringify(args);
    let mut out = String::with_capacity(s.len());
    js_escape_into(&mut out, &s, js_regexp_escape);
    if out.is_empty() {
        return "(?:)".to_string();
    }
    out
}

fn js_value(out: &mut String, value: &Value) {
    match value {
        Value::Nil | Value::Func(_) => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        Value::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::Uint(u) => {
            let _ = write!(out, "{}", u);
        }
        Value::Float(x) if x.is_finite() => {
            let _ = write!(out, "{}", x);
        }
        Value::Float(_) => out.push_str("null"),
        Value::Complex(_) => out.push_str("null"),
        Value::Str(s) => {
            out.push('"');
            js_escape_into(out, s, js_str_escape);
            out.push('"');
        }
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                js_value(out, item);
            }
            out.push(']');
        }
        Value::Map(entries) => {
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('"');
                js_escape_into(out, key, js_str_escape);
                out.push_str("\":");
                js_value(out, item);
            }
            out.push('}');
        }
    }
}

/// Renders operands as a JavaScript expression. Output starting or ending
/// in an identifier character is padded with spaces so it cannot merge with
/// surrounding tokens.
pub fn js_val_escaper(args: &[Value]) -> String {
    let mut body = String::new();
    match args {
        [single] => js_value(&mut body, single),
        many => js_value(&mut body, &Value::List(many.to_vec())),
    }
    let ident_part = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if ident_part(body.chars().next()) || ident_part(body.chars().last()) {
        format!(" {} ", body)
    } else {
        body
    }
}

fn url_process(s: &str, normalize: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        let keep = is_unreserved(b)
            || (normalize
                && matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'&'
                        | b'*'
                        | b'+'
                        | b','
                        | b'/'
                        | b':'
                        | b';'
                        | b'='
                        | b'?'
                        | b'@'
                        | b'['
                        | b']'
                        | b'%'
                        | b'\''
                        | b'('
                        | b')'
                ));
        if keep {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{:02x}", b);
        }
    }
    out
}

/// Percent-encodes everything but unreserved characters, for URL parts.
pub fn url_escaper(args: &[Value]) -> String {
    url_process(&stringify(args), false)
}

/// Percent-encodes characters that may not appear in a URL, leaving
/// reserved delimiters intact.
pub fn url_normalizer(args: &[Value]) -> String {
    url_process(&stringify(args), true)
}

/// Rejects URLs whose scheme is not `http`, `https`, or `mailto`.
pub fn url_filter(args: &[Value]) -> String {
    let s = stringify(args);
    if let Some(colon) = s.find(':') {
        if !s[..colon].contains('/') {
            let scheme = s[..colon].to_ascii_lowercase();
            if !matches!(scheme.as_str(), "http" | "https" | "mailto") {
                return format!("#{}", FILTER_FAILSAFE);
            }
        }
    }
    s.into_owned()
}
