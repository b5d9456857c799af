//! Runtime library for code generated by stencil.
//!
//! Generated template functions import this crate (as `rt`) for:
//!
//! - [`error`]: the `Error` type entry points return, the `Abort` panic
//!   payload used by error-wrapper helpers, `quiet_aborts` to keep those
//!   panics off stderr, and `deref` for nullable pointers
//! - [`value`]: the dynamically typed `Value` builtins operate on
//! - [`funcs`]: `and`, `or`, `not`, comparisons, `index`, `len`, `call`
//! - [`print`]: `print`, `println`, `printf`
//! - [`escape`]: `html`, `js`, `urlquery`, and the contextual escapers

pub mod error;
pub mod escape;
pub mod funcs;
pub mod print;
pub mod value;

pub use error::{deref, quiet_aborts, Abort, Error};
pub use escape::{
    attr_escaper, comment_escaper, css_escaper, css_value_filter, html, html_escaper,
    html_name_filter, html_nospace_escaper, js, js_regexp_escaper, js_str_escaper,
    js_val_escaper, rcdata_escaper, url_escaper, url_filter, url_normalizer, urlquery,
};
pub use funcs::{and, call, eq, ge, gt, index, le, len, lt, ne, not, or};
pub use print::{print, printf, println};
pub use value::{Complex128, Func, ToValue, Value};

