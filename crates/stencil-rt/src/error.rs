//! Failure types shared by generated code and the builtin functions.
//!
//! Generated entry points return `Result<(), Error>`. Inside a single
//! expression a fallible accessor cannot use `?`, so its failure is raised
//! as a panic carrying an [`Abort`] and caught again at the entry point.

use std::fmt;
use std::panic;
use std::sync::Once;

/// A boxed failure cause.
///
/// `Error` does not implement `std::error::Error` itself, so any type that
/// does converts into it with `?` or `.into()`.
pub struct Error {
    inner: Box<dyn std::error::Error + Send + Sync + 'static>,
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Message {}

impl Error {
    /// An error carrying only a message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Error {
            inner: Box::new(Message(message.to_string())),
        }
    }

    /// The underlying cause.
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// Unwrap into the boxed cause, for callers that need a real
    /// `std::error::Error`.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.inner
    }
}

impl<E> From<E> for Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Error {
            inner: Box::new(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// The panic payload raised by generated error-wrapper helpers.
///
/// Entry points convert a caught `Abort` into their returned `Err`; every
/// other payload is resumed untouched. The panic hook still runs before the
/// entry point catches it, so unless [`quiet_aborts`] was called each failed
/// render prints a `panicked at` line to stderr.
#[derive(Debug)]
pub struct Abort(Error);

impl Abort {
    pub fn new(err: Error) -> Self {
        Abort(err)
    }

    pub fn error(&self) -> &Error {
        &self.0
    }

    pub fn into_error(self) -> Error {
        self.0
    }
}

/// Install a panic hook that stays silent for [`Abort`] payloads and hands
/// every other panic to the hook that was installed before it. Only the
/// first call has an effect.
pub fn quiet_aborts() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<Abort>().is_none() {
                previous(info);
            }
        }));
    });
}

/// Dereference a nullable pointer in generated code.
///
/// A `None` aborts the enclosing entry point with an error rather than
/// tearing down the caller.
pub fn deref<T>(ptr: &Option<Box<T>>) -> &T {
    match ptr {
        Some(value) => value,
        None => panic::panic_any(Abort::new(Error::msg(format!(
            "nil pointer evaluating {}",
            std::any::type_name::<Option<Box<T>>>()
        )))),
    }
}
