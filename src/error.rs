use std::fmt::{self, Display, Formatter};

/// The error type raised by this crate itself, e.g. for an invalid route
/// registration or a parameter value which couldn't be decoded.
#[derive(Debug)]
pub struct Error {
    msg: String,
}

impl Error {
    /// Creates a new error with the provided message.
    pub fn new<M: Into<String>>(msg: M) -> Error {
        Error { msg: msg.into() }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "cascade: {}", self.msg)
    }
}

impl std::error::Error for Error {}

/// The boxed error type which route handlers and the dispatch machinery
/// propagate. Any error type can be converted into it with `?`.
pub type RouteError = Box<dyn std::error::Error + Send + Sync + 'static>;
