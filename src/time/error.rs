use std::fmt;

/// An error that occurred while parsing a duration such as `15m`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    Syntax(String),
    UnitNotSupported(String),
}

impl ::std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref err) => err.fmt(f),
            Error::UnitNotSupported(ref err) => err.fmt(f),
        }
    }
}
