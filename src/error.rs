use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while resolving configuration, running suites or
/// persisting their results.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The control file exists but is not valid YAML.
    Parse { file: PathBuf, message: String },
    /// A required configuration leaf is absent, named by its dotted path.
    MissingSetting(String),
    InvalidSetting {
        path: String,
        value: String,
        reason: String,
    },
    /// A collaborator needed at startup cannot be found.
    MissingDependency(String),
    Logging(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Error {
    /// Errors which must abort the whole invocation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Parse { .. } | Error::MissingDependency(_))
    }
}

impl ::std::error::Error for Error {
    fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Json(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Parse {
                ref file,
                ref message,
            } => write!(
                f,
                "Error while parsing YAML file {}: {}",
                file.display(),
                message
            ),
            Error::MissingSetting(ref path) => {
                write!(f, "Required setting '{}' is not configured", path)
            }
            Error::InvalidSetting {
                ref path,
                ref value,
                ref reason,
            } => write!(
                f,
                "Setting '{}' has invalid value '{}': {}",
                path, value, reason
            ),
            Error::MissingDependency(ref name) => {
                write!(f, "Could not start because of a missing dependency: {}", name)
            }
            Error::Logging(ref err) => write!(f, "Cannot set up logging: {}", err),
            Error::Io(ref err) => err.fmt(f),
            Error::Json(ref err) => err.fmt(f),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(err: log::SetLoggerError) -> Self {
        Error::Logging(err.to_string())
    }
}
