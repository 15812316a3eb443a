use std::borrow::Cow;
use std::{error, fmt, io};

use crate::Fourcc;

/// Type alias for the result of container operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kinds of errors that may occur while reading or rewriting a file.
#[derive(Debug)]
pub enum ErrorKind {
    /// A required atom could not be found. Contains the atom's identifier.
    AtomNotFound(Fourcc),
    /// The number of atoms of a kind is outside the allowed range. Contains the atom's
    /// identifier.
    Selection(Fourcc),
    /// The version byte of a full atom is unknown. Contains the unknown version.
    UnknownVersion(u8),
    /// The file structure is inconsistent with the container format.
    Parsing,
    /// The requested cut time lies at or past the end of the movie.
    ExceededDuration,
    /// An IO error has occurred.
    Io(io::Error),
}

/// Any error that may occur while reading or rewriting a file.
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// A human readable string describing the error.
    pub description: Cow<'static, str>,
}

impl Error {
    pub fn new(kind: ErrorKind, description: impl Into<Cow<'static, str>>) -> Error {
        Error { kind, description: description.into() }
    }
}

impl error::Error for Error {
    fn cause(&self) -> Option<&dyn error::Error> {
        match self.kind {
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        let description = format!("IO error: {err}");
        Error::new(ErrorKind::Io(err), description)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{}:\n{:?}", self.description, self.kind)
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{}:\n{:?}", self.description, self.kind)
        }
    }
}
