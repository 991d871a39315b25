use std::fmt;

/// Recoverable errors are reported to the caller and leave the database
/// untouched; fatal errors mean a structural invariant or the underlying
/// file is broken and the process has no safe way to continue.
#[derive(Debug)]
pub enum Error {
    DuplicateKey(i32),
    KeyNotFound(i32),
    Syntax(String),
    Io(std::io::Error),
    Corrupt(String),
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Corrupt(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DuplicateKey(_) => write!(f, "duplicate key"),
            Error::KeyNotFound(_) => write!(f, "key not found"),
            Error::Syntax(msg) => write!(f, "Syntax error. {}", msg),
            Error::Io(e) => write!(f, "I/O error. {}", e),
            Error::Corrupt(msg) => write!(f, "database corrupted. {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[macro_export]
macro_rules! err {
    (Syntax, $($arg:tt)*) => {
        $crate::errors::Error::Syntax(format!($($arg)*))
    };
    (Corrupt, $($arg:tt)*) => {
        $crate::errors::Error::Corrupt(format!($($arg)*))
    };
}
