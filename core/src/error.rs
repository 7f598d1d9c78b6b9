use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsafe path: {0}")]
    PathSafety(String),

    #[error("Encryption key not available for this workspace")]
    EncryptionUnavailable,

    #[error("Encryption error: {0}")]
    Crypto(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        match err.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::Io(std::io::Error::other("filesystem loop while walking workspace")),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

impl Error {
    /// Errors the user can fix from the current view; never worth a log line above `warn`.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::PathSafety(_) | Error::NotFound(_) | Error::EncryptionUnavailable
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
