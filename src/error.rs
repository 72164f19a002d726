use std::{fmt, process::ExitStatus, string::FromUtf8Error};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Simple wrapper over all I/O related errors
    IoError(std::io::Error),
    /// A command ran, but exited unsuccessfully
    CommandFailed {
        /// The command line that was run
        command: String,
        status: ExitStatus,
        /// Whatever the command wrote to stderr, trimmed
        stderr: String,
    },
    /// We were unable to make sense of what a collaborator returned,
    /// e.g. an interface dump that isn't valid JSON
    ParseError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(_) => write!(f, "IO operation failed"),
            Error::CommandFailed {
                command,
                status,
                stderr,
            } => {
                write!(f, "command `{}` failed with {}", command, status)?;
                if stderr.is_empty() {
                    Ok(())
                } else {
                    write!(f, ": {}", stderr)
                }
            }
            Error::ParseError(reason) => write!(f, "failed to parse response: {}", reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_: FromUtf8Error) -> Self {
        Error::ParseError("failed to parse as utf8".into())
    }
}
