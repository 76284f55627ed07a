//! Error and Result types for bulk write operations.
use bson::{self, oid};
use bulk::error::BulkWriteException;
use std::{error, fmt, io, result};

/// A type for results generated by bulk write operations.
pub type Result<T> = result::Result<T, Error>;

/// The error type for bulk write operations.
#[derive(Debug)]
pub enum Error {
    /// An invalid argument was provided, such as a malformed update document
    /// or an attempt to execute an empty bulk operation.
    ArgumentError(String),
    /// The server replied with a document that could not be interpreted.
    ResponseError(String),
    /// The server rejected a command outright, with the given code and message.
    CommandError(i32, String),
    /// A command could not be carried out by the transport.
    OperationError(String),
    /// One or more writes in a bulk operation failed.
    BulkWriteError(BulkWriteException),
    DecoderError(bson::DecoderError),
    OidError(oid::Error),
    IoError(io::Error),
}

impl Error {
    /// Returns the server error code attached to this error, if any.
    pub fn code(&self) -> Option<i32> {
        match *self {
            Error::CommandError(code, _) => Some(code),
            Error::BulkWriteError(ref exception) => exception.first_error().map(|e| e.code),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for Error {
    fn from(s: &str) -> Error {
        Error::OperationError(s.to_owned())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::OperationError(s)
    }
}

impl From<BulkWriteException> for Error {
    fn from(err: BulkWriteException) -> Error {
        Error::BulkWriteError(err)
    }
}

impl From<bson::DecoderError> for Error {
    fn from(err: bson::DecoderError) -> Error {
        Error::DecoderError(err)
    }
}

impl From<oid::Error> for Error {
    fn from(err: oid::Error) -> Error {
        Error::OidError(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ArgumentError(ref inner) => inner.fmt(fmt),
            Error::ResponseError(ref inner) => inner.fmt(fmt),
            Error::CommandError(code, ref message) => {
                write!(fmt, "Command failed with code {}: {}", code, message)
            }
            Error::OperationError(ref inner) => inner.fmt(fmt),
            Error::BulkWriteError(ref inner) => inner.fmt(fmt),
            Error::DecoderError(ref inner) => inner.fmt(fmt),
            Error::OidError(ref inner) => inner.fmt(fmt),
            Error::IoError(ref inner) => inner.fmt(fmt),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::BulkWriteError(ref inner) => Some(inner),
            Error::DecoderError(ref inner) => Some(inner),
            Error::OidError(ref inner) => Some(inner),
            Error::IoError(ref inner) => Some(inner),
            Error::ArgumentError(_) |
            Error::ResponseError(_) |
            Error::CommandError(..) |
            Error::OperationError(_) => None,
        }
    }
}
