//! Write errors for bulk operations.
use bson::{self, Bson};
use common::WriteConcern;
use std::{error, fmt};
use {Error, Result};

use super::options::WriteModel;

/// The error struct for a single failed write, indicating the request
/// and its index in the bulk operation's queue.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkWriteError {
    pub index: usize,
    pub code: i32,
    pub message: String,
    pub request: Option<WriteModel>,
}

/// The error struct for a write-concern related error.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteConcernError {
    pub code: i32,
    pub details: WriteConcern,
    pub message: String,
}

/// The error struct for bulk operations in which at least one write failed.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkWriteException {
    pub processed_requests: Vec<WriteModel>,
    pub unprocessed_requests: Vec<WriteModel>,
    pub write_errors: Vec<BulkWriteError>,
    pub write_concern_errors: Vec<WriteConcernError>,
    pub message: String,
}

impl error::Error for BulkWriteException {}

impl fmt::Display for BulkWriteError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt,
               "BulkWriteError at index {} (code {}): {}",
               self.index,
               self.code,
               self.message)
    }
}

impl fmt::Display for WriteConcernError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "WriteConcernError (code {}): {}", self.code, self.message)
    }
}

impl fmt::Display for BulkWriteException {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.message)?;

        if !self.unprocessed_requests.is_empty() {
            write!(fmt,
                   " ({} of {} requests were not processed)",
                   self.unprocessed_requests.len(),
                   self.processed_requests.len() + self.unprocessed_requests.len())?;
        }

        Ok(())
    }
}

impl BulkWriteError {
    /// Returns a new BulkWriteError containing the provided error information.
    pub fn new<T: ToString>(index: usize,
                            code: i32,
                            message: T,
                            request: Option<WriteModel>)
                            -> BulkWriteError {
        BulkWriteError {
            index: index,
            code: code,
            message: message.to_string(),
            request: request,
        }
    }

    /// Parses an entry of a reply's `writeErrors` array. The entry's index is relative to
    /// the command it was reported for, so `offset` is added to recover the queue index.
    pub fn parse(error: &bson::Document, offset: usize) -> Result<BulkWriteError> {
        let index = error.get("index").and_then(int_value);
        let code = error.get("code").and_then(int_value);

        match (index, code, error.get("errmsg")) {
            (Some(index), Some(code), Some(&Bson::String(ref message))) if index >= 0 => {
                Ok(BulkWriteError::new(offset + index as usize, code as i32, message, None))
            }
            _ => Err(Error::ResponseError(format!("WriteError document is invalid: {:?}", error))),
        }
    }

    pub fn to_bson(&self) -> bson::Document {
        doc! {
            "index": self.index as i32,
            "code": self.code,
            "errmsg": self.message.clone()
        }
    }
}

impl WriteConcernError {
    /// Returns a new WriteConcernError containing the provided error information.
    pub fn new<T: ToString>(code: i32, details: WriteConcern, message: T) -> WriteConcernError {
        WriteConcernError {
            code: code,
            details: details,
            message: message.to_string(),
        }
    }

    /// Parses a reply's `writeConcernError` document.
    pub fn parse(error: &bson::Document, write_concern: WriteConcern) -> Result<WriteConcernError> {
        match (error.get("code").and_then(int_value), error.get("errmsg")) {
            (Some(code), Some(&Bson::String(ref message))) => {
                Ok(WriteConcernError::new(code as i32, write_concern, message))
            }
            _ => {
                Err(Error::ResponseError(format!("WriteConcernError document is invalid: {:?}",
                                                 error)))
            }
        }
    }

    pub fn to_bson(&self) -> bson::Document {
        doc! {
            "code": self.code,
            "errmsg": self.message.clone()
        }
    }
}

impl BulkWriteException {
    /// Returns a new BulkWriteException containing the provided error information.
    pub fn new(processed: Vec<WriteModel>,
               unprocessed: Vec<WriteModel>,
               write_errors: Vec<BulkWriteError>,
               write_concern_errors: Vec<WriteConcernError>)
               -> BulkWriteException {
        let message = match (write_errors.first(), write_concern_errors.first()) {
            (Some(error), _) => error.to_string(),
            (None, Some(error)) => error.to_string(),
            (None, None) => String::from("BulkWriteException"),
        };

        BulkWriteException {
            processed_requests: processed,
            unprocessed_requests: unprocessed,
            write_errors: write_errors,
            write_concern_errors: write_concern_errors,
            message: message,
        }
    }

    /// The representative failure: the first write error recorded.
    pub fn first_error(&self) -> Option<&BulkWriteError> {
        self.write_errors.first()
    }
}

/// Reads an integral value the server may have encoded as int32, int64 or double.
pub fn int_value(bson: &Bson) -> Option<i64> {
    match *bson {
        Bson::I32(n) => Some(n as i64),
        Bson::I64(n) => Some(n),
        Bson::FloatingPoint(f) if f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}
