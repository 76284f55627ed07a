//! Results for bulk write operations.
use bson::{self, Bson};
use command_type::CommandType;
use common::WriteConcern;
use std::collections::BTreeMap;
use {Error, Result};

use super::command::WriteCommand;
use super::error::{int_value, BulkWriteError, BulkWriteException, WriteConcernError};
use super::options::WriteModel;

/// Accumulates the outcome of every write dispatched by a bulk operation.
///
/// A result lives for the duration of a single execution and is consumed by `complete`.
#[derive(Clone, Debug, Default)]
pub struct WriteResult {
    acknowledged: bool,
    omit_n_modified: bool,
    steps: usize,
    n_inserted: i32,
    n_matched: i32,
    n_modified: i32,
    n_removed: i32,
    upserted_ids: BTreeMap<usize, Bson>,
    write_errors: Vec<BulkWriteError>,
    write_concern_errors: Vec<WriteConcernError>,
    processed_requests: Vec<WriteModel>,
    unprocessed_requests: Vec<WriteModel>,
}

/// The outcome of executing a bulk operation.
///
/// `reply` always describes the writes that completed, even when `error` is set. When
/// `acknowledged` is false the server never reported on the writes, so the counts in `reply`
/// are unknown rather than zero.
#[derive(Debug)]
pub struct BulkWriteReply {
    pub reply: bson::Document,
    pub error: Option<Error>,
    pub acknowledged: bool,
}

impl BulkWriteReply {
    /// A reply for a bulk operation that failed before anything was sent.
    pub fn failure(error: Error) -> BulkWriteReply {
        BulkWriteReply {
            reply: bson::Document::new(),
            error: Some(error),
            acknowledged: true,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<bson::Document> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.reply),
        }
    }
}

impl WriteResult {
    pub fn new() -> WriteResult {
        WriteResult { acknowledged: true, ..Default::default() }
    }

    /// Whether any write has failed so far. Write concern errors are not write failures.
    pub fn has_failed(&self) -> bool {
        !self.write_errors.is_empty()
    }

    /// The number of writes whose outcome has been recorded.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn inserted_count(&self) -> i32 {
        self.n_inserted
    }

    pub fn matched_count(&self) -> i32 {
        self.n_matched
    }

    pub fn modified_count(&self) -> i32 {
        self.n_modified
    }

    pub fn removed_count(&self) -> i32 {
        self.n_removed
    }

    pub fn upserted_count(&self) -> i32 {
        self.upserted_ids.len() as i32
    }

    /// Ids of upserted documents, keyed by the queue index of the write that upserted them.
    pub fn upserted_ids(&self) -> &BTreeMap<usize, Bson> {
        &self.upserted_ids
    }

    pub fn write_errors(&self) -> &[BulkWriteError] {
        &self.write_errors
    }

    pub fn write_concern_errors(&self) -> &[WriteConcernError] {
        &self.write_concern_errors
    }

    /// Marks the result as unacknowledged; the server was not asked to report on its writes.
    pub fn set_unacknowledged(&mut self) {
        self.acknowledged = false;
        self.steps += 1;
    }

    pub fn record_insert(&mut self, n: i32) {
        self.n_inserted += n;
        self.steps += 1;
    }

    pub fn record_delete(&mut self, n: i32) {
        self.n_removed += n;
        self.steps += 1;
    }

    /// Records an update or replacement. `n_modified` is `None` when the server did not report
    /// it, in which case `nModified` is left out of the final reply.
    pub fn record_update(&mut self,
                         n_matched: i32,
                         n_modified: Option<i32>,
                         upserted: Vec<(usize, Bson)>) {
        self.n_matched += n_matched;

        match n_modified {
            Some(n) => self.n_modified += n,
            None => self.omit_n_modified = true,
        }

        self.upserted_ids.extend(upserted);
        self.steps += 1;
    }

    pub fn record_write_error(&mut self, error: BulkWriteError) {
        self.write_errors.push(error);
    }

    pub fn record_write_concern_error(&mut self, error: WriteConcernError) {
        self.write_concern_errors.push(error);
    }

    /// Records a write that could not be carried out at all, such as a transport failure or a
    /// command the server refused.
    pub fn record_error(&mut self, index: usize, command: &WriteCommand, error: &Error) {
        let code = error.code().unwrap_or(0);
        debug!("Write {} failed: {}", index, error);

        self.record_write_error(BulkWriteError::new(index,
                                                    code,
                                                    error.to_string(),
                                                    Some(command.model().clone())));
        self.steps += 1;
    }

    pub fn add_processed_request(&mut self, model: WriteModel) {
        self.processed_requests.push(model);
    }

    pub fn add_unprocessed_requests<I>(&mut self, models: I)
        where I: IntoIterator<Item = WriteModel>
    {
        self.unprocessed_requests.extend(models);
    }

    /// Merges a server reply to the write command for `command`, queued at `index`.
    ///
    /// Nothing is recorded if the reply is malformed or reports that the command failed.
    pub fn merge_reply(&mut self,
                       command: &WriteCommand,
                       index: usize,
                       reply: &bson::Document,
                       write_concern: &WriteConcern)
                       -> Result<()> {
        trace!("Merging reply for write {}: {:?}", index, reply);

        if let Some(ok) = reply.get("ok").and_then(int_value) {
            if ok == 0 {
                let code = reply.get("code").and_then(int_value).unwrap_or(0) as i32;
                let message = match reply.get("errmsg") {
                    Some(&Bson::String(ref message)) => message.to_owned(),
                    _ => String::from("Unknown command error."),
                };
                return Err(Error::CommandError(code, message));
            }
        }

        let n = reply.get("n").and_then(int_value).unwrap_or(0) as i32;

        let mut write_errors = Vec::new();
        if let Some(&Bson::Array(ref errors)) = reply.get("writeErrors") {
            for error in errors {
                match *error {
                    Bson::Document(ref doc) => {
                        let mut write_error = BulkWriteError::parse(doc, index)?;
                        write_error.request = Some(command.model().clone());
                        write_errors.push(write_error);
                    }
                    _ => {
                        return Err(Error::ResponseError(String::from("WriteError provided was \
                                                                      not a bson document.")))
                    }
                }
            }
        }

        let write_concern_error = match reply.get("writeConcernError") {
            Some(&Bson::Document(ref error)) => {
                Some(WriteConcernError::parse(error, write_concern.clone())?)
            }
            _ => None,
        };

        match command.command_type() {
            CommandType::Insert => self.record_insert(n),
            CommandType::Delete => self.record_delete(n),
            CommandType::Update => {
                let upserted = parse_upserted_ids(reply.get("upserted"), index);
                let n_modified = reply.get("nModified").and_then(int_value).map(|n| n as i32);
                let n_matched = n - upserted.len() as i32;
                self.record_update(n_matched, n_modified, upserted);
            }
        }

        for error in write_errors {
            self.record_write_error(error);
        }

        if let Some(error) = write_concern_error {
            self.record_write_concern_error(error);
        }

        Ok(())
    }

    /// Renders the accumulated outcome into a reply document, and an error if any write or
    /// write concern failed.
    pub fn complete(self) -> BulkWriteReply {
        let mut reply = bson::Document::new();
        reply.insert("nInserted", Bson::I32(self.n_inserted));
        reply.insert("nMatched", Bson::I32(self.n_matched));

        if !self.omit_n_modified {
            reply.insert("nModified", Bson::I32(self.n_modified));
        }

        reply.insert("nRemoved", Bson::I32(self.n_removed));
        reply.insert("nUpserted", Bson::I32(self.upserted_ids.len() as i32));

        if !self.upserted_ids.is_empty() {
            let upserted = self.upserted_ids
                .iter()
                .map(|(index, id)| {
                    let mut doc = bson::Document::new();
                    doc.insert("index", Bson::I32(*index as i32));
                    doc.insert("_id", id.clone());
                    Bson::Document(doc)
                })
                .collect();
            reply.insert("upserted", Bson::Array(upserted));
        }

        let write_errors = self.write_errors
            .iter()
            .map(|error| Bson::Document(error.to_bson()))
            .collect();
        reply.insert("writeErrors", Bson::Array(write_errors));

        if !self.write_concern_errors.is_empty() {
            let errors = self.write_concern_errors
                .iter()
                .map(|error| Bson::Document(error.to_bson()))
                .collect();
            reply.insert("writeConcernErrors", Bson::Array(errors));
        }

        let error = if self.write_errors.is_empty() && self.write_concern_errors.is_empty() {
            None
        } else {
            Some(Error::BulkWriteError(BulkWriteException::new(self.processed_requests,
                                                               self.unprocessed_requests,
                                                               self.write_errors,
                                                               self.write_concern_errors)))
        };

        BulkWriteReply {
            reply: reply,
            error: error,
            acknowledged: self.acknowledged,
        }
    }
}

// Parses the `upserted` field of an update reply: either a single `{ index, _id }` document or
// an array of them. Indexes are offset by the queue index of the write.
fn parse_upserted_ids(bson: Option<&Bson>, offset: usize) -> Vec<(usize, Bson)> {
    fn parse_one(doc: &bson::Document, offset: usize) -> Option<(usize, Bson)> {
        match (doc.get("index").and_then(int_value), doc.get("_id")) {
            (Some(index), Some(id)) if index >= 0 => Some((offset + index as usize, id.clone())),
            _ => None,
        }
    }

    match bson {
        Some(&Bson::Document(ref doc)) => parse_one(doc, offset).into_iter().collect(),
        Some(&Bson::Array(ref values)) => {
            values.iter()
                .filter_map(|value| match *value {
                    Bson::Document(ref doc) => parse_one(doc, offset),
                    _ => None,
                })
                .collect()
        }
        _ => Vec::new(),
    }
}
