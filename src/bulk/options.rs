//! Options and write models for bulk operations.
use bson::{self, Bson};
use common::WriteConcern;
use Result;

use super::executor::Hint;

/// A single write that can be queued on a bulk operation.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteModel {
    InsertOne { document: bson::Document },
    DeleteOne { filter: bson::Document },
    DeleteMany { filter: bson::Document },
    ReplaceOne {
        filter: bson::Document,
        replacement: bson::Document,
        upsert: bool,
    },
    UpdateOne {
        filter: bson::Document,
        update: bson::Document,
        upsert: bool,
    },
    UpdateMany {
        filter: bson::Document,
        update: bson::Document,
        upsert: bool,
    },
}

impl WriteModel {
    /// Whether the write may affect more than one matching document.
    pub fn is_multi(&self) -> bool {
        match *self {
            WriteModel::DeleteMany { .. } |
            WriteModel::UpdateMany { .. } => true,
            WriteModel::InsertOne { .. } |
            WriteModel::DeleteOne { .. } |
            WriteModel::ReplaceOne { .. } |
            WriteModel::UpdateOne { .. } => false,
        }
    }

    /// Whether a document should be inserted when nothing matches the filter.
    pub fn is_upsert(&self) -> bool {
        match *self {
            WriteModel::ReplaceOne { upsert, .. } |
            WriteModel::UpdateOne { upsert, .. } |
            WriteModel::UpdateMany { upsert, .. } => upsert,
            WriteModel::InsertOne { .. } |
            WriteModel::DeleteOne { .. } |
            WriteModel::DeleteMany { .. } => false,
        }
    }

    /// The selector of a delete, update or replacement.
    pub fn filter(&self) -> Option<&bson::Document> {
        match *self {
            WriteModel::InsertOne { .. } => None,
            WriteModel::DeleteOne { ref filter } |
            WriteModel::DeleteMany { ref filter } |
            WriteModel::ReplaceOne { ref filter, .. } |
            WriteModel::UpdateOne { ref filter, .. } |
            WriteModel::UpdateMany { ref filter, .. } => Some(filter),
        }
    }
}

/// Options for creating a bulk operation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BulkWriteOptions {
    /// Whether to stop at the first failed write. Defaults to true.
    pub ordered: bool,
    #[serde(rename = "writeConcern")]
    pub write_concern: Option<WriteConcern>,
    /// Server the first write should prefer.
    #[serde(skip)]
    pub hint: Hint,
}

impl Default for BulkWriteOptions {
    fn default() -> Self {
        BulkWriteOptions {
            ordered: true,
            write_concern: None,
            hint: Hint::none(),
        }
    }
}

impl BulkWriteOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Decodes options from a document such as `{ ordered: false, writeConcern: { w: 2 } }`.
    pub fn from_document(document: bson::Document) -> Result<BulkWriteOptions> {
        Ok(bson::from_bson(Bson::Document(document))?)
    }
}
