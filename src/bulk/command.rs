//! Queued write commands.
use bson::{self, oid, Bson};
use command_type::CommandType;
use common::WriteConcern;
use Error::ArgumentError;
use Result;

use super::options::WriteModel;

/// A validated write waiting in a bulk operation's queue.
///
/// Each command carries the ordering policy of the bulk operation it was queued on, so it can
/// be encoded and dispatched on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCommand {
    model: WriteModel,
    ordered: bool,
}

impl WriteCommand {
    /// Validates the model's payload and wraps it into a command.
    pub fn new(model: WriteModel, ordered: bool) -> Result<WriteCommand> {
        match model {
            WriteModel::ReplaceOne { ref replacement, .. } => validate_replace(replacement)?,
            WriteModel::UpdateOne { ref update, .. } |
            WriteModel::UpdateMany { ref update, .. } => validate_update(update)?,
            WriteModel::InsertOne { .. } |
            WriteModel::DeleteOne { .. } |
            WriteModel::DeleteMany { .. } => (),
        }

        Ok(WriteCommand {
            model: model,
            ordered: ordered,
        })
    }

    pub fn model(&self) -> &WriteModel {
        &self.model
    }

    pub fn ordered(&self) -> bool {
        self.ordered
    }

    pub fn command_type(&self) -> CommandType {
        match self.model {
            WriteModel::InsertOne { .. } => CommandType::Insert,
            WriteModel::DeleteOne { .. } |
            WriteModel::DeleteMany { .. } => CommandType::Delete,
            WriteModel::ReplaceOne { .. } |
            WriteModel::UpdateOne { .. } |
            WriteModel::UpdateMany { .. } => CommandType::Update,
        }
    }

    /// Encodes this write as a server write command against `collection`.
    ///
    /// Inserted documents without an `_id` are given a fresh ObjectId.
    pub fn to_command(&self,
                      collection: &str,
                      write_concern: &WriteConcern)
                      -> Result<bson::Document> {
        let statement = match self.model {
            WriteModel::InsertOne { ref document } => {
                let mut document = document.clone();
                if !document.contains_key("_id") {
                    document.insert("_id", Bson::ObjectId(oid::ObjectId::new()?));
                }
                document
            }
            WriteModel::DeleteOne { ref filter } |
            WriteModel::DeleteMany { ref filter } => {
                let limit = if self.model.is_multi() { 0 } else { 1 };
                doc! {
                    "q": filter.clone(),
                    "limit": limit
                }
            }
            WriteModel::ReplaceOne { ref filter, replacement: ref update, upsert } |
            WriteModel::UpdateOne { ref filter, ref update, upsert } |
            WriteModel::UpdateMany { ref filter, ref update, upsert } => {
                doc! {
                    "q": filter.clone(),
                    "u": update.clone(),
                    "upsert": upsert,
                    "multi": self.model.is_multi()
                }
            }
        };

        let command_type = self.command_type();

        let mut cmd = bson::Document::new();
        cmd.insert(command_type.to_str(), Bson::String(collection.to_owned()));
        cmd.insert(command_type.statements_key(),
                   Bson::Array(vec![Bson::Document(statement)]));
        cmd.insert("ordered", Bson::Boolean(self.ordered));
        cmd.insert("writeConcern", Bson::Document(write_concern.to_bson()));

        Ok(cmd)
    }
}

/// Checks that every top-level key of an update document is an update operator.
pub fn validate_update(update: &bson::Document) -> Result<()> {
    for key in update.keys() {
        if !key.starts_with('$') {
            return Err(ArgumentError(String::from("Update only works with $ operators.")));
        }
    }
    Ok(())
}

/// Checks that no key of a replacement document, at any depth, is an operator or a dotted path.
pub fn validate_replace(replacement: &bson::Document) -> Result<()> {
    for (key, value) in replacement.iter() {
        if key.starts_with('$') || key.contains('.') {
            return Err(ArgumentError(format!("Replacement document may not contain $ or . in \
                                              keys, found '{}'.",
                                             key)));
        }
        validate_replace_value(value)?;
    }
    Ok(())
}

fn validate_replace_value(value: &Bson) -> Result<()> {
    match *value {
        Bson::Document(ref doc) => validate_replace(doc),
        Bson::Array(ref values) => {
            for value in values {
                validate_replace_value(value)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
