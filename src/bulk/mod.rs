//! Interface for bulk write operations.
mod command;
pub mod error;
mod executor;
pub mod options;
pub mod results;

pub use self::command::{validate_replace, validate_update, WriteCommand};
pub use self::executor::{CommandExecutor, CommandRunner, Hint, ServerExecutor, WriteRequest};
pub use self::options::{BulkWriteOptions, WriteModel};
pub use self::results::{BulkWriteReply, WriteResult};

use bson;
use common::WriteConcern;
use Error::ArgumentError;
use Result;

/// A queue of writes against a single collection, executed as one logical unit.
///
/// Writes are validated as they are queued and sent in queue order when the operation is
/// executed. An ordered operation stops at the first write that fails; an unordered one
/// attempts every write.
#[derive(Debug, Clone)]
pub struct BulkOperation {
    database: String,
    collection: String,
    hint: Hint,
    ordered: bool,
    write_concern: WriteConcern,
    commands: Vec<WriteCommand>,
}

impl BulkOperation {
    /// Creates an empty bulk operation against `database.collection`.
    ///
    /// If no write concern is given, the implicit default concern is used.
    pub fn new(database: &str,
               collection: &str,
               hint: Hint,
               ordered: bool,
               write_concern: Option<WriteConcern>)
               -> BulkOperation {
        BulkOperation {
            database: database.to_owned(),
            collection: collection.to_owned(),
            hint: hint,
            ordered: ordered,
            write_concern: write_concern.unwrap_or_else(WriteConcern::new),
            commands: Vec::new(),
        }
    }

    /// `new` with the settings taken from `options`.
    pub fn with_options(database: &str,
                        collection: &str,
                        options: BulkWriteOptions)
                        -> BulkOperation {
        BulkOperation::new(database,
                           collection,
                           options.hint,
                           options.ordered,
                           options.write_concern)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The namespace of the target collection, formatted as db_name.coll_name.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }

    pub fn ordered(&self) -> bool {
        self.ordered
    }

    pub fn write_concern(&self) -> &WriteConcern {
        &self.write_concern
    }

    /// The server the last execution finished on, or the hint given at construction if the
    /// operation has not been executed.
    pub fn hint(&self) -> Hint {
        self.hint
    }

    /// The queued writes, in the order they will be sent.
    pub fn commands(&self) -> &[WriteCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Validates and queues a write. Rejected writes are not queued.
    pub fn append(&mut self, model: WriteModel) -> Result<()> {
        match WriteCommand::new(model, self.ordered) {
            Ok(command) => {
                self.commands.push(command);
                Ok(())
            }
            Err(err) => {
                warn!("Ignoring write for {}: {}", self.namespace(), err);
                Err(err)
            }
        }
    }

    /// Queues the insertion of a document.
    pub fn insert(&mut self, document: bson::Document) -> Result<()> {
        self.append(WriteModel::InsertOne { document: document })
    }

    /// Queues the removal of every document matching `selector`.
    pub fn remove(&mut self, selector: bson::Document) -> Result<()> {
        self.append(WriteModel::DeleteMany { filter: selector })
    }

    /// Queues the removal of a single document matching `selector`.
    pub fn remove_one(&mut self, selector: bson::Document) -> Result<()> {
        self.append(WriteModel::DeleteOne { filter: selector })
    }

    /// Alias for `remove`.
    pub fn delete(&mut self, selector: bson::Document) -> Result<()> {
        self.remove(selector)
    }

    /// Alias for `remove_one`.
    pub fn delete_one(&mut self, selector: bson::Document) -> Result<()> {
        self.remove_one(selector)
    }

    /// Queues the replacement of a single document matching `selector`.
    ///
    /// The replacement may not contain `$`-prefixed or dotted keys at any depth.
    pub fn replace_one(&mut self,
                       selector: bson::Document,
                       document: bson::Document,
                       upsert: bool)
                       -> Result<()> {
        self.append(WriteModel::ReplaceOne {
            filter: selector,
            replacement: document,
            upsert: upsert,
        })
    }

    /// Queues an update of every document matching `selector`.
    ///
    /// Every top-level key of the update document must be a `$` operator.
    pub fn update(&mut self,
                  selector: bson::Document,
                  document: bson::Document,
                  upsert: bool)
                  -> Result<()> {
        self.append(WriteModel::UpdateMany {
            filter: selector,
            update: document,
            upsert: upsert,
        })
    }

    /// Queues an update of a single document matching `selector`.
    pub fn update_one(&mut self,
                      selector: bson::Document,
                      document: bson::Document,
                      upsert: bool)
                      -> Result<()> {
        self.append(WriteModel::UpdateOne {
            filter: selector,
            update: document,
            upsert: upsert,
        })
    }

    /// Sends every queued write through `executor` and merges the outcomes.
    ///
    /// The reply is populated with whatever completed, even when the returned error is set.
    /// Executing an operation with no queued writes fails without sending anything. Every
    /// execution starts without a server hint.
    pub fn execute<E: CommandExecutor>(&mut self, executor: &mut E) -> BulkWriteReply {
        if self.commands.is_empty() {
            return BulkWriteReply::failure(ArgumentError(String::from("Cannot do an empty bulk \
                                                                       write")));
        }

        let mut result = WriteResult::new();
        let mut hint = Hint::none();

        for (index, command) in self.commands.iter().enumerate() {
            let request = WriteRequest {
                command: command,
                index: index,
                hint: hint,
                database: &self.database,
                collection: &self.collection,
                write_concern: &self.write_concern,
            };

            hint = executor.execute(request, &mut result);
            result.add_processed_request(command.model().clone());

            if result.has_failed() && self.ordered {
                debug!("Ordered bulk write to {}.{} stopped at write {} of {}",
                       self.database,
                       self.collection,
                       index,
                       self.commands.len());

                let remaining = self.commands[index + 1..].iter().map(|c| c.model().clone());
                result.add_unprocessed_requests(remaining);
                break;
            }
        }

        self.hint = hint;
        result.complete()
    }
}
