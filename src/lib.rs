//! Bulk write operations for MongoDB collections.
//!
//! A `BulkOperation` queues inserts, deletes, updates and replacements against a single
//! collection and executes them as one logical unit, either in order (stopping at the first
//! failed write) or unordered (attempting every write). The outcome of every dispatched write
//! is merged into a single reply document mirroring the server's write command replies.
//!
//! ```no_run
//! # #[macro_use] extern crate bson;
//! # extern crate mongo_bulk;
//! # use mongo_bulk::bulk::{BulkOperation, CommandRunner, Hint, ServerExecutor};
//! # fn run<R: CommandRunner>(runner: R) -> mongo_bulk::Result<()> {
//! let mut bulk = BulkOperation::new("test", "people", Hint::none(), true, None);
//!
//! bulk.insert(doc! { "name": "Alice" })?;
//! bulk.update_one(doc! { "name": "Alice" }, doc! { "$set": { "age": 30 } }, false)?;
//! bulk.remove(doc! { "inactive": true })?;
//!
//! let mut executor = ServerExecutor::new(runner);
//! let reply = bulk.execute(&mut executor).into_result()?;
//! println!("inserted {:?}", reply.get("nInserted"));
//! # Ok(())
//! # }
//! # fn main() {}
//! ```
#[macro_use(doc)]
extern crate bson;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod bulk;
pub mod command_type;
pub mod common;
pub mod error;

pub use error::{Error, Result};
