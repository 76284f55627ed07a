//! Dispatching queued writes to the server.
use bson;
use common::WriteConcern;
use Result;

use super::command::WriteCommand;
use super::results::WriteResult;

/// An opaque token identifying the server a previous command was routed to.
///
/// The zero value means no server has been selected yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hint(u32);

impl Hint {
    pub fn none() -> Hint {
        Hint(0)
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Hint {
    fn from(id: u32) -> Hint {
        Hint(id)
    }
}

/// Everything a command executor needs to dispatch one queued write.
#[derive(Clone, Copy, Debug)]
pub struct WriteRequest<'a> {
    pub command: &'a WriteCommand,
    /// Position of the command in the bulk operation's queue.
    pub index: usize,
    /// Server the previous command was sent to.
    pub hint: Hint,
    pub database: &'a str,
    pub collection: &'a str,
    pub write_concern: &'a WriteConcern,
}

/// Sends queued writes to the server on behalf of a bulk operation.
pub trait CommandExecutor {
    /// Dispatches a single write, records its outcome (counts or errors) in `result`, and
    /// returns the hint of the server it was sent to.
    ///
    /// Failures must be recorded in `result` rather than returned.
    fn execute(&mut self, request: WriteRequest, result: &mut WriteResult) -> Hint;
}

impl<F> CommandExecutor for F
    where F: FnMut(WriteRequest, &mut WriteResult) -> Hint
{
    fn execute(&mut self, request: WriteRequest, result: &mut WriteResult) -> Hint {
        self(request, result)
    }
}

/// Runs command documents against a database.
pub trait CommandRunner {
    /// Runs `command` on `database`, preferring the server identified by `hint` if it is set.
    /// Returns the server's reply and the hint of the server that produced it.
    fn run_command(&mut self,
                   database: &str,
                   command: bson::Document,
                   hint: Hint)
                   -> Result<(bson::Document, Hint)>;
}

/// A command executor that encodes each write as a server write command and merges the
/// server's reply into the bulk operation's result.
pub struct ServerExecutor<R> {
    runner: R,
}

impl<R: CommandRunner> ServerExecutor<R> {
    pub fn new(runner: R) -> ServerExecutor<R> {
        ServerExecutor { runner: runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }
}

impl<R: CommandRunner> CommandExecutor for ServerExecutor<R> {
    fn execute(&mut self, request: WriteRequest, result: &mut WriteResult) -> Hint {
        let cmd = match request.command.to_command(request.collection, request.write_concern) {
            Ok(cmd) => cmd,
            Err(err) => {
                result.record_error(request.index, request.command, &err);
                return request.hint;
            }
        };

        debug!("Sending {} command for write {} to {}.{}",
               request.command.command_type().to_str(),
               request.index,
               request.database,
               request.collection);

        let (reply, hint) = match self.runner.run_command(request.database, cmd, request.hint) {
            Ok(response) => response,
            Err(err) => {
                result.record_error(request.index, request.command, &err);
                return Hint::none();
            }
        };

        if !request.write_concern.is_acknowledged() {
            result.set_unacknowledged();
            return hint;
        }

        if let Err(err) = result.merge_reply(request.command,
                                             request.index,
                                             &reply,
                                             request.write_concern) {
            result.record_error(request.index, request.command, &err);
        }

        hint
    }
}
