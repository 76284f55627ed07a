//! Write command types sent by bulk operations.

/// The server write command a queued operation is sent as.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CommandType {
    Insert,
    Delete,
    Update,
}

impl CommandType {
    /// The command name, which is also the first key of the command document.
    pub fn to_str(&self) -> &'static str {
        match *self {
            CommandType::Insert => "insert",
            CommandType::Delete => "delete",
            CommandType::Update => "update",
        }
    }

    /// The key holding the array of write statements within the command document.
    pub fn statements_key(&self) -> &'static str {
        match *self {
            CommandType::Insert => "documents",
            CommandType::Delete => "deletes",
            CommandType::Update => "updates",
        }
    }
}
