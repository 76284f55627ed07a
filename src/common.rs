//! Write concern shared by every command a bulk operation sends.
use bson::{self, Bson};

/// The acknowledgment a client requests from the server for a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteConcern {
    /// Write replication.
    pub w: i32,
    /// Used in conjunction with `w`. Propagation timeout in ms.
    #[serde(rename = "wtimeout")]
    pub w_timeout: i32,
    /// If true, will block until write operations have been committed to the journal.
    pub j: bool,
    /// If true and the server is not journaling, blocks until the server has synced all data
    /// files to disk.
    pub fsync: bool,
}

impl Default for WriteConcern {
    fn default() -> WriteConcern {
        WriteConcern::new()
    }
}

impl WriteConcern {
    /// The implicit write concern: acknowledged by the primary only.
    pub fn new() -> WriteConcern {
        WriteConcern {
            w: 1,
            w_timeout: 0,
            j: false,
            fsync: false,
        }
    }

    /// A write concern that requests no acknowledgment at all.
    pub fn unacknowledged() -> WriteConcern {
        WriteConcern { w: 0, ..WriteConcern::new() }
    }

    /// Whether the server is asked to report on writes using this concern.
    pub fn is_acknowledged(&self) -> bool {
        self.w != 0 || self.j || self.fsync
    }

    pub fn to_bson(&self) -> bson::Document {
        let mut bson = bson::Document::new();
        bson.insert("w", Bson::I32(self.w));
        bson.insert("wtimeout", Bson::I32(self.w_timeout));
        bson.insert("j", Bson::Boolean(self.j));

        if self.fsync {
            bson.insert("fsync", Bson::Boolean(true));
        }

        bson
    }
}
