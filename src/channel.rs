//! Physical channel identity.
//!
//! A physical channel (pchannel) is one partition of the write-ahead log and
//! the unit of independent time tick synchronization. The inspector only
//! interprets [`PChannelInfo::name`]; the remaining fields travel with the
//! identity for operators and logs.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// How the owning WAL holds the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessMode {
    #[default]
    ReadWrite,
    ReadOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PChannelInfo {
    /// Globally unique channel name
    pub name: String,
    /// Assignment term of the channel on this node
    pub term: i64,
    #[serde(default)]
    pub access_mode: AccessMode,
}

impl PChannelInfo {
    pub fn new(
        name: impl Into<String>,
        term: i64,
    ) -> Self {
        Self {
            name: name.into(),
            term,
            access_mode: AccessMode::ReadWrite,
        }
    }

    pub fn with_access_mode(
        mut self,
        access_mode: AccessMode,
    ) -> Self {
        self.access_mode = access_mode;
        self
    }
}

impl fmt::Display for PChannelInfo {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.term)
    }
}
