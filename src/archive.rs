//! Versioned JSON export of the full player and match record set.

use crate::error::{Error, Result};
use crate::model::{Match, Player};
use serde::{Deserialize, Serialize};

pub const ARCHIVE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Archive {
    pub version: u32,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
}

/// Read before anything else so a foreign format is refused on its tag alone.
#[derive(Deserialize)]
struct VersionTag {
    version: u32,
}

impl Archive {
    pub fn new(players: Vec<Player>, matches: Vec<Match>) -> Self {
        Archive {
            version: ARCHIVE_VERSION,
            players,
            matches,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let VersionTag { version } = serde_json::from_slice(bytes)?;
        if version != ARCHIVE_VERSION {
            return Err(Error::VersionMismatch {
                found: version,
                expected: ARCHIVE_VERSION,
            });
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}
