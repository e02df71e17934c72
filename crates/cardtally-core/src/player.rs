// Player identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ledger-assigned player identifier.
///
/// Ids come from a per-ledger monotonic counter, so ordering by id is the
/// same as ordering by insertion. Displayed as `p<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = String;

    /// Parse the `p<n>` display form (the prefix is case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('p')
            .or_else(|| s.strip_prefix('P'))
            .ok_or_else(|| format!("invalid player id `{s}`"))?;
        digits
            .parse::<u64>()
            .map(PlayerId)
            .map_err(|_| format!("invalid player id `{s}`"))
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PlayerId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A player at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Trimmed display name, unique (case-insensitive) within its ledger.
    pub name: String,
}

impl Player {
    /// Whether `other` names this player, ignoring case and surrounding
    /// whitespace.
    pub fn has_name(&self, other: &str) -> bool {
        names_match(&self.name, other)
    }
}

/// Case-insensitive comparison used for name uniqueness.
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
