// Committed rounds.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::player::PlayerId;

/// Ledger-assigned round identifier. Unlike the round number, ids are never
/// reused after a reset. Displayed as `r<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl From<RoundId> for String {
    fn from(id: RoundId) -> Self {
        id.to_string()
    }
}

/// One committed round: the frozen per-player deltas.
///
/// Rounds are created only by `GameLedger::commit_round` and are read-only
/// to everyone else. The round total is always recomputed from `scores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    id: RoundId,
    number: u32,
    scores: BTreeMap<PlayerId, i64>,
}

impl Round {
    pub(crate) fn new(id: RoundId, number: u32, scores: BTreeMap<PlayerId, i64>) -> Self {
        Round { id, number, scores }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    /// 1-based position of this round in commit order.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Per-player deltas, ordered by player id (insertion order).
    pub fn scores(&self) -> &BTreeMap<PlayerId, i64> {
        &self.scores
    }

    /// The delta recorded for `player`, or 0 if the player has no entry.
    pub fn score_for(&self, player: PlayerId) -> i64 {
        self.scores.get(&player).copied().unwrap_or(0)
    }

    /// Sum of all deltas in this round, saturating at the `i64` bounds.
    pub fn total(&self) -> i64 {
        self.scores
            .values()
            .fold(0i64, |acc, &d| acc.saturating_add(d))
    }

    /// Drop a removed player's entry.
    pub(crate) fn forget_player(&mut self, player: PlayerId) {
        self.scores.remove(&player);
    }
}
