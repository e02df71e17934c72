// Scoring rules: who wins, how low a score may go, roster policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which end of the standings wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreGoal {
    #[default]
    HighestWins,
    LowestWins,
}

impl ScoreGoal {
    /// Whether `candidate` strictly beats `incumbent` under this goal.
    pub fn improves(self, candidate: i64, incumbent: i64) -> bool {
        match self {
            ScoreGoal::HighestWins => candidate > incumbent,
            ScoreGoal::LowestWins => candidate < incumbent,
        }
    }
}

impl fmt::Display for ScoreGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreGoal::HighestWins => write!(f, "highest wins"),
            ScoreGoal::LowestWins => write!(f, "lowest wins"),
        }
    }
}

impl FromStr for ScoreGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "highest" | "high" | "highest_wins" => Ok(ScoreGoal::HighestWins),
            "lowest" | "low" | "lowest_wins" => Ok(ScoreGoal::LowestWins),
            other => Err(format!("unknown score goal `{other}`")),
        }
    }
}

/// Lower bound applied to a player's displayed cumulative score while
/// adjusting the pending round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFloor {
    /// Deltas are applied as given; totals may go negative.
    #[default]
    Unbounded,
    /// The displayed score (total + pending) never drops below zero.
    Zero,
}

impl ScoreFloor {
    /// Apply `delta` to a displayed score, returning the new displayed score,
    /// or `None` if the sum leaves the `i64` range.
    pub fn apply(self, displayed: i64, delta: i64) -> Option<i64> {
        let raw = displayed.checked_add(delta)?;
        match self {
            ScoreFloor::Unbounded => Some(raw),
            ScoreFloor::Zero => Some(raw.max(0)),
        }
    }
}

/// Front-end flavour whose behavior a ledger reproduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Unclamped totals; the roster is fixed once the game starts.
    #[default]
    Web,
    /// Running totals clamped at zero; players are editable only during setup.
    Mobile,
}

/// Rules a `GameLedger` enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRules {
    pub score_floor: ScoreFloor,
    /// Players required to start a game or commit a round. At least 2.
    pub min_players: usize,
    /// Reject add/remove while the ledger is Active.
    pub lock_roster_when_active: bool,
    /// Goal used when no game has been started with an explicit one.
    pub default_goal: ScoreGoal,
}

impl Default for LedgerRules {
    fn default() -> Self {
        LedgerRules {
            score_floor: ScoreFloor::Unbounded,
            min_players: 2,
            lock_roster_when_active: false,
            default_goal: ScoreGoal::HighestWins,
        }
    }
}

impl LedgerRules {
    /// Rules matching a front-end variant.
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Web => LedgerRules {
                lock_roster_when_active: true,
                ..LedgerRules::default()
            },
            Variant::Mobile => LedgerRules {
                score_floor: ScoreFloor::Zero,
                lock_roster_when_active: true,
                ..LedgerRules::default()
            },
        }
    }
}
