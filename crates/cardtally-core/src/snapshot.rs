// Read model rendered by front ends.

use serde::Serialize;

use crate::ledger::{GameInfo, GameLedger, Phase, Standing};
use crate::player::PlayerId;
use crate::rules::ScoreGoal;

/// A player row with live scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerLine {
    pub id: PlayerId,
    pub name: String,
    /// Committed total.
    pub total: i64,
    /// Delta in the open round.
    pub pending: i64,
    /// `total + pending`.
    pub display: i64,
}

/// One row of the round history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundLine {
    pub id: String,
    pub number: u32,
    /// Deltas in player order; `None` when the player has no entry (joined
    /// after the round was committed).
    pub deltas: Vec<Option<i64>>,
    pub total: i64,
}

/// Everything a view needs to draw the ledger, captured in one shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    pub phase: Phase,
    pub game: Option<GameInfo>,
    pub goal: ScoreGoal,
    /// Number the next committed round will get.
    pub round_number: u32,
    pub players: Vec<PlayerLine>,
    pub standings: Vec<Standing>,
    pub rounds: Vec<RoundLine>,
    pub winner: Option<String>,
    pub can_commit: bool,
}

impl LedgerSnapshot {
    pub fn capture(ledger: &GameLedger) -> Self {
        let players = ledger
            .players()
            .iter()
            .map(|p| {
                let total = ledger.total_score(p.id);
                let pending = ledger.pending_score(p.id);
                PlayerLine {
                    id: p.id,
                    name: p.name.clone(),
                    total,
                    pending,
                    display: total.saturating_add(pending),
                }
            })
            .collect();

        let rounds = ledger
            .rounds()
            .iter()
            .map(|r| RoundLine {
                id: r.id().to_string(),
                number: r.number(),
                deltas: ledger
                    .players()
                    .iter()
                    .map(|p| r.scores().get(&p.id).copied())
                    .collect(),
                total: r.total(),
            })
            .collect();

        LedgerSnapshot {
            phase: ledger.phase(),
            game: ledger.game().cloned(),
            goal: ledger.goal(),
            round_number: ledger.round_number(),
            players,
            standings: ledger.standings(),
            rounds,
            winner: ledger.current_winner().map(|p| p.name.clone()),
            can_commit: ledger.can_commit(),
        }
    }
}
