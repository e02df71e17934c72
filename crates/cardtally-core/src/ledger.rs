// Game ledger: players, the committed round log and the pending round.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::player::{Player, PlayerId};
use crate::round::{Round, RoundId};
use crate::rules::{LedgerRules, ScoreGoal};
use crate::snapshot::LedgerSnapshot;

/// Where the ledger is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Players are being set up; nothing has been committed or started.
    Setup,
    /// A game is running. Rounds may be committed.
    Active,
}

/// Metadata recorded when a game is explicitly started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameInfo {
    pub id: u64,
    pub name: String,
    pub goal: ScoreGoal,
    pub created_at: DateTime<Utc>,
}

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub player: Player,
    pub total: i64,
}

/// The authoritative in-memory record of one game session.
///
/// Cumulative totals are never stored: they are summed from the round log
/// whenever asked for, so removing a player or resetting history cannot
/// leave a stale total behind.
#[derive(Debug, Clone)]
pub struct GameLedger {
    rules: LedgerRules,
    players: Vec<Player>,
    rounds: Vec<Round>,
    pending: BTreeMap<PlayerId, i64>,
    phase: Phase,
    game: Option<GameInfo>,
    next_player_id: u64,
    next_round_id: u64,
    next_game_id: u64,
}

impl Default for GameLedger {
    fn default() -> Self {
        GameLedger::new(LedgerRules::default())
    }
}

impl GameLedger {
    /// Create an empty ledger in the Setup phase.
    ///
    /// `rules.min_players` is raised to 2 if configured lower.
    pub fn new(mut rules: LedgerRules) -> Self {
        rules.min_players = rules.min_players.max(2);
        GameLedger {
            rules,
            players: Vec::new(),
            rounds: Vec::new(),
            pending: BTreeMap::new(),
            phase: Phase::Setup,
            game: None,
            next_player_id: 1,
            next_round_id: 1,
            next_game_id: 1,
        }
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Add a player with the trimmed `name`. The player joins the pending
    /// round at 0.
    pub fn add_player(&mut self, name: &str) -> Result<Player, LedgerError> {
        self.check_roster_unlocked()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if let Some(existing) = self.player_by_name(name) {
            return Err(LedgerError::DuplicateName {
                name: existing.name.clone(),
            });
        }

        let player = Player {
            id: PlayerId(self.next_player_id),
            name: name.to_string(),
        };
        self.next_player_id += 1;

        self.pending.insert(player.id, 0);
        self.players.push(player.clone());
        info!("Added player {} ({})", player.name, player.id);
        Ok(player)
    }

    /// Remove a player, dropping its pending entry and its entries in every
    /// committed round. Other players' deltas are untouched.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, LedgerError> {
        self.check_roster_unlocked()?;

        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(LedgerError::NotFound { id })?;

        let player = self.players.remove(idx);
        self.pending.remove(&id);
        for round in &mut self.rounds {
            round.forget_player(id);
        }
        info!("Removed player {} ({})", player.name, player.id);
        Ok(player)
    }

    fn check_roster_unlocked(&self) -> Result<(), LedgerError> {
        if self.rules.lock_roster_when_active && self.phase == Phase::Active {
            return Err(LedgerError::RosterLocked);
        }
        Ok(())
    }

    fn check_enough_players(&self) -> Result<(), LedgerError> {
        if self.players.len() < self.rules.min_players {
            return Err(LedgerError::InsufficientPlayers {
                required: self.rules.min_players,
                actual: self.players.len(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Game lifecycle
    // -----------------------------------------------------------------------

    /// Start (or rename) the game. Requires at least `min_players` players.
    pub fn start_game(&mut self, name: &str, goal: ScoreGoal) -> Result<&GameInfo, LedgerError> {
        self.start_game_at(name, goal, Utc::now())
    }

    /// `start_game` with an explicit creation timestamp.
    pub fn start_game_at(
        &mut self,
        name: &str,
        goal: ScoreGoal,
        created_at: DateTime<Utc>,
    ) -> Result<&GameInfo, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        self.check_enough_players()?;

        let info = match self.game.take() {
            // Restarting an active game keeps its identity and timestamp.
            Some(existing) => GameInfo {
                name: name.to_string(),
                goal,
                ..existing
            },
            None => {
                let id = self.next_game_id;
                self.next_game_id += 1;
                GameInfo {
                    id,
                    name: name.to_string(),
                    goal,
                    created_at,
                }
            }
        };
        info!(
            "Game '{}' started with {} players ({})",
            info.name,
            self.players.len(),
            info.goal
        );
        self.phase = Phase::Active;
        let info: &GameInfo = self.game.insert(info);
        Ok(info)
    }

    /// Clear the round history and the pending round. Players, phase and
    /// game metadata are kept; numbering restarts at 1.
    pub fn reset_rounds(&mut self) {
        let cleared = self.rounds.len();
        self.rounds.clear();
        self.zero_pending();
        info!("Reset {} committed rounds", cleared);
    }

    /// Discard everything: players, rounds, pending scores and game metadata.
    /// Id counters keep running so ids are never reused.
    pub fn new_game(&mut self) {
        self.players.clear();
        self.rounds.clear();
        self.pending.clear();
        self.game = None;
        self.phase = Phase::Setup;
        info!("Ledger cleared for a new game");
    }

    // -----------------------------------------------------------------------
    // Pending round
    // -----------------------------------------------------------------------

    /// Add `delta` to a player's pending score, honoring the score floor.
    ///
    /// With `ScoreFloor::Zero` the player's displayed score (total + pending)
    /// is clamped at 0 and only the effective change is kept. Returns the
    /// player's new pending score. Fails with `ScoreOverflow` if the player's
    /// displayed score or the open round's total would leave the `i64` range.
    pub fn adjust_pending_score(&mut self, id: PlayerId, delta: i64) -> Result<i64, LedgerError> {
        if self.player(id).is_none() {
            return Err(LedgerError::NotFound { id });
        }
        let overflow = LedgerError::ScoreOverflow { id };

        let displayed = self.display_score(id);
        let target = self
            .rules
            .score_floor
            .apply(displayed, delta)
            .ok_or(overflow.clone())?;
        let effective = target.checked_sub(displayed).ok_or(overflow.clone())?;
        let pending = self
            .pending_score(id)
            .checked_add(effective)
            .ok_or(overflow.clone())?;

        // The open round becomes a committed round; its total must stay in range.
        self.pending
            .iter()
            .map(|(&p, &v)| if p == id { pending } else { v })
            .try_fold(0i64, |acc, v| acc.checked_add(v))
            .ok_or(overflow)?;

        self.pending.insert(id, pending);
        debug!(
            "Pending score for {} adjusted by {} (effective {}), now {}",
            id, delta, effective, pending
        );
        Ok(pending)
    }

    /// Whether any pending score is non-zero. Callers use this to gate
    /// committing a round; the ledger itself accepts an all-zero round.
    pub fn has_non_zero_pending(&self) -> bool {
        self.pending.values().any(|&v| v != 0)
    }

    /// Freeze the pending scores into the next round and zero the pending
    /// round. Moves a Setup ledger to Active.
    pub fn commit_round(&mut self) -> Result<&Round, LedgerError> {
        self.check_enough_players()?;

        let scores: BTreeMap<PlayerId, i64> = self
            .players
            .iter()
            .map(|p| (p.id, self.pending_score(p.id)))
            .collect();
        let number = self.rounds.len() as u32 + 1;
        let round = Round::new(RoundId(self.next_round_id), number, scores);
        self.next_round_id += 1;

        info!(
            "Committed round {} ({}), total {}",
            round.number(),
            round.id(),
            round.total()
        );
        self.rounds.push(round);
        self.zero_pending();
        self.phase = Phase::Active;

        Ok(&self.rounds[self.rounds.len() - 1])
    }

    fn zero_pending(&mut self) {
        self.pending = self.players.iter().map(|p| (p.id, 0)).collect();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn rules(&self) -> &LedgerRules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game(&self) -> Option<&GameInfo> {
        self.game.as_ref()
    }

    /// Players in insertion order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Committed rounds in commit order.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Pending scores keyed by player id.
    pub fn pending(&self) -> &BTreeMap<PlayerId, i64> {
        &self.pending
    }

    /// Number the next committed round will get.
    pub fn round_number(&self) -> u32 {
        self.rounds.len() as u32 + 1
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Look up a player by case-insensitive name.
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.has_name(name))
    }

    /// Sum of the player's deltas over all committed rounds. Unknown players
    /// score 0.
    pub fn total_score(&self, id: PlayerId) -> i64 {
        self.rounds
            .iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.score_for(id)))
    }

    pub fn pending_score(&self, id: PlayerId) -> i64 {
        self.pending.get(&id).copied().unwrap_or(0)
    }

    /// Running score shown while a round is open: total plus pending.
    pub fn display_score(&self, id: PlayerId) -> i64 {
        self.total_score(id).saturating_add(self.pending_score(id))
    }

    /// Players ranked by descending total. Equal totals keep insertion order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .players
            .iter()
            .map(|p| Standing {
                player: p.clone(),
                total: self.total_score(p.id),
            })
            .collect();
        // sort_by is stable
        standings.sort_by(|a, b| b.total.cmp(&a.total));
        standings
    }

    /// Goal of the started game, or the rules' default.
    pub fn goal(&self) -> ScoreGoal {
        self.game
            .as_ref()
            .map(|g| g.goal)
            .unwrap_or(self.rules.default_goal)
    }

    /// The leading player under `goal`, once at least one round is committed.
    ///
    /// Scans players in insertion order and only replaces the incumbent on a
    /// strict improvement, so the first player to reach the extreme wins ties.
    pub fn winner(&self, goal: ScoreGoal) -> Option<&Player> {
        if self.rounds.is_empty() {
            return None;
        }

        let mut best: Option<(&Player, i64)> = None;
        for player in &self.players {
            let total = self.total_score(player.id);
            match best {
                Some((_, incumbent)) if !goal.improves(total, incumbent) => {}
                _ => best = Some((player, total)),
            }
        }
        best.map(|(player, _)| player)
    }

    /// `winner` under the game's goal.
    pub fn current_winner(&self) -> Option<&Player> {
        self.winner(self.goal())
    }

    /// Whether a round may be committed right now: enough players and at
    /// least one non-zero pending score.
    pub fn can_commit(&self) -> bool {
        self.players.len() >= self.rules.min_players && self.has_non_zero_pending()
    }

    /// Capture the read model a front end renders.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::capture(self)
    }
}
