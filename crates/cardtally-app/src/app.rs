// Application state and command handling.
//
// Owns the single GameLedger for the session, resolves user references to
// players, enforces the caller-side gates the ledger leaves open (such as
// refusing all-zero rounds) and produces UiUpdates for the renderer.

use thiserror::Error;
use tracing::{info, warn};

use cardtally_core::{GameLedger, LedgerError, PlayerId, ScoreGoal};

use crate::config::Config;
use crate::protocol::{UiUpdate, UserCommand, View};

/// Why a command was refused.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("no player named `{0}`")]
    UnknownPlayer(String),

    #[error("nothing to commit: every pending score is zero")]
    EmptyRound,

    #[error("failed to export snapshot: {0}")]
    Export(#[from] serde_json::Error),
}

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub ledger: GameLedger,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let ledger = GameLedger::new(config.rules.ledger_rules());
        AppState { config, ledger }
    }

    /// Apply one command. Refusals come back as `UiUpdate::Rejected` and
    /// leave the ledger untouched.
    pub fn handle_user_command(&mut self, cmd: UserCommand) -> UiUpdate {
        let label = format!("{cmd:?}");
        match self.apply(cmd) {
            Ok(update) => update,
            Err(e) => {
                warn!("Rejected {}: {}", label, e);
                UiUpdate::Rejected(e.to_string())
            }
        }
    }

    fn apply(&mut self, cmd: UserCommand) -> Result<UiUpdate, AppError> {
        let update = match cmd {
            UserCommand::AddPlayer { name } => {
                let player = self.ledger.add_player(&name)?;
                self.table(Some(format!("Added {} ({})", player.name, player.id)))
            }
            UserCommand::RemovePlayer { player } => {
                let id = self.resolve_player(&player)?;
                let removed = self.ledger.remove_player(id)?;
                self.table(Some(format!("Removed {}", removed.name)))
            }
            UserCommand::AdjustScore { player, delta } => {
                let id = self.resolve_player(&player)?;
                self.ledger.adjust_pending_score(id, delta)?;
                self.table(None)
            }
            UserCommand::CommitRound => {
                if !self.config.rules.allow_empty_rounds && !self.ledger.has_non_zero_pending() {
                    return Err(AppError::EmptyRound);
                }
                let round = self.ledger.commit_round()?;
                let notice = format!("Round {} recorded (total {})", round.number(), round.total());
                self.snapshot(View::History, Some(notice))
            }
            UserCommand::ResetRounds => {
                self.ledger.reset_rounds();
                self.table(Some("Round history cleared".into()))
            }
            UserCommand::NewGame => {
                self.ledger.new_game();
                self.table(Some("Started over with an empty table".into()))
            }
            UserCommand::StartGame { name, goal } => {
                let (name, goal) = self.resolve_game(&name, goal);
                let info = self.ledger.start_game(&name, goal)?;
                let notice = format!("Playing {} ({})", info.name, info.goal);
                self.table(Some(notice))
            }
            UserCommand::ListGameTypes => UiUpdate::GameTypes(self.config.game_types.clone()),
            UserCommand::Show(view) => self.snapshot(view, None),
            UserCommand::Export => {
                UiUpdate::Export(serde_json::to_string_pretty(&self.ledger.snapshot())?)
            }
            UserCommand::Help => UiUpdate::Help,
            UserCommand::Quit => {
                info!("Quit requested");
                UiUpdate::Quit
            }
        };
        Ok(update)
    }

    /// Resolve what the user typed to a player id: a name match wins, then
    /// the `p<n>` id form. Ids that parse but are unknown are passed through
    /// so the ledger reports them as not found.
    pub fn resolve_player(&self, key: &str) -> Result<PlayerId, AppError> {
        if let Some(player) = self.ledger.player_by_name(key) {
            return Ok(player.id);
        }
        key.trim()
            .parse::<PlayerId>()
            .map_err(|_| AppError::UnknownPlayer(key.trim().to_string()))
    }

    /// A configured game type supplies its canonical name and goal; an
    /// explicit goal always wins. Free-form names use the default goal.
    fn resolve_game(&self, name: &str, goal: Option<ScoreGoal>) -> (String, ScoreGoal) {
        match self.config.game_type(name) {
            Some(game_type) => (game_type.name.clone(), goal.unwrap_or(game_type.goal)),
            None => (
                name.trim().to_string(),
                goal.unwrap_or(self.ledger.rules().default_goal),
            ),
        }
    }

    fn table(&self, notice: Option<String>) -> UiUpdate {
        self.snapshot(View::Table, notice)
    }

    fn snapshot(&self, view: View, notice: Option<String>) -> UiUpdate {
        UiUpdate::Snapshot {
            view,
            notice,
            snapshot: Box::new(self.ledger.snapshot()),
        }
    }
}
