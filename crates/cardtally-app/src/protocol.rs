// Messages between the input layer, the app state and the renderer.

use cardtally_core::{LedgerSnapshot, ScoreGoal};

use crate::config::GameType;

/// A user action, parsed from one line of input.
///
/// Players are referred to by the raw text the user typed: a name
/// (case-insensitive) or a `p<n>` id. The app resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    AddPlayer { name: String },
    RemovePlayer { player: String },
    AdjustScore { player: String, delta: i64 },
    CommitRound,
    ResetRounds,
    NewGame,
    /// Start with a configured game type or a free-form name; `goal`
    /// overrides the game type's goal.
    StartGame { name: String, goal: Option<ScoreGoal> },
    ListGameTypes,
    Show(View),
    Export,
    Help,
    Quit,
}

/// Which part of the read model to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Players with live pending scores plus the winner line.
    Table,
    Standings,
    History,
    Winner,
}

/// What the app hands back to the renderer after each command.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Redraw `view` from a fresh snapshot. `notice` is a one-line summary
    /// of what the command changed, if anything.
    Snapshot {
        view: View,
        notice: Option<String>,
        snapshot: Box<LedgerSnapshot>,
    },
    GameTypes(Vec<GameType>),
    /// Pretty-printed JSON of the current snapshot.
    Export(String),
    Help,
    /// The command was refused; the ledger is unchanged.
    Rejected(String),
    Quit,
}
