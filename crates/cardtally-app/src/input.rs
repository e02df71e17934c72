// Line input parsing.
//
// Translates one line typed at the prompt into a UserCommand. Blank lines
// and `#` comments parse to nothing.

use thiserror::Error;

use cardtally_core::ScoreGoal;

use crate::protocol::{UserCommand, View};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command `{0}` (type `help` for a list)")]
    UnknownCommand(String),

    #[error("`{command}` needs {what}")]
    MissingArgument { command: &'static str, what: &'static str },

    #[error("`{0}` is not a whole number")]
    InvalidNumber(String),
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Option<UserCommand>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let cmd = match head.to_lowercase().as_str() {
        "add" => UserCommand::AddPlayer {
            name: required(rest, "add", "a player name")?.to_string(),
        },
        "remove" | "rm" => UserCommand::RemovePlayer {
            player: required(rest, "remove", "a player")?.to_string(),
        },
        "score" => {
            let rest = required(rest, "score", "a player and a delta")?;
            let (player, delta) = split_last_word(rest).ok_or(InputError::MissingArgument {
                command: "score",
                what: "a player and a delta",
            })?;
            UserCommand::AdjustScore {
                player: player.to_string(),
                delta: parse_delta(delta)?,
            }
        }
        "commit" | "done" => UserCommand::CommitRound,
        "reset" => UserCommand::ResetRounds,
        "new" => UserCommand::NewGame,
        "start" => parse_start(required(rest, "start", "a game name")?),
        "types" => UserCommand::ListGameTypes,
        "show" | "table" => UserCommand::Show(View::Table),
        "standings" => UserCommand::Show(View::Standings),
        "history" | "rounds" => UserCommand::Show(View::History),
        "winner" => UserCommand::Show(View::Winner),
        "export" => UserCommand::Export,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" | "q" => UserCommand::Quit,
        _ => return parse_shorthand(line),
    };
    Ok(Some(cmd))
}

/// `<player> +3` / `<player> -2`: adjust without the `score` keyword.
fn parse_shorthand(line: &str) -> Result<Option<UserCommand>, InputError> {
    let unknown = || {
        let head = line.split_whitespace().next().unwrap_or(line);
        InputError::UnknownCommand(head.to_string())
    };
    let (player, delta) = split_last_word(line).ok_or_else(unknown)?;
    if !delta.starts_with(['+', '-']) {
        return Err(unknown());
    }
    Ok(Some(UserCommand::AdjustScore {
        player: player.to_string(),
        delta: parse_delta(delta)?,
    }))
}

/// `start <name> [highest|lowest]`.
fn parse_start(rest: &str) -> UserCommand {
    if let Some((name, last)) = split_last_word(rest) {
        if let Ok(goal) = last.parse::<ScoreGoal>() {
            return UserCommand::StartGame {
                name: name.to_string(),
                goal: Some(goal),
            };
        }
    }
    UserCommand::StartGame {
        name: rest.to_string(),
        goal: None,
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, InputError> {
    if rest.is_empty() {
        Err(InputError::MissingArgument { command, what })
    } else {
        Ok(rest)
    }
}

/// Split off the final whitespace-separated word. `None` for a single word.
fn split_last_word(s: &str) -> Option<(&str, &str)> {
    let (front, last) = s.trim().rsplit_once(char::is_whitespace)?;
    let front = front.trim();
    if front.is_empty() {
        None
    } else {
        Some((front, last))
    }
}

/// A signed integer with at most one leading `+` or `-`.
fn parse_delta(s: &str) -> Result<i64, InputError> {
    s.parse::<i64>()
        .map_err(|_| InputError::InvalidNumber(s.to_string()))
}
