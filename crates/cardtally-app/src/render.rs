// Plain-text rendering of UiUpdates.

use std::fmt::Write;

use cardtally_core::snapshot::LedgerSnapshot;
use cardtally_core::Phase;

use crate::config::GameType;
use crate::protocol::{UiUpdate, View};

pub const HELP: &str = "\
Commands:
  add <name>                 add a player
  remove <player>            remove a player (name or id such as p2)
  score <player> <delta>     adjust the open round (shorthand: <player> +3)
  commit                     record the open round
  reset                      clear round history, keep players
  new                        clear everything
  start <game> [highest|lowest]
                             start a configured game type or a named game
  types                      list configured game types
  show | standings | history | winner
  export                     print the current state as JSON
  quit";

/// Render an update as the text shown to the user.
pub fn render(update: &UiUpdate) -> String {
    match update {
        UiUpdate::Snapshot {
            view,
            notice,
            snapshot,
        } => {
            let mut out = String::new();
            if let Some(notice) = notice {
                let _ = writeln!(out, "{notice}");
            }
            out.push_str(&render_view(*view, snapshot));
            out
        }
        UiUpdate::GameTypes(types) => render_game_types(types),
        UiUpdate::Export(json) => json.clone(),
        UiUpdate::Help => HELP.to_string(),
        UiUpdate::Rejected(reason) => format!("rejected: {reason}"),
        UiUpdate::Quit => "bye".to_string(),
    }
}

pub fn render_view(view: View, snap: &LedgerSnapshot) -> String {
    match view {
        View::Table => render_table(snap),
        View::Standings => render_standings(snap),
        View::History => render_history(snap),
        View::Winner => render_winner(snap),
    }
}

fn heading(snap: &LedgerSnapshot) -> String {
    match (&snap.game, snap.phase) {
        (Some(game), _) => format!("{} ({}) - round {}", game.name, game.goal, snap.round_number),
        (None, Phase::Active) => format!("Round {} ({})", snap.round_number, snap.goal),
        (None, Phase::Setup) => "Setup".to_string(),
    }
}

fn name_width(snap: &LedgerSnapshot) -> usize {
    snap.players
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(6)
}

fn render_table(snap: &LedgerSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading(snap));
    if snap.players.is_empty() {
        out.push_str("No players yet. Use `add <name>`.");
        return out;
    }

    let w = name_width(snap);
    let _ = writeln!(
        out,
        "{:<4} {:<w$} {:>7} {:>7} {:>7}",
        "id", "player", "total", "round", "score"
    );
    for p in &snap.players {
        let _ = writeln!(
            out,
            "{:<4} {:<w$} {:>7} {:>+7} {:>7}",
            p.id.to_string(),
            p.name,
            p.total,
            p.pending,
            p.display
        );
    }
    let gate = if snap.can_commit {
        "ready to commit"
    } else {
        "nothing to commit"
    };
    let _ = write!(out, "{} | {}", render_winner(snap), gate);
    out
}

fn render_standings(snap: &LedgerSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Standings");
    let w = name_width(snap);
    for (rank, s) in snap.standings.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {:<w$} {:>7}", rank + 1, s.player.name, s.total);
    }
    out.push_str(&render_winner(snap));
    out
}

fn render_history(snap: &LedgerSnapshot) -> String {
    let mut out = String::new();
    if snap.rounds.is_empty() {
        out.push_str("No rounds recorded yet.");
        return out;
    }

    let cols: Vec<usize> = snap
        .players
        .iter()
        .map(|p| p.name.chars().count().max(5))
        .collect();

    let _ = write!(out, "{:>5}", "round");
    for (p, &w) in snap.players.iter().zip(&cols) {
        let _ = write!(out, " {:>w$}", p.name);
    }
    let _ = writeln!(out, " {:>7}", "total");

    for round in &snap.rounds {
        let _ = write!(out, "{:>5}", round.number);
        for (delta, &w) in round.deltas.iter().zip(&cols) {
            match delta {
                Some(d) => {
                    let _ = write!(out, " {:>+w$}", d);
                }
                None => {
                    let _ = write!(out, " {:>w$}", "-");
                }
            }
        }
        let _ = writeln!(out, " {:>7}", round.total);
    }

    let _ = write!(out, "{:>5}", "sum");
    for (p, &w) in snap.players.iter().zip(&cols) {
        let _ = write!(out, " {:>w$}", p.total);
    }
    out
}

fn render_winner(snap: &LedgerSnapshot) -> String {
    match &snap.winner {
        Some(name) => format!("Leader: {name} ({})", snap.goal),
        None => "No winner yet".to_string(),
    }
}

fn render_game_types(types: &[GameType]) -> String {
    if types.is_empty() {
        return "No game types configured.".to_string();
    }
    types
        .iter()
        .map(|t| format!("  {} ({})", t.name, t.goal))
        .collect::<Vec<_>>()
        .join("\n")
}
