// Card game score keeper entry point.
//
// Startup sequence:
// 1. Load config (copying defaults on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Create the ledger-owning AppState
// 4. Read commands line by line until `quit` or end of input

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::{info, warn};

use cardtally_app::app::AppState;
use cardtally_app::config::{self, LoggingConfig};
use cardtally_app::input;
use cardtally_app::protocol::{UiUpdate, UserCommand, View};
use cardtally_app::render;

fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    info!(
        "Config loaded: variant={:?}, {} game types",
        config.rules.variant,
        config.game_types.len()
    );

    // 3. Create the application state
    let mut state = AppState::new(config);

    // 4. Command loop
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "cardtally - type `help` for commands")?;
    let first = state.handle_user_command(UserCommand::Show(View::Table));
    writeln!(out, "{}", render::render(&first))?;
    prompt(&mut out)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        match input::parse_command(&line) {
            Ok(None) => {}
            Ok(Some(cmd)) => {
                let update = state.handle_user_command(cmd);
                writeln!(out, "{}", render::render(&update))?;
                if update == UiUpdate::Quit {
                    break;
                }
            }
            Err(e) => {
                warn!("Unparseable input {:?}: {}", line, e);
                writeln!(out, "error: {e}")?;
            }
        }
        prompt(&mut out)?;
    }

    info!("Session ended after {} rounds", state.ledger.rounds().len());
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

/// Initialize tracing to log to a file (not the terminal, which is used for
/// the interactive session).
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(&logging.dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("cardtally.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
