// Configuration loading and parsing (cardtally.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use cardtally_core::{player::names_match, LedgerRules, ScoreFloor, ScoreGoal, Variant};

/// Name of the single config file under `config/` (and `defaults/`).
pub const CONFIG_FILE: &str = "cardtally.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rules: RulesConfig,
    /// Selectable game presets, in menu order.
    #[serde(default)]
    pub game_types: Vec<GameType>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[rules]` table. Unset overrides fall back to the variant's preset.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub score_floor: Option<ScoreFloor>,
    #[serde(default = "default_min_players")]
    pub min_players: usize,
    #[serde(default)]
    pub lock_roster_when_active: Option<bool>,
    #[serde(default)]
    pub default_goal: ScoreGoal,
    /// Let `commit` freeze a round in which every delta is zero.
    #[serde(default)]
    pub allow_empty_rounds: bool,
}

fn default_min_players() -> usize {
    2
}

impl RulesConfig {
    /// Resolve the variant preset plus overrides into ledger rules.
    pub fn ledger_rules(&self) -> LedgerRules {
        let preset = LedgerRules::for_variant(self.variant);
        LedgerRules {
            score_floor: self.score_floor.unwrap_or(preset.score_floor),
            min_players: self.min_players,
            lock_roster_when_active: self
                .lock_roster_when_active
                .unwrap_or(preset.lock_roster_when_active),
            default_goal: self.default_goal,
        }
    }
}

/// A named card game and which end of the table wins it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameType {
    pub name: String,
    pub goal: ScoreGoal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Directory for `cardtally.log`, relative to the working directory.
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            dir: default_log_dir(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".into()
}

fn default_log_filter() -> String {
    "cardtally_core=info,cardtally_app=info,warn".into()
}

impl Config {
    /// Find a configured game type by case-insensitive name.
    pub fn game_type(&self, name: &str) -> Option<&GameType> {
        self.game_types.iter().find(|g| names_match(&g.name, name))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/cardtally.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text, &path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy `defaults/cardtally.toml` to `config/cardtally.toml` unless the
/// config file already exists. Returns the path written, if any.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither config/{CONFIG_FILE} nor defaults/{CONFIG_FILE} found in {}; \
                 run from the crate root or ensure defaults/ is present",
                base_dir.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create config directory: {e}"),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;
    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Copies the default config file first if none exists yet.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.rules.min_players < 2 {
        return Err(ConfigError::ValidationError {
            field: "rules.min_players".into(),
            message: format!("must be at least 2, got {}", config.rules.min_players),
        });
    }

    for (i, game_type) in config.game_types.iter().enumerate() {
        if game_type.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("game_types[{i}].name"),
                message: "must not be empty".into(),
            });
        }
        let duplicate = config.game_types[..i]
            .iter()
            .any(|earlier| names_match(&earlier.name, &game_type.name));
        if duplicate {
            return Err(ConfigError::ValidationError {
                field: format!("game_types[{i}].name"),
                message: format!("duplicate game type `{}`", game_type.name),
            });
        }
    }

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the path to the cardtally-app crate root
    /// (works whether `cargo test` runs from the crate root or repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/cardtally-app/defaults").exists() {
            cwd.join("crates/cardtally-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Write `body` as config/cardtally.toml under a fresh temp dir.
    fn temp_config(dir_name: &str, body: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(dir_name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), body).unwrap();
        tmp
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let root = project_root();
        let tmp = std::env::temp_dir().join("cardtally_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            root.join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        let copied = ensure_config_file(&tmp).expect("should copy default config");
        assert_eq!(copied, Some(tmp.join("config").join(CONFIG_FILE)));
        let config = load_config_from(&tmp).expect("should load default config");

        assert_eq!(config.rules.variant, Variant::Web);
        assert_eq!(config.rules.min_players, 2);
        assert!(!config.rules.allow_empty_rounds);
        assert_eq!(config.game_type("hearts").unwrap().goal, ScoreGoal::LowestWins);
        assert_eq!(config.game_type("Rummy").unwrap().goal, ScoreGoal::HighestWins);
        assert_eq!(config.logging.dir, "logs");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let tmp = temp_config("cardtally_config_minimal", "[rules]\n");
        let config = load_config_from(&tmp).expect("should load minimal config");
        assert_eq!(config.rules.variant, Variant::Web);
        assert_eq!(config.rules.default_goal, ScoreGoal::HighestWins);
        assert!(config.game_types.is_empty());
        assert_eq!(config.logging.filter, "cardtally_core=info,cardtally_app=info,warn");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn mobile_variant_resolves_zero_floor() {
        let tmp = temp_config(
            "cardtally_config_mobile",
            "[rules]\nvariant = \"mobile\"\nlock_roster_when_active = false\n",
        );
        let config = load_config_from(&tmp).unwrap();
        let rules = config.rules.ledger_rules();
        assert_eq!(rules.score_floor, ScoreFloor::Zero);
        assert!(!rules.lock_roster_when_active);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn score_floor_override_beats_variant() {
        let tmp = temp_config(
            "cardtally_config_floor_override",
            "[rules]\nvariant = \"web\"\nscore_floor = \"zero\"\n",
        );
        let rules = load_config_from(&tmp).unwrap().rules.ledger_rules();
        assert_eq!(rules.score_floor, ScoreFloor::Zero);
        assert!(rules.lock_roster_when_active);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_min_players_below_two() {
        let tmp = temp_config("cardtally_config_min_players", "[rules]\nmin_players = 1\n");
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "rules.min_players");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_duplicate_game_types() {
        let tmp = temp_config(
            "cardtally_config_dup_types",
            "[rules]\n\n[[game_types]]\nname = \"Hearts\"\ngoal = \"lowest_wins\"\n\n\
             [[game_types]]\nname = \"hearts\"\ngoal = \"highest_wins\"\n",
        );
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, message } => {
                assert_eq!(field, "game_types[1].name");
                assert!(message.contains("duplicate"));
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_game_type_name() {
        let tmp = temp_config(
            "cardtally_config_blank_type",
            "[rules]\n\n[[game_types]]\nname = \"  \"\ngoal = \"lowest_wins\"\n",
        );
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ValidationError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("cardtally_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("cardtally_config_invalid", "this is not valid [[[ toml");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_unknown_variant() {
        let tmp = temp_config("cardtally_config_bad_variant", "[rules]\nvariant = \"desktop\"\n");
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_keeps_existing_config() {
        let tmp = temp_config("cardtally_config_ensure_keeps", "# custom\n");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), "[rules]\n").unwrap();
        fs::write(tmp.join("defaults").join("extra.toml"), "[rules]\n").unwrap();

        assert_eq!(ensure_config_file(&tmp).expect("should succeed"), None);
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");
        assert!(!tmp.join("config").join("extra.toml").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_errors_when_both_files_missing() {
        let tmp = std::env::temp_dir().join("cardtally_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_file(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither config/cardtally.toml nor defaults/cardtally.toml"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
