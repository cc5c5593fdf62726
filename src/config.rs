//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.
//! The file never gates gameplay; it tunes the shell: an optional RNG
//! seed for reproducible runs, display toggles, and log settings.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Seed for the maze's randomness source; omitted means entropy.
    pub seed: Option<u64>,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub color: bool,
    pub clear_screen: bool,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Empty string disables logging entirely.
    pub file: String,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    ui: TomlUi,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGame {
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlUi {
    #[serde(default = "default_color")]
    color: bool,
    #[serde(default = "default_clear_screen")]
    clear_screen: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_color() -> bool { true }
fn default_clear_screen() -> bool { true }
fn default_log_file() -> String { "mazewalk.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlUi {
    fn default() -> Self {
        TomlUi {
            color: default_color(),
            clear_screen: default_clear_screen(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig {
            seed: toml_cfg.game.seed,
            ui: UiConfig {
                color: toml_cfg.ui.color,
                clear_screen: toml_cfg.ui.clear_screen,
            },
            log: LogConfig {
                file: toml_cfg.log.file,
                level: toml_cfg.log.level,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_an_empty_file() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.game.seed, None);
        assert!(cfg.ui.color);
        assert!(cfg.ui.clear_screen);
        assert_eq!(cfg.log.file, "mazewalk.log");
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn partial_sections_keep_their_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[game]\nseed = 42\n\n[ui]\ncolor = false\n",
        )
        .unwrap();
        assert_eq!(cfg.game.seed, Some(42));
        assert!(!cfg.ui.color);
        assert!(cfg.ui.clear_screen);
        assert_eq!(cfg.log.level, "info");
    }
}
