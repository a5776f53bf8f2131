use crate::app_dirs::AppDirs;
use crate::game::{GameConfig, DEFAULT_INITIAL_SECONDS};
use crate::word_bank::{default_words, load_words_from_file};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings persisted between runs. Game sessions themselves are never saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub initial_seconds: u32,
    /// `None` means one less than the number of language labels
    pub max_wrong_guesses: Option<usize>,
    /// Newline-delimited word list replacing the built-in one
    pub word_list: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_seconds: DEFAULT_INITIAL_SECONDS,
            max_wrong_guesses: None,
            word_list: None,
            seed: None,
        }
    }
}

impl Config {
    /// Resolve into the core's construction config, reading the word list if one is set.
    pub fn to_game_config(&self) -> std::io::Result<GameConfig> {
        let words = match &self.word_list {
            Some(path) => load_words_from_file(path)?,
            None => default_words(),
        };
        Ok(GameConfig {
            initial_seconds: self.initial_seconds,
            max_wrong_guesses: self.max_wrong_guesses,
            words,
            seed: self.seed,
            ..GameConfig::default()
        })
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!(
                    "ignoring unreadable config {}: {e}",
                    self.path.display()
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            initial_seconds: 90,
            max_wrong_guesses: Some(3),
            word_list: Some(PathBuf::from("/tmp/words.txt")),
            seed: Some(42),
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn missing_or_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "initial_seconds": 30 }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.initial_seconds, 30);
        assert_eq!(cfg.max_wrong_guesses, None);
    }

    #[test]
    fn game_config_reads_word_list_file() {
        let dir = tempdir().unwrap();
        let words = dir.path().join("words.txt");
        fs::write(&words, "Ferris\ncrab\n").unwrap();
        let cfg = Config {
            word_list: Some(words),
            ..Config::default()
        };
        let game_cfg = cfg.to_game_config().unwrap();
        assert_eq!(game_cfg.words, vec!["ferris", "crab"]);
        assert_eq!(game_cfg.initial_seconds, DEFAULT_INITIAL_SECONDS);
    }

    #[test]
    fn game_config_missing_word_list_is_an_error() {
        let cfg = Config {
            word_list: Some(PathBuf::from("/definitely/not/here.txt")),
            ..Config::default()
        };
        assert!(cfg.to_game_config().is_err());
    }
}
