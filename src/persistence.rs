//! Whole-game save files.
//!
//! A save holds the config, board layout, full history and the random
//! source, so a loaded game continues exactly as the saved one would have.
//! Files are written beside the target with a `.json.tmp` extension and
//! renamed into place.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::Game;

/// Bumped whenever the saved shape changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema version mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u32, got: u32 },

    #[error("saved game has no states")]
    EmptyHistory,
}

#[derive(Serialize)]
struct SaveFile<'a> {
    schema_version: u32,
    game: &'a Game,
}

#[derive(Deserialize)]
struct LoadFile {
    schema_version: u32,
    game: Game,
}

impl Game {
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        let file = SaveFile {
            schema_version: SCHEMA_VERSION,
            game: self,
        };
        Ok(serde_json::to_string(&file)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let file: LoadFile = serde_json::from_str(json)?;
        if file.schema_version != SCHEMA_VERSION {
            return Err(PersistenceError::SchemaMismatch {
                expected: SCHEMA_VERSION,
                got: file.schema_version,
            });
        }
        if file.game.history().is_empty() {
            return Err(PersistenceError::EmptyHistory);
        }
        Ok(file.game)
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        let json = self.to_json()?;
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    #[test]
    fn json_round_trip_keeps_history_and_id() {
        let game = Game::new(GameConfig::default()).unwrap();
        let loaded = Game::from_json(&game.to_json().unwrap()).unwrap();
        assert_eq!(loaded.id, game.id);
        assert_eq!(loaded.config, game.config);
        assert_eq!(loaded.history(), game.history());
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let game = Game::new(GameConfig::default()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&game.to_json().unwrap()).unwrap();
        value["schema_version"] = serde_json::json!(99);
        let err = Game::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::SchemaMismatch {
                expected: SCHEMA_VERSION,
                got: 99
            }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Game::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
