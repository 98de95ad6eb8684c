//! Game configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RulesError;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 1337;

/// What a wrong accusation costs the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WrongAccusationPolicy {
    /// The innocent dies and play continues.
    #[default]
    ReturnToPlay,
    /// The innocent dies and the game is lost.
    GameOver,
}

/// Tunables for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random choice in a session.
    pub seed: u64,

    /// Last day with authored content. Past it, each night claims a random villager.
    pub final_authored_day: u32,

    /// The game is lost once survivors drop to this many.
    pub loss_threshold: usize,

    /// Survivor count expected on the final authored day.
    pub expected_final_survivors: usize,

    pub wrong_accusation: WrongAccusationPolicy,

    /// Hold a correct accusation until survivors reach `expected_final_survivors`.
    pub confirm_victory_at_final_day: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            final_authored_day: 3,
            loss_threshold: 1,
            expected_final_survivors: 2,
            wrong_accusation: WrongAccusationPolicy::ReturnToPlay,
            confirm_victory_at_final_day: false,
        }
    }
}

impl GameConfig {
    /// Parse a config; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, RulesError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_wrong_accusation(mut self, policy: WrongAccusationPolicy) -> Self {
        self.wrong_accusation = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.final_authored_day, 3);
        assert_eq!(config.wrong_accusation, WrongAccusationPolicy::ReturnToPlay);
    }

    #[test]
    fn test_partial_toml() {
        let config = GameConfig::from_toml_str(
            r#"
            seed = 42
            wrong_accusation = "game_over"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.wrong_accusation, WrongAccusationPolicy::GameOver);
        assert_eq!(config.loss_threshold, 1);
        assert!(!config.confirm_victory_at_final_day);
    }

    #[test]
    fn test_bad_toml() {
        let result = GameConfig::from_toml_str("seed = \"not a number\"");
        assert!(matches!(result, Err(RulesError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = GameConfig::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(RulesError::Io(_))));
    }
}
