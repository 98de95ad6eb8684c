//! Errors raised while building or loading a village.

use thiserror::Error;

use crate::entities::HouseId;

/// Errors from the rules crate.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("unknown house: {0}")]
    UnknownHouse(HouseId),

    #[error("duplicate house id: {0}")]
    DuplicateHouse(HouseId),

    /// Villagers must have someone living in them from day one.
    #[error("villager house {0} has no npc authored for day 1")]
    MissingNpc(HouseId),

    #[error("village has no villager houses")]
    NoVillagers,

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid village script: {0}")]
    Script(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
