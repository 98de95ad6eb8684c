//! Village mechanics: house kinds, statuses, dialogue actions and directions.

use serde::{Deserialize, Serialize};

/// The role a house plays in the village.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HouseKind {
    /// The guard post. Sleeping and accusations happen here.
    Guard,
    Villager,
    /// Scripted location that only plays cinematics (e.g. the summoning circle).
    SpecialEvent,
}

/// Condition of a house and its occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum HouseStatus {
    #[default]
    Normal,
    Infected,
    Dead,
    Missing,
}

impl HouseStatus {
    /// Whether the occupant can still be talked to or accused.
    pub fn is_present(&self) -> bool {
        matches!(self, HouseStatus::Normal)
    }

    /// Whether the occupant is gone for good.
    pub fn is_gone(&self) -> bool {
        matches!(self, HouseStatus::Dead | HouseStatus::Missing)
    }
}

/// Terminal actions a dialogue option can hand to the rest of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogueAction {
    /// End the day (guard house only).
    Sleep,
    /// Open the accusation picker.
    Eliminate,
    /// Close the conversation.
    Close,
    /// Hand off to free-form interrogation.
    Chat,
}

/// Directional input for the spatial selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Unit vector in screen space (y grows downward).
    pub fn vector(&self) -> (f64, f64) {
        match self {
            Direction::North => (0.0, -1.0),
            Direction::South => (0.0, 1.0),
            Direction::East => (1.0, 0.0),
            Direction::West => (-1.0, 0.0),
        }
    }

    /// Map a WASD key to a direction.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::North),
            's' => Some(Direction::South),
            'd' => Some(Direction::East),
            'a' => Some(Direction::West),
            _ => None,
        }
    }
}
