//! Entity definitions for the village.

mod dialogue;
mod house;

pub use dialogue::*;
pub use house::*;

use serde::{Deserialize, Serialize};

/// Stable identifier for a house. Never reused within a village.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseId(pub String);

impl HouseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HouseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for HouseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for HouseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in village (screen) space. y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `self` to `other`.
    pub fn delta_to(&self, other: Position) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}
