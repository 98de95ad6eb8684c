//! Remote adjudicator boundary.
//!
//! A deployment may hand interrogation and final verdicts to a remote service.
//! The engine only knows the [`Adjudicator`] trait; transports live outside
//! this crate. Requests are tracked one at a time so a late answer for a
//! conversation the player already left is dropped instead of applied.

mod request;

pub use request::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Line shown when an interrogation cannot reach the service.
pub const CONNECTION_FALLBACK: &str = "The wind howls... (Connection Error)";

/// Identifier of a game session, local or remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failures talking to the adjudicator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("service unreachable: {0}")]
    Unreachable(String),

    #[error("service rejected the request: {0}")]
    Rejected(String),

    #[error("malformed service response: {0}")]
    Malformed(String),
}

impl ServiceError {
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }
}

/// Reply to a free-form question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interrogation {
    pub response: String,
}

/// Reply to an advance-day call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAdvance {
    pub current_day: u32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictOutcome {
    Win,
    Lose,
}

/// Final word on an accusation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub result: VerdictOutcome,
    #[serde(default)]
    pub message: String,
}

/// The remote service a session may defer to.
#[async_trait]
pub trait Adjudicator: Send + Sync {
    async fn create_session(&self) -> Result<SessionId, ServiceError>;

    async fn advance_day(&self, session: SessionId) -> Result<DayAdvance, ServiceError>;

    /// Forward the player's text verbatim.
    async fn interrogate(
        &self,
        session: SessionId,
        character: &str,
        message: &str,
        day: u32,
    ) -> Result<Interrogation, ServiceError>;

    async fn eliminate(&self, session: SessionId, character: &str) -> Result<Verdict, ServiceError>;
}
