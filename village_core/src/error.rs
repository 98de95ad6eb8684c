//! Engine errors. Only configuration and remote-service failures surface here;
//! sequencing mistakes are reported as no-op outcomes instead.

use thiserror::Error;
use village_rules::RulesError;

use crate::remote::ServiceError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The remote adjudicator could not be reached or refused the call.
    #[error("adjudicator unavailable: {0}")]
    Service(#[from] ServiceError),

    #[error("no remote session; connect first")]
    NotConnected,

    #[error("a request is already in flight")]
    RequestInFlight,

    #[error("no villager can be the antagonist")]
    NoAntagonistCandidates,
}
