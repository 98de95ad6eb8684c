//! Accusation Resolver - owns the hidden antagonist and judges accusations.
//!
//! States: `Idle -> Accusing -> (Won | Lost | Idle)`. `Won` and `Lost` are
//! terminal, and this is the only place that can reach them.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use village_rules::{GameConfig, House, HouseId, HouseStatus, WorldState, WrongAccusationPolicy};

use crate::error::CoreError;
use crate::remote::VerdictOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccusationState {
    Idle,
    Accusing,
    Won,
    Lost,
}

impl AccusationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AccusationState::Won | AccusationState::Lost)
    }
}

/// Result of naming a suspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccusationOutcome {
    Won,
    /// Correct, but victory waits until the village reaches its final count.
    Exposed,
    /// An innocent died and play continues.
    Innocent(HouseId),
    /// An innocent died and the game is over.
    Lost(HouseId),
    /// Not accusing, or the suspect cannot be accused. Nothing changed.
    Rejected,
}

pub struct AccusationResolver {
    antagonist: HouseId,
    state: AccusationState,
    exposed: bool,
    wrong_accusation: WrongAccusationPolicy,
    loss_threshold: usize,
    expected_final_survivors: usize,
    confirm_victory_at_final_day: bool,
}

impl AccusationResolver {
    /// Pick the antagonist among villagers that no authored day takes out of
    /// play, so the true culprit can always still be accused.
    pub fn assign<R: Rng + ?Sized>(world: &WorldState, config: &GameConfig, rng: &mut R) -> Result<Self, CoreError> {
        let candidates: Vec<&HouseId> = world
            .houses
            .iter()
            .filter(|h| h.is_villager() && !h.ever_leaves_play())
            .map(|h| &h.id)
            .collect();
        let antagonist = candidates
            .choose(rng)
            .map(|id| (*id).clone())
            .ok_or(CoreError::NoAntagonistCandidates)?;
        Ok(Self::with_antagonist(antagonist, config))
    }

    /// Use a fixed antagonist (scripted scenarios).
    pub fn with_antagonist(antagonist: HouseId, config: &GameConfig) -> Self {
        Self {
            antagonist,
            state: AccusationState::Idle,
            exposed: false,
            wrong_accusation: config.wrong_accusation,
            loss_threshold: config.loss_threshold,
            expected_final_survivors: config.expected_final_survivors,
            confirm_victory_at_final_day: config.confirm_victory_at_final_day,
        }
    }

    // The session spares the antagonist from the night's fallback.
    pub(crate) fn antagonist(&self) -> &HouseId {
        &self.antagonist
    }

    pub fn state(&self) -> AccusationState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Whether the antagonist has been named but victory is still pending.
    pub fn is_exposed(&self) -> bool {
        self.exposed
    }

    /// Enter accusation mode. Returns the suspects, or `None` outside `Idle`.
    pub fn begin(&mut self, world: &WorldState) -> Option<Vec<HouseId>> {
        if self.state != AccusationState::Idle {
            return None;
        }
        self.state = AccusationState::Accusing;
        Some(world.accusable_houses().into_iter().map(|h| h.id.clone()).collect())
    }

    /// Leave accusation mode without naming anyone.
    pub fn cancel(&mut self) -> bool {
        if self.state != AccusationState::Accusing {
            return false;
        }
        self.state = AccusationState::Idle;
        true
    }

    /// Judge an accusation locally.
    pub fn accuse(&mut self, world: &mut WorldState, suspect: &HouseId) -> AccusationOutcome {
        let correct = *suspect == self.antagonist;
        self.resolve(world, suspect, correct)
    }

    /// Apply a verdict handed down by the remote adjudicator.
    pub fn accept_verdict(
        &mut self,
        world: &mut WorldState,
        suspect: &HouseId,
        verdict: VerdictOutcome,
    ) -> AccusationOutcome {
        self.resolve(world, suspect, verdict == VerdictOutcome::Win)
    }

    fn resolve(&mut self, world: &mut WorldState, suspect: &HouseId, correct: bool) -> AccusationOutcome {
        if self.state != AccusationState::Accusing {
            return AccusationOutcome::Rejected;
        }
        let Some(house) = world.house_mut(suspect).filter(|h| h.is_accusable()) else {
            return AccusationOutcome::Rejected;
        };

        if correct && !self.confirm_victory_at_final_day {
            self.state = AccusationState::Won;
            info!(house = %suspect, "antagonist unmasked");
            return AccusationOutcome::Won;
        }

        house.status = HouseStatus::Dead;

        if correct {
            self.exposed = true;
            self.state = AccusationState::Idle;
            info!(house = %suspect, "antagonist exposed; holding out for the final day");
            return AccusationOutcome::Exposed;
        }

        warn!(house = %suspect, "an innocent was eliminated");
        match self.wrong_accusation {
            WrongAccusationPolicy::ReturnToPlay => {
                self.state = AccusationState::Idle;
                AccusationOutcome::Innocent(suspect.clone())
            }
            WrongAccusationPolicy::GameOver => {
                self.state = AccusationState::Lost;
                AccusationOutcome::Lost(suspect.clone())
            }
        }
    }

    /// Check the survivor-based end conditions after a night.
    ///
    /// Returns the new terminal state if one was reached.
    pub fn check_after_day(&mut self, world: &WorldState) -> Option<AccusationState> {
        if self.is_over() {
            return None;
        }
        let survivors = world.count_survivors();
        let antagonist_present = world.house(&self.antagonist).is_some_and(House::is_accusable);

        if self.exposed && survivors <= self.expected_final_survivors {
            self.state = AccusationState::Won;
        } else if (!self.exposed && !antagonist_present) || survivors <= self.loss_threshold {
            self.state = AccusationState::Lost;
        } else {
            return None;
        }

        info!(survivors, state = ?self.state, "game decided at dawn");
        Some(self.state)
    }
}

impl std::fmt::Debug for AccusationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The antagonist never leaves this module.
        f.debug_struct("AccusationResolver")
            .field("state", &self.state)
            .field("exposed", &self.exposed)
            .field("wrong_accusation", &self.wrong_accusation)
            .finish_non_exhaustive()
    }
}
