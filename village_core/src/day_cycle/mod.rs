//! Day Transition Engine - advances the village by one night.
//!
//! The transition works as follows:
//! 1. **Next day**: `cycle + 1`
//! 2. **Scripted**: write every house's overrides authored for that day
//! 3. **Fallback**: past the last authored day, if no script changed a status,
//!    a random surviving villager dies so the story keeps moving
//! 4. **Commit**: store the new day, clear the open house and unpause

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use village_rules::{HouseId, HouseStatus, WorldState};

/// What one night changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    pub day: u32,
    /// Houses whose status an authored override changed.
    pub scripted_changes: Vec<HouseId>,
    /// Villager claimed by the procedural fallback, if it fired.
    pub fallback_victim: Option<HouseId>,
}

impl DayReport {
    /// Every house whose status changed overnight.
    pub fn changed_houses(&self) -> impl Iterator<Item = &HouseId> {
        self.scripted_changes.iter().chain(self.fallback_victim.iter())
    }
}

/// Runs day transitions.
#[derive(Debug, Clone, Copy)]
pub struct DayCycle {
    final_authored_day: u32,
}

impl DayCycle {
    pub fn new(final_authored_day: u32) -> Self {
        Self { final_authored_day }
    }

    pub fn final_authored_day(&self) -> u32 {
        self.final_authored_day
    }

    /// Advance `world` by exactly one day.
    pub fn advance<R: Rng + ?Sized>(&self, world: &mut WorldState, rng: &mut R) -> DayReport {
        self.advance_sparing(world, rng, None)
    }

    /// Advance by one day; the fallback never claims `spared`.
    pub fn advance_sparing<R: Rng + ?Sized>(
        &self,
        world: &mut WorldState,
        rng: &mut R,
        spared: Option<&HouseId>,
    ) -> DayReport {
        let day = world.cycle + 1;

        let scripted_changes = world.apply_overrides_for_day(day);
        debug!(day, changed = scripted_changes.len(), "applied scripted overrides");

        let fallback_victim = if day > self.final_authored_day && scripted_changes.is_empty() {
            self.claim_random_villager(world, rng, spared)
        } else {
            None
        };

        world.cycle = day;
        world.current_house = None;
        world.is_paused = false;

        info!(day, survivors = world.count_survivors(), "a new day begins");
        DayReport {
            day,
            scripted_changes,
            fallback_victim,
        }
    }

    fn claim_random_villager<R: Rng + ?Sized>(
        &self,
        world: &mut WorldState,
        rng: &mut R,
        spared: Option<&HouseId>,
    ) -> Option<HouseId> {
        let candidates: Vec<HouseId> = world
            .accusable_houses()
            .into_iter()
            .filter(|h| Some(&h.id) != spared)
            .map(|h| h.id.clone())
            .collect();
        let victim = candidates.choose(rng)?.clone();

        world.house_mut(&victim)?.status = HouseStatus::Dead;
        info!(house = %victim, "the night claimed a villager");
        Some(victim)
    }
}
