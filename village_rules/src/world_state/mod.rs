//! World state management - the central structure holding the village.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entities::{Cinematic, House, HouseId, Npc, Position};
use crate::error::RulesError;
use crate::mechanics::{HouseKind, HouseStatus};

/// What happens when the player interacts with a house today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum HouseEvent {
    Dialogue(Npc),
    Cinematic(Cinematic),
    /// An unstaffed guard post: the player may only rest.
    SleepPrompt,
}

/// The complete state of the village at any point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// All houses, in layout order. Indices are stable for the session.
    pub houses: Vec<House>,

    /// Current day, starting at 1.
    pub cycle: u32,

    /// House whose overlay is currently open.
    pub current_house: Option<HouseId>,

    /// Set while any overlay is open; input-driven movement must not run.
    pub is_paused: bool,
}

impl WorldState {
    /// Build the world at day 1.
    ///
    /// Fails if ids collide, if there are no villagers, or if a villager who
    /// is not gone on day 1 has no npc.
    pub fn new(houses: Vec<House>) -> Result<Self, RulesError> {
        let mut seen = HashSet::new();
        for house in &houses {
            if !seen.insert(house.id.clone()) {
                return Err(RulesError::DuplicateHouse(house.id.clone()));
            }
        }
        if !houses.iter().any(House::is_villager) {
            return Err(RulesError::NoVillagers);
        }

        let mut houses = houses;
        for house in &mut houses {
            let day_one = house.resolve_content(1);
            let status = day_one.status.unwrap_or(house.status);
            if house.is_villager() && day_one.npc.is_none() && !status.is_gone() {
                return Err(RulesError::MissingNpc(house.id.clone()));
            }
            house.status = status;
            house.npc = day_one.npc;
            house.cinematic = day_one.cinematic;
        }

        Ok(Self {
            houses,
            cycle: 1,
            current_house: None,
            is_paused: false,
        })
    }

    /// Get a house by id.
    pub fn house(&self, id: &HouseId) -> Option<&House> {
        self.houses.iter().find(|h| &h.id == id)
    }

    /// Get a mutable house by id.
    pub fn house_mut(&mut self, id: &HouseId) -> Option<&mut House> {
        self.houses.iter_mut().find(|h| &h.id == id)
    }

    /// Position of a house in the layout order.
    pub fn index_of(&self, id: &HouseId) -> Option<usize> {
        self.houses.iter().position(|h| &h.id == id)
    }

    /// House positions in layout order, for the spatial selector.
    pub fn positions(&self) -> Vec<Position> {
        self.houses.iter().map(|h| h.position).collect()
    }

    /// First house of the given kind in layout order.
    pub fn first_of_kind(&self, kind: HouseKind) -> Option<&House> {
        self.houses.iter().find(|h| h.kind == kind)
    }

    /// Resolve what interacting with `id` shows today.
    ///
    /// Returns `None` when the house has nothing to talk about today; callers
    /// treat that as not interactable.
    pub fn event_for_today(&self, id: &HouseId) -> Option<HouseEvent> {
        let house = self.house(id)?;

        if let Some(cinematic) = &house.cinematic {
            return Some(HouseEvent::Cinematic(cinematic.clone()));
        }
        if !house.status.is_present() {
            return None;
        }
        match (&house.npc, house.kind) {
            (Some(npc), _) => Some(HouseEvent::Dialogue(npc.clone())),
            (None, HouseKind::Guard) => Some(HouseEvent::SleepPrompt),
            (None, _) => None,
        }
    }

    /// The view for a house whose occupant is dead, missing or infected.
    ///
    /// Such houses have no event today but may still be looked at.
    pub fn aftermath_for_today(&self, id: &HouseId) -> Option<&Cinematic> {
        let house = self.house(id)?;
        if house.status.is_present() {
            return None;
        }
        house.aftermath.as_ref()
    }

    /// Write each house's overrides authored for `day` into its live state.
    ///
    /// Fields absent from an override are left as they are. Returns the houses
    /// whose status changed.
    pub fn apply_overrides_for_day(&mut self, day: u32) -> Vec<HouseId> {
        self.houses
            .iter_mut()
            .filter_map(|house| house.apply_override(day).then(|| house.id.clone()))
            .collect()
    }

    /// Latest day any house has authored content for.
    pub fn highest_authored_day(&self) -> u32 {
        self.houses
            .iter()
            .filter_map(House::last_authored_day)
            .max()
            .unwrap_or(1)
    }

    /// Number of villagers still in play.
    pub fn count_survivors(&self) -> usize {
        self.houses.iter().filter(|h| h.is_accusable()).count()
    }

    /// Villagers the player may accuse.
    pub fn accusable_houses(&self) -> Vec<&House> {
        self.houses.iter().filter(|h| h.is_accusable()).collect()
    }

    /// Set a house's status. Returns whether it changed.
    pub fn set_status(&mut self, id: &HouseId, status: HouseStatus) -> Result<bool, RulesError> {
        let house = self
            .house_mut(id)
            .ok_or_else(|| RulesError::UnknownHouse(id.clone()))?;
        let changed = house.status != status;
        house.status = status;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DayContent, DialogueNode};

    fn npc(name: &str) -> Npc {
        Npc::new(name, "portrait.png", DialogueNode::new(format!("I am {name}.")))
    }

    fn villager(id: &str, x: f64) -> House {
        House::new(id, HouseKind::Villager, Position::new(x, 0.0))
            .with_day(1, DayContent::new().with_npc(npc(id)))
    }

    fn sample_world() -> WorldState {
        let guard = House::new("house_guard", HouseKind::Guard, Position::new(0.0, 100.0));
        let circle = House::new("house_circle", HouseKind::SpecialEvent, Position::new(50.0, 100.0))
            .with_day(1, DayContent::new().with_cinematic(Cinematic::new("circle.png", "A hum.")));
        let dying = villager("house_2", 20.0)
            .with_day(2, DayContent::new().with_status(HouseStatus::Dead));
        WorldState::new(vec![guard, circle, villager("house_1", 10.0), dying]).unwrap()
    }

    #[test]
    fn test_new_world_starts_at_day_one() {
        let world = sample_world();
        assert_eq!(world.cycle, 1);
        assert!(world.current_house.is_none());
        assert!(!world.is_paused);
        assert_eq!(world.count_survivors(), 2);
        assert_eq!(world.highest_authored_day(), 2);
    }

    #[test]
    fn test_villager_without_npc_rejected() {
        let bare = House::new("house_1", HouseKind::Villager, Position::new(0.0, 0.0));
        assert!(matches!(WorldState::new(vec![bare]), Err(RulesError::MissingNpc(_))));
    }

    #[test]
    fn test_missing_villager_needs_no_npc() {
        let missing = House::new("house_kabir", HouseKind::Villager, Position::new(0.0, 0.0))
            .with_day(1, DayContent::new().with_status(HouseStatus::Missing));
        let world = WorldState::new(vec![missing, villager("house_1", 5.0)]).unwrap();
        assert_eq!(world.count_survivors(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = WorldState::new(vec![villager("house_1", 0.0), villager("house_1", 1.0)]);
        assert!(matches!(result, Err(RulesError::DuplicateHouse(_))));
    }

    #[test]
    fn test_event_for_today() {
        let mut world = sample_world();

        assert_eq!(
            world.event_for_today(&"house_guard".into()),
            Some(HouseEvent::SleepPrompt)
        );
        assert!(matches!(
            world.event_for_today(&"house_circle".into()),
            Some(HouseEvent::Cinematic(_))
        ));
        assert!(matches!(
            world.event_for_today(&"house_1".into()),
            Some(HouseEvent::Dialogue(npc)) if npc.name == "house_1"
        ));
        assert!(world.event_for_today(&"nowhere".into()).is_none());

        world.apply_overrides_for_day(2);
        assert!(world.event_for_today(&"house_2".into()).is_none());
        assert!(world.event_for_today(&"house_circle".into()).is_none());
    }

    #[test]
    fn test_aftermath_only_once_gone() {
        let dying = villager("house_1", 0.0)
            .with_day(2, DayContent::new().with_status(HouseStatus::Infected))
            .with_aftermath(Cinematic::new("house1-infected-view.png", "Claw marks on the door."));
        let mut world = WorldState::new(vec![dying, villager("house_2", 10.0)]).unwrap();

        assert!(world.aftermath_for_today(&"house_1".into()).is_none());

        world.apply_overrides_for_day(2);
        assert!(world.event_for_today(&"house_1".into()).is_none());
        assert_eq!(
            world.aftermath_for_today(&"house_1".into()).map(|c| c.image.as_str()),
            Some("house1-infected-view.png")
        );

        world.set_status(&"house_2".into(), HouseStatus::Dead).unwrap();
        assert!(world.aftermath_for_today(&"house_2".into()).is_none());
    }

    #[test]
    fn test_apply_overrides_reports_changes() {
        let mut world = sample_world();
        let changed = world.apply_overrides_for_day(2);
        assert_eq!(changed, vec![HouseId::new("house_2")]);
        assert_eq!(world.count_survivors(), 1);

        // Nothing authored for day 3: state carries over.
        assert!(world.apply_overrides_for_day(3).is_empty());
        assert_eq!(world.count_survivors(), 1);
    }

    #[test]
    fn test_set_status() {
        let mut world = sample_world();
        let id = HouseId::new("house_1");
        assert!(world.set_status(&id, HouseStatus::Dead).unwrap());
        assert!(!world.set_status(&id, HouseStatus::Dead).unwrap());
        assert!(world.accusable_houses().iter().all(|h| h.id != id));
        assert!(world.set_status(&"ghost".into(), HouseStatus::Dead).is_err());
    }
}
