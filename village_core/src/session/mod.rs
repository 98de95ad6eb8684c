//! Game Session - the owned state of one play-through.
//!
//! The session is the only handle collaborators get. It routes input to the
//! spatial selector, the dialogue engine, the day cycle and the accusation
//! resolver, keeps `is_paused` in step with the open overlay, and pushes a
//! [`GameEvent`] for every visible change.

mod remote_flow;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::{debug, info};
use village_rules::{
    generate_village, Cinematic, DialogueAction, Direction, GameConfig, House, HouseEvent, HouseId, HouseKind,
    HouseStatus, SpatialSelector, WorldState,
};

use crate::accusation::{AccusationOutcome, AccusationResolver, AccusationState};
use crate::day_cycle::{DayCycle, DayReport};
use crate::dialogue::{Conversation, DialogueOutcome};
use crate::error::CoreError;
use crate::events::{EventBus, GameEvent, SubscriptionId};
use crate::remote::{RequestTracker, SessionId};

/// The overlay currently covering the village.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Conversation,
    Cinematic(Cinematic),
    SleepPrompt,
    Accusation(Vec<HouseId>),
}

/// What interacting with the selected house did.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Conversation,
    Cinematic(Cinematic),
    SleepPrompt,
    /// The occupant is gone or infected; only the house itself is shown.
    Aftermath(Cinematic),
    /// Nothing to do here today, or input is blocked.
    Nothing,
}

pub struct GameSession {
    id: SessionId,
    config: GameConfig,
    world: WorldState,
    selector: SpatialSelector,
    overlay: Option<Overlay>,
    conversation: Option<Conversation>,
    resolver: AccusationResolver,
    day_cycle: DayCycle,
    rng: ChaCha8Rng,
    events: EventBus,
    requests: RequestTracker,
    remote_session: Option<SessionId>,
    visited: HashSet<HouseId>,
}

impl GameSession {
    /// Start a session on the built-in village for `config.seed`.
    pub fn from_village(config: GameConfig) -> Result<Self, CoreError> {
        let village = generate_village(config.seed);
        Self::new(village.houses, config)
    }

    /// Start a session; the antagonist is drawn from the seeded RNG.
    pub fn new(houses: Vec<House>, config: GameConfig) -> Result<Self, CoreError> {
        let world = WorldState::new(houses)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let resolver = AccusationResolver::assign(&world, &config, &mut rng)?;
        Ok(Self::assemble(world, config, resolver, rng))
    }

    /// Start a session with a fixed antagonist.
    pub fn with_antagonist(houses: Vec<House>, config: GameConfig, antagonist: HouseId) -> Result<Self, CoreError> {
        let world = WorldState::new(houses)?;
        match world.house(&antagonist) {
            Some(house) if house.is_villager() && house.status != HouseStatus::Missing => {}
            _ => return Err(CoreError::NoAntagonistCandidates),
        }
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let resolver = AccusationResolver::with_antagonist(antagonist, &config);
        Ok(Self::assemble(world, config, resolver, rng))
    }

    fn assemble(world: WorldState, config: GameConfig, resolver: AccusationResolver, rng: ChaCha8Rng) -> Self {
        let id = SessionId::new();
        info!(session = %id, seed = config.seed, houses = world.houses.len(), "session started");
        Self {
            id,
            day_cycle: DayCycle::new(config.final_authored_day),
            config,
            world,
            selector: SpatialSelector::default(),
            overlay: None,
            conversation: None,
            resolver,
            rng,
            events: EventBus::new(),
            requests: RequestTracker::new(id),
            remote_session: None,
            visited: HashSet::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view for renderers.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn day(&self) -> u32 {
        self.world.cycle
    }

    pub fn is_paused(&self) -> bool {
        self.world.is_paused
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    pub fn accusation_state(&self) -> AccusationState {
        self.resolver.state()
    }

    pub fn is_over(&self) -> bool {
        self.resolver.is_over()
    }

    pub fn selected_index(&self) -> usize {
        self.selector.selected()
    }

    pub fn selected_house(&self) -> Option<&House> {
        self.world.houses.get(self.selector.selected())
    }

    /// The special house the player should visit first, while it is still unvisited on day one.
    pub fn objective_house(&self) -> Option<&House> {
        if self.world.cycle != 1 {
            return None;
        }
        self.world
            .first_of_kind(HouseKind::SpecialEvent)
            .filter(|h| !self.visited.contains(&h.id))
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn input_blocked(&self) -> bool {
        self.world.is_paused || self.resolver.is_over()
    }

    // Keeps `is_paused` and `current_house` consistent with the overlay.
    fn set_overlay(&mut self, overlay: Option<Overlay>, house: Option<HouseId>) {
        let was_paused = self.world.is_paused;
        let paused = overlay.is_some();

        if overlay.is_none() && self.overlay.is_some() {
            self.end_conversation();
            self.events.emit(GameEvent::OverlayClosed);
        }
        self.overlay = overlay;
        self.world.current_house = if paused { house } else { None };
        self.world.is_paused = paused;

        if paused != was_paused {
            self.events.emit(GameEvent::PauseChanged { paused });
        }
    }

    // A reply for a conversation that is no longer on screen must not land.
    fn end_conversation(&mut self) {
        self.conversation = None;
        self.requests.invalidate();
    }

    /// Move the selection in `direction`. Ignored while paused.
    pub fn move_selection(&mut self, direction: Direction) -> bool {
        if self.input_blocked() {
            return false;
        }
        let positions = self.world.positions();
        if !self.selector.step(direction, &positions) {
            return false;
        }
        self.emit_selection();
        true
    }

    /// Select a house directly (pointer input). Ignored while paused.
    pub fn select_house(&mut self, id: &HouseId) -> bool {
        if self.input_blocked() {
            return false;
        }
        let Some(index) = self.world.index_of(id) else {
            return false;
        };
        if index == self.selector.selected() {
            return false;
        }
        self.selector.select(index);
        self.emit_selection();
        true
    }

    fn emit_selection(&mut self) {
        let index = self.selector.selected();
        if let Some(house) = self.world.houses.get(index) {
            let house = house.id.clone();
            self.events.emit(GameEvent::SelectionChanged { index, house });
        }
    }

    /// Open today's event for the selected house.
    pub fn interact(&mut self) -> Interaction {
        if self.input_blocked() {
            return Interaction::Nothing;
        }
        let Some(house) = self.selected_house().map(|h| h.id.clone()) else {
            return Interaction::Nothing;
        };
        let Some(event) = self.world.event_for_today(&house) else {
            return self.open_aftermath(house);
        };

        self.visited.insert(house.clone());
        let interaction = match event {
            HouseEvent::Dialogue(npc) => {
                self.conversation = Some(Conversation::open(house.clone(), &npc));
                self.set_overlay(Some(Overlay::Conversation), Some(house.clone()));
                Interaction::Conversation
            }
            HouseEvent::Cinematic(cinematic) => {
                self.set_overlay(Some(Overlay::Cinematic(cinematic.clone())), Some(house.clone()));
                Interaction::Cinematic(cinematic)
            }
            HouseEvent::SleepPrompt => {
                self.set_overlay(Some(Overlay::SleepPrompt), Some(house.clone()));
                Interaction::SleepPrompt
            }
        };
        debug!(house = %house, "house opened");
        self.events.emit(GameEvent::HouseOpened { house });
        interaction
    }

    fn open_aftermath(&mut self, house: HouseId) -> Interaction {
        let Some(view) = self.world.aftermath_for_today(&house).cloned() else {
            debug!(house = %house, "nothing to do here today");
            return Interaction::Nothing;
        };
        self.set_overlay(Some(Overlay::Cinematic(view.clone())), Some(house.clone()));
        debug!(house = %house, "aftermath shown");
        self.events.emit(GameEvent::HouseOpened { house });
        Interaction::Aftermath(view)
    }

    /// The rest key: offer to sleep when the guard post is selected.
    pub fn rest(&mut self) -> bool {
        if self.input_blocked() {
            return false;
        }
        let Some(house) = self.selected_house().filter(|h| h.is_guard()).map(|h| h.id.clone()) else {
            return false;
        };
        self.set_overlay(Some(Overlay::SleepPrompt), Some(house.clone()));
        self.events.emit(GameEvent::HouseOpened { house });
        true
    }

    /// Accept the sleep prompt.
    pub fn confirm_sleep(&mut self) -> Option<DayReport> {
        if self.overlay != Some(Overlay::SleepPrompt) {
            return None;
        }
        self.sleep()
    }

    /// Close whatever overlay is open. Cancels a pending accusation.
    pub fn close(&mut self) {
        if matches!(self.overlay, Some(Overlay::Accusation(_))) {
            self.cancel_accusation();
            return;
        }
        if self.overlay.is_some() {
            self.set_overlay(None, None);
        }
    }

    /// Pick a dialogue option in the open conversation.
    pub fn select_option(&mut self, index: usize) -> DialogueOutcome {
        let Some(conversation) = self.conversation.as_mut() else {
            return DialogueOutcome::Rejected;
        };
        let outcome = conversation.select_option(index);
        match outcome {
            DialogueOutcome::Action(action) => self.dispatch(action),
            DialogueOutcome::Closed => {
                self.set_overlay(None, None);
                outcome
            }
            DialogueOutcome::Continue | DialogueOutcome::Rejected => outcome,
        }
    }

    /// Dismiss the response on screen.
    pub fn continue_dialogue(&mut self) -> DialogueOutcome {
        let Some(conversation) = self.conversation.as_mut() else {
            return DialogueOutcome::Rejected;
        };
        let outcome = conversation.continue_response();
        if outcome == DialogueOutcome::Closed {
            self.set_overlay(None, None);
        }
        outcome
    }

    fn at_guard_house(&self) -> bool {
        self.world
            .current_house
            .as_ref()
            .and_then(|id| self.world.house(id))
            .is_some_and(House::is_guard)
    }

    fn dispatch(&mut self, action: DialogueAction) -> DialogueOutcome {
        let handled = match action {
            DialogueAction::Sleep => self.sleep().is_some(),
            DialogueAction::Eliminate => self.begin_accusation(),
            DialogueAction::Close => {
                self.set_overlay(None, None);
                true
            }
            DialogueAction::Chat => self.request_chat(),
        };
        if handled {
            DialogueOutcome::Action(action)
        } else {
            DialogueOutcome::Rejected
        }
    }

    fn request_chat(&mut self) -> bool {
        let Some(conversation) = &self.conversation else {
            return false;
        };
        let event = GameEvent::ChatRequested {
            house: conversation.house().clone(),
            character: conversation.speaker().to_string(),
        };
        self.events.emit(event);
        true
    }

    // Refused while a request is in flight so a pending remote night cannot
    // be overtaken by a local one.
    fn can_sleep(&self) -> bool {
        !self.resolver.is_over()
            && !self.requests.is_loading()
            && self.at_guard_house()
            && matches!(self.overlay, Some(Overlay::Conversation | Overlay::SleepPrompt))
    }

    // Consumes the open guard-house overlay, so a second call without
    // reopening is rejected.
    fn sleep(&mut self) -> Option<DayReport> {
        if !self.can_sleep() {
            debug!("sleep rejected away from the guard house");
            return None;
        }
        self.set_overlay(None, None);
        Some(self.advance_day())
    }

    fn advance_day(&mut self) -> DayReport {
        let report = self
            .day_cycle
            .advance_sparing(&mut self.world, &mut self.rng, Some(self.resolver.antagonist()));

        let changed: Vec<HouseId> = report.changed_houses().cloned().collect();
        for house in changed {
            if let Some(status) = self.world.house(&house).map(|h| h.status) {
                self.events.emit(GameEvent::StatusChanged { house, status });
            }
        }
        self.events.emit(GameEvent::DayAdvanced { day: report.day });

        match self.resolver.check_after_day(&self.world) {
            Some(AccusationState::Won) => self.events.emit(GameEvent::GameWon),
            Some(AccusationState::Lost) => self.events.emit(GameEvent::GameLost),
            _ => {}
        }
        report
    }

    fn begin_accusation(&mut self) -> bool {
        if !self.at_guard_house() || self.requests.is_loading() {
            return false;
        }
        let Some(suspects) = self.resolver.begin(&self.world) else {
            return false;
        };
        let guard = self.world.current_house.clone();
        self.end_conversation();
        self.set_overlay(Some(Overlay::Accusation(suspects.clone())), guard);
        self.events.emit(GameEvent::AccusationStarted { suspects });
        true
    }

    /// Back out of the accusation picker.
    pub fn cancel_accusation(&mut self) -> bool {
        if !self.resolver.cancel() {
            return false;
        }
        self.set_overlay(None, None);
        self.events.emit(GameEvent::AccusationCancelled);
        true
    }

    /// Name a suspect and judge it locally.
    pub fn accuse(&mut self, suspect: &HouseId) -> AccusationOutcome {
        if self.requests.is_loading() {
            return AccusationOutcome::Rejected;
        }
        let outcome = self.resolver.accuse(&mut self.world, suspect);
        self.after_accusation(suspect, &outcome);
        outcome
    }

    fn after_accusation(&mut self, suspect: &HouseId, outcome: &AccusationOutcome) {
        if *outcome == AccusationOutcome::Rejected {
            return;
        }
        if let Some(status) = self.world.house(suspect).map(|h| h.status) {
            if *outcome != AccusationOutcome::Won {
                self.events.emit(GameEvent::StatusChanged {
                    house: suspect.clone(),
                    status,
                });
            }
        }
        self.set_overlay(None, None);
        match outcome {
            AccusationOutcome::Won => self.events.emit(GameEvent::GameWon),
            AccusationOutcome::Lost(_) => self.events.emit(GameEvent::GameLost),
            _ => {}
        }
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("day", &self.world.cycle)
            .field("overlay", &self.overlay)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
