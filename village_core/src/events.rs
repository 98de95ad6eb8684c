//! Game events pushed to observers (renderer, UI) whenever session state changes.

use serde::{Deserialize, Serialize};
use village_rules::{HouseId, HouseStatus};

/// Something observers may want to redraw for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SelectionChanged { index: usize, house: HouseId },
    HouseOpened { house: HouseId },
    OverlayClosed,
    PauseChanged { paused: bool },
    /// The player wants to talk freely to `character`.
    ChatRequested { house: HouseId, character: String },
    DayAdvanced { day: u32 },
    StatusChanged { house: HouseId, status: HouseStatus },
    AccusationStarted { suspects: Vec<HouseId> },
    AccusationCancelled,
    GameWon,
    GameLost,
    /// A remote call failed and the player should be told.
    ServiceFailed { message: String },
}

impl GameEvent {
    /// Whether the session is over after this event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameWon | GameEvent::GameLost)
    }
}

/// Handle returned by [`EventBus::subscribe`].
pub type SubscriptionId = u64;

type Subscriber = Box<dyn FnMut(&GameEvent)>;

/// Push-on-change observer list. Subscribers run synchronously, in
/// subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: GameEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
