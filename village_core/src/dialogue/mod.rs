//! Dialogue Engine - traversal of a dialogue tree for one open conversation.
//!
//! A conversation alternates between two modes:
//! - **Prompt**: the active node's text and options are shown
//! - **Response**: the NPC's answer to the chosen option is shown until the
//!   player continues
//!
//! The engine knows nothing about houses or days; terminal actions are handed
//! back to the caller as [`DialogueOutcome::Action`].

use serde::{Deserialize, Serialize};
use village_rules::{DialogueAction, DialogueNode, DialogueOption, HouseId, Npc};

/// Which half of an exchange is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueMode {
    Prompt,
    Response,
}

/// Result of a player input on a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueOutcome {
    /// The conversation is still open.
    Continue,
    /// The option carries an action for another component. The active node is unchanged.
    Action(DialogueAction),
    /// The conversation ended.
    Closed,
    /// The input was not valid in the current state; nothing changed.
    Rejected,
}

/// An open conversation with one NPC.
#[derive(Debug, Clone)]
pub struct Conversation {
    house: HouseId,
    speaker: String,
    active: DialogueNode,
    mode: DialogueMode,
    response: Option<String>,
    pending_next: Option<DialogueNode>,
}

impl Conversation {
    /// Start at the npc's root node for today.
    pub fn open(house: HouseId, npc: &Npc) -> Self {
        Self {
            house,
            speaker: npc.name.clone(),
            active: npc.dialogue.clone(),
            mode: DialogueMode::Prompt,
            response: None,
            pending_next: None,
        }
    }

    pub fn house(&self) -> &HouseId {
        &self.house
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn active_node(&self) -> &DialogueNode {
        &self.active
    }

    pub fn mode(&self) -> DialogueMode {
        self.mode
    }

    /// Text currently on screen.
    pub fn displayed_text(&self) -> &str {
        match (&self.mode, &self.response) {
            (DialogueMode::Response, Some(response)) => response,
            _ => &self.active.text,
        }
    }

    /// Options the player can pick right now. Empty while a response is shown.
    pub fn options(&self) -> &[DialogueOption] {
        match self.mode {
            DialogueMode::Prompt => &self.active.options,
            DialogueMode::Response => &[],
        }
    }

    /// Whether only closing is possible.
    pub fn at_leaf(&self) -> bool {
        self.mode == DialogueMode::Prompt && self.active.is_leaf()
    }

    /// Pick the option at `index` of the active node.
    pub fn select_option(&mut self, index: usize) -> DialogueOutcome {
        if self.mode != DialogueMode::Prompt {
            return DialogueOutcome::Rejected;
        }
        let Some(option) = self.active.options.get(index) else {
            return DialogueOutcome::Rejected;
        };

        if let Some(action) = option.action {
            return DialogueOutcome::Action(action);
        }

        match (&option.response, &option.next) {
            (Some(response), next) => {
                self.response = Some(response.clone());
                self.pending_next = next.as_deref().cloned();
                self.mode = DialogueMode::Response;
                DialogueOutcome::Continue
            }
            (None, Some(next)) => {
                self.active = (**next).clone();
                DialogueOutcome::Continue
            }
            (None, None) => DialogueOutcome::Closed,
        }
    }

    /// Dismiss the response on screen.
    pub fn continue_response(&mut self) -> DialogueOutcome {
        if self.mode != DialogueMode::Response {
            return DialogueOutcome::Rejected;
        }
        self.response = None;
        self.mode = DialogueMode::Prompt;
        match self.pending_next.take() {
            Some(next) => {
                self.active = next;
                DialogueOutcome::Continue
            }
            None => DialogueOutcome::Closed,
        }
    }
}
