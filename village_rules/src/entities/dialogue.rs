//! Dialogue tree definitions.

use serde::{Deserialize, Serialize};

use crate::mechanics::DialogueAction;

/// One screen of NPC text plus the options the player can pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub text: String,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

impl DialogueNode {
    /// Create a node with no options (a leaf).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    /// Append an option.
    pub fn with_option(mut self, option: DialogueOption) -> Self {
        self.options.push(option);
        self
    }

    /// A node with no options can only be closed.
    pub fn is_leaf(&self) -> bool {
        self.options.is_empty()
    }
}

/// A player-selectable option.
///
/// `action` takes precedence over `response`, which takes precedence over `next`.
/// An option with none of them ends the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueOption {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, rename = "nextDialog", skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<DialogueNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<DialogueAction>,
}

impl DialogueOption {
    /// Create an option that ends the conversation when picked.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            response: None,
            next: None,
            action: None,
        }
    }

    /// Text the NPC answers with.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Node to continue with (after the response, if any).
    pub fn with_next(mut self, next: DialogueNode) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    pub fn with_action(mut self, action: DialogueAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Whether picking this option ends the conversation outright.
    pub fn is_terminal(&self) -> bool {
        self.action.is_none() && self.response.is_none() && self.next.is_none()
    }
}
