//! House definitions and their per-day content.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DialogueNode, HouseId, Position};
use crate::mechanics::{HouseKind, HouseStatus};

/// The character living in a house on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    /// Portrait reference handed to the renderer.
    pub portrait: String,
    /// Root of today's conversation.
    pub dialogue: DialogueNode,
}

impl Npc {
    pub fn new(name: impl Into<String>, portrait: impl Into<String>, dialogue: DialogueNode) -> Self {
        Self {
            name: name.into(),
            portrait: portrait.into(),
            dialogue,
        }
    }
}

/// A full-screen image event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cinematic {
    pub image: String,
    pub caption: String,
}

impl Cinematic {
    pub fn new(image: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            caption: caption.into(),
        }
    }
}

/// Authored overrides for one day. Absent fields keep whatever the house had.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc: Option<Npc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HouseStatus>,
    /// Only shown on the day it is authored for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cinematic: Option<Cinematic>,
}

impl DayContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_npc(mut self, npc: Npc) -> Self {
        self.npc = Some(npc);
        self
    }

    pub fn with_status(mut self, status: HouseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_cinematic(mut self, cinematic: Cinematic) -> Self {
        self.cinematic = Some(cinematic);
        self
    }
}

/// A visitable location in the village.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct House {
    pub id: HouseId,
    pub kind: HouseKind,
    pub position: Position,
    /// Texture key for the renderer.
    #[serde(default)]
    pub texture: String,
    #[serde(default)]
    pub status: HouseStatus,
    #[serde(default)]
    pub content_by_day: BTreeMap<u32, DayContent>,
    /// Shown instead of a conversation once the occupant is no longer present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aftermath: Option<Cinematic>,

    // Active content for the current day, written at day transitions.
    #[serde(default)]
    pub npc: Option<Npc>,
    #[serde(default)]
    pub cinematic: Option<Cinematic>,
}

impl House {
    /// Create a house with no authored content.
    pub fn new(id: impl Into<HouseId>, kind: HouseKind, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            texture: String::new(),
            status: HouseStatus::Normal,
            content_by_day: BTreeMap::new(),
            aftermath: None,
            npc: None,
            cinematic: None,
        }
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = texture.into();
        self
    }

    pub fn with_aftermath(mut self, aftermath: Cinematic) -> Self {
        self.aftermath = Some(aftermath);
        self
    }

    /// Author content for a day, replacing any previous entry for it.
    pub fn with_day(mut self, day: u32, content: DayContent) -> Self {
        self.content_by_day.insert(day, content);
        self
    }

    pub fn is_villager(&self) -> bool {
        self.kind == HouseKind::Villager
    }

    pub fn is_guard(&self) -> bool {
        self.kind == HouseKind::Guard
    }

    /// A villager who is still around: counts as a survivor and can be accused.
    pub fn is_accusable(&self) -> bool {
        self.is_villager() && self.status.is_present()
    }

    /// Whether the occupant is out of play now or any authored day takes them out.
    pub fn ever_leaves_play(&self) -> bool {
        !self.status.is_present()
            || self
                .content_by_day
                .values()
                .filter_map(|content| content.status)
                .any(|status| !status.is_present())
    }

    /// Texture key for the current status. Houses whose occupant is gone or
    /// infected use the `-infected` variant of their texture.
    pub fn texture_key(&self) -> String {
        if self.status.is_present() || self.texture.is_empty() {
            self.texture.clone()
        } else {
            format!("{}-infected", self.texture)
        }
    }

    /// Name shown for the occupant, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.npc.as_ref().map(|npc| npc.name.as_str())
    }

    /// Latest authored day, if the house has any content.
    pub fn last_authored_day(&self) -> Option<u32> {
        self.content_by_day.keys().next_back().copied()
    }

    /// Resolve what the house looks like on `day`.
    ///
    /// Each field is taken from the most recent authored day at or before `day`,
    /// so content carries forward until something overrides it. Cinematics
    /// never carry forward.
    pub fn resolve_content(&self, day: u32) -> DayContent {
        let mut resolved = DayContent::new();
        for (authored_day, content) in self.content_by_day.range(..=day).rev() {
            if resolved.npc.is_none() {
                resolved.npc = content.npc.clone();
            }
            if resolved.status.is_none() {
                resolved.status = content.status;
            }
            if *authored_day == day {
                resolved.cinematic = content.cinematic.clone();
            }
            if resolved.npc.is_some() && resolved.status.is_some() {
                break;
            }
        }
        resolved
    }

    /// Overwrite current state with the fields authored for exactly `day`.
    ///
    /// Returns true when the status changed.
    pub fn apply_override(&mut self, day: u32) -> bool {
        let Some(content) = self.content_by_day.get(&day) else {
            self.cinematic = None;
            return false;
        };

        if let Some(npc) = &content.npc {
            self.npc = Some(npc.clone());
        }
        self.cinematic = content.cinematic.clone();

        match content.status {
            Some(status) if status != self.status => {
                self.status = status;
                true
            }
            _ => false,
        }
    }
}
