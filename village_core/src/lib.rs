//! # Village Core
//!
//! The play-through layer on top of `village_rules`. This crate owns the game
//! session: dialogue traversal, the day/night cycle, the accusation resolver and
//! the boundary to the remote adjudicator.
//!
//! ## Core Components
//!
//! - **session**: The single owned game state; every input goes through it
//! - **dialogue**: Walks an npc's authored dialogue tree
//! - **day_cycle**: Scripted overrides at dawn, with a seeded fallback death
//! - **accusation**: Hidden antagonist and win/loss resolution
//! - **remote**: Adjudicator trait and the stale-response guard
//! - **events**: Notifications pushed to renderers and other collaborators
//!
//! ## Design Philosophy
//!
//! - **State-Driven**: Renderers read the world; they never mutate it
//! - **Deterministic**: One seed fixes the village, the antagonist and every fallback death
//! - **Paused Means Modal**: While an overlay is open, the village ignores movement and interaction

pub mod accusation;
pub mod day_cycle;
pub mod dialogue;
pub mod error;
pub mod events;
pub mod remote;
pub mod session;

pub use accusation::*;
pub use day_cycle::*;
pub use dialogue::*;
pub use error::*;
pub use events::*;
pub use remote::*;
pub use session::*;
