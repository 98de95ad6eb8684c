//! # Village Rules
//!
//! The "village bible" crate - houses, their authored days, the world state and
//! the spatial rules for picking houses. This crate is the single source of
//! truth for the village and holds no session or dialogue-traversal logic.

pub mod config;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod spatial;
pub mod village;
pub mod world_state;

pub use config::*;
pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use spatial::*;
pub use village::*;
pub use world_state::*;
