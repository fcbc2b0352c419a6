//! Tactical combat engine for Ongezellig Tactics.
//!
//! The crate is `no_std` compatible (with `alloc`) so the same rules run in the
//! browser client and in native tests.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod ai;
pub mod battle;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod log;
pub mod range;
pub mod rng;
pub mod roster;
pub mod skills;
pub mod turns;
pub mod types;
pub mod view;

#[cfg(test)]
mod tests;

pub use battle::{Battle, BattleEvent, BattleState};
pub use config::BattleConfig;
pub use controller::{BattleController, BattleOutcome, SelectionMode};
pub use error::{CombatError, CombatResult};
pub use grid::{Cell, Grid, Hazard, Terrain};
pub use roster::{CharacterTemplate, PlayerProfile, PlayerResources, RosterProvider};
pub use types::*;
pub use view::BattleView;
