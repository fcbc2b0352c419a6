//! Logging utilities
//!
//! Thin wrappers over the `log` facade. Without an installed logger every call
//! is a no-op, which keeps native tests and `no_std` builds quiet.

#![allow(unused)]

const TARGET: &str = "tactics";

/// Log an info message
#[inline(always)]
pub fn info(msg: &str) {
    ::log::info!(target: TARGET, "{}", msg);
}

/// Log a warning message
#[inline(always)]
pub fn warn(msg: &str) {
    ::log::warn!(target: TARGET, "{}", msg);
}

/// Log an error message
#[inline(always)]
pub fn error(msg: &str) {
    ::log::error!(target: TARGET, "{}", msg);
}

/// Log a debug message with a label
#[inline(always)]
pub fn debug(label: &str, msg: &str) {
    ::log::debug!(target: TARGET, "[{}] {}", label, msg);
}

/// Log a battle summary line
pub fn battle_summary(state: &str, round: u32, active: Option<u32>, alive_players: usize, alive_enemies: usize) {
    ::log::debug!(
        target: TARGET,
        "state={} round={} active={:?} players={} enemies={}",
        state,
        round,
        active,
        alive_players,
        alive_enemies
    );
}

/// Log a command being performed
#[inline(always)]
pub fn action(name: &str, details: &str) {
    ::log::info!(target: TARGET, ">> {} ({})", name, details);
}

/// Log a command result
#[inline(always)]
pub fn result(success: bool, msg: &str) {
    if success {
        ::log::debug!(target: TARGET, "<< ok: {}", msg);
    } else {
        ::log::warn!(target: TARGET, "<< rejected: {}", msg);
    }
}
