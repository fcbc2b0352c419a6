//! Battle engine for browser WASM builds
//!
//! Wraps the core [`BattleController`] for JavaScript. Commands return
//! `Result<(), String>` so rejections surface as thrown errors; reads return
//! plain JS objects (or SCALE bytes for the hot path).

use std::format;
use std::string::String;
use std::vec::Vec;

use parity_scale_codec::Encode;
use tactics_core::log;
use tactics_core::{BattleConfig, BattleController, PlayerProfile, UnitId};
use wasm_bindgen::prelude::*;

/// The battle engine exposed to WASM
#[wasm_bindgen]
pub struct TacticsEngine {
    controller: BattleController<PlayerProfile>,
}

/// Fresh entropy for the battlefield seed
fn random_seed() -> u64 {
    let mut bytes = [0u8; 8];
    if let Err(e) = getrandom::getrandom(&mut bytes) {
        log::warn(&format!("getrandom failed, using fixed seed: {:?}", e));
        return 0x5EED;
    }
    u64::from_le_bytes(bytes)
}

#[wasm_bindgen]
impl TacticsEngine {
    /// Create an engine for a new profile.
    ///
    /// `config` may be a partial JSON object; missing fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>, config: JsValue) -> Result<TacticsEngine, String> {
        log::info("=== TACTICS ENGINE INITIALIZED ===");
        let config = if config.is_undefined() || config.is_null() {
            BattleConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| format!("Failed to parse config: {:?}", e))?
        };
        let seed = seed.unwrap_or_else(random_seed);
        log::debug("new", &format!("seed={}", seed));
        Ok(Self {
            controller: BattleController::new(PlayerProfile::new(), config, seed),
        })
    }

    #[wasm_bindgen]
    pub fn start_battle(&mut self) -> Result<(), String> {
        self.controller
            .start_battle()
            .map_err(|e| format!("Cannot start battle: {:?}", e))
    }

    #[wasm_bindgen]
    pub fn reset_battle(&mut self) {
        self.controller.reset_battle();
    }

    #[wasm_bindgen]
    pub fn select_unit(&mut self, unit_id: u32) -> Result<(), String> {
        self.controller
            .select_unit(UnitId(unit_id))
            .map_err(|e| format!("{:?}", e))
    }

    #[wasm_bindgen]
    pub fn toggle_move_mode(&mut self) -> Result<(), String> {
        self.controller.toggle_move_mode().map_err(|e| format!("{:?}", e))
    }

    #[wasm_bindgen]
    pub fn select_skill(&mut self, skill_index: usize) -> Result<(), String> {
        self.controller
            .select_skill(skill_index)
            .map_err(|e| format!("{:?}", e))
    }

    #[wasm_bindgen]
    pub fn select_cell(&mut self, row: u8, col: u8) -> Result<(), String> {
        self.controller
            .select_cell(row, col)
            .map_err(|e| format!("{:?}", e))
    }

    #[wasm_bindgen]
    pub fn end_turn(&mut self) -> Result<(), String> {
        self.controller.end_turn().map_err(|e| format!("{:?}", e))
    }

    /// Advance the enemy schedule by `elapsed_ms`; call from the animation loop
    #[wasm_bindgen]
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<(), String> {
        self.controller
            .tick(elapsed_ms)
            .map_err(|e| format!("Enemy step failed: {:?}", e))
    }

    /// Play out every queued enemy step without waiting
    #[wasm_bindgen]
    pub fn run_pending_ai(&mut self) -> Result<(), String> {
        self.controller
            .run_pending_ai()
            .map_err(|e| format!("Enemy step failed: {:?}", e))
    }

    #[wasm_bindgen]
    pub fn ai_in_flight(&self) -> bool {
        self.controller.ai_in_flight()
    }

    #[wasm_bindgen]
    pub fn restore_stamina(&mut self, amount: u32) {
        self.controller.profile_mut().restore_stamina(amount);
    }

    /// Get the current battle view as JSON
    #[wasm_bindgen]
    pub fn get_view(&self) -> JsValue {
        log::debug("get_view", "Serializing battle to view");
        match serde_wasm_bindgen::to_value(&self.controller.view()) {
            Ok(val) => val,
            Err(e) => {
                log::error(&format!("get_view serialization failed: {:?}", e));
                JsValue::NULL
            }
        }
    }

    /// Get the current battle view as SCALE bytes
    #[wasm_bindgen]
    pub fn get_view_scale(&self) -> Vec<u8> {
        self.controller.view().encode()
    }

    /// Get the terminal outcome, or null while the battle runs
    #[wasm_bindgen]
    pub fn get_outcome(&self) -> JsValue {
        match self.controller.outcome() {
            Some(outcome) => serde_wasm_bindgen::to_value(&outcome).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Get the player profile as JSON
    #[wasm_bindgen]
    pub fn get_profile(&self) -> JsValue {
        match serde_wasm_bindgen::to_value(self.controller.profile()) {
            Ok(val) => val,
            Err(e) => {
                log::error(&format!("get_profile serialization failed: {:?}", e));
                JsValue::NULL
            }
        }
    }

    /// Overwrite the player profile from JSON (save-game restore)
    #[wasm_bindgen]
    pub fn set_profile(&mut self, profile_val: JsValue) -> Result<(), String> {
        if self.controller.battle().is_some_and(|b| b.is_in_progress()) {
            return Err("Cannot replace the profile during a battle".into());
        }
        let profile: PlayerProfile = serde_wasm_bindgen::from_value(profile_val)
            .map_err(|e| format!("Failed to parse profile: {:?}", e))?;
        *self.controller.profile_mut() = profile;
        Ok(())
    }
}
