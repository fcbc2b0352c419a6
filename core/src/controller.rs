//! Battle controller
//!
//! Owns the single live [`Battle`], the player's selection state, and the
//! enemy step queue. Presentation code drives it through the command methods
//! and reads [`BattleController::view`] back; no other component mutates the
//! grid or the units.

use alloc::format;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::ai::{run_step, AiSchedule, ScheduledStep, StepEffect};
use crate::battle::{Battle, BattleEvent, BattleState};
use crate::config::{BattleConfig, GRID_SIZE, MAX_TEAM_SIZE, MOVE_RADIUS};
use crate::error::{CombatError, CombatResult};
use crate::grid::Grid;
use crate::log;
use crate::range::{attack_range, contains, move_range};
use crate::rng::XorShiftRng;
use crate::roster::{boss_encounter, PlayerResources, RosterProvider};
use crate::skills::resolve_skill;
use crate::turns::TurnAdvance;
use crate::types::{Position, Side, UnitId};
use crate::view::BattleView;

/// What the player is doing with the selected unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionMode {
    Idle,
    Moving,
    Targeting { skill: usize },
}

/// Player-side selection, rebuilt at every turn change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub unit: Option<UnitId>,
    pub mode: SelectionMode,
    pub move_range: Vec<Position>,
    pub attack_range: Vec<Position>,
    pub cell: Option<Position>,
}

impl Selection {
    fn empty() -> Self {
        Self {
            unit: None,
            mode: SelectionMode::Idle,
            move_range: Vec::new(),
            attack_range: Vec::new(),
            cell: None,
        }
    }
}

/// Terminal notification for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleOutcome {
    Victory { reward: u32 },
    Defeat,
}

pub struct BattleController<P> {
    profile: P,
    config: BattleConfig,
    seed: u64,
    battles_started: u64,
    battle: Option<Battle>,
    selection: Selection,
    schedule: AiSchedule,
    outcome: Option<BattleOutcome>,
}

impl<P: PlayerResources + RosterProvider> BattleController<P> {
    pub fn new(profile: P, config: BattleConfig, seed: u64) -> Self {
        Self {
            profile,
            config,
            seed,
            battles_started: 0,
            battle: None,
            selection: Selection::empty(),
            schedule: AiSchedule::new(),
            outcome: None,
        }
    }

    pub fn profile(&self) -> &P {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut P {
        &mut self.profile
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn battle_mut(&mut self) -> Option<&mut Battle> {
        self.battle.as_mut()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// Whether enemy steps are waiting to run
    pub fn ai_in_flight(&self) -> bool {
        !self.schedule.is_idle()
    }

    pub fn state(&self) -> BattleState {
        self.battle.as_ref().map_or(BattleState::Setup, |b| b.state)
    }

    pub fn view(&self) -> BattleView {
        BattleView::new(self.battle.as_ref(), &self.selection, self.ai_in_flight())
    }

    /// Spend stamina, field up to `max_team_size` owned characters against
    /// the boss encounter, and start the first turn
    pub fn start_battle(&mut self) -> CombatResult<()> {
        log::action("start_battle", &format!("stamina={}", self.profile.stamina()));
        if self.battle.as_ref().is_some_and(|b| b.is_in_progress()) {
            return Err(CombatError::BattleInProgress);
        }
        let need = self.config.stamina_cost;
        let have = self.profile.stamina();
        if have < need {
            log::result(false, "not enough stamina");
            return Err(CombatError::InsufficientStamina { have, need });
        }

        let players: Vec<_> = self
            .profile
            .owned_characters()
            .iter()
            .take(self.config.max_team_size.min(MAX_TEAM_SIZE))
            .enumerate()
            .map(|(i, c)| c.to_unit(Position::new(GRID_SIZE - 1, (i as u8) * 2)))
            .collect();
        if players.is_empty() {
            log::result(false, "no owned characters");
            return Err(CombatError::NoOwnedCharacters);
        }

        let mut rng = XorShiftRng::seed_from_u64(self.seed.wrapping_add(self.battles_started));
        let mut battle = Battle::new(Grid::generate(&mut rng), players, boss_encounter());
        battle.begin()?;

        if !self.profile.deduct_stamina(need) {
            return Err(CombatError::InsufficientStamina {
                have: self.profile.stamina(),
                need,
            });
        }
        self.battles_started += 1;
        self.battle = Some(battle);
        self.selection = Selection::empty();
        self.schedule.cancel();
        self.outcome = None;
        self.hand_over();
        self.log_summary();
        log::result(true, "battle started");
        Ok(())
    }

    /// Discard the battle and return to an uninitialized controller
    pub fn reset_battle(&mut self) {
        log::action("reset_battle", "discarding battle");
        self.battle = None;
        self.selection = Selection::empty();
        self.schedule.cancel();
        self.outcome = None;
    }

    /// Pick the active player unit and show where it can move
    pub fn select_unit(&mut self, id: UnitId) -> CombatResult<()> {
        log::action("select_unit", &format!("unit={}", id.0));
        let battle = self.player_turn()?;
        let unit = battle.unit(id)?;
        if battle.active_unit_id() != Some(id) {
            return Err(CombatError::NotYourTurn);
        }
        let move_range = if unit.moved {
            Vec::new()
        } else {
            move_range(&battle.grid, unit.position, MOVE_RADIUS)
        };
        self.selection = Selection {
            unit: Some(id),
            move_range,
            ..Selection::empty()
        };
        Ok(())
    }

    /// Switch between moving and idle for the selected unit
    pub fn toggle_move_mode(&mut self) -> CombatResult<()> {
        log::action("toggle_move_mode", "");
        let battle = self.player_turn()?;
        let id = self.selection.unit.ok_or(CombatError::NoUnitSelected)?;
        if battle.unit(id)?.moved {
            return Err(CombatError::AlreadyMoved);
        }
        self.selection.mode = match self.selection.mode {
            SelectionMode::Moving => SelectionMode::Idle,
            _ => SelectionMode::Moving,
        };
        self.selection.attack_range.clear();
        Ok(())
    }

    /// Arm a skill and show its reach
    pub fn select_skill(&mut self, skill_index: usize) -> CombatResult<()> {
        log::action("select_skill", &format!("skill={}", skill_index));
        let battle = self.player_turn()?;
        let id = self.selection.unit.ok_or(CombatError::NoUnitSelected)?;
        let unit = battle.unit(id)?;
        let skill = unit.skills.get(skill_index).ok_or(CombatError::UnknownSkill)?;
        if unit.attacked {
            return Err(CombatError::AlreadyActed);
        }
        if !skill.is_ready() {
            return Err(CombatError::SkillNotReady {
                skill: skill.name.clone(),
            });
        }
        let reach = attack_range(unit.position, skill.range);
        self.selection.attack_range = reach;
        self.selection.mode = SelectionMode::Targeting { skill: skill_index };
        Ok(())
    }

    /// Click a cell: move there, fire the armed skill at it, or just inspect it
    pub fn select_cell(&mut self, row: u8, col: u8) -> CombatResult<()> {
        log::action("select_cell", &format!("row={}, col={}", row, col));
        let pos = Position::new(row, col);
        if !Grid::in_bounds(pos) {
            return Err(CombatError::InvalidTarget { row, col });
        }
        self.player_turn()?;

        let result = match (self.selection.unit, self.selection.mode) {
            (Some(id), SelectionMode::Moving) => self.player_move(id, pos),
            (Some(id), SelectionMode::Targeting { skill }) => self.player_skill(id, skill, pos),
            _ => {
                self.selection.cell = Some(pos);
                Ok(())
            }
        };
        if let Err(e) = &result {
            log::result(false, &format!("{:?}", e));
        }
        result
    }

    /// Hand the turn over at the player's request
    pub fn end_turn(&mut self) -> CombatResult<()> {
        log::action("end_turn", "");
        self.player_turn()?;
        self.finish_turn()
    }

    /// Feed wall-clock time to the enemy schedule, running every step that falls due.
    ///
    /// Time left after one enemy's turn carries into the next enemy's turn.
    pub fn tick(&mut self, elapsed_ms: u32) -> CombatResult<()> {
        let mut budget = elapsed_ms;
        loop {
            let (due, unused) = self.schedule.tick(budget);
            budget = unused;
            if due.is_empty() {
                return Ok(());
            }
            let mut due = due.into_iter();
            while let Some(step) = due.next() {
                if let Err(e) = self.run_ai_step(step) {
                    log::warn(&format!("enemy step {:?} failed: {:?}", step.step, e));
                    self.schedule.requeue(due);
                    return Err(e);
                }
            }
        }
    }

    /// Run every pending enemy step immediately, ignoring delays
    pub fn run_pending_ai(&mut self) -> CombatResult<()> {
        while let Some(step) = self.schedule.next_step() {
            self.run_ai_step(step)?;
        }
        Ok(())
    }

    fn run_ai_step(&mut self, step: ScheduledStep) -> CombatResult<()> {
        let Some(battle) = self.battle.as_mut() else {
            self.schedule.cancel();
            return Ok(());
        };
        log::debug("ai", &format!("{:?} for unit {}", step.step, step.unit.0));
        let effect = run_step(battle, step)?;
        if let StepEffect::TurnEnded(advance) = effect {
            self.after_advance(advance);
        } else {
            self.settle();
        }
        Ok(())
    }

    fn player_turn(&self) -> CombatResult<&Battle> {
        let battle = self
            .battle
            .as_ref()
            .filter(|b| b.is_in_progress())
            .ok_or(CombatError::NoActiveBattle)?;
        if self.ai_in_flight() || !battle.active_unit().is_some_and(|u| u.is_player()) {
            return Err(CombatError::NotYourTurn);
        }
        Ok(battle)
    }

    fn player_move(&mut self, id: UnitId, pos: Position) -> CombatResult<()> {
        let battle = self.battle.as_mut().ok_or(CombatError::NoActiveBattle)?;
        if battle.unit_at(pos).is_some() {
            return Err(CombatError::OccupiedCell {
                row: pos.row,
                col: pos.col,
            });
        }
        if !contains(&self.selection.move_range, pos) {
            return Err(CombatError::InvalidTarget {
                row: pos.row,
                col: pos.col,
            });
        }
        battle.move_unit(id, pos)?;
        let complete = battle.turn_complete();
        self.selection.mode = SelectionMode::Idle;
        self.selection.move_range.clear();
        if complete {
            return self.finish_turn();
        }
        Ok(())
    }

    fn player_skill(&mut self, id: UnitId, skill: usize, pos: Position) -> CombatResult<()> {
        if !contains(&self.selection.attack_range, pos) {
            return Err(CombatError::InvalidTarget {
                row: pos.row,
                col: pos.col,
            });
        }
        let battle = self.battle.as_mut().ok_or(CombatError::NoActiveBattle)?;
        let outcome = resolve_skill(battle, id, skill, pos)?;
        self.selection.mode = SelectionMode::Idle;
        self.selection.attack_range.clear();
        if self.settle() {
            return Ok(());
        }
        if outcome.turn_complete {
            return self.finish_turn();
        }
        self.refresh_move_range();
        Ok(())
    }

    /// Knockouts free cells, so an unmoved unit's options change after it acts
    fn refresh_move_range(&mut self) {
        let Some(battle) = self.battle.as_ref() else {
            return;
        };
        let range = match self.selection.unit.and_then(|id| battle.unit(id).ok()) {
            Some(unit) if !unit.moved => move_range(&battle.grid, unit.position, MOVE_RADIUS),
            _ => Vec::new(),
        };
        self.selection.move_range = range;
    }

    fn finish_turn(&mut self) -> CombatResult<()> {
        let battle = self.battle.as_mut().ok_or(CombatError::NoActiveBattle)?;
        let advance = battle.end_turn()?;
        self.after_advance(advance);
        Ok(())
    }

    fn after_advance(&mut self, advance: TurnAdvance) {
        self.selection = Selection::empty();
        match advance {
            TurnAdvance::Next { next, new_round } => {
                log::debug(
                    "turn",
                    &format!("next unit {} (new round: {})", next.0, new_round),
                );
                self.hand_over();
            }
            TurnAdvance::Finished(_) => {
                self.settle();
            }
        }
        self.log_summary();
    }

    /// Queue enemy steps if the active unit is not player-controlled
    fn hand_over(&mut self) {
        let Some(battle) = self.battle.as_ref() else {
            return;
        };
        if let Some(unit) = battle.active_unit().filter(|u| !u.is_player()) {
            self.schedule.plan_turn(unit.id, &self.config);
        }
    }

    /// Apply rewards once the battle has ended. Returns true if it has.
    fn settle(&mut self) -> bool {
        let Some(battle) = self.battle.as_mut() else {
            return false;
        };
        if !battle.state.is_terminal() {
            return false;
        }
        if self.outcome.is_some() {
            return true;
        }
        self.schedule.cancel();
        self.selection = Selection::empty();
        let outcome = match battle.state {
            BattleState::Victory => {
                let reward = self.config.victory_credits;
                self.profile.grant_credits(reward);
                self.profile.advance_chapter(self.config.victory_chapter);
                battle.log.push(BattleEvent::Victory { credits: reward });
                BattleOutcome::Victory { reward }
            }
            _ => {
                battle.log.push(BattleEvent::Defeat);
                BattleOutcome::Defeat
            }
        };
        log::info(&format!("Battle result: {:?}", outcome));
        self.outcome = Some(outcome);
        true
    }

    fn log_summary(&self) {
        if let Some(battle) = self.battle.as_ref() {
            log::battle_summary(
                battle.state.as_str(),
                battle.round,
                battle.active_unit_id().map(|id| id.0),
                battle.living(Side::Player).count(),
                battle.living(Side::Enemy).count(),
            );
        }
    }
}
