//! Enemy AI.
//!
//! An enemy turn is three steps: move toward the nearest player, attack
//! something adjacent, end the turn. The steps are queued in an [`AiSchedule`]
//! with presentation delays and driven by an external clock through
//! [`AiSchedule::tick`], or drained at once with [`AiSchedule::next_step`]. Nothing
//! else may touch the battle while steps are pending.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::battle::{Battle, BattleEvent};
use crate::config::{BattleConfig, BASIC_ATTACK_RADIUS, BOSS_PHASE_THRESHOLD_PERCENT, MOVE_RADIUS};
use crate::error::CombatResult;
use crate::range::{attack_range, move_range};
use crate::skills::resolve_skill;
use crate::turns::TurnAdvance;
use crate::types::{Position, Side, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AiStep {
    Move,
    Attack,
    EndTurn,
}

/// A step that becomes due `delay_ms` after the previous one ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledStep {
    pub unit: UnitId,
    pub step: AiStep,
    pub delay_ms: u32,
}

/// What running a step did to the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEffect {
    /// Turn still in flight
    Continue,
    /// The enemy's turn ended
    TurnEnded(TurnAdvance),
}

/// Pending enemy steps, oldest first
#[derive(Debug, Clone, Default)]
pub struct AiSchedule {
    queue: VecDeque<ScheduledStep>,
    /// Time accumulated toward the head step
    elapsed_ms: u32,
}

impl AiSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ScheduledStep> {
        self.queue.iter()
    }

    /// Queue a full turn for `unit`
    pub fn plan_turn(&mut self, unit: UnitId, config: &BattleConfig) {
        self.queue.push_back(ScheduledStep {
            unit,
            step: AiStep::Move,
            delay_ms: config.ai_move_delay_ms,
        });
        self.queue.push_back(ScheduledStep {
            unit,
            step: AiStep::Attack,
            delay_ms: config.ai_attack_delay_ms,
        });
        self.queue.push_back(ScheduledStep {
            unit,
            step: AiStep::EndTurn,
            delay_ms: config.ai_end_delay_ms,
        });
    }

    /// Drop every pending step
    pub fn cancel(&mut self) {
        self.queue.clear();
        self.elapsed_ms = 0;
    }

    /// Advance the clock and pop every step that has become due.
    ///
    /// Also returns the time left over once the queue runs dry, which belongs
    /// to whatever turn gets planned next.
    pub fn tick(&mut self, elapsed_ms: u32) -> (Vec<ScheduledStep>, u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        let mut due = Vec::new();
        while let Some(head) = self.queue.front() {
            if self.elapsed_ms < head.delay_ms {
                break;
            }
            self.elapsed_ms -= head.delay_ms;
            due.extend(self.queue.pop_front());
        }
        let mut unused = 0;
        if self.queue.is_empty() {
            unused = core::mem::take(&mut self.elapsed_ms);
        }
        (due, unused)
    }

    /// Put popped steps that never ran back at the head, due immediately
    pub fn requeue(&mut self, steps: impl DoubleEndedIterator<Item = ScheduledStep>) {
        for step in steps.rev() {
            self.queue.push_front(ScheduledStep { delay_ms: 0, ..step });
        }
    }

    /// Pop the next step regardless of its delay
    pub fn next_step(&mut self) -> Option<ScheduledStep> {
        self.elapsed_ms = 0;
        self.queue.pop_front()
    }
}

/// Run one scheduled step against the battle
pub fn run_step(battle: &mut Battle, step: ScheduledStep) -> CombatResult<StepEffect> {
    if battle.active_unit_id() != Some(step.unit) {
        return Ok(StepEffect::Continue);
    }
    match step.step {
        AiStep::Move => {
            take_move(battle, step.unit)?;
            Ok(StepEffect::Continue)
        }
        AiStep::Attack => {
            take_attack(battle, step.unit)?;
            check_boss_phase(battle, step.unit);
            Ok(StepEffect::Continue)
        }
        AiStep::EndTurn => Ok(StepEffect::TurnEnded(battle.end_turn()?)),
    }
}

/// Greedy destination: the candidate closest to any living player unit.
///
/// Scans players in roster order and candidates in range order, keeping the
/// first strict minimum.
pub fn choose_move(battle: &Battle, unit: UnitId) -> Option<Position> {
    let origin = battle.units.get(unit.index())?.position;
    let candidates = move_range(&battle.grid, origin, MOVE_RADIUS);
    let mut best: Option<(u32, Position)> = None;
    for target in battle.living(Side::Player) {
        for &candidate in &candidates {
            let distance = candidate.distance(target.position);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, candidate));
            }
        }
    }
    best.map(|(_, pos)| pos)
}

/// First cell around the unit holding a living player unit
pub fn choose_target(battle: &Battle, unit: UnitId) -> Option<Position> {
    let origin = battle.units.get(unit.index())?.position;
    attack_range(origin, BASIC_ATTACK_RADIUS)
        .into_iter()
        .find(|pos| battle.unit_at(*pos).is_some_and(|u| u.is_player()))
}

fn take_move(battle: &mut Battle, unit: UnitId) -> CombatResult<()> {
    if battle.unit(unit)?.moved {
        return Ok(());
    }
    if let Some(to) = choose_move(battle, unit) {
        battle.move_unit(unit, to)?;
    }
    Ok(())
}

fn take_attack(battle: &mut Battle, unit: UnitId) -> CombatResult<()> {
    let actor = battle.unit(unit)?;
    if actor.attacked {
        return Ok(());
    }
    let name = actor.name.clone();
    let Some(target) = choose_target(battle, unit) else {
        battle.log.push(BattleEvent::NoTarget { name });
        battle.unit_mut(unit)?.attacked = true;
        return Ok(());
    };
    // Reach 1 is always enough for the cell found above
    let skill = actor
        .skills
        .iter()
        .position(|s| s.is_ready() && s.effect.is_offensive() && s.range >= BASIC_ATTACK_RADIUS);
    match skill {
        Some(index) => {
            resolve_skill(battle, unit, index, target)?;
        }
        None => {
            battle.log.push(BattleEvent::NoReadySkill { name });
            battle.unit_mut(unit)?.attacked = true;
        }
    }
    Ok(())
}

/// One-way switch into phase two once hp drops below the threshold; halves defense
pub fn check_boss_phase(battle: &mut Battle, unit: UnitId) {
    let Some(boss) = battle.units.get_mut(unit.index()) else {
        return;
    };
    if boss.phase != Some(1) || !boss.is_alive() {
        return;
    }
    let below = (boss.hp as i64) * 100 < (boss.max_hp as i64) * BOSS_PHASE_THRESHOLD_PERCENT;
    if !below {
        return;
    }
    boss.phase = Some(2);
    boss.def /= 2;
    let name = boss.name.clone();
    battle.log.push(BattleEvent::PhaseTransition { name, phase: 2 });
}
