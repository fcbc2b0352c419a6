//! Turn scheduling.
//!
//! Units act one at a time in speed order. A turn ends explicitly or once the
//! unit has both moved and attacked; the scheduler then counts down the unit's
//! own cooldowns and buffs, settles Victory/Defeat, and hands control to the
//! next living unit. Passing the end of the order starts a new round.

use alloc::vec::Vec;

use crate::battle::{Battle, BattleEvent, BattleState};
use crate::error::{CombatError, CombatResult};
use crate::types::{Unit, UnitId};

/// Speed descending; ties keep insertion order
pub fn compute_turn_order(units: &[Unit]) -> Vec<UnitId> {
    let mut order: Vec<&Unit> = units.iter().collect();
    order.sort_by(|a, b| b.spd.cmp(&a.spd));
    order.into_iter().map(|u| u.id).collect()
}

/// What happened when a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    /// Control passed to `next`
    Next { next: UnitId, new_round: bool },
    /// The battle reached a terminal state
    Finished(BattleState),
}

impl Battle {
    /// The unit whose turn it is
    pub fn active_unit_id(&self) -> Option<UnitId> {
        if !self.is_in_progress() {
            return None;
        }
        self.turn_order.get(self.current_index).copied()
    }

    pub fn active_unit(&self) -> Option<&Unit> {
        self.active_unit_id().and_then(|id| self.units.get(id.index()))
    }

    /// Whether the active unit has used both its move and its action
    pub fn turn_complete(&self) -> bool {
        self.active_unit().is_some_and(|u| u.moved && u.attacked)
    }

    /// End the active unit's turn and advance to the next living unit
    pub fn end_turn(&mut self) -> CombatResult<TurnAdvance> {
        let id = self.active_unit_id().ok_or(CombatError::NoActiveBattle)?;

        let unit = &mut self.units[id.index()];
        let expired = unit.end_own_turn();
        let name = unit.name.clone();
        for stat in expired {
            self.log.push(BattleEvent::BuffExpired {
                name: name.clone(),
                stat,
            });
        }

        let state = self.check_outcome();
        if state.is_terminal() {
            return Ok(TurnAdvance::Finished(state));
        }
        Ok(self.advance())
    }

    /// Step `current_index` to the next living unit, rolling rounds as the order wraps
    fn advance(&mut self) -> TurnAdvance {
        let len = self.turn_order.len();
        let mut new_round = false;
        // check_outcome guarantees someone is alive, so this finds a unit within one lap
        for _ in 0..len {
            self.current_index = (self.current_index + 1) % len;
            if self.current_index == 0 {
                self.start_round();
                new_round = true;
            }
            let next = self.turn_order[self.current_index];
            if self.units[next.index()].is_alive() {
                return TurnAdvance::Next { next, new_round };
            }
        }
        TurnAdvance::Finished(self.check_outcome())
    }

    fn start_round(&mut self) {
        self.round += 1;
        for unit in self.units.iter_mut() {
            unit.moved = false;
            unit.attacked = false;
        }
        self.log.push(BattleEvent::RoundStart { round: self.round });
    }
}
