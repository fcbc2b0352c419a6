//! Skill resolution.
//!
//! Behaviour dispatches on [`EffectKind`], never on a skill's display name.
//! Damage uses integer arithmetic so `floor` is exact:
//! `atk * (300 - def) / 300`, with defense at or beyond 300 dealing nothing.

use alloc::string::String;
use alloc::vec::Vec;

use crate::battle::{Battle, BattleEvent, Hit};
use crate::config::{AREA_DAMAGE_PERCENT, AREA_EFFECT_RADIUS, DEFENSE_SCALE};
use crate::error::{CombatError, CombatResult};
use crate::grid::Grid;
use crate::range::{attack_range, contains};
use crate::types::{EffectKind, Position, Side, StatBuff, StatKind, UnitId};

/// `floor(atk * (1 - def/300))`, never negative
pub fn basic_damage(atk: i32, def: i32) -> i32 {
    scaled_damage(atk, def, 100)
}

/// `floor(atk * 1.5 * (1 - def/300))`, never negative
pub fn area_damage(atk: i32, def: i32) -> i32 {
    scaled_damage(atk, def, AREA_DAMAGE_PERCENT)
}

fn scaled_damage(atk: i32, def: i32, percent: i64) -> i32 {
    let mitigation = (DEFENSE_SCALE - def as i64).max(0);
    let raw = (atk.max(0) as i64) * percent * mitigation / (100 * DEFENSE_SCALE);
    raw.clamp(0, i32::MAX as i64) as i32
}

/// Result of a resolved skill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillOutcome {
    /// Attacker has now both moved and attacked
    pub turn_complete: bool,
}

/// Resolve `attacker`'s skill at `skill_index` against `target`.
///
/// On success the skill goes on cooldown, the attacker is marked as having
/// acted, fallen units leave the board, and Victory/Defeat is settled before
/// anyone else can act.
pub fn resolve_skill(
    battle: &mut Battle,
    attacker: UnitId,
    skill_index: usize,
    target: Position,
) -> CombatResult<SkillOutcome> {
    if !battle.is_in_progress() {
        return Err(CombatError::NoActiveBattle);
    }
    let unit = battle.unit(attacker)?;
    if !unit.is_alive() {
        return Err(CombatError::UnknownUnit);
    }
    let skill = unit.skills.get(skill_index).ok_or(CombatError::UnknownSkill)?;
    if unit.attacked {
        return Err(CombatError::AlreadyActed);
    }
    if !skill.is_ready() {
        return Err(CombatError::SkillNotReady {
            skill: skill.name.clone(),
        });
    }
    if !Grid::in_bounds(target) || !contains(&attack_range(unit.position, skill.range), target) {
        return Err(CombatError::InvalidTarget {
            row: target.row,
            col: target.col,
        });
    }
    // Single-target skills never land on allies
    if skill.effect == EffectKind::SingleTarget
        && battle.unit_at(target).is_some_and(|t| t.side == unit.side)
    {
        return Err(CombatError::InvalidTarget {
            row: target.row,
            col: target.col,
        });
    }

    let effect = skill.effect;
    let skill_name = skill.name.clone();
    let side = unit.side;
    let name = unit.name.clone();
    let atk = unit.effective_atk();

    let event = match effect {
        EffectKind::SingleTarget => match battle.unit_at(target).map(|t| t.id) {
            Some(target_id) => {
                let victim = &mut battle.units[target_id.index()];
                let damage = basic_damage(atk, victim.effective_def());
                victim.take_damage(damage);
                BattleEvent::Attack {
                    attacker: name,
                    target: victim.name.clone(),
                    skill: skill_name,
                    damage,
                    remaining_hp: victim.hp,
                }
            }
            None => BattleEvent::Whiff {
                attacker: name,
                skill: skill_name,
            },
        },
        EffectKind::AreaAroundTarget => {
            let hits = strike_area(battle, side.opponent(), atk, target);
            BattleEvent::AreaAttack {
                attacker: name,
                skill: skill_name,
                hits,
            }
        }
        EffectKind::TeamBuffAtk => buff_team(battle, side, StatKind::Atk, name, skill_name),
        EffectKind::TeamBuffDef => buff_team(battle, side, StatKind::Def, name, skill_name),
        EffectKind::TeamCooldownReduction => {
            for ally in battle
                .units
                .iter_mut()
                .filter(|u| u.side == side && u.is_alive() && u.id != attacker)
            {
                for skill in ally.skills.iter_mut() {
                    skill.tick();
                }
            }
            BattleEvent::CooldownsReduced {
                source: name,
                skill: skill_name,
            }
        }
    };
    battle.log.push(event);

    let unit = &mut battle.units[attacker.index()];
    let skill = &mut unit.skills[skill_index];
    skill.cooldown_remaining = skill.cooldown_max;
    unit.attacked = true;
    let turn_complete = unit.moved && unit.attacked;

    battle.clear_fallen();
    battle.check_outcome();
    Ok(SkillOutcome { turn_complete })
}

/// Damage every living `victims` unit within the blast around `center`
fn strike_area(battle: &mut Battle, victims: Side, atk: i32, center: Position) -> Vec<Hit> {
    let mut hits = Vec::new();
    for pos in attack_range(center, AREA_EFFECT_RADIUS) {
        let Some(id) = battle.unit_at(pos).filter(|u| u.side == victims).map(|u| u.id) else {
            continue;
        };
        let victim = &mut battle.units[id.index()];
        let damage = area_damage(atk, victim.effective_def());
        victim.take_damage(damage);
        hits.push(Hit {
            target: id,
            target_name: victim.name.clone(),
            damage,
            remaining_hp: victim.hp,
        });
    }
    hits
}

fn buff_team(
    battle: &mut Battle,
    side: Side,
    stat: StatKind,
    source: String,
    skill: String,
) -> BattleEvent {
    let percent = stat.buff_percent();
    let turns = stat.buff_turns();
    for ally in battle
        .units
        .iter_mut()
        .filter(|u| u.side == side && u.is_alive())
    {
        let base = match stat {
            StatKind::Atk => ally.atk,
            StatKind::Def => ally.def,
        };
        ally.apply_buff(StatBuff {
            stat,
            amount: base * percent / 100,
            turns_remaining: turns,
        });
    }
    BattleEvent::TeamBuff {
        source,
        skill,
        stat,
        percent,
        turns,
    }
}
