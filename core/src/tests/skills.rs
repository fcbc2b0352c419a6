use super::*;
use crate::battle::{BattleEvent, BattleState};
use crate::error::CombatError;
use crate::skills::{area_damage, basic_damage, resolve_skill};

#[test]
fn test_damage_formula() {
    // floor(120 * (1 - 80/300)) = 88
    assert_eq!(basic_damage(120, 80), 88);
    // floor(180 * 1.5 * (1 - 50/300)) = 225
    assert_eq!(area_damage(180, 50), 225);
    assert_eq!(basic_damage(100, 0), 100);
}

#[test]
fn test_defense_at_or_above_scale_deals_nothing() {
    assert_eq!(basic_damage(500, 300), 0);
    assert_eq!(basic_damage(500, 450), 0);
    assert_eq!(area_damage(500, 1000), 0);
    assert_eq!(basic_damage(-20, 0), 0);
}

#[test]
fn test_single_target_hit() {
    let mut battle = live_battle(
        vec![make_unit("Maya", 600, 120, 80, 6, 2, 2)],
        vec![make_unit("Minion", 500, 80, 80, 4, 2, 3)],
    );
    let outcome = resolve_skill(&mut battle, UnitId(0), 0, Position::new(2, 3)).unwrap();

    assert!(!outcome.turn_complete);
    assert_eq!(battle.units[1].hp, 412);
    assert!(battle.units[0].attacked);
    assert_eq!(
        battle.log.last(),
        Some(&BattleEvent::Attack {
            attacker: "Maya".to_string(),
            target: "Minion".to_string(),
            skill: "Basic Attack".to_string(),
            damage: 88,
            remaining_hp: 412,
        })
    );
    assert_eq!(battle.state, BattleState::InProgress);
}

#[test]
fn test_lethal_hit_clamps_hp_and_wins() {
    let mut battle = live_battle(
        vec![make_unit("Maya", 600, 120, 80, 6, 2, 2)],
        vec![make_unit("Minion", 10, 80, 80, 4, 2, 3)],
    );
    resolve_skill(&mut battle, UnitId(0), 0, Position::new(2, 3)).unwrap();

    let minion = &battle.units[1];
    assert_eq!(minion.hp, 0);
    assert!(!minion.is_alive());
    // Knocked out units leave the board but stay in the roster
    assert_eq!(battle.units.len(), 2);
    assert!(!battle.grid.is_occupied(Position::new(2, 3)));
    assert!(battle
        .log
        .contains(&BattleEvent::KnockedOut { name: "Minion".to_string() }));
    assert_eq!(battle.state, BattleState::Victory);
}

#[test]
fn test_area_skill_hits_only_opponents() {
    let coco = with_skill(
        make_unit("Coco", 750, 180, 60, 8, 3, 2),
        "Power Strike",
        EffectKind::AreaAroundTarget,
        4,
        2,
    );
    let maya = make_unit("Maya", 600, 120, 80, 6, 2, 1);
    let mut battle = live_battle(
        vec![coco, maya],
        vec![
            make_unit("Front", 1000, 80, 50, 4, 2, 2),
            make_unit("Back", 1000, 80, 50, 4, 1, 2),
            make_unit("Far", 1000, 80, 50, 4, 0, 0),
        ],
    );

    resolve_skill(&mut battle, UnitId(0), 1, Position::new(2, 2)).unwrap();

    assert_eq!(battle.units[0].hp, 750);
    assert_eq!(battle.units[1].hp, 600);
    assert_eq!(battle.units[2].hp, 775);
    assert_eq!(battle.units[3].hp, 775);
    assert_eq!(battle.units[4].hp, 1000);
    assert_eq!(battle.units[0].skills[1].cooldown_remaining, 4);

    let Some(BattleEvent::AreaAttack { hits, .. }) = battle.log.last() else {
        panic!("expected an area attack, got {:?}", battle.log.last());
    };
    // Row-major blast order
    let names: Vec<_> = hits.iter().map(|h| h.target_name.as_str()).collect();
    assert_eq!(names, vec!["Back", "Front"]);
    assert!(hits.iter().all(|h| h.damage == 225));
}

#[test]
fn test_attack_on_empty_cell_still_spends_the_action() {
    let mut battle = live_battle(
        vec![with_skill(
            make_unit("Kiki", 680, 200, 50, 9, 2, 2),
            "Pirate's Cutlass",
            EffectKind::SingleTarget,
            3,
            1,
        )],
        vec![make_unit("Minion", 300, 80, 50, 4, 0, 0)],
    );
    resolve_skill(&mut battle, UnitId(0), 1, Position::new(2, 1)).unwrap();

    let kiki = &battle.units[0];
    assert!(kiki.attacked);
    assert_eq!(kiki.skills[1].cooldown_remaining, 3);
    assert!(matches!(battle.log.last(), Some(BattleEvent::Whiff { .. })));
}

#[test]
fn test_invalid_targets_are_rejected() {
    let mut battle = live_battle(
        vec![
            make_unit("Maya", 600, 120, 80, 6, 2, 2),
            make_unit("Mymy", 900, 100, 120, 4, 2, 3),
        ],
        vec![make_unit("Minion", 300, 80, 50, 4, 0, 0)],
    );
    let maya = UnitId(0);

    // Out of reach
    assert_eq!(
        resolve_skill(&mut battle, maya, 0, Position::new(0, 2)),
        Err(CombatError::InvalidTarget { row: 0, col: 2 })
    );
    // Off the board
    assert_eq!(
        resolve_skill(&mut battle, maya, 0, Position::new(2, 7)),
        Err(CombatError::InvalidTarget { row: 2, col: 7 })
    );
    // Ally
    assert_eq!(
        resolve_skill(&mut battle, maya, 0, Position::new(2, 3)),
        Err(CombatError::InvalidTarget { row: 2, col: 3 })
    );
    assert_eq!(
        resolve_skill(&mut battle, maya, 5, Position::new(2, 1)),
        Err(CombatError::UnknownSkill)
    );
    assert!(!battle.units[0].attacked);
    assert_eq!(battle.units[1].hp, 900);
}

#[test]
fn test_one_skill_per_turn_and_cooldowns() {
    let mut battle = live_battle(
        vec![with_skill(
            make_unit("Kiki", 680, 200, 50, 9, 2, 2),
            "Pirate's Cutlass",
            EffectKind::SingleTarget,
            3,
            1,
        )],
        vec![make_unit("Minion", 3000, 80, 50, 4, 2, 3)],
    );
    let kiki = UnitId(0);
    let target = Position::new(2, 3);
    resolve_skill(&mut battle, kiki, 1, target).unwrap();

    assert_eq!(
        resolve_skill(&mut battle, kiki, 0, target),
        Err(CombatError::AlreadyActed)
    );

    battle.units[0].attacked = false;
    assert_eq!(
        resolve_skill(&mut battle, kiki, 1, target),
        Err(CombatError::SkillNotReady {
            skill: "Pirate's Cutlass".to_string()
        })
    );
    // Basic attack has no cooldown
    assert!(resolve_skill(&mut battle, kiki, 0, target).is_ok());
}

#[test]
fn test_team_attack_buff_applies_and_expires() {
    let maya = with_skill(
        make_unit("Maya", 600, 120, 80, 6, 4, 0),
        "Inspiration",
        EffectKind::TeamBuffAtk,
        3,
        1,
    );
    let coco = make_unit("Coco", 750, 180, 60, 8, 4, 2);
    let mut battle = live_battle(
        vec![maya, coco],
        vec![make_unit("Minion", 300, 80, 50, 4, 0, 4)],
    );

    resolve_skill(&mut battle, UnitId(0), 1, Position::new(4, 0)).unwrap();
    assert_eq!(battle.units[0].effective_atk(), 132);
    assert_eq!(battle.units[1].effective_atk(), 198);
    assert_eq!(battle.units[1].atk, 180);
    // Enemies are untouched
    assert_eq!(battle.units[2].effective_atk(), 80);

    let coco = &mut battle.units[1];
    assert!(coco.end_own_turn().is_empty());
    assert!(coco.end_own_turn().is_empty());
    assert_eq!(coco.end_own_turn(), vec![StatKind::Atk]);
    assert_eq!(coco.effective_atk(), 180);
    assert!(coco.buffs.is_empty());
}

#[test]
fn test_reapplied_buff_refreshes_instead_of_stacking() {
    let mut unit = make_unit("Mymy", 900, 100, 120, 4, 0, 0);
    let buff = StatBuff {
        stat: StatKind::Def,
        amount: 24,
        turns_remaining: 4,
    };
    unit.apply_buff(buff.clone());
    unit.end_own_turn();
    unit.apply_buff(buff);

    assert_eq!(unit.buffs.len(), 1);
    assert_eq!(unit.buffs[0].turns_remaining, 4);
    assert_eq!(unit.effective_def(), 144);
}

#[test]
fn test_cooldown_reduction_ticks_other_allies() {
    let vera = with_skill(
        make_unit("Vera Persijn", 550, 110, 70, 7, 4, 0),
        "Guidance",
        EffectKind::TeamCooldownReduction,
        4,
        1,
    );
    let mut coco = with_skill(
        make_unit("Coco", 750, 180, 60, 8, 4, 2),
        "Power Strike",
        EffectKind::AreaAroundTarget,
        4,
        2,
    );
    coco.skills[1].cooldown_remaining = 3;
    let mut minion = make_unit("Minion", 300, 80, 50, 4, 0, 4);
    minion.skills[0] = Skill::new("Attack", EffectKind::SingleTarget, 2, 1);
    minion.skills[0].cooldown_remaining = 2;
    let mut battle = live_battle(vec![vera, coco], vec![minion]);

    resolve_skill(&mut battle, UnitId(0), 1, Position::new(4, 0)).unwrap();

    assert_eq!(battle.units[1].skills[1].cooldown_remaining, 2);
    assert_eq!(battle.units[0].skills[1].cooldown_remaining, 4);
    assert_eq!(battle.units[2].skills[0].cooldown_remaining, 2);
    assert_eq!(
        battle.log.last().map(|e| e.to_string()),
        Some("Vera Persijn uses Guidance! Team cooldowns reduced by 1.".to_string())
    );
}
