use super::*;
use crate::ai::{check_boss_phase, choose_move, choose_target, run_step, AiSchedule, AiStep, ScheduledStep, StepEffect};
use crate::battle::BattleEvent;
use crate::config::BattleConfig;
use crate::roster::boss_encounter;
use crate::turns::TurnAdvance;

fn step(unit: u32, step: AiStep) -> ScheduledStep {
    ScheduledStep {
        unit: UnitId(unit),
        step,
        delay_ms: 0,
    }
}

#[test]
fn test_choose_move_closes_distance_greedily() {
    let battle = live_battle(
        vec![make_unit("Coco", 750, 180, 60, 1, 4, 2)],
        vec![make_unit("Minion", 300, 80, 50, 9, 0, 2)],
    );
    assert_eq!(choose_move(&battle, UnitId(1)), Some(Position::new(2, 2)));
}

#[test]
fn test_choose_move_keeps_first_of_equal_candidates() {
    let battle = live_battle(
        vec![make_unit("Coco", 750, 180, 60, 1, 4, 4)],
        vec![make_unit("Minion", 300, 80, 50, 9, 0, 0)],
    );
    // (0,2), (1,1) and (2,0) all end six cells away; row-major order picks (0,2)
    assert_eq!(choose_move(&battle, UnitId(1)), Some(Position::new(0, 2)));
}

#[test]
fn test_choose_target_takes_first_adjacent_player() {
    let battle = live_battle(
        vec![
            make_unit("Maya", 600, 120, 80, 1, 1, 2),
            make_unit("Mymy", 900, 100, 120, 1, 2, 3),
        ],
        vec![
            make_unit("Minion", 300, 80, 50, 9, 2, 2),
            make_unit("Other", 300, 80, 50, 9, 2, 1),
        ],
    );
    assert_eq!(choose_target(&battle, UnitId(2)), Some(Position::new(1, 2)));
    assert_eq!(choose_target(&battle, UnitId(3)), None);
}

#[test]
fn test_full_enemy_turn() {
    let mut battle = live_battle(
        vec![make_unit("Coco", 500, 180, 0, 1, 3, 2)],
        vec![make_unit("Minion", 300, 100, 50, 9, 0, 2)],
    );
    let minion = 1;

    assert_eq!(run_step(&mut battle, step(minion, AiStep::Move)), Ok(StepEffect::Continue));
    assert_eq!(battle.units[1].position, Position::new(2, 2));

    assert_eq!(run_step(&mut battle, step(minion, AiStep::Attack)), Ok(StepEffect::Continue));
    assert_eq!(battle.units[0].hp, 400);
    assert!(battle.units[1].attacked);

    assert_eq!(
        run_step(&mut battle, step(minion, AiStep::EndTurn)),
        Ok(StepEffect::TurnEnded(TurnAdvance::Next {
            next: UnitId(0),
            new_round: false
        }))
    );
}

#[test]
fn test_steps_for_inactive_units_are_ignored() {
    let mut battle = live_battle(
        vec![make_unit("Coco", 500, 180, 0, 9, 3, 2)],
        vec![make_unit("Minion", 300, 100, 50, 1, 0, 2)],
    );
    assert_eq!(run_step(&mut battle, step(1, AiStep::Move)), Ok(StepEffect::Continue));
    assert_eq!(battle.units[1].position, Position::new(0, 2));
    assert!(!battle.units[1].moved);
}

#[test]
fn test_no_target_is_logged_and_spends_the_action() {
    let mut battle = live_battle(
        vec![make_unit("Coco", 750, 180, 60, 1, 4, 4)],
        vec![make_unit("Minion", 300, 80, 50, 9, 0, 0)],
    );
    run_step(&mut battle, step(1, AiStep::Move)).unwrap();
    run_step(&mut battle, step(1, AiStep::Attack)).unwrap();

    assert!(battle.units[1].attacked);
    assert_eq!(battle.units[0].hp, 750);
    assert_eq!(
        battle.log.last(),
        Some(&BattleEvent::NoTarget {
            name: "Minion".to_string()
        })
    );
}

#[test]
fn test_boss_uses_first_ready_offensive_skill() {
    let mut enemies = boss_encounter();
    enemies.truncate(1);
    enemies[0].spd = 9;
    enemies[0].skills[0].cooldown_remaining = 2;
    let mut battle = live_battle(vec![make_unit("Mymy", 900, 100, 120, 1, 1, 2)], enemies);

    run_step(&mut battle, step(1, AiStep::Attack)).unwrap();

    let Some(BattleEvent::AreaAttack { skill, hits, .. }) = battle.log.last() else {
        panic!("expected an area attack, got {:?}", battle.log.last());
    };
    assert_eq!(skill, "Last Gasp");
    assert_eq!(hits.len(), 1);
    assert_eq!(battle.units[1].skills[1].cooldown_remaining, 5);
}

#[test]
fn test_boss_phase_transition_happens_once() {
    let mut battle = live_battle(
        vec![make_unit("Coco", 750, 180, 60, 1, 4, 4)],
        boss_encounter(),
    );
    let boss = UnitId(1);

    battle.units[1].hp = 360;
    check_boss_phase(&mut battle, boss);
    assert_eq!(battle.units[1].phase, Some(1));
    assert_eq!(battle.units[1].def, 100);

    battle.units[1].hp = 359;
    check_boss_phase(&mut battle, boss);
    assert_eq!(battle.units[1].phase, Some(2));
    assert_eq!(battle.units[1].def, 50);
    assert_eq!(
        battle.log.last().map(|e| e.to_string()),
        Some("Studio Massa enters phase 2: Creative Block! Defense reduced!".to_string())
    );

    battle.units[1].hp = 100;
    check_boss_phase(&mut battle, boss);
    assert_eq!(battle.units[1].def, 50);
}

#[test]
fn test_schedule_releases_steps_as_time_passes() {
    let config = BattleConfig::default();
    let mut schedule = AiSchedule::new();
    assert!(schedule.is_idle());

    schedule.plan_turn(UnitId(3), &config);
    assert_eq!(schedule.pending().count(), 3);

    assert_eq!(schedule.tick(999), (vec![], 0));
    let (due, unused) = schedule.tick(1);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].step, AiStep::Move);
    assert_eq!(unused, 0);

    let (due, unused) = schedule.tick(1300);
    let steps: Vec<_> = due.into_iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![AiStep::Attack, AiStep::EndTurn]);
    assert_eq!(unused, 0);
    assert!(schedule.is_idle());
}

#[test]
fn test_schedule_hands_back_time_left_after_the_turn() {
    let mut schedule = AiSchedule::new();
    schedule.plan_turn(UnitId(4), &BattleConfig::default());

    let (due, unused) = schedule.tick(3000);
    assert_eq!(due.len(), 3);
    assert_eq!(unused, 700);
    assert!(schedule.is_idle());

    // Nothing queued: all of it comes straight back
    assert_eq!(schedule.tick(250), (vec![], 250));
}

#[test]
fn test_requeued_steps_are_due_at_once() {
    let mut schedule = AiSchedule::new();
    schedule.plan_turn(UnitId(4), &BattleConfig::default());
    let (due, _) = schedule.tick(2300);
    assert!(schedule.is_idle());

    let mut due = due.into_iter();
    due.next();
    schedule.requeue(due);

    let (due, _) = schedule.tick(0);
    let steps: Vec<_> = due.into_iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![AiStep::Attack, AiStep::EndTurn]);
}

#[test]
fn test_cancelled_schedule_runs_nothing() {
    let mut schedule = AiSchedule::new();
    schedule.plan_turn(UnitId(3), &BattleConfig::default());
    schedule.cancel();
    assert!(schedule.is_idle());
    assert!(schedule.tick(10_000).0.is_empty());
    assert_eq!(schedule.next_step(), None);
}

#[test]
fn test_choose_move_prefers_earlier_player_on_ties() {
    let battle = live_battle(
        vec![
            make_unit("Mymy", 900, 100, 120, 1, 4, 4),
            make_unit("Maya", 600, 120, 80, 1, 4, 0),
        ],
        vec![make_unit("Minion", 300, 80, 50, 9, 0, 2)],
    );
    // (0,4) is four cells from Mymy and (0,0) four from Maya. Players are
    // scanned in roster order, so Mymy's closest cell wins even though (0,0)
    // comes first in row-major order.
    assert_eq!(choose_move(&battle, UnitId(2)), Some(Position::new(0, 4)));
}

#[test]
fn test_attack_step_triggers_boss_phase() {
    let mut enemies = boss_encounter();
    enemies.truncate(1);
    enemies[0].spd = 9;
    enemies[0].hp = 300;
    let mut battle = live_battle(vec![make_unit("Mymy", 900, 100, 120, 1, 1, 2)], enemies);

    run_step(&mut battle, step(1, AiStep::Attack)).unwrap();

    let boss = &battle.units[1];
    assert!(boss.attacked);
    assert_eq!(boss.phase, Some(2));
    assert_eq!(boss.def, 50);
    assert!(battle.units[0].hp < 900);
    assert_eq!(
        battle.log.last(),
        Some(&BattleEvent::PhaseTransition {
            name: "Studio Massa".to_string(),
            phase: 2
        })
    );
}
