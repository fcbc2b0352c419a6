use super::*;
use crate::error::CombatError;
use crate::grid::Terrain;
use crate::rng::XorShiftRng;

#[test]
fn test_new_grid_is_empty_floor() {
    let grid = Grid::new();
    assert_eq!(grid.cells().len(), 25);
    assert!(grid
        .cells()
        .iter()
        .all(|c| c.terrain == Terrain::Floor && c.hazard.is_none() && c.occupant.is_none()));
    // Row-major layout
    assert_eq!(grid.cells()[7].position, Position::new(1, 2));
}

#[test]
fn test_generated_grid_is_deterministic_per_seed() {
    let a = Grid::generate(&mut XorShiftRng::seed_from_u64(99));
    let b = Grid::generate(&mut XorShiftRng::seed_from_u64(99));
    assert_eq!(a, b);
    assert!(a.cells().iter().all(|c| c.occupant.is_none()));
}

#[test]
fn test_in_bounds() {
    assert!(Grid::in_bounds(Position::new(0, 0)));
    assert!(Grid::in_bounds(Position::new(4, 4)));
    assert!(!Grid::in_bounds(Position::new(5, 0)));
    assert!(!Grid::in_bounds(Position::new(0, 5)));
}

#[test]
fn test_place_unit_keeps_position_and_cell_in_step() {
    let mut grid = Grid::new();
    let mut unit = make_unit("Maya", 600, 120, 80, 6, 4, 0);
    grid.place_unit(&mut unit, Position::new(4, 0)).unwrap();
    assert_eq!(grid.occupant(Position::new(4, 0)), Some(unit.id));

    grid.place_unit(&mut unit, Position::new(3, 1)).unwrap();
    assert_eq!(unit.position, Position::new(3, 1));
    assert!(!grid.is_occupied(Position::new(4, 0)));
    assert_eq!(grid.occupant(Position::new(3, 1)), Some(unit.id));
}

#[test]
fn test_place_unit_rejects_occupied_and_off_board_cells() {
    let mut grid = Grid::new();
    let mut first = make_unit("Maya", 600, 120, 80, 6, 2, 2);
    let mut second = make_unit("Coco", 750, 180, 60, 8, 0, 0);
    second.id = UnitId(1);
    grid.place_unit(&mut first, Position::new(2, 2)).unwrap();
    grid.place_unit(&mut second, Position::new(0, 0)).unwrap();

    assert_eq!(
        grid.place_unit(&mut second, Position::new(2, 2)),
        Err(CombatError::OccupiedCell { row: 2, col: 2 })
    );
    assert_eq!(
        grid.place_unit(&mut second, Position::new(5, 1)),
        Err(CombatError::InvalidTarget { row: 5, col: 1 })
    );
    // Failed placements leave everything where it was
    assert_eq!(second.position, Position::new(0, 0));
    assert_eq!(grid.occupant(Position::new(0, 0)), Some(UnitId(1)));
}

#[test]
fn test_remove_unit_clears_only_its_own_cell() {
    let mut grid = Grid::new();
    let mut unit = make_unit("Maya", 600, 120, 80, 6, 1, 1);
    grid.place_unit(&mut unit, Position::new(1, 1)).unwrap();
    grid.remove_unit(&unit);
    assert!(!grid.is_occupied(Position::new(1, 1)));
}
