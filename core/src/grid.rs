//! The 5x5 battlefield.
//!
//! Terrain and hazards are rolled once at setup and never change. Only cell
//! occupancy moves during a battle, and only through [`Grid::place_unit`] and
//! [`Grid::remove_unit`], which keep every unit's `position` in step with the
//! cell that references it.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::{DESK_CHANCE_PERCENT, GRID_SIZE, HAZARD_CHANCE_PERCENT};
use crate::error::{CombatError, CombatResult};
use crate::rng::BattleRng;
use crate::types::{Position, Unit, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Terrain {
    Floor,
    Desk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Hazard {
    CrowdNoise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub position: Position,
    pub terrain: Terrain,
    pub hazard: Option<Hazard>,
    pub occupant: Option<UnitId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Row-major, `GRID_SIZE * GRID_SIZE` cells
    cells: Vec<Cell>,
}

impl Grid {
    /// An empty all-floor board
    pub fn new() -> Self {
        Self::build(|_| (Terrain::Floor, None))
    }

    /// A board with randomized desks and hazards, rolled independently per cell
    pub fn generate<R: BattleRng>(rng: &mut R) -> Self {
        Self::build(|_| {
            let hazard = rng.chance(HAZARD_CHANCE_PERCENT).then_some(Hazard::CrowdNoise);
            let terrain = if rng.chance(DESK_CHANCE_PERCENT) {
                Terrain::Desk
            } else {
                Terrain::Floor
            };
            (terrain, hazard)
        })
    }

    fn build(mut roll: impl FnMut(Position) -> (Terrain, Option<Hazard>)) -> Self {
        let mut cells = Vec::with_capacity((GRID_SIZE as usize) * (GRID_SIZE as usize));
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let position = Position::new(row, col);
                let (terrain, hazard) = roll(position);
                cells.push(Cell {
                    position,
                    terrain,
                    hazard,
                    occupant: None,
                });
            }
        }
        Self { cells }
    }

    pub fn in_bounds(pos: Position) -> bool {
        pos.row < GRID_SIZE && pos.col < GRID_SIZE
    }

    fn index(pos: Position) -> Option<usize> {
        Self::in_bounds(pos).then(|| pos.row as usize * GRID_SIZE as usize + pos.col as usize)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        Self::index(pos).map(|i| &self.cells[i])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn occupant(&self, pos: Position) -> Option<UnitId> {
        self.cell(pos).and_then(|c| c.occupant)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupant(pos).is_some()
    }

    /// Put `unit` on `to`, vacating its previous cell.
    ///
    /// The grid only ever holds living units, so any other occupant blocks.
    /// Placing a unit on the cell it already holds is a no-op.
    pub fn place_unit(&mut self, unit: &mut Unit, to: Position) -> CombatResult<()> {
        let target = Self::index(to).ok_or(CombatError::InvalidTarget {
            row: to.row,
            col: to.col,
        })?;
        match self.cells[target].occupant {
            Some(id) if id == unit.id => return Ok(()),
            Some(_) => {
                return Err(CombatError::OccupiedCell {
                    row: to.row,
                    col: to.col,
                })
            }
            None => {}
        }

        if let Some(previous) = Self::index(unit.position) {
            if self.cells[previous].occupant == Some(unit.id) {
                self.cells[previous].occupant = None;
            }
        }
        self.cells[target].occupant = Some(unit.id);
        unit.position = to;
        Ok(())
    }

    /// Clear the cell holding `unit`, if any
    pub fn remove_unit(&mut self, unit: &Unit) {
        if let Some(i) = Self::index(unit.position) {
            if self.cells[i].occupant == Some(unit.id) {
                self.cells[i].occupant = None;
            }
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
