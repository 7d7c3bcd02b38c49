//! 2D grid of capacity-limited cells.

use crate::agent::Agent;
use crate::cell::GridCell;
use hamlet_core::{AgentId, Error, Position, Result, WorldConfig};
use serde::Serialize;
use tracing::{trace, warn};

/// A bounded, fixed-size grid. Cells are stored row-major: `x` selects the
/// column in `0..width`, `y` the row in `0..height`.
#[derive(Debug, Clone, Serialize)]
pub struct WorldGrid {
    width: i32,
    height: i32,
    cells: Vec<GridCell>,
}

impl WorldGrid {
    pub fn new(width: i32, height: i32, capacity: u32) -> Result<Self> {
        Self::from_config(&WorldConfig {
            width,
            height,
            cell_capacity: capacity,
        })
    }

    /// Create a grid from world configuration
    pub fn from_config(config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let size = (config.width as usize) * (config.height as usize);

        Ok(Self {
            width: config.width,
            height: config.height,
            cells: vec![GridCell::new(config.cell_capacity); size],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        0 <= pos.x && pos.x < self.width && 0 <= pos.y && pos.y < self.height
    }

    fn pos_to_index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    pub fn cell(&self, pos: Position) -> Option<&GridCell> {
        self.pos_to_index(pos).map(|index| &self.cells[index])
    }

    fn bounds_error(&self, position: Position) -> Error {
        Error::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        }
    }

    /// Insert an agent into the cell at its own coordinates.
    ///
    /// Returns `Ok(false)` when the cell is full. Coordinates outside the
    /// grid and agents already listed in any cell are caller bugs and
    /// produce [`Error::OutOfBounds`] and [`Error::AlreadyExists`].
    pub fn place(&mut self, agent: &Agent) -> Result<bool> {
        let index = self
            .pos_to_index(agent.position())
            .ok_or_else(|| self.bounds_error(agent.position()))?;
        if self.cells.iter().any(|cell| cell.contains(agent.id())) {
            return Err(Error::AlreadyExists(agent.id()));
        }
        Ok(self.cells[index].add(agent))
    }

    /// Relocate `agent` to `target`.
    ///
    /// Capacity is checked before the agent leaves its current cell, so a
    /// rejected move never mutates anything. Moving to the current cell
    /// always succeeds. An agent that is not listed in the cell at its own
    /// coordinates is rejected.
    pub fn move_agent(&mut self, agent: &mut Agent, target: Position) -> bool {
        let Some(to) = self.pos_to_index(target) else {
            trace!(agent_id = %agent.id(), x = target.x, y = target.y, "Move rejected: out of bounds");
            return false;
        };

        let source = agent.position();
        let from = match self.pos_to_index(source) {
            Some(index) if self.cells[index].contains(agent.id()) => index,
            _ => {
                warn!(
                    agent_id = %agent.id(),
                    x = source.x,
                    y = source.y,
                    "Move rejected: agent is not placed at its recorded position"
                );
                return false;
            }
        };

        if from == to {
            return true;
        }

        if !self.cells[to].can_accommodate(agent) {
            trace!(
                agent_id = %agent.id(),
                x = target.x,
                y = target.y,
                used = self.cells[to].used(),
                capacity = self.cells[to].capacity(),
                "Move rejected: target cell full"
            );
            return false;
        }

        self.cells[from].remove(agent.id());
        let added = self.cells[to].add(agent);
        debug_assert!(added, "capacity was checked before removal");
        agent.set_position(target);
        true
    }

    /// Take the agent out of the cell at its coordinates
    pub fn remove(&mut self, agent: &Agent) -> bool {
        match self.pos_to_index(agent.position()) {
            Some(index) => self.cells[index].remove(agent.id()),
            None => false,
        }
    }

    /// Every position whose cell lists `id`
    pub fn locate(&self, id: AgentId) -> Vec<Position> {
        self.iter()
            .filter(|(_, cell)| cell.contains(id))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Summed size of all occupants across the grid
    pub fn total_occupancy(&self) -> u64 {
        self.cells.iter().map(|cell| cell.used() as u64).sum()
    }

    /// Iterator over all positions
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &GridCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }
}
