//! A single fixed-capacity grid location.

use crate::agent::Agent;
use hamlet_core::AgentId;
use serde::{Deserialize, Serialize};

/// Occupancy record held by a cell. The agent itself is owned by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: AgentId,
    pub size: u32,
}

impl From<&Agent> for Occupant {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id(),
            size: agent.size(),
        }
    }
}

/// Grid cell holding agents whose summed size never exceeds `capacity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    occupants: Vec<Occupant>,
    capacity: u32,
}

impl GridCell {
    pub fn new(capacity: u32) -> Self {
        Self {
            occupants: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Summed size of everyone currently in the cell
    pub fn used(&self) -> u32 {
        self.occupants.iter().map(|o| o.size).sum()
    }

    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used())
    }

    pub fn can_accommodate(&self, agent: &Agent) -> bool {
        self.used()
            .checked_add(agent.size())
            .is_some_and(|total| total <= self.capacity)
    }

    /// Append the agent if it fits and is not already listed. Returns false
    /// and leaves the cell untouched otherwise.
    pub fn add(&mut self, agent: &Agent) -> bool {
        if self.contains(agent.id()) || !self.can_accommodate(agent) {
            return false;
        }
        self.occupants.push(Occupant::from(agent));
        true
    }

    /// Remove the agent if present. Removing an absent agent is a no-op.
    pub fn remove(&mut self, id: AgentId) -> bool {
        match self.occupants.iter().position(|o| o.id == id) {
            Some(index) => {
                self.occupants.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.occupants.iter().any(|o| o.id == id)
    }

    /// Occupants in insertion order
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}
