//! The world: grid plus the roster of registered agents.

use crate::agent::Agent;
use crate::grid::WorldGrid;
use hamlet_core::{AgentId, Direction, Error, Position, Result, WorldConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Outcome of one agent's move attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEvent {
    /// The agent now stands at `position`
    Moved {
        day: u64,
        agent: AgentId,
        position: Position,
    },
    /// The move was rejected; the agent stays at `position`
    Blocked {
        day: u64,
        agent: AgentId,
        position: Position,
    },
}

impl MoveEvent {
    pub fn day(&self) -> u64 {
        match self {
            MoveEvent::Moved { day, .. } | MoveEvent::Blocked { day, .. } => *day,
        }
    }

    pub fn agent(&self) -> AgentId {
        match self {
            MoveEvent::Moved { agent, .. } | MoveEvent::Blocked { agent, .. } => *agent,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            MoveEvent::Moved { position, .. } | MoveEvent::Blocked { position, .. } => *position,
        }
    }

    pub fn is_moved(&self) -> bool {
        matches!(self, MoveEvent::Moved { .. })
    }
}

/// Receiver for per-agent move outcomes
pub trait EventSink {
    /// Called once before the first event of each day
    fn begin_day(&mut self, _day: u64) {}

    fn record(&mut self, event: MoveEvent);
}

impl EventSink for Vec<MoveEvent> {
    fn record(&mut self, event: MoveEvent) {
        self.push(event);
    }
}

/// Result of [`World::register`]
#[derive(Debug)]
pub enum Registration {
    Placed(AgentId),
    /// The target cell was full. The agent is handed back untracked.
    Rejected(Agent),
}

impl Registration {
    pub fn is_placed(&self) -> bool {
        matches!(self, Registration::Placed(_))
    }
}

#[derive(Debug)]
pub struct World {
    grid: WorldGrid,
    agents: HashMap<AgentId, Agent>,
    // registration order, drives iteration within a day
    roster: Vec<AgentId>,
    day: u64,
    shuffle_order: bool,
}

impl World {
    pub fn new(config: &WorldConfig) -> Result<Self> {
        Ok(Self {
            grid: WorldGrid::from_config(config)?,
            agents: HashMap::new(),
            roster: Vec::new(),
            day: 0,
            shuffle_order: false,
        })
    }

    /// Shuffle the roster at the start of each day instead of using
    /// registration order
    pub fn with_shuffle(mut self, shuffle_order: bool) -> Self {
        self.shuffle_order = shuffle_order;
        self
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Registered agents in registration order
    pub fn agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.roster.iter().filter_map(|id| self.agents.get(id))
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Number of completed days
    pub fn day(&self) -> u64 {
        self.day
    }

    /// Place the agent into the cell at its coordinates and start tracking it.
    ///
    /// A full cell is a normal outcome and returns the agent to the caller.
    /// Out-of-bounds coordinates and duplicate ids are errors.
    pub fn register(&mut self, agent: Agent) -> Result<Registration> {
        let id = agent.id();
        if self.agents.contains_key(&id) {
            return Err(Error::AlreadyExists(id));
        }

        if !self.grid.place(&agent)? {
            warn!(
                agent_id = %id,
                name = %agent.name,
                x = agent.position().x,
                y = agent.position().y,
                "Could not place agent: cell full"
            );
            return Ok(Registration::Rejected(agent));
        }

        debug!(agent_id = %id, name = %agent.name, position = %agent.position(), "Agent registered");
        self.roster.push(id);
        self.agents.insert(id, agent);
        Ok(Registration::Placed(id))
    }

    /// Remove an agent from both its cell and the roster
    pub fn deregister(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        self.grid.remove(&agent);
        self.roster.retain(|r| *r != id);
        debug!(agent_id = %id, "Agent deregistered");
        Some(agent)
    }

    /// Attempt a single move in `direction` for a registered agent
    pub fn try_move(&mut self, id: AgentId, direction: Direction) -> Result<MoveEvent> {
        let day = self.day;
        let agent = self.agents.get_mut(&id).ok_or(Error::NotFound(id))?;
        Ok(Self::relocate(&mut self.grid, agent, direction, day))
    }

    fn relocate(grid: &mut WorldGrid, agent: &mut Agent, direction: Direction, day: u64) -> MoveEvent {
        let target = agent.position().step(direction);
        if grid.move_agent(agent, target) {
            trace!(agent_id = %agent.id(), position = %target, "Agent moved");
            MoveEvent::Moved {
                day,
                agent: agent.id(),
                position: target,
            }
        } else {
            trace!(agent_id = %agent.id(), position = %agent.position(), "Agent blocked");
            MoveEvent::Blocked {
                day,
                agent: agent.id(),
                position: agent.position(),
            }
        }
    }

    /// Advance one day: every agent in the roster at the start of the day
    /// draws a unit direction and attempts to move. One event per agent is
    /// sent to `sink`.
    pub fn step<R, S>(&mut self, rng: &mut R, sink: &mut S)
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        self.day += 1;
        let day = self.day;
        sink.begin_day(day);

        let mut order = self.roster.clone();
        if self.shuffle_order {
            order.shuffle(rng);
        }

        let directions = Direction::all();
        for id in order {
            let Some(agent) = self.agents.get_mut(&id) else {
                continue;
            };
            let Some(&direction) = directions.choose(rng) else {
                continue;
            };
            sink.record(Self::relocate(&mut self.grid, agent, direction, day));
        }
    }

    /// Run `days` steps. Zero days does nothing.
    pub fn run<R, S>(&mut self, days: u64, rng: &mut R, sink: &mut S)
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        for _ in 0..days {
            self.step(rng, sink);
        }
    }

    /// Verify that every cell respects its capacity and that each registered
    /// agent appears exactly once, in the cell at its own coordinates.
    pub fn check_invariants(&self) -> Result<()> {
        for (pos, cell) in self.grid.iter() {
            if cell.used() > cell.capacity() {
                return Err(Error::InvalidState(format!(
                    "cell {pos} holds {} of {}",
                    cell.used(),
                    cell.capacity()
                )));
            }
            for occupant in cell.occupants() {
                if !self.agents.contains_key(&occupant.id) {
                    return Err(Error::InvalidState(format!(
                        "cell {pos} lists unregistered agent {}",
                        occupant.id
                    )));
                }
            }
        }

        for agent in self.agents.values() {
            let found = self.grid.locate(agent.id());
            if found != [agent.position()] {
                return Err(Error::InvalidState(format!(
                    "agent {} recorded at {} but found in {:?}",
                    agent.id(),
                    agent.position(),
                    found
                )));
            }
        }

        if self.roster.len() != self.agents.len() {
            return Err(Error::InvalidState(format!(
                "roster has {} entries for {} agents",
                self.roster.len(),
                self.agents.len()
            )));
        }

        Ok(())
    }
}
