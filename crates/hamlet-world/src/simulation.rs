//! Simulation driver: seeds the world with a population and runs the days.

use crate::agent::{Agent, Name};
use crate::factory::AgentFactory;
use crate::world::{EventSink, MoveEvent, Registration, World};
use hamlet_core::{AgentId, Position, Result, SimConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// An agent that could not be placed at its starting position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementFailure {
    pub name: Name,
    pub position: Position,
}

/// Snapshot of a registered agent at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentData {
    pub id: AgentId,
    pub name: Name,
    pub variant: String,
    pub health: i32,
    pub role: String,
    pub size: u32,
    pub position: Position,
}

impl From<&Agent> for AgentData {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id(),
            name: agent.name.clone(),
            variant: agent.describe().to_string(),
            health: agent.health,
            role: agent.role.to_string(),
            size: agent.size(),
            position: agent.position(),
        }
    }
}

pub struct Simulation {
    world: World,
    config: SimConfig,
    rng: ChaCha8Rng,
    placement_failures: Vec<PlacementFailure>,
    moves: u64,
    blocked: u64,
}

impl Simulation {
    /// Build a world from `config` and populate it with humans
    pub fn new(config: SimConfig) -> Result<Self> {
        Self::with_factory(config, &AgentFactory::human())
    }

    pub fn with_factory(config: SimConfig, factory: &AgentFactory) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let world = World::new(&config.world)?.with_shuffle(config.shuffle_order);

        let mut sim = Self {
            world,
            config,
            rng,
            placement_failures: Vec::new(),
            moves: 0,
            blocked: 0,
        };
        sim.populate(factory)?;

        Ok(sim)
    }

    /// Spawn the initial population at uniformly random cells
    fn populate(&mut self, factory: &AgentFactory) -> Result<()> {
        let (width, height) = (self.config.world.width, self.config.world.height);
        let last_name = self.config.population.shared_last_name.clone();

        for _ in 0..self.config.population.initial_agents {
            let pos = Position::new(self.rng.gen_range(0..width), self.rng.gen_range(0..height));
            let agent = match self.config.population.gender {
                Some(gender) => factory.spawn_as(gender, pos, last_name.as_deref(), &mut self.rng)?,
                None => factory.spawn(pos, last_name.as_deref(), &mut self.rng)?,
            };

            match self.world.register(agent)? {
                Registration::Placed(id) => {
                    debug!(agent_id = %id, x = pos.x, y = pos.y, "Spawned agent");
                }
                Registration::Rejected(agent) => {
                    warn!(
                        name = %agent.name,
                        x = pos.x,
                        y = pos.y,
                        "Could not place spawned agent"
                    );
                    self.placement_failures.push(PlacementFailure {
                        name: agent.name,
                        position: pos,
                    });
                }
            }
        }

        info!(
            population = self.world.len(),
            failed_placements = self.placement_failures.len(),
            "World populated"
        );
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn placement_failures(&self) -> &[PlacementFailure] {
        &self.placement_failures
    }

    /// Run a single day and return its events
    pub fn step(&mut self) -> Vec<MoveEvent> {
        let mut events = Vec::with_capacity(self.world.len());
        self.world.step(&mut self.rng, &mut events);

        let moved = events.iter().filter(|e| e.is_moved()).count() as u64;
        let blocked = events.len() as u64 - moved;
        self.moves += moved;
        self.blocked += blocked;

        info!(
            event = "day_complete",
            day = self.world.day(),
            moved = moved,
            blocked = blocked,
            "Day complete"
        );
        events
    }

    /// Run the configured number of days, forwarding every event to `sink`
    #[instrument(skip(self, sink), fields(days = self.config.days, seed = self.config.seed))]
    pub fn run<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> SimulationResult {
        info!("Starting simulation for {} days", self.config.days);

        for _ in 0..self.config.days {
            sink.begin_day(self.world.day() + 1);
            for event in self.step() {
                sink.record(event);
            }
        }

        let result = self.results();
        self.emit_summary(&result);
        result
    }

    pub fn results(&self) -> SimulationResult {
        SimulationResult {
            days: self.world.day(),
            moves: self.moves,
            blocked: self.blocked,
            placement_failures: self.placement_failures.clone(),
            agents: self.world.agents().map(AgentData::from).collect(),
        }
    }

    fn emit_summary(&self, result: &SimulationResult) {
        let attempts = result.moves + result.blocked;
        let block_rate = if attempts > 0 {
            (result.blocked as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        info!(
            event = "run_summary",
            days = result.days,
            population = result.agents.len(),
            moves = result.moves,
            blocked = result.blocked,
            block_rate = format!("{:.2}%", block_rate),
            failed_placements = result.placement_failures.len(),
            "Simulation complete"
        );
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub days: u64,
    pub moves: u64,
    pub blocked: u64,
    pub placement_failures: Vec<PlacementFailure>,
    pub agents: Vec<AgentData>,
}
