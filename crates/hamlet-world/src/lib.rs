//! World simulation engine.
//!
//! This module implements the bounded 2D grid where agents live, the
//! capacity-checked movement protocol, and the day-by-day simulation driver.

pub mod agent;
pub mod cell;
pub mod factory;
pub mod grid;
pub mod names;
pub mod simulation;
pub mod world;

pub use agent::{Agent, Name, VariantProfile};
pub use cell::{GridCell, Occupant};
pub use factory::AgentFactory;
pub use grid::WorldGrid;
pub use simulation::{AgentData, PlacementFailure, Simulation, SimulationResult};
pub use world::{EventSink, MoveEvent, Registration, World};
