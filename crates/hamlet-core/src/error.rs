//! Error types for the simulation.
//!
//! Capacity and bounds rejections during movement are ordinary outcomes and
//! never show up here. These variants signal misuse of the API.

use thiserror::Error;

use crate::types::{AgentId, Position};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: i32,
        height: i32,
    },

    #[error("Agent already registered: {0}")]
    AlreadyExists(AgentId),

    #[error("Agent not found: {0}")]
    NotFound(AgentId),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
