//! Agent state and variant profiles.

use hamlet_core::{AgentId, Error, Gender, Position, Result, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name of an agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    pub first: String,
    pub last: String,
}

impl Name {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

/// Generation rules for one kind of agent.
///
/// Variants differ only in data: the health range, the pool of roles and
/// the footprint an agent takes up in a cell. Grid and world code never
/// look at the profile, so adding a variant means adding a value, not code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantProfile {
    pub label: String,
    pub health_min: i32,
    pub health_max: i32,
    pub roles: Vec<Role>,
    pub size: u32,
}

impl VariantProfile {
    /// Ground-dwelling human: health 80..=120, unassigned or farmer, size 2
    pub fn human() -> Self {
        Self {
            label: "Human".to_string(),
            health_min: 80,
            health_max: 120,
            roles: vec![Role::Unassigned, Role::Farmer],
            size: 2,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfig(format!(
                "variant {} must have size >= 1",
                self.label
            )));
        }
        if self.health_min > self.health_max {
            return Err(Error::InvalidConfig(format!(
                "variant {} has empty health range {}..={}",
                self.label, self.health_min, self.health_max
            )));
        }
        if self.roles.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "variant {} has no roles",
                self.label
            )));
        }
        Ok(())
    }
}

/// An agent in the simulation.
///
/// Identity, size and position are read-only from outside this crate:
/// the position only changes through [`crate::WorldGrid::move_agent`] so it
/// cannot drift away from the cell that lists the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    pub name: Name,
    pub gender: Option<Gender>,
    pub health: i32,
    pub role: Role,
    variant: String,
    size: u32,
    position: Position,
}

impl Agent {
    pub const DEFAULT_HEALTH: i32 = 100;

    /// Plain NPC with default attributes. Fails if `size` is zero.
    pub fn new(name: Name, size: u32, position: Position) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidArgument(format!(
                "agent {name} must have size >= 1"
            )));
        }

        Ok(Self {
            id: AgentId::new(),
            name,
            gender: None,
            health: Self::DEFAULT_HEALTH,
            role: Role::Unassigned,
            variant: "NPC".to_string(),
            size,
            position,
        })
    }

    pub fn with_id(mut self, id: AgentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_variant(mut self, label: impl Into<String>) -> Self {
        self.variant = label.into();
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Label of the variant this agent was generated from
    pub fn describe(&self) -> &str {
        &self.variant
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}
