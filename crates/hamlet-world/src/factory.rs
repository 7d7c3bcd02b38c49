//! Agent generation from a variant profile.

use crate::agent::{Agent, VariantProfile};
use crate::names::generate_name;
use hamlet_core::{AgentId, Gender, Position, Result, Role};
use rand::seq::SliceRandom;
use rand::Rng;

/// Produces fully populated agents of one variant
#[derive(Debug, Clone)]
pub struct AgentFactory {
    profile: VariantProfile,
}

impl AgentFactory {
    pub fn new(profile: VariantProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self { profile })
    }

    pub fn human() -> Self {
        Self {
            profile: VariantProfile::human(),
        }
    }

    pub fn profile(&self) -> &VariantProfile {
        &self.profile
    }

    /// Generate an agent at `position`. Gender, name, health and role are
    /// drawn from `rng`; the size comes from the profile.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        position: Position,
        last_name: Option<&str>,
        rng: &mut R,
    ) -> Result<Agent> {
        let gender = *Gender::all().choose(rng).unwrap_or(&Gender::Male);
        self.spawn_as(gender, position, last_name, rng)
    }

    /// Like [`spawn`](Self::spawn) with a caller-chosen gender
    pub fn spawn_as<R: Rng + ?Sized>(
        &self,
        gender: Gender,
        position: Position,
        last_name: Option<&str>,
        rng: &mut R,
    ) -> Result<Agent> {
        let name = generate_name(gender, last_name, rng);
        let health = rng.gen_range(self.profile.health_min..=self.profile.health_max);
        let role = self
            .profile
            .roles
            .choose(rng)
            .copied()
            .unwrap_or(Role::Unassigned);

        let agent = Agent::new(name, self.profile.size, position)?
            .with_id(AgentId::from_rng(rng))
            .with_gender(gender)
            .with_health(health)
            .with_role(role)
            .with_variant(self.profile.label.clone());

        Ok(agent)
    }
}
