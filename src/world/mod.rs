//! World - agents, the scene their bodies live in, and the heart
//!
//! A physical agent is split while it lives here: its body goes into the
//! [`Scene`] and its mind and memory into the resident table, keyed by
//! [`AgentId`]. [`World::remove`] puts the two halves back together.

pub mod scene;
pub mod snapshot;

use ahash::AHashMap;

use crate::core::config::SimulationConfig;
use crate::core::error::{MasError, Result};
use crate::core::types::{AgentId, BodyId, Tick, WorldId};
use crate::entity::agent::{Agent, AgentCore, AgentView};
use crate::entity::body::Body;
use crate::simulation::heart::Heart;

pub use scene::{Bodies, Scene, SceneView};
pub use snapshot::{AgentSnapshot, WorldSnapshot};

/// Mind half of a physical agent
#[derive(Debug)]
pub(crate) struct Resident {
    pub(crate) core: AgentCore,
    pub(crate) body: BodyId,
}

#[derive(Debug)]
pub struct World {
    id: WorldId,
    config: SimulationConfig,
    pub(crate) scene: Scene,
    pub(crate) heart: Heart,
    pub(crate) residents: AHashMap<AgentId, Resident>,
    pub(crate) outside: Vec<Agent>,
    pub(crate) tick: Tick,
}

impl World {
    /// Empty world with a heart built from `config.resolution`
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let heart = Heart::from_mode(config.resolution);
        Self::with_heart(config, heart)
    }

    /// Empty world driven by `heart`, which gets bound to it
    pub fn with_heart(config: SimulationConfig, mut heart: Heart) -> Result<Self> {
        config.validate()?;
        let id = WorldId::new();
        heart.bind(id)?;
        Ok(Self {
            id,
            scene: Scene::new(config.grid_cell_size),
            config,
            heart,
            residents: AHashMap::new(),
            outside: Vec::new(),
            tick: 0,
        })
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn heart(&self) -> &Heart {
        &self.heart
    }

    /// Number of completed ticks
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Add an agent. `false` (and the agent is dropped) when the agent or
    /// its body is already here.
    pub fn add(&mut self, agent: Agent) -> bool {
        let id = agent.id();
        if self.contains(id) {
            return false;
        }

        let (core, body) = agent.into_parts();
        match body {
            Some(body) => {
                let body_id = body.id();
                if self.scene.insert(body).is_err() {
                    return false;
                }
                self.residents.insert(id, Resident { core, body: body_id });
                tracing::debug!(agent = ?id, body = ?body_id, "physical agent added");
            }
            None => {
                self.outside.push(Agent::from_parts(core, None));
                tracing::debug!(agent = ?id, "outside agent added");
            }
        }
        true
    }

    /// Take an agent out of the world, body included
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        if let Some(resident) = self.residents.remove(&id) {
            let body = self.scene.remove(resident.body);
            tracing::debug!(agent = ?id, "physical agent removed");
            return Some(Agent::from_parts(resident.core, body));
        }
        let index = self.outside.iter().position(|a| a.id() == id)?;
        tracing::debug!(agent = ?id, "outside agent removed");
        Some(self.outside.remove(index))
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.residents.contains_key(&id) || self.outside.iter().any(|a| a.id() == id)
    }

    pub fn agent(&self, id: AgentId) -> Option<AgentView<'_>> {
        if let Some(resident) = self.residents.get(&id) {
            return Some(AgentView::new(&resident.core, self.scene.get(resident.body)));
        }
        self.outside.iter().find(|a| a.id() == id).map(Agent::view)
    }

    pub fn body_of(&self, id: AgentId) -> Option<&Body> {
        let resident = self.residents.get(&id)?;
        self.scene.get(resident.body)
    }

    /// Physical agents in scene order, then outside agents in add order
    pub fn agents(&self) -> Agents<'_> {
        Agents {
            bodies: self.scene.iter(),
            residents: &self.residents,
            outside: self.outside.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.residents.len() + self.outside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn physical_count(&self) -> usize {
        self.residents.len()
    }

    pub fn outside_count(&self) -> usize {
        self.outside.len()
    }
}

/// Traversal of every agent in a world
pub struct Agents<'a> {
    bodies: Bodies<'a>,
    residents: &'a AHashMap<AgentId, Resident>,
    outside: std::slice::Iter<'a, Agent>,
}

impl<'a> Agents<'a> {
    /// Like `next`, but running past the end is an error
    pub fn expect_next(&mut self) -> Result<AgentView<'a>> {
        self.next().ok_or(MasError::IterationExhausted)
    }
}

impl<'a> Iterator for Agents<'a> {
    type Item = AgentView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let residents = self.residents;
        for body in self.bodies.by_ref() {
            let resident = body.agent().and_then(|id| residents.get(&id));
            if let Some(resident) = resident {
                return Some(AgentView::new(&resident.core, Some(body)));
            }
        }
        self.outside.next().map(Agent::view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mind::IdleMind;
    use glam::Vec2;

    fn world() -> World {
        World::new(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_add_and_remove_round_trip() {
        let mut world = world();
        let agent = Agent::new(IdleMind, Body::at(Vec2::new(5.0, 5.0)));
        let id = agent.id();
        let body = agent.body().unwrap().id();

        assert!(world.add(agent));
        assert!(world.scene().contains(body));
        assert_eq!(world.body_of(id).unwrap().center(), Vec2::new(5.0, 5.0));

        let agent = world.remove(id).unwrap();
        assert_eq!(agent.body().unwrap().id(), body);
        assert!(world.is_empty());
        assert!(world.scene().is_empty());
        assert!(world.remove(id).is_none());
    }

    #[test]
    fn test_agents_lists_physical_then_outside() {
        let mut world = world();
        let outside = Agent::outside(IdleMind);
        let outside_id = outside.id();
        let first = Agent::new(IdleMind, Body::at(Vec2::ZERO));
        let first_id = first.id();
        let second = Agent::new(IdleMind, Body::at(Vec2::ONE));
        let second_id = second.id();

        world.add(outside);
        world.add(first);
        world.add(second);

        let order: Vec<AgentId> = world.agents().map(|a| a.id()).collect();
        assert_eq!(order, vec![first_id, second_id, outside_id]);
        assert_eq!(world.physical_count(), 2);
        assert_eq!(world.outside_count(), 1);
    }

    #[test]
    fn test_expect_next_past_end() {
        let mut world = world();
        world.add(Agent::outside(IdleMind));

        let mut agents = world.agents();
        assert!(agents.expect_next().is_ok());
        assert!(matches!(
            agents.expect_next(),
            Err(MasError::IterationExhausted)
        ));
    }

    #[test]
    fn test_lookup_by_id() {
        let mut world = world();
        let agent = Agent::outside(IdleMind);
        let id = agent.id();
        world.add(agent);

        let view = world.agent(id).unwrap();
        assert!(!view.is_physical());
        assert!(world.agent(AgentId::new()).is_none());
        assert!(world.body_of(id).is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig {
            grid_cell_size: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            World::new(config),
            Err(MasError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_foreign_heart_is_rejected() {
        let mut heart = Heart::default();
        heart.bind(WorldId::new()).unwrap();
        assert!(matches!(
            World::with_heart(SimulationConfig::default(), heart),
            Err(MasError::HeartAlreadyBound)
        ));
    }
}
