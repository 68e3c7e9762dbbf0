//! Agents: a mind, its memory and (optionally) a body

use crate::actions::actor::Intent;
use crate::actions::influence::Influence;
use crate::core::error::Result;
use crate::core::types::AgentId;
use crate::entity::body::Body;
use crate::entity::properties::Properties;
use crate::mind::{Context, Mind};
use crate::simulation::perception::Percept;
use crate::world::{Scene, World};

/// The bodiless part of an agent
///
/// While an agent lives in a world, this is what the world keeps next to
/// the scene; the body itself sits in the scene.
#[derive(Debug)]
pub struct AgentCore {
    id: AgentId,
    mind: Box<dyn Mind>,
    memory: Properties,
}

impl AgentCore {
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn mind(&self) -> &dyn Mind {
        self.mind.as_ref()
    }

    pub fn memory(&self) -> &Properties {
        &self.memory
    }

    /// Run the mind once. Only the mind and the memory are written.
    pub fn decide(
        &mut self,
        body: Option<&Body>,
        scene: &Scene,
        percepts: &[Percept],
    ) -> Option<Intent> {
        let mut ctx = Context {
            agent: self.id,
            body,
            scene,
            percepts,
            memory: &mut self.memory,
        };
        self.mind.decide(&mut ctx)
    }
}

#[derive(Debug)]
pub struct Agent {
    core: AgentCore,
    body: Option<Body>,
}

impl Agent {
    /// Physical agent owning `body`
    pub fn new(mind: impl Mind + 'static, body: Body) -> Self {
        Self::with_body(AgentId::new(), Box::new(mind), Some(body))
    }

    /// Agent with no presence in the scene
    pub fn outside(mind: impl Mind + 'static) -> Self {
        Self::with_body(AgentId::new(), Box::new(mind), None)
    }

    fn with_body(id: AgentId, mind: Box<dyn Mind>, mut body: Option<Body>) -> Self {
        if let Some(body) = body.as_mut() {
            body.set_agent(id);
        }
        Self {
            core: AgentCore {
                id,
                mind,
                memory: Properties::new(),
            },
            body,
        }
    }

    pub fn id(&self) -> AgentId {
        self.core.id
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut Body> {
        self.body.as_mut()
    }

    pub fn is_physical(&self) -> bool {
        self.body.is_some()
    }

    pub fn mind(&self) -> &dyn Mind {
        self.core.mind()
    }

    pub fn memory(&self) -> &Properties {
        &self.core.memory
    }

    pub fn memory_mut(&mut self) -> &mut Properties {
        &mut self.core.memory
    }

    /// Sense, decide and act against a read-only world
    ///
    /// The returned influence still has to go through a heart; nothing in
    /// `world` changes here.
    pub fn tick(&mut self, world: &World) -> Result<Option<Influence>> {
        let percepts = match &self.body {
            Some(body) => body.sense(world),
            None => Vec::new(),
        };
        let Some(intent) = self
            .core
            .decide(self.body.as_ref(), world.scene(), &percepts)
        else {
            return Ok(None);
        };
        match self.body.as_mut() {
            Some(body) => body.perform(&intent),
            None => {
                tracing::warn!(agent = ?self.core.id, "bodiless agent chose an action, ignoring");
                Ok(None)
            }
        }
    }

    pub fn view(&self) -> AgentView<'_> {
        AgentView {
            core: &self.core,
            body: self.body.as_ref(),
        }
    }

    pub(crate) fn into_parts(self) -> (AgentCore, Option<Body>) {
        (self.core, self.body)
    }

    pub(crate) fn from_parts(core: AgentCore, body: Option<Body>) -> Self {
        Self { core, body }
    }
}

/// Read-only look at an agent, wherever the world keeps its parts
#[derive(Debug, Clone, Copy)]
pub struct AgentView<'a> {
    core: &'a AgentCore,
    body: Option<&'a Body>,
}

impl<'a> AgentView<'a> {
    pub(crate) fn new(core: &'a AgentCore, body: Option<&'a Body>) -> Self {
        Self { core, body }
    }

    pub fn id(&self) -> AgentId {
        self.core.id
    }

    pub fn body(&self) -> Option<&'a Body> {
        self.body
    }

    pub fn mind(&self) -> &'a dyn Mind {
        self.core.mind()
    }

    pub fn memory(&self) -> &'a Properties {
        &self.core.memory
    }

    pub fn is_physical(&self) -> bool {
        self.body.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mind::IdleMind;
    use glam::Vec2;

    #[test]
    fn test_body_knows_its_agent() {
        let agent = Agent::new(IdleMind, Body::at(Vec2::ZERO));
        assert_eq!(agent.body().unwrap().agent(), Some(agent.id()));
        assert!(agent.is_physical());
    }

    #[test]
    fn test_outside_agent_has_no_body() {
        let agent = Agent::outside(IdleMind);
        assert!(!agent.is_physical());
        assert_eq!(agent.mind().describe(), "idle");
    }

    #[test]
    fn test_parts_round_trip() {
        let mut agent = Agent::new(IdleMind, Body::at(Vec2::new(1.0, 2.0)));
        agent.memory_mut().set("mood", 3);
        let id = agent.id();

        let (core, body) = agent.into_parts();
        let agent = Agent::from_parts(core, body);
        assert_eq!(agent.id(), id);
        assert_eq!(agent.memory().int(&"mood".into()), Some(3));
        assert_eq!(agent.body().unwrap().center(), Vec2::new(1.0, 2.0));
    }
}
