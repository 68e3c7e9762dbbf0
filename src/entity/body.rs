//! Bodies: shaped, property-bearing entities situated in a scene

use glam::Vec2;

use crate::actions::actor::{Actor, ActorKind, Intent};
use crate::actions::influence::Influence;
use crate::core::error::{MasError, Result};
use crate::core::types::{ActorId, AgentId, BodyId};
use crate::entity::properties::{Properties, PropertyValue};
use crate::simulation::perception::{Percept, Sensor};
use crate::spatial::shape::Shape;
use crate::world::World;

/// Side of the square extent given to bodies built with [`Body::at`]
pub const DEFAULT_SIZE: f32 = 3.0;

/// Physical presence of an agent
///
/// Sensors and actors are kept in attach order and are unique by identity.
/// At most one actor is prepared at a time; [`Body::act`] consumes it.
#[derive(Debug)]
pub struct Body {
    id: BodyId,
    agent: Option<AgentId>,
    shape: Shape,
    sensors: Vec<Box<dyn Sensor>>,
    actors: Vec<Box<dyn Actor>>,
    prepared: Option<ActorId>,
    properties: Properties,
}

impl Body {
    pub fn new(shape: Shape) -> Self {
        Self {
            id: BodyId::new(),
            agent: None,
            shape,
            sensors: Vec::new(),
            actors: Vec::new(),
            prepared: None,
            properties: Properties::new(),
        }
    }

    /// Default square body centered on `center`
    pub fn at(center: Vec2) -> Self {
        Self::new(Shape::rect(center, DEFAULT_SIZE, DEFAULT_SIZE))
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Owning agent (lookup handle only)
    pub fn agent(&self) -> Option<AgentId> {
        self.agent
    }

    pub(crate) fn set_agent(&mut self, agent: AgentId) {
        self.agent = Some(agent);
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn center(&self) -> Vec2 {
        self.shape.center()
    }

    /// Move the body. Bodies already in a scene are moved through
    /// [`crate::world::Scene::translate`] so the spatial index follows.
    pub fn translate(&mut self, delta: Vec2) {
        self.shape.translate(delta);
    }

    /// Attach a sensor. `Ok(false)` when this sensor is already attached.
    pub fn add_sensor(&mut self, sensor: impl Sensor + 'static) -> Result<bool> {
        if self.sensors.iter().any(|s| s.id() == sensor.id()) {
            return Ok(false);
        }
        let mut sensor = sensor;
        sensor.attach(self.id)?;
        self.sensors.push(Box::new(sensor));
        Ok(true)
    }

    /// Attach an actor. `Ok(false)` when this actor is already attached.
    pub fn add_actor(&mut self, actor: impl Actor + 'static) -> Result<bool> {
        if self.has_actor(actor.id()) {
            return Ok(false);
        }
        let mut actor = actor;
        actor.attach(self.id)?;
        self.actors.push(Box::new(actor));
        Ok(true)
    }

    pub fn sensors(&self) -> impl Iterator<Item = &dyn Sensor> + '_ {
        self.sensors.iter().map(|s| s.as_ref())
    }

    pub fn actors(&self) -> impl Iterator<Item = &dyn Actor> + '_ {
        self.actors.iter().map(|a| a.as_ref())
    }

    pub fn has_actor(&self, actor: ActorId) -> bool {
        self.actors.iter().any(|a| a.id() == actor)
    }

    /// Movement actor with the highest max speed (first one on ties)
    pub fn fastest_mover(&self) -> Option<(ActorId, i32)> {
        self.actors
            .iter()
            .filter_map(|a| match a.kind() {
                ActorKind::Movement { max_speed } => Some((a.id(), max_speed)),
                _ => None,
            })
            .fold(None, |best: Option<(ActorId, i32)>, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            })
    }

    /// First attached actor of `kind`
    pub fn actor_of_kind(&self, kind: ActorKind) -> Option<ActorId> {
        self.actors.iter().find(|a| a.kind() == kind).map(|a| a.id())
    }

    pub fn prepared(&self) -> Option<ActorId> {
        self.prepared
    }

    /// Prepare an attached actor for the next [`Body::act`]
    ///
    /// Actors attached elsewhere are rejected and the slot is left as is.
    pub fn prepare_actor(&mut self, actor: ActorId) -> Result<()> {
        if !self.has_actor(actor) {
            return Err(MasError::ActorNotAttached {
                actor,
                body: self.id,
            });
        }
        self.prepared = Some(actor);
        Ok(())
    }

    /// Fire the prepared actor and clear the slot
    pub fn act(&mut self) -> Option<Influence> {
        let prepared = self.prepared.take()?;
        self.actors
            .iter_mut()
            .find(|a| a.id() == prepared)
            .and_then(|a| a.act())
    }

    /// Prepare, configure and fire the actor named by `intent`
    pub fn perform(&mut self, intent: &Intent) -> Result<Option<Influence>> {
        self.prepare_actor(intent.actor)?;
        let configured = self
            .actors
            .iter_mut()
            .find(|a| a.id() == intent.actor)
            .is_some_and(|a| a.configure(&intent.command));
        if !configured {
            tracing::warn!(
                body = ?self.id,
                actor = ?intent.actor,
                command = ?intent.command,
                "command does not apply to actor, skipping"
            );
            self.prepared = None;
            return Ok(None);
        }
        Ok(self.act())
    }

    /// Everything every sensor reports, in attach order
    pub fn sense(&self, world: &World) -> Vec<Percept> {
        self.sensors
            .iter()
            .flat_map(|s| s.sense(self, world))
            .collect()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Upsert a property, returning the previous value
    pub fn set(&mut self, key: &str, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.properties.set(key, value)
    }
}
