//! Perception system - sensors turn the world into percepts

use std::fmt;

use glam::Vec2;
use serde::Serialize;

use crate::core::error::{MasError, Result};
use crate::core::types::{Attachment, BodyId, SensorId};
use crate::entity::body::Body;
use crate::spatial::shape::Shape;
use crate::world::World;

/// A sensed fact, valid for one decision step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Percept {
    /// Bodies whose shape overlaps `field`, in scene order
    Surface {
        sensor: SensorId,
        field: Shape,
        bodies: Vec<BodyId>,
    },
}

impl Percept {
    pub fn bodies(&self) -> &[BodyId] {
        match self {
            Percept::Surface { bodies, .. } => bodies,
        }
    }
}

pub trait Sensor: Send + fmt::Debug {
    fn id(&self) -> SensorId;

    fn body(&self) -> Option<BodyId>;

    /// Bind to `body`. Misconfigured sensors are rejected here rather than
    /// on first use.
    fn attach(&mut self, body: BodyId) -> Result<()>;

    /// Read-only view of `world` from `body`
    fn sense(&self, body: &Body, world: &World) -> Vec<Percept>;
}

/// Reports every body overlapping a detection shape centered on its body
#[derive(Debug, Clone)]
pub struct ShapeSensor {
    attachment: Attachment<SensorId>,
    shape: Option<Shape>,
}

impl ShapeSensor {
    /// `shape` is given relative to the body center
    pub fn new(shape: Shape) -> Self {
        Self {
            attachment: Attachment::new(SensorId::new()),
            shape: Some(shape),
        }
    }

    /// Sensor with no detection shape yet; attaching it fails
    pub fn unshaped() -> Self {
        Self {
            attachment: Attachment::new(SensorId::new()),
            shape: None,
        }
    }

    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Detection shape moved onto `center`
    pub fn field_at(&self, center: Vec2) -> Option<Shape> {
        self.shape.map(|shape| shape.translated(center))
    }
}

impl Sensor for ShapeSensor {
    fn id(&self) -> SensorId {
        self.attachment.id
    }

    fn body(&self) -> Option<BodyId> {
        self.attachment.body
    }

    fn attach(&mut self, body: BodyId) -> Result<()> {
        if self.shape.is_none() {
            return Err(MasError::MissingDetectionShape(self.attachment.id));
        }
        self.attachment.bind(body)
    }

    fn sense(&self, body: &Body, world: &World) -> Vec<Percept> {
        let Some(field) = self.field_at(body.center()) else {
            return Vec::new();
        };
        let bodies = world.scene().partly_in(&field).ids().to_vec();
        vec![Percept::Surface {
            sensor: self.id(),
            field,
            bodies,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::entity::agent::Agent;
    use crate::mind::IdleMind;

    #[test]
    fn test_field_follows_body_center() {
        let sensor = ShapeSensor::new(Shape::circle(Vec2::ZERO, 100.0));
        assert_eq!(
            sensor.field_at(Vec2::new(200.0, 50.0)),
            Some(Shape::circle(Vec2::new(200.0, 50.0), 100.0))
        );
        assert_eq!(ShapeSensor::unshaped().field_at(Vec2::ZERO), None);
    }

    #[test]
    fn test_sense_reports_self_and_neighbours() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let mut body = Body::at(Vec2::ZERO);
        body.add_sensor(ShapeSensor::new(Shape::circle(Vec2::ZERO, 20.0)))
            .unwrap();
        let me = body.id();
        let agent = Agent::new(IdleMind, body);
        let id = agent.id();
        world.add(agent);

        let near = Body::at(Vec2::new(10.0, 0.0));
        let near_id = near.id();
        world.add(Agent::new(IdleMind, near));
        world.add(Agent::new(IdleMind, Body::at(Vec2::new(100.0, 0.0))));

        let percepts = world.body_of(id).unwrap().sense(&world);
        assert_eq!(percepts.len(), 1);
        assert_eq!(percepts[0].bodies(), &[me, near_id]);
    }

    #[test]
    fn test_reattach_to_same_body_is_accepted() {
        let mut sensor = ShapeSensor::new(Shape::circle(Vec2::ZERO, 1.0));
        let body = BodyId::new();
        sensor.attach(body).unwrap();
        sensor.attach(body).unwrap();
        assert_eq!(sensor.body(), Some(body));
        assert!(matches!(
            sensor.attach(BodyId::new()),
            Err(MasError::AlreadyAttached { .. })
        ));
    }
}
