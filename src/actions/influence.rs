//! Influences: queued, intent-tagged world mutations

use glam::Vec2;
use serde::Serialize;

use crate::core::types::{ActorId, BodyId};
use crate::entity::properties::{Property, PropertyChange};

/// What an influence does to its target once the heart applies it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Effect {
    /// Move the target's shape by this vector
    Displace(Vec2),
    /// Rewrite one of the target's properties, clamped to its declared bounds
    ChangeProperty {
        property: Property,
        change: PropertyChange,
    },
}

/// A pending world mutation produced by an actor during phase 1
///
/// Created fresh each time an actor fires and consumed exactly once by the
/// heart in phase 2.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Influence {
    pub author: ActorId,
    /// Body the authoring actor is attached to
    pub source: BodyId,
    pub target: BodyId,
    pub effect: Effect,
}

impl Influence {
    pub fn displacement(author: ActorId, body: BodyId, delta: Vec2) -> Self {
        Self {
            author,
            source: body,
            target: body,
            effect: Effect::Displace(delta),
        }
    }

    pub fn property_change(
        author: ActorId,
        source: BodyId,
        target: BodyId,
        property: Property,
        change: PropertyChange,
    ) -> Self {
        Self {
            author,
            source,
            target,
            effect: Effect::ChangeProperty { property, change },
        }
    }

    pub fn is_movement(&self) -> bool {
        matches!(self.effect, Effect::Displace(_))
    }
}
