//! Heart - the only place where the scene is mutated
//!
//! Influences are queued during phase 1 of a tick and applied by
//! [`Heart::pulse`] in phase 2. A [`ResolutionPolicy`] fixes the order of
//! application; every policy shipped here is deterministic for a given
//! submission sequence.

use std::fmt;

use crate::actions::influence::{Effect, Influence};
use crate::core::config::ResolutionMode;
use crate::core::error::{MasError, Result};
use crate::core::types::{BodyId, WorldId};
use crate::entity::properties::{Property, PropertyChange};
use crate::world::Scene;

/// Orders a tick's influences before they are applied
pub trait ResolutionPolicy: Send + fmt::Debug {
    fn name(&self) -> &'static str;

    fn order(&self, queue: Vec<Influence>) -> Vec<Influence>;
}

/// Apply in submission order
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl ResolutionPolicy for Fifo {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn order(&self, queue: Vec<Influence>) -> Vec<Influence> {
        queue
    }
}

/// All displacements first, then property changes, each class in
/// submission order
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementFirst;

impl ResolutionPolicy for MovementFirst {
    fn name(&self) -> &'static str {
        "movement_first"
    }

    fn order(&self, queue: Vec<Influence>) -> Vec<Influence> {
        let (mut moves, changes): (Vec<_>, Vec<_>) =
            queue.into_iter().partition(Influence::is_movement);
        moves.extend(changes);
        moves
    }
}

impl From<ResolutionMode> for Box<dyn ResolutionPolicy> {
    fn from(mode: ResolutionMode) -> Self {
        match mode {
            ResolutionMode::Fifo => Box::new(Fifo),
            ResolutionMode::MovementFirst => Box::new(MovementFirst),
        }
    }
}

/// Outcome of one pulse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PulseReport {
    /// Influences that changed the scene
    pub applied: usize,
    /// Influences whose target was no longer in the scene, or that tried
    /// to add to a property holding a non-integer value
    pub dropped: usize,
    /// Bodies whose health sits at its declared minimum after this pulse,
    /// in the order they were first hit
    pub depleted: Vec<BodyId>,
}

#[derive(Debug)]
pub struct Heart {
    world: Option<WorldId>,
    queue: Vec<Influence>,
    policy: Box<dyn ResolutionPolicy>,
}

impl Heart {
    pub fn new(policy: impl ResolutionPolicy + 'static) -> Self {
        Self {
            world: None,
            queue: Vec::new(),
            policy: Box::new(policy),
        }
    }

    pub fn from_mode(mode: ResolutionMode) -> Self {
        Self {
            world: None,
            queue: Vec::new(),
            policy: mode.into(),
        }
    }

    /// Bind to a world. Binding again to the same world is a no-op.
    pub fn bind(&mut self, world: WorldId) -> Result<()> {
        match self.world {
            Some(bound) if bound != world => Err(MasError::HeartAlreadyBound),
            _ => {
                self.world = Some(world);
                Ok(())
            }
        }
    }

    pub fn world(&self) -> Option<WorldId> {
        self.world
    }

    pub fn policy(&self) -> &dyn ResolutionPolicy {
        self.policy.as_ref()
    }

    pub fn submit(&mut self, influence: Influence) {
        self.queue.push(influence);
    }

    pub fn pending(&self) -> &[Influence] {
        &self.queue
    }

    /// Drop everything queued without applying it
    pub fn discard(&mut self) {
        self.queue.clear();
    }

    /// Apply and clear the queue
    pub fn pulse(&mut self, scene: &mut Scene) -> Result<PulseReport> {
        if self.world.is_none() {
            return Err(MasError::HeartUnbound);
        }

        let queue = std::mem::take(&mut self.queue);
        let mut report = PulseReport::default();
        let mut hit = Vec::new();

        for influence in self.policy.order(queue) {
            match apply(scene, &influence) {
                Outcome::Applied => {
                    report.applied += 1;
                    tracing::trace!(
                        author = ?influence.author,
                        target = ?influence.target,
                        effect = ?influence.effect,
                        "applied influence"
                    );
                    if !influence.is_movement() && !hit.contains(&influence.target) {
                        hit.push(influence.target);
                    }
                }
                Outcome::TargetMissing => {
                    report.dropped += 1;
                    tracing::warn!(
                        author = ?influence.author,
                        target = ?influence.target,
                        "influence target left the scene, dropping"
                    );
                }
                Outcome::NotAnInteger => {
                    report.dropped += 1;
                    tracing::warn!(
                        author = ?influence.author,
                        target = ?influence.target,
                        effect = ?influence.effect,
                        "cannot add to a non-integer property, dropping"
                    );
                }
            }
        }

        report.depleted = hit
            .into_iter()
            .filter(|id| {
                scene
                    .get(*id)
                    .is_some_and(|b| b.properties().is_depleted(&Property::Health))
            })
            .collect();

        tracing::debug!(
            policy = self.policy.name(),
            applied = report.applied,
            dropped = report.dropped,
            depleted = report.depleted.len(),
            "pulse"
        );
        Ok(report)
    }
}

impl Default for Heart {
    fn default() -> Self {
        Self::new(Fifo)
    }
}

enum Outcome {
    Applied,
    TargetMissing,
    NotAnInteger,
}

fn apply(scene: &mut Scene, influence: &Influence) -> Outcome {
    match &influence.effect {
        Effect::Displace(delta) => {
            if scene.translate(influence.target, *delta) {
                Outcome::Applied
            } else {
                Outcome::TargetMissing
            }
        }
        Effect::ChangeProperty { property, change } => {
            let Some(body) = scene.get_mut(influence.target) else {
                return Outcome::TargetMissing;
            };
            let properties = body.properties_mut();
            let current = properties.get(property.key());
            if matches!(change, PropertyChange::Add(_))
                && current.is_some_and(|v| v.as_int().is_none())
            {
                return Outcome::NotAnInteger;
            }
            let value = change.resolve(properties.int(property));
            let value = properties.clamp(property, value);
            properties.set(property.key(), value);
            Outcome::Applied
        }
    }
}
