//! Property-changing actors
//!
//! [`ChangePropertyActor`] holds the target and emits the influence; a
//! [`PropertyRule`] supplies which property is touched and by how much.

use std::fmt;

use crate::actions::actor::{Actor, ActorKind, Command};
use crate::actions::influence::Influence;
use crate::core::error::Result;
use crate::core::types::{ActorId, Attachment, BodyId};
use crate::entity::properties::{Property, PropertyChange};

/// Value computation for a property-changing actor
pub trait PropertyRule: Send + fmt::Debug {
    fn kind(&self) -> ActorKind;
    fn property(&self) -> Property;
    fn change(&self) -> PropertyChange;
}

#[derive(Debug, Clone)]
pub struct ChangePropertyActor<R> {
    attachment: Attachment<ActorId>,
    target: Option<BodyId>,
    rule: R,
}

impl<R: PropertyRule> ChangePropertyActor<R> {
    pub fn new(rule: R) -> Self {
        Self {
            attachment: Attachment::new(ActorId::new()),
            target: None,
            rule,
        }
    }

    pub fn target(&self) -> Option<BodyId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<BodyId>) {
        self.target = target;
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }
}

impl<R: PropertyRule> Actor for ChangePropertyActor<R> {
    fn id(&self) -> ActorId {
        self.attachment.id
    }

    fn body(&self) -> Option<BodyId> {
        self.attachment.body
    }

    fn attach(&mut self, body: BodyId) -> Result<()> {
        self.attachment.bind(body)
    }

    fn kind(&self) -> ActorKind {
        self.rule.kind()
    }

    fn configure(&mut self, command: &Command) -> bool {
        match *command {
            Command::Target(body) => {
                self.target = Some(body);
                true
            }
            Command::Move { .. } => false,
        }
    }

    fn act(&mut self) -> Option<Influence> {
        let source = self.attachment.body?;
        let target = self.target?;
        Some(Influence::property_change(
            self.id(),
            source,
            target,
            self.rule.property(),
            self.rule.change(),
        ))
    }
}

/// Takes a bite out of the target's health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Devour {
    pub bite: i64,
}

impl PropertyRule for Devour {
    fn kind(&self) -> ActorKind {
        ActorKind::Eat
    }

    fn property(&self) -> Property {
        Property::Health
    }

    fn change(&self) -> PropertyChange {
        PropertyChange::Add(-self.bite.abs())
    }
}

/// Deals fixed damage to the target's health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub damage: i64,
}

impl PropertyRule for Strike {
    fn kind(&self) -> ActorKind {
        ActorKind::Hit
    }

    fn property(&self) -> Property {
        Property::Health
    }

    fn change(&self) -> PropertyChange {
        PropertyChange::Add(-self.damage.abs())
    }
}

pub type EatActor = ChangePropertyActor<Devour>;
pub type HitActor = ChangePropertyActor<Strike>;

impl EatActor {
    pub fn eat(bite: i64) -> Self {
        ChangePropertyActor::new(Devour { bite })
    }
}

impl HitActor {
    pub fn hit(damage: i64) -> Self {
        ChangePropertyActor::new(Strike { damage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::influence::Effect;

    #[test]
    fn test_no_target_no_influence() {
        let mut actor = EatActor::eat(10);
        actor.attach(BodyId::new()).unwrap();
        assert!(actor.act().is_none());
    }

    #[test]
    fn test_eat_targets_health() {
        let mut actor = EatActor::eat(10);
        let me = BodyId::new();
        let prey = BodyId::new();
        actor.attach(me).unwrap();
        assert!(actor.configure(&Command::Target(prey)));

        let influence = actor.act().unwrap();
        assert_eq!(influence.source, me);
        assert_eq!(influence.target, prey);
        assert_eq!(
            influence.effect,
            Effect::ChangeProperty {
                property: Property::Health,
                change: PropertyChange::Add(-10),
            }
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(EatActor::eat(1).kind(), ActorKind::Eat);
        assert_eq!(HitActor::hit(1).kind(), ActorKind::Hit);
    }

    #[test]
    fn test_rejects_move_command() {
        let mut actor = HitActor::hit(3);
        assert!(!actor.configure(&Command::Move {
            heading_deg: 0.0,
            speed: 1
        }));
        assert_eq!(actor.target(), None);
    }
}
