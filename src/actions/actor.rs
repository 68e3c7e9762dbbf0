//! Actor contract: body-attached capabilities that turn intent into influences

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actions::influence::Influence;
use crate::core::error::Result;
use crate::core::types::{ActorId, BodyId};

/// What an actor can do, used by states to pick one from a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Movement { max_speed: i32 },
    Eat,
    Hit,
}

/// Parameters a state hands to the actor it selected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Heading in degrees (0 = +x, counter-clockwise) and requested speed
    Move { heading_deg: f32, speed: i32 },
    /// Body the actor should affect
    Target(BodyId),
}

/// A decision: which actor to prepare and how to configure it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub actor: ActorId,
    pub command: Command,
}

impl Intent {
    pub fn new(actor: ActorId, command: Command) -> Self {
        Self { actor, command }
    }
}

pub trait Actor: Send + fmt::Debug {
    fn id(&self) -> ActorId;

    /// Body this actor is attached to, if any
    fn body(&self) -> Option<BodyId>;

    /// Bind to `body`; fails if already bound to a different body
    fn attach(&mut self, body: BodyId) -> Result<()>;

    fn kind(&self) -> ActorKind;

    /// Apply a command; returns false when the command does not apply to
    /// this kind of actor (the actor is left unchanged)
    fn configure(&mut self, command: &Command) -> bool;

    /// Fire once. `None` is a legal "nothing to do" result.
    fn act(&mut self) -> Option<Influence>;
}
