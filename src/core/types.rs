//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{MasError, Result};

macro_rules! handle_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

handle_id!(
    /// Unique identifier for agents
    AgentId
);
handle_id!(
    /// Unique identifier for bodies
    BodyId
);
handle_id!(
    /// Identity of an actor attached to a body
    ActorId
);
handle_id!(
    /// Identity of a sensor attached to a body
    SensorId
);
handle_id!(
    /// Identity of a world, used to bind its heart
    WorldId
);

/// Index of a state inside its owning machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId(pub usize);

impl StateId {
    /// The state a machine is constructed with
    pub const INITIAL: StateId = StateId(0);
}

/// Simulation tick counter
pub type Tick = u64;

/// Identity of a body-attached component plus the body it is bound to
///
/// Binding is insert-if-absent: re-binding to the same body is accepted,
/// binding to a different body is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment<I> {
    pub id: I,
    pub body: Option<BodyId>,
}

impl<I: Copy + std::fmt::Debug> Attachment<I> {
    pub fn new(id: I) -> Self {
        Self { id, body: None }
    }

    pub fn bind(&mut self, body: BodyId) -> Result<()> {
        match self.body {
            Some(current) if current != body => Err(MasError::AlreadyAttached {
                component: format!("{:?}", self.id),
                attached_to: current,
            }),
            _ => {
                self.body = Some(body);
                Ok(())
            }
        }
    }
}
