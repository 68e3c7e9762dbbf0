//! Minds: percept-to-decision policies
//!
//! A mind reads the (read-only) scene, the percepts its body gathered this
//! tick and the agent's private memory, and answers with at most one
//! [`Intent`]. Returning `None` means "no action this tick".

pub mod machine;
pub mod states;

use std::fmt;

use crate::actions::actor::Intent;
use crate::core::types::{AgentId, BodyId};
use crate::entity::body::Body;
use crate::entity::properties::Properties;
use crate::simulation::perception::Percept;
use crate::world::Scene;

pub use machine::{Behavior, Machine, State, Transition};
pub use states::{predate, EatState, FollowState, PatrolState, TargetFilter};

/// Everything a decision step may look at
pub struct Context<'a> {
    pub agent: AgentId,
    /// `None` for agents living outside the scene
    pub body: Option<&'a Body>,
    pub scene: &'a Scene,
    pub percepts: &'a [Percept],
    /// The agent's own memory; the only thing a decision may write
    pub memory: &'a mut Properties,
}

impl<'a> Context<'a> {
    /// Bodies reported by any percept, first report first, without repeats
    pub fn visible(&self) -> Vec<BodyId> {
        let mut seen = Vec::new();
        for id in self.percepts.iter().flat_map(|p| p.bodies()) {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }

    pub fn target(&self) -> Option<BodyId> {
        self.memory.target()
    }

    pub fn own_id(&self) -> Option<BodyId> {
        self.body.map(Body::id)
    }
}

pub trait Mind: Send + fmt::Debug {
    fn decide(&mut self, ctx: &mut Context<'_>) -> Option<Intent>;

    /// Human-readable name of what the mind is currently doing
    fn describe(&self) -> String;
}

/// Never acts. Used for agents that only exist outside the scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleMind;

impl Mind for IdleMind {
    fn decide(&mut self, _ctx: &mut Context<'_>) -> Option<Intent> {
        None
    }

    fn describe(&self) -> String {
        "idle".to_string()
    }
}

/// Mind driven by a hierarchical state machine
#[derive(Debug)]
pub struct StateMachineMind {
    machine: Machine,
}

impl StateMachineMind {
    pub fn new(initial: State) -> Self {
        Self {
            machine: Machine::new(initial),
        }
    }

    pub fn from_machine(machine: Machine) -> Self {
        Self { machine }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }
}

impl Mind for StateMachineMind {
    fn decide(&mut self, ctx: &mut Context<'_>) -> Option<Intent> {
        self.machine.step(ctx)
    }

    fn describe(&self) -> String {
        self.machine.path()
    }
}
