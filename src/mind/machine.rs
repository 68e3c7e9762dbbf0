//! Hierarchical finite state machine
//!
//! A [`Machine`] owns its states in an arena and always has exactly one
//! current state. Each step:
//!
//! 1. the current state's transitions are checked in registration order and
//!    the first whose guard holds replaces the current state;
//! 2. the (possibly new) current state selects an action.
//!
//! A super-state is a [`State`] whose node is a nested machine; selecting
//! an action on it steps the nested machine, so the parent never sees the
//! child's internals.

use std::fmt;

use crate::actions::actor::Intent;
use crate::core::error::{MasError, Result};
use crate::core::types::StateId;
use crate::mind::Context;

/// Leaf behavior: picks and configures an actor for this tick
pub trait Behavior: Send + fmt::Debug {
    fn select_action(&mut self, ctx: &mut Context<'_>) -> Option<Intent>;
}

pub type Guard = Box<dyn Fn(&mut Context<'_>) -> bool + Send + Sync>;

pub struct Transition {
    label: String,
    target: StateId,
    guard: Guard,
}

impl Transition {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn is_valid(&self, ctx: &mut Context<'_>) -> bool {
        (self.guard)(ctx)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("label", &self.label)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum Node {
    Leaf(Box<dyn Behavior>),
    Super(Box<Machine>),
}

#[derive(Debug)]
pub struct State {
    name: String,
    node: Node,
    transitions: Vec<Transition>,
}

impl State {
    pub fn leaf(name: impl Into<String>, behavior: impl Behavior + 'static) -> Self {
        Self {
            name: name.into(),
            node: Node::Leaf(Box::new(behavior)),
            transitions: Vec::new(),
        }
    }

    pub fn superstate(name: impl Into<String>, machine: Machine) -> Self {
        Self {
            name: name.into(),
            node: Node::Super(Box::new(machine)),
            transitions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn is_super(&self) -> bool {
        matches!(self.node, Node::Super(_))
    }

    /// Nested machine of a super-state
    pub fn submachine(&self) -> Option<&Machine> {
        match &self.node {
            Node::Super(machine) => Some(machine),
            Node::Leaf(_) => None,
        }
    }

    pub fn select_action(&mut self, ctx: &mut Context<'_>) -> Option<Intent> {
        match &mut self.node {
            Node::Leaf(behavior) => behavior.select_action(ctx),
            Node::Super(machine) => machine.step(ctx),
        }
    }

    fn path(&self) -> String {
        match &self.node {
            Node::Leaf(_) => self.name.clone(),
            Node::Super(machine) => format!("{}/{}", self.name, machine.path()),
        }
    }
}

#[derive(Debug)]
pub struct Machine {
    states: Vec<State>,
    current: StateId,
}

impl Machine {
    /// The initial state gets [`StateId::INITIAL`] and starts current
    pub fn new(initial: State) -> Self {
        Self {
            states: vec![initial],
            current: StateId::INITIAL,
        }
    }

    pub fn add_state(&mut self, state: State) -> StateId {
        self.states.push(state);
        StateId(self.states.len() - 1)
    }

    /// Register a transition; transitions of a state are checked in the
    /// order they were added
    pub fn add_transition<F>(
        &mut self,
        from: StateId,
        to: StateId,
        label: impl Into<String>,
        guard: F,
    ) -> Result<()>
    where
        F: Fn(&mut Context<'_>) -> bool + Send + Sync + 'static,
    {
        if to.0 >= self.states.len() {
            return Err(MasError::UnknownState(to));
        }
        let state = self
            .states
            .get_mut(from.0)
            .ok_or(MasError::UnknownState(from))?;
        state.transitions.push(Transition {
            label: label.into(),
            target: to,
            guard: Box::new(guard),
        });
        Ok(())
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn current_state(&self) -> &State {
        &self.states[self.current.0]
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name).map(StateId)
    }

    pub fn set_current(&mut self, id: StateId) -> Result<()> {
        if id.0 >= self.states.len() {
            return Err(MasError::UnknownState(id));
        }
        self.current = id;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// One decision step: fire at most one transition, then delegate
    pub fn step(&mut self, ctx: &mut Context<'_>) -> Option<Intent> {
        let fired = self.states[self.current.0]
            .transitions
            .iter()
            .find(|t| t.is_valid(ctx))
            .map(|t| (t.target, t.label.clone()));

        if let Some((target, label)) = fired {
            tracing::debug!(
                agent = ?ctx.agent,
                from = self.states[self.current.0].name.as_str(),
                to = self.states[target.0].name.as_str(),
                via = label.as_str(),
                "state transition"
            );
            self.current = target;
        }

        self.states[self.current.0].select_action(ctx)
    }

    /// Names of the current states from this machine down, `/`-separated
    pub fn path(&self) -> String {
        self.current_state().path()
    }
}
