//! Stock behaviors: patrol, follow, eat and the predate super-state

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actions::actor::{ActorKind, Command, Intent};
use crate::core::error::Result;
use crate::core::types::StateId;
use crate::entity::body::Body;
use crate::mind::machine::{Behavior, Machine, State};
use crate::mind::Context;

/// Default bound on the per-tick heading change of a patrol
pub const DEFAULT_MAX_TURN_DEG: f32 = 22.0;

/// Decides which visible bodies are worth chasing
pub type TargetFilter = Arc<dyn Fn(&Body) -> bool + Send + Sync>;

/// Bounded random walk at full speed
#[derive(Debug, Clone)]
pub struct PatrolState {
    heading_deg: f32,
    max_turn_deg: f32,
    rng: ChaCha8Rng,
}

impl PatrolState {
    pub fn seeded(seed: u64) -> Self {
        Self {
            heading_deg: 0.0,
            max_turn_deg: DEFAULT_MAX_TURN_DEG,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_max_turn(mut self, degrees: f32) -> Self {
        self.max_turn_deg = degrees.abs();
        self
    }

    pub fn with_heading(mut self, degrees: f32) -> Self {
        self.heading_deg = degrees.rem_euclid(360.0);
        self
    }

    pub fn heading(&self) -> f32 {
        self.heading_deg
    }
}

impl Behavior for PatrolState {
    fn select_action(&mut self, ctx: &mut Context<'_>) -> Option<Intent> {
        let (mover, max_speed) = ctx.body?.fastest_mover()?;
        if self.max_turn_deg > 0.0 {
            let turn = self.rng.gen_range(-self.max_turn_deg..=self.max_turn_deg);
            self.heading_deg = (self.heading_deg + turn).rem_euclid(360.0);
        }
        Some(Intent::new(
            mover,
            Command::Move {
                heading_deg: self.heading_deg,
                speed: max_speed,
            },
        ))
    }
}

/// Heads straight for the remembered target
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowState;

impl Behavior for FollowState {
    fn select_action(&mut self, ctx: &mut Context<'_>) -> Option<Intent> {
        let body = ctx.body?;
        let target = ctx.scene.get(ctx.target()?)?;
        let (mover, max_speed) = body.fastest_mover()?;

        let offset = target.center() - body.center();
        let heading_deg = offset.y.atan2(offset.x).to_degrees();
        let speed = (offset.length().trunc() as i32).min(max_speed);
        Some(Intent::new(mover, Command::Move { heading_deg, speed }))
    }
}

/// Bites the remembered target while it overlaps the body, then forgets it
#[derive(Debug, Clone, Copy, Default)]
pub struct EatState;

impl Behavior for EatState {
    fn select_action(&mut self, ctx: &mut Context<'_>) -> Option<Intent> {
        let body = ctx.body?;
        let target = ctx.target()?;
        if !ctx.scene.contains(target) {
            ctx.memory.set_target(None);
            return None;
        }
        if !ctx.scene.partly_in(body.shape()).contains(target) {
            return None;
        }
        let eater = body.actor_of_kind(ActorKind::Eat)?;
        ctx.memory.set_target(None);
        Some(Intent::new(eater, Command::Target(target)))
    }
}

fn target_overlaps(ctx: &Context<'_>) -> bool {
    match (ctx.body, ctx.target()) {
        (Some(body), Some(target)) => ctx.scene.partly_in(body.shape()).contains(target),
        _ => false,
    }
}

/// Patrol until something passing `filter` is seen, follow it, eat it
///
/// The returned super-state starts in patrol. Its nested transitions, in
/// registration order:
///
/// | from   | to     | when                                           |
/// |--------|--------|------------------------------------------------|
/// | patrol | follow | a visible body other than our own passes filter |
/// | follow | patrol | no target, or the target left the scene        |
/// | follow | eat    | the target overlaps our body                   |
/// | eat    | patrol | no target is remembered                        |
/// | eat    | follow | the target no longer overlaps our body         |
pub fn predate(filter: TargetFilter, patrol: PatrolState) -> Result<State> {
    let mut machine = Machine::new(State::leaf("patrol", patrol));
    let patrolling = StateId::INITIAL;
    let following = machine.add_state(State::leaf("follow", FollowState));
    let eating = machine.add_state(State::leaf("eat", EatState));

    machine.add_transition(patrolling, following, "prey spotted", move |ctx| {
        let own = ctx.own_id();
        let prey = ctx.visible().into_iter().find(|id| {
            Some(*id) != own && ctx.scene.get(*id).is_some_and(|b| filter(b))
        });
        match prey {
            Some(prey) => {
                ctx.memory.set_target(Some(prey));
                true
            }
            None => false,
        }
    })?;
    machine.add_transition(following, patrolling, "prey lost", |ctx| {
        let lost = ctx.target().map_or(true, |t| !ctx.scene.contains(t));
        if lost {
            ctx.memory.set_target(None);
        }
        lost
    })?;
    machine.add_transition(following, eating, "prey reached", |ctx| {
        target_overlaps(ctx)
    })?;
    machine.add_transition(eating, patrolling, "prey consumed", |ctx| {
        ctx.target().is_none()
    })?;
    machine.add_transition(eating, following, "prey escaped", |ctx| {
        ctx.target().is_some() && !target_overlaps(ctx)
    })?;

    Ok(State::superstate("predate", machine))
}
