//! Tick system - one bulk-synchronous step of the world
//!
//! Phase 1 visits every agent (physical agents in scene order, then
//! outside agents in add order): sense, decide, act. Acting only produces
//! influences, which are queued on the heart. Phase 2 is a single heart
//! pulse. Nothing another agent can observe changes before phase 2, so
//! the outcome of a tick does not depend on the visiting order.

use crate::actions::influence::Influence;
use crate::core::error::Result;
use crate::core::types::{AgentId, BodyId, Tick};
use crate::world::World;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Number of the tick just completed (first tick is 1)
    pub tick: Tick,
    pub submitted: usize,
    pub applied: usize,
    pub dropped: usize,
    /// Agents removed because their health was depleted
    pub culled: Vec<AgentId>,
}

impl World {
    /// Advance the simulation by one step
    ///
    /// An error during phase 1 aborts the tick before anything is applied;
    /// the queued influences are discarded and the tick counter is left as
    /// is.
    pub fn tick(&mut self) -> Result<TickReport> {
        let submitted = match self.decide_all() {
            Ok(submitted) => submitted,
            Err(err) => {
                self.heart.discard();
                return Err(err);
            }
        };

        let pulse = self.heart.pulse(&mut self.scene)?;

        let culled = if self.config().cull_depleted {
            self.cull(&pulse.depleted)
        } else {
            Vec::new()
        };

        self.tick += 1;
        Ok(TickReport {
            tick: self.tick,
            submitted,
            applied: pulse.applied,
            dropped: pulse.dropped,
            culled,
        })
    }

    /// Phase 1: queue every agent's influence
    fn decide_all(&mut self) -> Result<usize> {
        let roster: Vec<(BodyId, AgentId)> = self
            .scene
            .iter()
            .filter_map(|body| body.agent().map(|agent| (body.id(), agent)))
            .collect();

        let mut submitted = 0;
        for (body, agent) in roster {
            if let Some(influence) = self.step_resident(body, agent)? {
                self.heart.submit(influence);
                submitted += 1;
            }
        }

        let mut outside = std::mem::take(&mut self.outside);
        let mut result = Ok(());
        for agent in outside.iter_mut() {
            match agent.tick(self) {
                Ok(Some(influence)) => {
                    self.heart.submit(influence);
                    submitted += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }
        self.outside = outside;
        result.map(|()| submitted)
    }

    fn step_resident(&mut self, body: BodyId, agent: AgentId) -> Result<Option<Influence>> {
        let percepts = match self.scene.get(body) {
            Some(own) => own.sense(self),
            None => return Ok(None),
        };
        let Some(resident) = self.residents.get_mut(&agent) else {
            return Ok(None);
        };
        let intent = resident
            .core
            .decide(self.scene.get(body), &self.scene, &percepts);

        match (intent, self.scene.get_mut(body)) {
            (Some(intent), Some(own)) => own.perform(&intent),
            _ => Ok(None),
        }
    }

    fn cull(&mut self, depleted: &[BodyId]) -> Vec<AgentId> {
        let doomed: Vec<AgentId> = depleted
            .iter()
            .filter_map(|id| self.scene.get(*id).and_then(|b| b.agent()))
            .collect();
        doomed
            .into_iter()
            .filter(|id| {
                let removed = self.remove(*id).is_some();
                if removed {
                    tracing::debug!(agent = ?id, "culled depleted agent");
                }
                removed
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::actor::{ActorKind, Command, Intent};
    use crate::actions::movement::MovementActor;
    use crate::actions::property::EatActor;
    use crate::core::config::SimulationConfig;
    use crate::entity::agent::Agent;
    use crate::entity::body::Body;
    use crate::entity::properties::Property;
    use crate::mind::{Context, IdleMind, Mind, PatrolState, State, StateMachineMind};
    use crate::simulation::perception::ShapeSensor;
    use crate::spatial::shape::Shape;
    use glam::Vec2;

    fn straight_walker(center: Vec2, max_speed: i32) -> Agent {
        let mut body = Body::at(center);
        body.add_actor(MovementActor::new(max_speed)).unwrap();
        let patrol = PatrolState::seeded(0).with_max_turn(0.0);
        Agent::new(StateMachineMind::new(State::leaf("patrol", patrol)), body)
    }

    #[test]
    fn test_tick_moves_patrolling_body() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let agent = straight_walker(Vec2::new(100.0, 100.0), 10);
        let id = agent.id();
        world.add(agent);

        let report = world.tick().unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(report.submitted, 1);
        assert_eq!(report.applied, 1);
        assert_eq!(world.body_of(id).unwrap().center(), Vec2::new(110.0, 100.0));
        assert_eq!(world.current_tick(), 1);
    }

    #[test]
    fn test_idle_world_still_counts_ticks() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        world.add(Agent::outside(IdleMind));
        for _ in 0..3 {
            let report = world.tick().unwrap();
            assert_eq!(report.submitted, 0);
        }
        assert_eq!(world.current_tick(), 3);
    }

    #[derive(Debug)]
    struct Glutton;

    impl Mind for Glutton {
        fn decide(&mut self, ctx: &mut Context<'_>) -> Option<Intent> {
            let body = ctx.body?;
            let eater = body.actor_of_kind(ActorKind::Eat)?;
            let prey = ctx.visible().into_iter().find(|id| Some(*id) != ctx.own_id())?;
            Some(Intent::new(eater, Command::Target(prey)))
        }

        fn describe(&self) -> String {
            "glutton".to_string()
        }
    }

    #[test]
    fn test_depleted_agents_are_culled() {
        let config = SimulationConfig {
            cull_depleted: true,
            ..SimulationConfig::default()
        };
        let mut world = World::new(config).unwrap();

        let mut hunter = Body::at(Vec2::ZERO);
        hunter.add_actor(EatActor::eat(5)).unwrap();
        hunter
            .add_sensor(ShapeSensor::new(Shape::circle(Vec2::ZERO, 10.0)))
            .unwrap();
        world.add(Agent::new(Glutton, hunter));

        let mut prey = Body::at(Vec2::new(2.0, 0.0));
        prey.properties_mut()
            .set_bounded(&Property::Health, 8, 0, 8);
        let prey = Agent::new(IdleMind, prey);
        let prey_id = prey.id();
        world.add(prey);

        let first = world.tick().unwrap();
        assert!(first.culled.is_empty());
        assert_eq!(
            world
                .body_of(prey_id)
                .unwrap()
                .properties()
                .int(&Property::Health),
            Some(3)
        );

        let second = world.tick().unwrap();
        assert_eq!(second.culled, vec![prey_id]);
        assert!(!world.contains(prey_id));
        assert_eq!(world.len(), 1);
    }
}
