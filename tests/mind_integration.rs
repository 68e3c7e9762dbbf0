//! Integration tests for state-machine minds running inside a world

use std::sync::Arc;

use glam::Vec2;
use mas_world::actions::{EatActor, Intent, MovementActor};
use mas_world::core::types::{AgentId, StateId};
use mas_world::entity::{Agent, Body, Property};
use mas_world::mind::{
    predate, Behavior, Context, IdleMind, Machine, PatrolState, State, StateMachineMind,
    TargetFilter,
};
use mas_world::simulation::ShapeSensor;
use mas_world::spatial::Shape;
use mas_world::{SimulationConfig, World};

fn has_feed() -> TargetFilter {
    Arc::new(|body: &Body| body.get(Property::Feed.key()).is_some())
}

fn hunter(center: Vec2) -> Agent {
    let mut body = Body::at(center);
    body.add_actor(MovementActor::new(20)).unwrap();
    body.add_actor(EatActor::eat(10)).unwrap();
    body.add_sensor(ShapeSensor::new(Shape::circle(Vec2::ZERO, 200.0)))
        .unwrap();
    let state = predate(has_feed(), PatrolState::seeded(5)).unwrap();
    Agent::new(StateMachineMind::new(state), body)
}

fn morsel(center: Vec2, health: i64) -> Agent {
    let mut body = Body::at(center);
    body.properties_mut()
        .set_bounded(&Property::Health, health, 0, health);
    body.properties_mut()
        .set_bounded(&Property::Feed, 100, 0, 100);
    Agent::new(IdleMind, body)
}

fn state_of(world: &World, id: AgentId) -> String {
    world.agent(id).unwrap().mind().describe()
}

fn health_of(world: &World, id: AgentId) -> Option<i64> {
    world.body_of(id)?.properties().int(&Property::Health)
}

#[test]
fn test_hunter_follows_then_eats() {
    let mut world = World::new(SimulationConfig::default()).unwrap();
    let hunter = hunter(Vec2::ZERO);
    let hunter_id = hunter.id();
    let prey = morsel(Vec2::new(50.0, 0.0), 30);
    let prey_id = prey.id();
    world.add(hunter);
    world.add(prey);

    // 50 units away at speed 20: 20, 40, then the last 10
    world.tick().unwrap();
    assert_eq!(state_of(&world, hunter_id), "predate/follow");
    assert_eq!(world.body_of(hunter_id).unwrap().center(), Vec2::new(20.0, 0.0));
    assert_eq!(
        world.agent(hunter_id).unwrap().memory().target(),
        Some(world.body_of(prey_id).unwrap().id())
    );

    world.tick().unwrap();
    world.tick().unwrap();
    assert_eq!(world.body_of(hunter_id).unwrap().center(), Vec2::new(50.0, 0.0));
    assert_eq!(health_of(&world, prey_id), Some(30));

    world.tick().unwrap();
    assert_eq!(state_of(&world, hunter_id), "predate/eat");
    assert_eq!(health_of(&world, prey_id), Some(20));

    // Eating forgets the target, so the hunter goes back to patrolling
    world.tick().unwrap();
    assert_eq!(state_of(&world, hunter_id), "predate/patrol");
}

#[test]
fn test_hunter_gives_up_on_vanished_prey() {
    let mut world = World::new(SimulationConfig::default()).unwrap();
    let hunter = hunter(Vec2::ZERO);
    let hunter_id = hunter.id();
    let prey = morsel(Vec2::new(100.0, 0.0), 30);
    let prey_id = prey.id();
    world.add(hunter);
    world.add(prey);

    world.tick().unwrap();
    assert_eq!(state_of(&world, hunter_id), "predate/follow");

    world.remove(prey_id).unwrap();
    world.tick().unwrap();
    assert_eq!(state_of(&world, hunter_id), "predate/patrol");
    assert_eq!(world.agent(hunter_id).unwrap().memory().target(), None);
}

#[test]
fn test_hunter_leaves_eat_once_prey_vanishes() {
    // Without an eat actor the hunter stays in eat holding its target
    let mut body = Body::at(Vec2::ZERO);
    body.add_actor(MovementActor::new(20)).unwrap();
    body.add_sensor(ShapeSensor::new(Shape::circle(Vec2::ZERO, 200.0)))
        .unwrap();
    let state = predate(has_feed(), PatrolState::seeded(5)).unwrap();
    let hunter = Agent::new(StateMachineMind::new(state), body);
    let hunter_id = hunter.id();
    let prey = morsel(Vec2::new(10.0, 0.0), 30);
    let prey_id = prey.id();
    let mut world = World::new(SimulationConfig::default()).unwrap();
    world.add(hunter);
    world.add(prey);

    world.tick().unwrap();
    assert_eq!(state_of(&world, hunter_id), "predate/follow");
    world.tick().unwrap();
    world.tick().unwrap();
    assert_eq!(state_of(&world, hunter_id), "predate/eat");
    assert!(world.agent(hunter_id).unwrap().memory().target().is_some());

    world.remove(prey_id).unwrap();
    world.tick().unwrap();
    assert_ne!(state_of(&world, hunter_id), "predate/eat");

    world.tick().unwrap();
    assert_eq!(state_of(&world, hunter_id), "predate/patrol");
    assert_eq!(world.agent(hunter_id).unwrap().memory().target(), None);
}

#[test]
fn test_prey_is_eventually_culled() {
    let config = SimulationConfig {
        cull_depleted: true,
        ..SimulationConfig::default()
    };
    let mut world = World::new(config).unwrap();
    let hunter = hunter(Vec2::ZERO);
    let prey = morsel(Vec2::new(30.0, 30.0), 30);
    let prey_id = prey.id();
    world.add(hunter);
    world.add(prey);

    let mut culled = Vec::new();
    for _ in 0..200 {
        culled.extend(world.tick().unwrap().culled);
        if !culled.is_empty() {
            break;
        }
    }
    assert_eq!(culled, vec![prey_id]);
    assert_eq!(world.len(), 1);
}

#[test]
fn test_hunters_ignore_each_other() {
    let mut world = World::new(SimulationConfig::default()).unwrap();
    let a = hunter(Vec2::ZERO);
    let b = hunter(Vec2::new(10.0, 0.0));
    let (a_id, b_id) = (a.id(), b.id());
    world.add(a);
    world.add(b);

    for _ in 0..10 {
        world.tick().unwrap();
        assert_eq!(state_of(&world, a_id), "predate/patrol");
        assert_eq!(state_of(&world, b_id), "predate/patrol");
    }
}

#[derive(Debug)]
struct Rest;

impl Behavior for Rest {
    fn select_action(&mut self, _ctx: &mut Context<'_>) -> Option<Intent> {
        None
    }
}

#[test]
fn test_parent_transitions_leave_a_superstate() {
    let mut machine = Machine::new(predate(has_feed(), PatrolState::seeded(9)).unwrap());
    let rest = machine.add_state(State::leaf("rest", Rest));
    machine
        .add_transition(StateId::INITIAL, rest, "tired", |ctx| {
            ctx.memory.get("tired").is_some()
        })
        .unwrap();

    let mut body = Body::at(Vec2::ZERO);
    body.add_actor(MovementActor::new(4)).unwrap();
    let mut agent = Agent::new(StateMachineMind::from_machine(machine), body);
    let id = agent.id();
    let mut world = World::new(SimulationConfig::default()).unwrap();

    agent.memory_mut().set("tired", 1);
    world.add(agent);
    let report = world.tick().unwrap();

    assert_eq!(report.submitted, 0);
    assert_eq!(state_of(&world, id), "rest");
    assert_eq!(world.body_of(id).unwrap().center(), Vec2::ZERO);
}
