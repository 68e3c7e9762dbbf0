use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mas_world::actions::{EatActor, MovementActor};
use mas_world::entity::{Agent, Body, Property};
use mas_world::mind::{predate, PatrolState, State, StateMachineMind, TargetFilter};
use mas_world::simulation::ShapeSensor;
use mas_world::spatial::Shape;
use mas_world::{SimulationConfig, World};

fn ecosystem(per_side: usize) -> World {
    let mut world = World::new(SimulationConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let filter: TargetFilter = Arc::new(|b: &Body| b.get(Property::Feed.key()).is_some());

    for i in 0..per_side as u64 {
        let center = Vec2::new(rng.gen_range(-1000.0..1000.0), rng.gen_range(-1000.0..1000.0));
        let mut body = Body::at(center);
        body.add_actor(MovementActor::new(8)).unwrap();
        body.add_actor(EatActor::eat(10)).unwrap();
        body.add_sensor(ShapeSensor::new(Shape::circle(Vec2::ZERO, 100.0)))
            .unwrap();
        let mind = StateMachineMind::new(predate(filter.clone(), PatrolState::seeded(i)).unwrap());
        world.add(Agent::new(mind, body));

        let center = Vec2::new(rng.gen_range(-1000.0..1000.0), rng.gen_range(-1000.0..1000.0));
        let mut body = Body::at(center);
        body.properties_mut()
            .set_bounded(&Property::Health, 1000, 0, 1000);
        body.properties_mut()
            .set_bounded(&Property::Feed, 100, 0, 100);
        body.add_actor(MovementActor::new(4)).unwrap();
        body.add_sensor(ShapeSensor::new(Shape::circle(Vec2::ZERO, 150.0)))
            .unwrap();
        let patrol = PatrolState::seeded(10_000 + i);
        world.add(Agent::new(StateMachineMind::new(State::leaf("patrol", patrol)), body));
    }
    world
}

fn bench_tick_ecosystem(c: &mut Criterion) {
    let mut world = ecosystem(50);
    c.bench_function("tick_ecosystem_100", |b| {
        b.iter(|| black_box(world.tick().unwrap()))
    });
}

fn bench_tick_crowded(c: &mut Criterion) {
    let mut world = ecosystem(500);
    c.bench_function("tick_ecosystem_1000", |b| {
        b.iter(|| black_box(world.tick().unwrap()))
    });
}

fn bench_scene_query(c: &mut Criterion) {
    let world = ecosystem(500);
    let field = Shape::circle(Vec2::ZERO, 150.0);
    c.bench_function("scene_partly_in_150_radius", |b| {
        b.iter(|| black_box(world.scene().partly_in(black_box(&field)).len()))
    });
}

criterion_group!(benches, bench_tick_ecosystem, bench_tick_crowded, bench_scene_query);
criterion_main!(benches);
