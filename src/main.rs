//! MAS World - headless scenario runner
//!
//! Builds one of the demo scenarios, runs it for a number of ticks and
//! optionally writes per-agent position traces and a final JSON snapshot.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mas_world::actions::{EatActor, HitActor, MovementActor};
use mas_world::core::types::AgentId;
use mas_world::entity::{Agent, Body, Property};
use mas_world::mind::{predate, PatrolState, State, StateMachineMind, TargetFilter};
use mas_world::simulation::ShapeSensor;
use mas_world::spatial::Shape;
use mas_world::{Result, SimulationConfig, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// One patrolling walker and one predator
    Duel,
    /// Predators and prey scattered over a square field
    Ecosystem,
}

/// Run a multi-agent scenario headless
#[derive(Parser, Debug)]
#[command(name = "mas-world")]
#[command(about = "Run a situated multi-agent scenario and trace its agents")]
struct Args {
    #[arg(long, value_enum, default_value = "duel")]
    scenario: Scenario,

    /// Number of ticks to run
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Predators and prey each, for the ecosystem scenario
    #[arg(long, default_value_t = 50)]
    population: usize,

    /// TOML file with simulation settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for per-agent `agent<N>.res` position traces
    #[arg(long)]
    trace_dir: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Prey are recognised by carrying food
fn prey_filter() -> TargetFilter {
    Arc::new(|body: &Body| body.get(Property::Feed.key()).is_some())
}

fn patrol(config: &SimulationConfig, salt: u64) -> PatrolState {
    PatrolState::seeded(config.seed.wrapping_add(salt)).with_max_turn(config.patrol_max_turn_deg)
}

fn prey(config: &SimulationConfig, salt: u64, center: Vec2, max_speed: i32, sight: f32) -> Result<Agent> {
    let mut body = Body::at(center);
    body.properties_mut().set_bounded(&Property::Health, 1000, 0, 1000);
    body.properties_mut().set_bounded(&Property::Feed, 100, 0, 100);
    body.add_actor(MovementActor::new(max_speed))?;
    body.add_actor(HitActor::hit(1))?;
    body.add_sensor(ShapeSensor::new(Shape::circle(Vec2::ZERO, sight)))?;

    let mind = StateMachineMind::new(State::leaf("patrol", patrol(config, salt)));
    Ok(Agent::new(mind, body))
}

fn predator(config: &SimulationConfig, salt: u64, center: Vec2, max_speed: i32, sight: f32) -> Result<Agent> {
    let mut body = Body::at(center);
    body.properties_mut().set_bounded(&Property::Health, 1000, 0, 1000);
    body.add_actor(MovementActor::new(max_speed))?;
    body.add_actor(EatActor::eat(10))?;
    body.add_sensor(ShapeSensor::new(Shape::circle(Vec2::ZERO, sight)))?;

    let mind = StateMachineMind::new(predate(prey_filter(), patrol(config, salt))?);
    Ok(Agent::new(mind, body))
}

fn build_duel(world: &mut World) -> Result<Vec<AgentId>> {
    let config = world.config().clone();
    let agents = vec![
        prey(&config, 1, Vec2::new(100.0, 100.0), 10, 100.0)?,
        predator(&config, 2, Vec2::new(200.0, 120.0), 20, 200.0)?,
    ];
    Ok(populate(world, agents))
}

fn build_ecosystem(world: &mut World, population: usize) -> Result<Vec<AgentId>> {
    let config = world.config().clone();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let spot = |rng: &mut ChaCha8Rng| {
        Vec2::new(rng.gen_range(-1000.0..1000.0), rng.gen_range(-1000.0..1000.0))
    };

    let mut agents = Vec::with_capacity(population * 2);
    for i in 0..population as u64 {
        agents.push(predator(&config, i, spot(&mut rng), 8, 100.0)?);
    }
    for i in 0..population as u64 {
        let salt = population as u64 + i;
        agents.push(prey(&config, salt, spot(&mut rng), 4, 150.0)?);
    }
    Ok(populate(world, agents))
}

fn populate(world: &mut World, agents: Vec<Agent>) -> Vec<AgentId> {
    agents
        .into_iter()
        .filter_map(|agent| {
            let id = agent.id();
            world.add(agent).then_some(id)
        })
        .collect()
}

fn open_traces(dir: &Path, count: usize) -> Result<Vec<BufWriter<File>>> {
    fs::create_dir_all(dir)?;
    (1..=count)
        .map(|n| -> Result<BufWriter<File>> {
            Ok(BufWriter::new(File::create(dir.join(format!("agent{n}.res")))?))
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mas_world=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut world = World::new(config)?;
    let roster = match args.scenario {
        Scenario::Duel => build_duel(&mut world)?,
        Scenario::Ecosystem => build_ecosystem(&mut world, args.population)?,
    };
    tracing::info!(
        scenario = ?args.scenario,
        agents = roster.len(),
        ticks = args.ticks,
        "starting run"
    );

    let mut traces = match &args.trace_dir {
        Some(dir) => open_traces(dir, roster.len())?,
        None => Vec::new(),
    };

    let mut culled = 0;
    for _ in 0..args.ticks {
        let report = world.tick()?;
        culled += report.culled.len();
        for (id, trace) in roster.iter().zip(traces.iter_mut()) {
            if let Some(body) = world.body_of(*id) {
                let center = body.center();
                writeln!(trace, "{} {}", center.x, center.y)?;
            }
        }
    }
    for trace in traces.iter_mut() {
        trace.flush()?;
    }

    tracing::info!(
        ticks = world.current_tick(),
        remaining = world.len(),
        culled,
        "run finished"
    );

    if args.json {
        println!("{}", world.snapshot().to_json()?);
    }
    Ok(())
}
