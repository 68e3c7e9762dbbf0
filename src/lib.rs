//! MAS World - situated multi-agent simulation
//!
//! Agents own bodies that sit in a shared scene. Every tick each agent
//! senses the scene, lets its mind pick an actor, and the actor emits an
//! influence; the heart then applies all influences at once.

pub mod actions;
pub mod core;
pub mod entity;
pub mod mind;
pub mod simulation;
pub mod spatial;
pub mod world;

pub use crate::core::{MasError, Result, SimulationConfig};
pub use entity::{Agent, Body};
pub use world::World;
