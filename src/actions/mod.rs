//! Actors and the influences they emit

pub mod actor;
pub mod influence;
pub mod movement;
pub mod property;

pub use actor::{Actor, ActorKind, Command, Intent};
pub use influence::{Effect, Influence};
pub use movement::MovementActor;
pub use property::{ChangePropertyActor, Devour, EatActor, HitActor, PropertyRule, Strike};
