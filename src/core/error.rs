use thiserror::Error;

use crate::core::types::{ActorId, BodyId, SensorId, StateId};

#[derive(Error, Debug)]
pub enum MasError {
    #[error("Sensor {0:?} has no detection shape")]
    MissingDetectionShape(SensorId),

    #[error("{component} is already attached to body {attached_to:?}")]
    AlreadyAttached {
        component: String,
        attached_to: BodyId,
    },

    #[error("Actor {actor:?} is not attached to body {body:?}")]
    ActorNotAttached { actor: ActorId, body: BodyId },

    #[error("Unknown state: {0:?}")]
    UnknownState(StateId),

    #[error("Heart is already bound to another world")]
    HeartAlreadyBound,

    #[error("Heart pulsed before being bound to a world")]
    HeartUnbound,

    #[error("No more agents in world")]
    IterationExhausted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MasError>;
