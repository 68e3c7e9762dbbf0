pub mod config;
pub mod error;
pub mod types;

pub use config::{ResolutionMode, SimulationConfig};
pub use error::{MasError, Result};
