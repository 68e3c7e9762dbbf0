pub mod agent;
pub mod body;
pub mod properties;

pub use agent::{Agent, AgentCore, AgentView};
pub use body::Body;
pub use properties::{Bounds, Properties, Property, PropertyChange, PropertyValue};
