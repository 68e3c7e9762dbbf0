//! Serializable snapshots of a world, for traces and inspection

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{AgentId, Tick};
use crate::entity::agent::AgentView;
use crate::entity::properties::Properties;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent: AgentId,
    /// `None` for outside agents
    pub center: Option<Vec2>,
    /// Current state path as reported by the mind, e.g. `predate/follow`
    pub state: String,
    /// Body properties; empty for outside agents
    pub properties: Properties,
}

impl From<AgentView<'_>> for AgentSnapshot {
    fn from(view: AgentView<'_>) -> Self {
        Self {
            agent: view.id(),
            center: view.body().map(|b| b.center()),
            state: view.mind().describe(),
            properties: view
                .body()
                .map(|b| b.properties().clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: Tick,
    pub agents: Vec<AgentSnapshot>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl World {
    /// Snapshot of every agent, in traversal order
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.current_tick(),
            agents: self.agents().map(AgentSnapshot::from).collect(),
        }
    }
}
