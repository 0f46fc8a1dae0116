use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::DatasetError;

static AGENTS_JSON: &str = include_str!("../../data/agents.json");

/// An agent's standing in one specific suburb.
///
/// Priority is suburb-scoped: the same agent can be the top pick in one suburb
/// and a fallback in another. Lower number means more relevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuburbProfile {
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

/// Twelve-month performance figures shown on agent cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    pub years_experience: u8,
    pub recent_sales: u32,
    pub avg_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_days_on_market: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContacts {
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

/// A recommended real-estate agent with per-suburb relevance profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub agency: String,
    pub rating: f32,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    pub why_recommended: Vec<String>,
    pub stats: AgentStats,
    pub contacts: AgentContacts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub suburbs: BTreeMap<String, SuburbProfile>,
}

#[derive(Debug, Deserialize)]
struct AgentsFile {
    agents: Vec<Agent>,
}

/// Read-only lookup over the curated agent pool, built once at startup.
#[derive(Debug, Clone)]
pub struct AgentDirectory {
    agents: Vec<Agent>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

impl AgentDirectory {
    /// Parse the dataset compiled into the binary.
    pub fn load_embedded() -> Result<Self, DatasetError> {
        let file: AgentsFile =
            serde_json::from_str(AGENTS_JSON).map_err(|source| DatasetError::Parse {
                name: "agents",
                source,
            })?;
        Ok(Self::from_agents(file.agents))
    }

    /// Build a directory from an explicit agent list. Used by tests.
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        let by_id = agents
            .iter()
            .enumerate()
            .map(|(index, agent)| (agent.id.clone(), index))
            .collect();
        let by_slug = agents
            .iter()
            .enumerate()
            .map(|(index, agent)| (agent.slug.clone(), index))
            .collect();
        Self {
            agents,
            by_id,
            by_slug,
        }
    }

    pub fn all(&self) -> &[Agent] {
        &self.agents
    }

    pub fn by_id(&self, id: &str) -> Option<&Agent> {
        self.by_id.get(id).map(|index| &self.agents[*index])
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Agent> {
        self.by_slug.get(slug).map(|index| &self.agents[*index])
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }
}
