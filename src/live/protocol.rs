//! Wire messages for the push channel and the batch fetch

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::snapshot::EntityState;

/// Largest number of entity ids sent in one subscribe or batch request
pub const MAX_ENTITY_IDS: usize = 100;

/// Outbound push-channel messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { entity_ids: Vec<String> },
    Unsubscribe,
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Inbound push-channel messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    State {
        entity_id: String,
        #[serde(default)]
        state: String,
        #[serde(default)]
        attributes: Map<String, Value>,
    },
}

impl ServerMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Split into the entity id and its new state
    pub fn into_state(self) -> (String, EntityState) {
        match self {
            ServerMessage::State {
                entity_id,
                state,
                attributes,
            } => (entity_id, EntityState { state, attributes }),
        }
    }
}

/// Polling fallback request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub entity_ids: Vec<String>,
}

impl BatchRequest {
    pub fn new<I, S>(entity_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entity_ids: sanitize_entity_ids(entity_ids),
        }
    }
}

/// Polling fallback response; unknown entities are simply absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub states: BTreeMap<String, EntityState>,
}

/// Trim, keep dotted ids, drop duplicates and cap the list
pub fn sanitize_entity_ids<I, S>(entity_ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for id in entity_ids {
        let id = id.as_ref().trim();
        if id.is_empty() || !id.contains('.') || out.iter().any(|seen| seen == id) {
            continue;
        }
        out.push(id.to_string());
        if out.len() == MAX_ENTITY_IDS {
            break;
        }
    }
    out
}
