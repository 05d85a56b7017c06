//! Most recently known entity states

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// State string and attributes of one external entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: Map::new(),
        }
    }

    /// Build from a state and a JSON attribute value; non-objects mean no attributes
    pub fn from_json(state: impl Into<String>, attributes: Value) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            state: state.into(),
            attributes,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Entity id → latest state, merged one entry at a time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, EntityState>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one entity's state; returns whether anything changed
    pub fn apply_state(&mut self, entity_id: impl Into<String>, state: EntityState) -> bool {
        let entity_id = entity_id.into();
        if self.entries.get(&entity_id) == Some(&state) {
            return false;
        }
        self.entries.insert(entity_id, state);
        true
    }

    /// Merge a batch of states; entities missing from the batch are kept
    pub fn merge_batch<I>(&mut self, states: I) -> usize
    where
        I: IntoIterator<Item = (String, EntityState)>,
    {
        states
            .into_iter()
            .filter(|(id, state)| self.apply_state(id.clone(), state.clone()))
            .count()
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.entries.get(entity_id)
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.entries.contains_key(entity_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityState)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drop entities no longer in `keep`
    pub fn retain_ids(&mut self, keep: &[String]) {
        self.entries.retain(|id, _| keep.iter().any(|k| k == id));
    }
}

impl FromIterator<(String, EntityState)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, EntityState)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
