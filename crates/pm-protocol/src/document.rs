//! Persisted snapshot: `{ "devices": { "<id>": DeviceState, ... } }`.
//!
//! The device map keeps insertion order, so the JSON object is written in
//! first-registration order and read back in file order. Query answers
//! that default to "the first device" depend on that order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::device::DeviceState;

/// Whole-fleet snapshot exchanged with the persistence adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub devices: IndexMap<String, DeviceState>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(&self, id: &str) -> Option<&DeviceState> {
        self.devices.get(id)
    }
}
