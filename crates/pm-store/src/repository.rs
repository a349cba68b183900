//! In-memory device repository.

use std::collections::VecDeque;

use indexmap::IndexMap;
use indexmap::map::Entry;
use pm_protocol::{DeviceState, Document};

/// Map of device id to state that remembers first-registration order.
///
/// Devices are created lazily by [`upsert`](Self::upsert) and never removed.
#[derive(Debug, Clone, Default)]
pub struct DeviceRepository {
    devices: IndexMap<String, DeviceState>,
}

impl DeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a repository from a persisted snapshot, keeping its order.
    pub fn from_document(document: Document) -> Self {
        Self {
            devices: document.devices,
        }
    }

    /// Snapshot the whole repository in first-registration order.
    pub fn to_document(&self) -> Document {
        Document {
            devices: self.devices.clone(),
        }
    }

    /// Return the device's state, creating an empty record on first sight.
    pub fn upsert(&mut self, device_id: &str) -> &mut DeviceState {
        match self.devices.entry(device_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!(device_id, "registering new device");
                entry.insert(DeviceState::new())
            }
        }
    }

    pub fn get(&self, device_id: &str) -> Option<&DeviceState> {
        self.devices.get(device_id)
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.contains_key(device_id)
    }

    /// Device ids in first-registration order.
    pub fn list_ids(&self) -> Vec<&str> {
        self.devices.keys().map(String::as_str).collect()
    }

    /// The earliest registered device, used when a query names none.
    pub fn first_id(&self) -> Option<&str> {
        self.devices.first().map(|(id, _)| id.as_str())
    }

    /// Iterate devices in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceState)> {
        self.devices.iter().map(|(id, state)| (id.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Append `item`, evicting from the front until `buffer` fits `capacity`.
///
/// Survivors keep their arrival order.
pub fn append_bounded<T>(buffer: &mut VecDeque<T>, item: T, capacity: usize) {
    buffer.push_back(item);
    while buffer.len() > capacity {
        buffer.pop_front();
    }
}
