// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the key-value store shared between the controller and the host framework.
use std::collections::HashMap;

use crate::controller::host::TaskHandle;
use crate::exception::{ControllerException, ControllerResult};

/// Key of the control mode entry, holds `"Position"` or `"Torque"`.
pub static CONTROL_MODE_KEY: &str = "ControlMode";
/// Key of the Coriolis entry. Only exposed for the host, the controller never reads it.
pub static CORIOLIS_KEY: &str = "Coriolis";
/// Key under which the posture task handle is exposed.
pub static POSTURE_TASK_KEY: &str = "getPostureTask";

/// A value stored in a [`Datastore`].
#[derive(Debug, Clone, PartialEq)]
pub enum DatastoreValue {
    Text(String),
    Task(TaskHandle),
}

impl DatastoreValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DatastoreValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<TaskHandle> {
        match self {
            DatastoreValue::Task(handle) => Some(*handle),
            _ => None,
        }
    }
}

impl From<&str> for DatastoreValue {
    fn from(text: &str) -> Self {
        DatastoreValue::Text(text.to_string())
    }
}

impl From<String> for DatastoreValue {
    fn from(text: String) -> Self {
        DatastoreValue::Text(text)
    }
}

impl From<TaskHandle> for DatastoreValue {
    fn from(handle: TaskHandle) -> Self {
        DatastoreValue::Task(handle)
    }
}

/// Read/write access to the shared key-value store.
///
/// The store is owned by the host framework. Whether writes from other threads are
/// synchronized is up to the implementation; the controller only reads at the start of a tick.
pub trait Datastore {
    /// Returns a copy of the value stored under `key`.
    fn get(&self, key: &str) -> Option<DatastoreValue>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: DatastoreValue);
    /// Removes the entry and returns its value.
    fn remove(&mut self, key: &str) -> Option<DatastoreValue>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Creates a new entry.
    /// # Errors
    /// [`DatastoreKeyExists`](`crate::exception::ControllerException::DatastoreKeyExists`) if the
    /// key is already present.
    fn make(&mut self, key: &str, value: DatastoreValue) -> ControllerResult<()> {
        if self.contains(key) {
            return Err(ControllerException::DatastoreKeyExists {
                key: key.to_string(),
            });
        }
        self.set(key, value);
        Ok(())
    }

    /// Returns the text stored under `key`, `None` if it is missing or not text.
    fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(DatastoreValue::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl<T: Datastore + ?Sized> Datastore for &mut T {
    fn get(&self, key: &str) -> Option<DatastoreValue> {
        (**self).get(key)
    }
    fn set(&mut self, key: &str, value: DatastoreValue) {
        (**self).set(key, value)
    }
    fn remove(&mut self, key: &str) -> Option<DatastoreValue> {
        (**self).remove(key)
    }
    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}

/// A [`Datastore`] backed by a HashMap.
#[derive(Debug, Default, Clone)]
pub struct MemoryDatastore {
    entries: HashMap<String, DatastoreValue>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        MemoryDatastore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|key| key.as_str())
    }
}

impl Datastore for MemoryDatastore {
    fn get(&self, key: &str) -> Option<DatastoreValue> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: DatastoreValue) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<DatastoreValue> {
        self.entries.remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::datastore::{Datastore, DatastoreValue, MemoryDatastore};
    use crate::controller::host::TaskHandle;
    use crate::exception::ControllerException;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryDatastore::new();
        assert!(store.is_empty());
        store.set("ControlMode", "Position".into());
        assert_eq!(store.get_text("ControlMode").as_deref(), Some("Position"));
        store.set("ControlMode", "Torque".into());
        assert_eq!(store.get_text("ControlMode").as_deref(), Some("Torque"));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.remove("ControlMode"),
            Some(DatastoreValue::Text("Torque".to_string()))
        );
        assert!(!store.contains("ControlMode"));
    }

    #[test]
    fn make_refuses_existing_key() {
        let mut store = MemoryDatastore::new();
        store.make("Coriolis", "Yes".into()).unwrap();
        assert_eq!(
            store.make("Coriolis", "No".into()),
            Err(ControllerException::DatastoreKeyExists {
                key: "Coriolis".to_string()
            })
        );
        assert_eq!(store.get_text("Coriolis").as_deref(), Some("Yes"));
    }

    #[test]
    fn typed_access() {
        let mut store = MemoryDatastore::new();
        store.set("getPostureTask", TaskHandle(3).into());
        assert_eq!(store.get_text("getPostureTask"), None);
        assert_eq!(
            store.get("getPostureTask").and_then(|v| v.as_task()),
            Some(TaskHandle(3))
        );
        assert_eq!(DatastoreValue::from("x").as_task(), None);
        assert_eq!(DatastoreValue::from("x").as_text(), Some("x"));
    }
}
