use crate::value::Path;
use serde_json::{Map, Value};

/// The contract the engine relies on from the host's model store.
pub trait ModelStore: Send + Sync {
    fn get(&self, path: &Path) -> Option<&Value>;
    fn set(&mut self, path: &Path, value: Value);
    fn get_all(&self) -> &Value;
    /// Restores the values the store was created with.
    fn reset(&mut self);

    /// Provides a field's initial value; paths that already hold a value keep it.
    fn seed(&mut self, path: &Path, value: Value) {
        if self.get(path).is_none() {
            self.set(path, value);
        }
    }
}

/// An in-memory store holding the current model next to its initial state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    initial: Value,
    values: Value,
}

impl MemoryStore {
    pub fn new(initial: Value) -> Self {
        let initial = match initial {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Self {
            values: initial.clone(),
            initial,
        }
    }
}

impl ModelStore for MemoryStore {
    fn get(&self, path: &Path) -> Option<&Value> {
        path.get(&self.values)
    }

    fn set(&mut self, path: &Path, value: Value) {
        path.set(&mut self.values, value);
    }

    fn get_all(&self) -> &Value {
        &self.values
    }

    fn reset(&mut self) {
        self.values = self.initial.clone();
    }

    fn seed(&mut self, path: &Path, value: Value) {
        if path.get(&self.initial).is_none() {
            path.set(&mut self.initial, value.clone());
        }
        if path.get(&self.values).is_none() {
            path.set(&mut self.values, value);
        }
    }
}
