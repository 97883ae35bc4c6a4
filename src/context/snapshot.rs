use crate::value::Path;
use ahash::AHashMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A named helper computed from the model values, e.g. a derived full name.
pub type Helper = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// An immutable, point-in-time view over the form model.
///
/// One snapshot is taken per resolution pass and handed to every computed
/// property, so all reads during a pass observe the same values.
#[derive(Clone)]
pub struct ContextSnapshot {
    values: Arc<Value>,
    disabled: bool,
    loading: bool,
    helpers: Arc<AHashMap<String, Helper>>,
}

impl ContextSnapshot {
    pub fn new(values: Value) -> Self {
        Self {
            values: Arc::new(values),
            disabled: false,
            loading: false,
            helpers: Arc::new(AHashMap::new()),
        }
    }

    pub(crate) fn from_parts(
        values: Arc<Value>,
        disabled: bool,
        loading: bool,
        helpers: Arc<AHashMap<String, Helper>>,
    ) -> Self {
        Self {
            values,
            disabled,
            loading,
            helpers,
        }
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    pub(crate) fn shared_values(&self) -> Arc<Value> {
        Arc::clone(&self.values)
    }

    /// Reads a single model value. `None` means the path is undefined.
    pub fn value(&self, path: impl Into<Path>) -> Option<&Value> {
        path.into().get(&self.values)
    }

    /// Convenience for string-valued fields.
    pub fn str_value(&self, path: impl Into<Path>) -> Option<&str> {
        self.value(path).and_then(Value::as_str)
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Evaluates a registered helper against the snapshot values.
    pub fn helper(&self, name: &str) -> Option<Value> {
        self.helpers.get(name).map(|helper| helper(&self.values))
    }

    /// Looks up a member by name. Helpers registered with an explicit
    /// override shadow the built-in `values`, `disabled` and `loading` members.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.helper(name) {
            return Some(value);
        }
        match name {
            "values" => Some(self.values.as_ref().clone()),
            "disabled" => Some(Value::Bool(self.disabled)),
            "loading" => Some(Value::Bool(self.loading)),
            _ => None,
        }
    }

    pub fn helper_names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }
}

impl fmt::Debug for ContextSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSnapshot")
            .field("values", &self.values)
            .field("disabled", &self.disabled)
            .field("loading", &self.loading)
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}
