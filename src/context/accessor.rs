use super::snapshot::{ContextSnapshot, Helper};
use super::store::{MemoryStore, ModelStore};
use crate::error::SubmitError;
use crate::value::{Path, Segment};
use ahash::AHashMap;
use serde_json::Value;
use std::future::{Future, ready};
use std::pin::Pin;
use std::sync::Arc;

/// The future returned by [`FormContext::submit`]. The host awaits it.
pub type SubmitFuture = Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send>>;

/// Host-supplied `onFinish` callback, invoked with the submitted values.
pub type FinishHandler = Arc<dyn Fn(Value) -> SubmitFuture + Send + Sync>;

/// Names of base accessor members. Helpers may only take these over through
/// [`FormContext::extend_overriding`].
pub const RESERVED_NAMES: &[&str] = &[
    "getValue",
    "getValues",
    "setValue",
    "setValues",
    "reset",
    "submit",
    "values",
    "disabled",
    "loading",
];

/// The read/write façade over the form model.
///
/// This is the only channel through which field callbacks observe the model
/// (via [`ContextSnapshot`]) and through which the host mutates it.
pub struct FormContext<S: ModelStore = MemoryStore> {
    store: S,
    disabled: bool,
    loading: bool,
    helpers: Arc<AHashMap<String, Helper>>,
    on_finish: Option<FinishHandler>,
}

impl FormContext<MemoryStore> {
    pub fn new(initial: Value) -> Self {
        Self::with_store(MemoryStore::new(initial))
    }
}

impl<S: ModelStore> FormContext<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            disabled: false,
            loading: false,
            helpers: Arc::new(AHashMap::new()),
            on_finish: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get_value(&self, path: impl Into<Path>) -> Option<&Value> {
        self.store.get(&path.into())
    }

    pub fn get_values(&self) -> &Value {
        self.store.get_all()
    }

    pub fn set_value(&mut self, path: impl Into<Path>, value: Value) {
        let path = path.into();
        log::trace!("set_value {} = {}", path, value);
        self.store.set(&path, value);
    }

    /// Merges a partial model into the store. Nested objects merge key by
    /// key; any other value replaces what was there.
    pub fn set_values(&mut self, partial: Value) {
        self.merge_at(&Path::root(), partial);
    }

    fn merge_at(&mut self, base: &Path, partial: Value) {
        match partial {
            Value::Object(entries) if base.is_empty() || self.store.get(base).is_some_and(Value::is_object) => {
                for (key, value) in entries {
                    self.merge_at(&base.join(Segment::Key(key)), value);
                }
            }
            other => self.store.set(base, other),
        }
    }

    pub(crate) fn seed(&mut self, path: &Path, value: Value) {
        self.store.seed(path, value);
    }

    pub fn reset(&mut self) {
        log::debug!("resetting form model");
        self.store.reset();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Registers a synchronous finish handler.
    pub fn on_finish<F>(&mut self, handler: F)
    where
        F: Fn(&Value) -> Result<(), SubmitError> + Send + Sync + 'static,
    {
        self.on_finish = Some(Arc::new(move |values: Value| -> SubmitFuture {
            Box::pin(ready(handler(&values)))
        }));
    }

    /// Registers an asynchronous finish handler.
    pub fn on_finish_async<F, Fut>(&mut self, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
    {
        self.on_finish = Some(Arc::new(move |values: Value| -> SubmitFuture {
            Box::pin(handler(values))
        }));
    }

    /// Invokes the finish handler with the current values.
    ///
    /// The returned future is awaited by the host. Failures are passed back
    /// unchanged; nothing is retried or rolled back.
    pub fn submit(&self) -> SubmitFuture {
        match &self.on_finish {
            Some(handler) => handler(self.store.get_all().clone()),
            None => Box::pin(ready(Err(SubmitError::NoHandler))),
        }
    }

    /// Adds a named helper. An existing helper or a reserved base name is
    /// kept, and `false` is returned.
    pub fn extend<F>(&mut self, name: &str, helper: F) -> bool
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        if RESERVED_NAMES.contains(&name) || self.helpers.contains_key(name) {
            log::warn!("context helper '{}' is already defined, keeping the existing one", name);
            return false;
        }
        Arc::make_mut(&mut self.helpers).insert(name.to_string(), Arc::new(helper));
        true
    }

    /// Adds a named helper, replacing any same-named helper or base member.
    pub fn extend_overriding<F>(&mut self, name: &str, helper: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.helpers).insert(name.to_string(), Arc::new(helper));
    }

    /// Takes an immutable view of the current model for one resolution pass.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot::from_parts(
            Arc::new(self.store.get_all().clone()),
            self.disabled,
            self.loading,
            Arc::clone(&self.helpers),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_values_merges_nested_objects() {
        let mut ctx = FormContext::new(json!({"address": {"city": "Bandung", "zip": "40111"}}));
        ctx.set_values(json!({"address": {"city": "Jakarta"}, "name": "Ayu"}));
        assert_eq!(
            ctx.get_values(),
            &json!({"address": {"city": "Jakarta", "zip": "40111"}, "name": "Ayu"})
        );
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut ctx = FormContext::new(json!({"role": "staff"}));
        ctx.set_value("role", json!("admin"));
        ctx.reset();
        assert_eq!(ctx.get_value("role"), Some(&json!("staff")));
    }

    #[test]
    fn reserved_helper_names_need_an_explicit_override() {
        let mut ctx = FormContext::new(json!({"first": "Ayu", "last": "Lestari"}));
        assert!(!ctx.extend("values", |_| json!("shadowed")));
        assert!(ctx.extend("fullName", |v| {
            json!(format!(
                "{} {}",
                v["first"].as_str().unwrap_or_default(),
                v["last"].as_str().unwrap_or_default()
            ))
        }));
        assert!(!ctx.extend("fullName", |_| json!("second")));

        let snapshot = ctx.snapshot();
        assert_eq!(snapshot.helper("fullName"), Some(json!("Ayu Lestari")));
        assert_eq!(snapshot.get("values"), Some(json!({"first": "Ayu", "last": "Lestari"})));

        ctx.extend_overriding("values", |_| json!("shadowed"));
        assert_eq!(ctx.snapshot().get("values"), Some(json!("shadowed")));
    }

    #[test]
    fn snapshots_do_not_observe_later_writes() {
        let mut ctx = FormContext::new(json!({"n": 1}));
        let snapshot = ctx.snapshot();
        ctx.set_value("n", json!(2));
        assert_eq!(snapshot.value("n"), Some(&json!(1)));
    }
}
