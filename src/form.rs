use crate::context::{FormContext, MemoryStore, ModelStore, SubmitFuture};
use crate::error::ResolveError;
use crate::output::Resolution;
use crate::resolver::TreeResolver;
use crate::spec::FormSpec;
use serde_json::Value;
use std::sync::Arc;

/// A mounted form: one specification tree, its model context and the resolver cache.
///
/// The host mutates the model through [`Form::context_mut`] and calls
/// [`Form::resolve`] whenever it needs a fresh widget tree.
pub struct Form<S: ModelStore = MemoryStore> {
    spec: FormSpec,
    context: FormContext<S>,
    resolver: TreeResolver,
    last_model: Option<Arc<Value>>,
}

impl Form<MemoryStore> {
    pub fn new(spec: FormSpec, initial: Value) -> Self {
        Self::with_context(spec, FormContext::new(initial), TreeResolver::default())
    }
}

impl<S: ModelStore> Form<S> {
    pub fn with_context(spec: FormSpec, context: FormContext<S>, resolver: TreeResolver) -> Self {
        Self {
            spec,
            context,
            resolver,
            last_model: None,
        }
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    pub fn context(&self) -> &FormContext<S> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut FormContext<S> {
        &mut self.context
    }

    pub fn resolver(&self) -> &TreeResolver {
        &self.resolver
    }

    /// Resolves the tree against the current model.
    ///
    /// Dynamic boundaries are compared against the model they were last
    /// resolved with. Initial values of visited fields are seeded into the store once
    /// the pass is complete, so the pass itself reads one consistent snapshot.
    pub fn resolve(&mut self) -> Result<Resolution, ResolveError> {
        let snapshot = self.context.snapshot();
        let prev = self.last_model.as_ref();
        let resolution = self.resolver.resolve(&self.spec, &snapshot, prev)?;

        for (path, value) in &resolution.seeds {
            self.context.seed(path, value.clone());
        }
        self.last_model = Some(if resolution.seeds.is_empty() {
            snapshot.shared_values()
        } else {
            Arc::new(self.context.get_values().clone())
        });
        Ok(resolution)
    }

    /// Swaps in a new specification tree. Cached boundaries belong to the old
    /// tree and are discarded.
    pub fn replace_spec(&mut self, spec: FormSpec) {
        self.spec = spec;
        self.resolver.clear_cache();
        self.last_model = None;
    }

    /// Submits the current values through the context's finish handler.
    pub fn submit(&self) -> SubmitFuture {
        self.context.submit()
    }
}
