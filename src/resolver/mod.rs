use crate::config::EngineConfig;
use crate::context::ContextSnapshot;
use crate::control::{ControlFactory, ControlStrategy};
use crate::error::ResolveError;
use crate::output::Resolution;
use crate::spec::FormSpec;
use ahash::AHashMap;
use serde_json::Value;
use std::sync::Arc;

#[cfg(feature = "debug-tools")]
use {crate::output::DisplayTree, std::fs};

mod layout;
mod pass;

use pass::{Boundary, Pass};

/// Resolves a specification tree against a context snapshot.
///
/// Dynamic nodes are resolved inside boundaries whose output is cached
/// between passes. On a later pass the dependency gate decides, per
/// boundary, whether the cached output can be reused.
pub struct TreeResolver {
    factory: ControlFactory,
    config: EngineConfig,
    boundaries: AHashMap<String, Boundary>,
    /// The `(disabled, loading)` flags the cache was built under.
    flags: Option<(bool, bool)>,
}

pub struct TreeResolverBuilder {
    factory: ControlFactory,
    config: EngineConfig,
}

impl Default for TreeResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeResolverBuilder {
    pub fn new() -> Self {
        Self {
            factory: ControlFactory::new(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Renders the field type `user_type` with the built-in control `builtin`.
    pub fn with_type_mapping(mut self, user_type: &str, builtin: &str) -> Self {
        self.factory.map_type(user_type, builtin);
        self
    }

    pub fn with_strategy(mut self, strategy: Box<dyn ControlStrategy>) -> Self {
        self.factory.register(Arc::from(strategy));
        self
    }

    pub fn build(self) -> TreeResolver {
        TreeResolver {
            factory: self.factory,
            config: self.config,
            boundaries: AHashMap::new(),
            flags: None,
        }
    }
}

impl Default for TreeResolver {
    fn default() -> Self {
        TreeResolverBuilder::new().build()
    }
}

impl TreeResolver {
    pub fn builder() -> TreeResolverBuilder {
        TreeResolverBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of dynamic boundaries currently cached.
    pub fn cached_boundaries(&self) -> usize {
        self.boundaries.len()
    }

    /// Forgets every cached boundary. Needed whenever the spec tree is replaced.
    pub fn clear_cache(&mut self) {
        log::debug!("clearing {} cached boundaries", self.boundaries.len());
        self.boundaries.clear();
    }

    /// Runs one depth-first pass over `spec`.
    ///
    /// `prev` is the model the previous pass settled on, seeded initial
    /// values included. Without it every dynamic boundary is recomputed.
    /// Each cached boundary is gated against the model it was resolved
    /// with, so a change is never lost to a pass that reused its parent.
    /// Boundaries that are not reached by this pass are dropped from the
    /// cache. On error the cache is left as it was.
    pub fn resolve(
        &mut self,
        spec: &FormSpec,
        ctx: &ContextSnapshot,
        prev: Option<&Arc<Value>>,
    ) -> Result<Resolution, ResolveError> {
        let flags = (ctx.disabled(), ctx.loading());
        if self.flags != Some(flags) {
            if !self.boundaries.is_empty() {
                log::debug!("form flags changed, invalidating cached boundaries");
            }
            self.boundaries.clear();
            self.flags = Some(flags);
        }

        if let Some(prev) = prev {
            for boundary in self.boundaries.values_mut() {
                boundary.settle(prev);
            }
        }

        let mut pass = Pass::new(&self.factory, &self.config, ctx, prev.is_some(), &self.boundaries);
        let mut nodes = Vec::with_capacity(spec.nodes.len());
        for (index, node) in spec.nodes.iter().enumerate() {
            if let Some(resolved) = pass.resolve_node(node, &index.to_string())? {
                nodes.push(resolved);
            }
        }

        let Pass {
            next,
            recomputed,
            reused,
            diagnostics,
            seeds,
            ..
        } = pass;
        self.boundaries = next;

        log::debug!(
            "resolved {} top-level nodes ({} recomputed, {} reused, {} skipped)",
            nodes.len(),
            recomputed.len(),
            reused.len(),
            diagnostics.len()
        );

        let resolution = Resolution {
            nodes,
            recomputed,
            reused,
            diagnostics,
            seeds,
        };

        #[cfg(feature = "debug-tools")]
        Self::write_debug_tree(&resolution);

        Ok(resolution)
    }

    #[cfg(feature = "debug-tools")]
    fn write_debug_tree(resolution: &Resolution) {
        let path = "tmp/resolved_tree.txt";
        let tree = DisplayTree {
            nodes: &resolution.nodes,
        }
        .to_string();
        match fs::create_dir_all("tmp").and_then(|_| fs::write(path, tree)) {
            Ok(()) => log::info!("  -> Wrote resolved tree to '{}'", path),
            Err(e) => log::warn!("could not write '{}': {}", path, e),
        }
    }
}
