//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the keishiki crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keishiki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let spec_json = std::fs::read_to_string("path/to/spec.json")?;
//! let spec = FormSpec::from_json(&spec_json)?;
//!
//! let resolver = TreeResolver::builder()
//!     .with_config(EngineConfig::from_file("path/to/engine.json")?)
//!     .with_type_mapping("email", "text")
//!     .build();
//!
//! let mut form = Form::with_context(spec, FormContext::new(serde_json::json!({})), resolver);
//! let resolution = form.resolve()?;
//! println!("{}", DisplayTree { nodes: &resolution.nodes });
//! # Ok(())
//! # }
//! ```

// Mounting and resolving
pub use crate::form::Form;
pub use crate::resolver::{TreeResolver, TreeResolverBuilder};
pub use crate::gate::should_recompute;

// Specification types
pub use crate::spec::{Column, ControlKind, FieldSpec, FormSpec, IntoFormSpec, Prop};

// Model access
pub use crate::context::{ContextSnapshot, FormContext, MemoryStore, ModelStore};

// Controls
pub use crate::control::{ControlStrategy, ResolvedProps};

// Output
pub use crate::output::{BoundControl, DisplayTree, Resolution, ResolvedNode};

// Values
pub use crate::value::{OptionItem, Path, normalize_options};

// Configuration
pub use crate::config::EngineConfig;

// Error types
pub use crate::error::{PropertyError, ResolveError, SpecError, SubmitError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
