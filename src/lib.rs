//! # Keishiki - Declarative Form Resolution Engine
//!
//! **Keishiki** turns a declarative specification of a data-entry screen (a tree of
//! typed field descriptors) into a concrete, render-ready widget tree. Properties may
//! be literals or functions of the live form model, and dynamic subtrees are only
//! recomputed when the model paths they depend on actually change.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the Screen**: Build a `FormSpec` with the `FieldSpec` builders, load it
//!     from JSON with `FormSpec::from_json`, or implement `IntoFormSpec` for your own format.
//! 2.  **Mount a Form**: Create a `Form` from the spec and the initial model values.
//! 3.  **Resolve**: Call `Form::resolve` to get a `Resolution` holding the widget tree.
//! 4.  **Mutate and Resolve Again**: Write through `Form::context_mut()` and resolve again.
//!     Dynamic boundaries whose watched paths did not change are reused from the last pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use keishiki::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let spec = FormSpec::new(vec![
//!         FieldSpec::text("email").with_label("Email"),
//!         FieldSpec::select("country", vec![json!("ID"), json!("US")]).with_label("Country"),
//!         FieldSpec::text("city")
//!             .with_label("City")
//!             .hidden_when(|ctx| ctx.str_value("country") != Some("ID"))
//!             .watch(["country"]),
//!     ]);
//!
//!     let mut form = Form::new(spec, json!({"country": "US"}));
//!     let first = form.resolve()?;
//!     assert_eq!(first.leaf_names(), vec!["email", "country"]);
//!
//!     form.context_mut().set_value("country", json!("ID"));
//!     let second = form.resolve()?;
//!     assert_eq!(second.leaf_names(), vec!["email", "country", "city"]);
//!     println!("{}", DisplayTree { nodes: &second.nodes });
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod control;
pub mod error;
pub mod form;
pub mod gate;
pub mod output;
pub mod prelude;
pub mod resolver;
pub mod spec;
pub mod value;
