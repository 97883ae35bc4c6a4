//! Common test utilities for building form specifications and models.
use keishiki::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A registration screen with a row of two half-width fields, a select and a
/// password confirmation that only recomputes when the password changes.
#[allow(dead_code)]
pub fn create_registration_spec() -> FormSpec {
    FormSpec::new(vec![
        FieldSpec::title("Create account"),
        FieldSpec::row(vec![
            Column::span(12, FieldSpec::text("first_name").with_label("First name")),
            Column::span(12, FieldSpec::text("last_name").with_label("Last name")),
        ]),
        FieldSpec::text("email")
            .with_label("Email")
            .with_rules(vec![json!({"required": true, "type": "email"})]),
        FieldSpec::select("role", vec![json!("staff"), json!("admin")]).with_label("Role"),
        FieldSpec::field(ControlKind::Password, "password").with_label("Password"),
        FieldSpec::field(ControlKind::Password, "confirm")
            .with_label("Confirm password")
            .with_key("confirm")
            .watch(["password"]),
    ])
}

/// The same screen in its JSON wire form.
#[allow(dead_code)]
pub const REGISTRATION_SPEC_JSON: &str = r#"[
    {"type": "title", "text": "Create account"},
    {"type": "row", "children": [
        {"type": "text", "name": "first_name", "label": "First name", "span": 12},
        {"type": "text", "name": "last_name", "label": "Last name", "span": 12}
    ]},
    {"type": "text", "name": "email", "label": "Email", "rules": [{"required": true, "type": "email"}]},
    {"type": "select", "name": "role", "label": "Role", "options": ["staff", "admin"]},
    {"type": "password", "name": "password", "label": "Password"},
    {"type": "password", "name": "confirm", "label": "Confirm password", "key": "confirm", "watch": ["password"]}
]"#;

#[allow(dead_code)]
pub fn create_registration_model() -> Value {
    json!({
        "first_name": "Ayu",
        "last_name": "Lestari",
        "role": "staff",
        "password": "a"
    })
}

/// A shared counter that computed properties bump every time they run.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

#[allow(dead_code)]
impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A text field whose label is computed and counts its own evaluations.
#[allow(dead_code)]
pub fn counted_field(name: &str, counter: &CallCounter) -> FieldSpec {
    let counter = counter.clone();
    let label = name.to_string();
    FieldSpec::text(name).with_label(Prop::computed(move |_ctx: &ContextSnapshot| {
        counter.bump();
        label.clone()
    }))
}

/// Finds the bound control of the leaf at `name`, panicking when absent.
#[allow(dead_code)]
pub fn control_of<'a>(resolution: &'a Resolution, name: &str) -> &'a BoundControl {
    resolution
        .find(name)
        .and_then(ResolvedNode::control)
        .unwrap_or_else(|| panic!("no control bound to '{}'", name))
}
