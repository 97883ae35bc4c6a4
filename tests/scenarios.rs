//! End-to-end scenarios for mounting and resolving forms.
//!
mod common;
use common::*;
use keishiki::output::ItemContent;
use keishiki::prelude::*;
use serde_json::{Value, json};

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_text_field_on_empty_model_has_undefined_value() {
        let mut form = Form::new(FormSpec::new(vec![FieldSpec::text("email")]), json!({}));
        let resolution = form.resolve().expect("resolution failed");

        assert_eq!(resolution.leaf_names(), vec!["email"]);
        let control = control_of(&resolution, "email");
        assert_eq!(control.primitive, "input");
        assert_eq!(control.value, None);
        assert!(!control.disabled);
    }

    #[test]
    fn test_select_options_are_normalized() {
        let spec = FormSpec::from_json(r#"[{"type": "select", "name": "role", "options": ["A", "B"]}]"#)
            .expect("spec should parse");
        let mut form = Form::new(spec, json!({}));
        let resolution = form.resolve().expect("resolution failed");

        let options = control_of(&resolution, "role").options.clone().expect("select has options");
        assert_eq!(options, vec![OptionItem::new("A", "A"), OptionItem::new("B", "B")]);
    }

    #[test]
    fn test_hidden_predicate_follows_the_model() {
        let spec = FormSpec::new(vec![
            FieldSpec::text("city").hidden_when(|ctx| ctx.str_value("country") != Some("ID")),
        ]);

        let mut form = Form::new(spec.clone(), json!({"country": "US"}));
        assert!(form.resolve().unwrap().find("city").is_none());

        let mut form = Form::new(spec, json!({"country": "ID"}));
        assert!(form.resolve().unwrap().find("city").is_some());
    }

    #[test]
    fn test_watched_path_gates_recomputation() {
        let counter = CallCounter::new();
        let spec = FormSpec::new(vec![counted_field("confirm", &counter).watch(["password"])]);
        let mut form = Form::new(spec, json!({"password": "a"}));

        form.resolve().unwrap();
        assert_eq!(counter.count(), 1);

        form.context_mut().set_value("password", json!("a"));
        let same = form.resolve().unwrap();
        assert_eq!(counter.count(), 1);
        assert_eq!(same.reused, vec!["0"]);

        form.context_mut().set_value("password", json!("b"));
        let changed = form.resolve().unwrap();
        assert_eq!(counter.count(), 2);
        assert_eq!(changed.recomputed, vec!["0"]);
    }

    #[test]
    fn test_span_columns_expand_to_breakpoints() {
        let spec = FormSpec::from_json(
            r#"[{"type": "row", "children": [
                {"type": "text", "name": "a", "span": 12},
                {"type": "text", "name": "b", "span": 12}
            ]}]"#,
        )
        .unwrap();
        let mut form = Form::new(spec, json!({}));
        let resolution = form.resolve().unwrap();

        let ResolvedNode::Row { columns, .. } = &resolution.nodes[0] else {
            panic!("expected a row, got {:?}", resolution.nodes[0]);
        };
        assert_eq!(columns.len(), 2);
        for column in columns {
            assert_eq!(Value::Object(column.layout.clone()), json!({"xs": 24, "md": 12}));
        }
    }

    #[test]
    fn test_registration_screen_resolves_in_declaration_order() {
        let mut form = Form::new(create_registration_spec(), create_registration_model());
        let resolution = form.resolve().unwrap();

        assert_eq!(
            resolution.leaf_names(),
            vec!["first_name", "last_name", "email", "role", "password", "confirm"]
        );
        let Some(ResolvedNode::Item(email)) = resolution.find("email") else {
            panic!("email should be wrapped in an item");
        };
        assert!(email.required);
        assert_eq!(email.label.as_deref(), Some("Email"));
        assert!(matches!(email.content, ItemContent::Control(_)));
        assert_eq!(control_of(&resolution, "first_name").value, Some(json!("Ayu")));
    }

    #[test]
    fn test_wire_and_builder_specs_resolve_alike() {
        let mut built = Form::new(create_registration_spec(), create_registration_model());
        let mut parsed = Form::new(
            FormSpec::from_json(REGISTRATION_SPEC_JSON).unwrap(),
            create_registration_model(),
        );
        assert_eq!(built.resolve().unwrap().nodes, parsed.resolve().unwrap().nodes);
    }

    #[test]
    fn test_mutations_only_recompute_affected_boundaries() {
        let mut form = Form::new(create_registration_spec(), create_registration_model());
        form.resolve().unwrap();

        form.context_mut().set_value("email", json!("ayu@example.com"));
        let after_email = form.resolve().unwrap();
        assert_eq!(after_email.reused, vec!["confirm"]);
        assert_eq!(control_of(&after_email, "email").value, Some(json!("ayu@example.com")));

        form.context_mut().set_value("password", json!("secret"));
        let after_password = form.resolve().unwrap();
        assert_eq!(after_password.recomputed, vec!["confirm"]);
    }

    #[test]
    fn test_reused_boundaries_show_their_own_current_value() {
        let mut form = Form::new(create_registration_spec(), create_registration_model());
        form.resolve().unwrap();

        form.context_mut().set_value("confirm", json!("typed"));
        let resolution = form.resolve().unwrap();
        assert_eq!(resolution.reused, vec!["confirm"]);
        assert_eq!(control_of(&resolution, "confirm").value, Some(json!("typed")));
    }

    #[test]
    fn test_tree_formatter_outlines_the_resolution() {
        let mut form = Form::new(create_registration_spec(), create_registration_model());
        let resolution = form.resolve().unwrap();
        let outline = DisplayTree { nodes: &resolution.nodes }.to_string();

        assert!(outline.starts_with("├── title Create account\n"));
        assert!(outline.contains("col {\"md\":12,\"xs\":24}") || outline.contains("col {\"xs\":24,\"md\":12}"));
        assert!(outline.contains("item email * [text] Email = undefined"));
        assert!(outline.ends_with("└── item confirm [password] Confirm password = undefined\n"));
    }
}
