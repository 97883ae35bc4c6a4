//! Tests for the form context: model access, helpers and submission.
//!
mod common;
use common::*;
use keishiki::prelude::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod context_tests {
    use super::*;

    #[test]
    fn test_submit_passes_current_values_to_the_handler() {
        let mut ctx = FormContext::new(create_registration_model());
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        ctx.on_finish(move |values| {
            *sink.lock().unwrap() = Some(values.clone());
            Ok(())
        });
        ctx.set_value("email", json!("ayu@example.com"));

        let result = tokio_test::block_on(ctx.submit());
        assert_eq!(result, Ok(()));
        let values = received.lock().unwrap().clone().unwrap();
        assert_eq!(values["email"], json!("ayu@example.com"));
        assert_eq!(values["role"], json!("staff"));
    }

    #[test]
    fn test_async_handler_failures_reach_the_host_unchanged() {
        let mut ctx = FormContext::new(json!({"amount": 0}));
        ctx.on_finish_async(|values| async move {
            if values["amount"] == json!(0) {
                Err(SubmitError::Rejected("amount must be positive".to_string()))
            } else {
                Ok(())
            }
        });

        let err = tokio_test::block_on(ctx.submit()).unwrap_err();
        assert_eq!(err, SubmitError::Rejected("amount must be positive".to_string()));

        ctx.set_value("amount", json!(10));
        assert_eq!(tokio_test::block_on(ctx.submit()), Ok(()));
    }

    #[test]
    fn test_submit_without_handler_is_an_error() {
        let ctx = FormContext::new(json!({}));
        assert_eq!(tokio_test::block_on(ctx.submit()), Err(SubmitError::NoHandler));
    }

    #[test]
    fn test_form_submit_uses_the_mounted_context() {
        let mut form = Form::new(create_registration_spec(), create_registration_model());
        form.context_mut().on_finish(|values| {
            if values.get("password").is_some() {
                Ok(())
            } else {
                Err(SubmitError::Rejected("password missing".to_string()))
            }
        });
        form.resolve().unwrap();
        assert_eq!(tokio_test::block_on(form.submit()), Ok(()));
    }

    #[test]
    fn test_helpers_are_visible_to_computed_properties() {
        let mut form = Form::new(
            FormSpec::new(vec![FieldSpec::text("greeting").with_placeholder(Prop::computed(
                |ctx: &ContextSnapshot| {
                    ctx.helper("fullName")
                        .and_then(|name| name.as_str().map(|n| format!("Hello {}", n)))
                        .unwrap_or_default()
                },
            ))]),
            create_registration_model(),
        );
        form.context_mut().extend("fullName", |values| {
            json!(format!(
                "{} {}",
                values["first_name"].as_str().unwrap_or_default(),
                values["last_name"].as_str().unwrap_or_default()
            ))
        });

        let resolution = form.resolve().unwrap();
        assert_eq!(
            control_of(&resolution, "greeting").props["placeholder"],
            json!("Hello Ayu Lestari")
        );
    }

    #[test]
    fn test_set_values_merges_without_dropping_siblings() {
        let mut ctx = FormContext::new(json!({"profile": {"name": "Ayu", "age": 30}}));
        ctx.set_values(json!({"profile": {"age": 31}, "tags": ["a"]}));

        assert_eq!(ctx.get_value("profile.name"), Some(&json!("Ayu")));
        assert_eq!(ctx.get_value("profile.age"), Some(&json!(31)));
        assert_eq!(ctx.get_value("tags.0"), Some(&json!("a")));
    }
}
