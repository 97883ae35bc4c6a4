use crate::config::EngineConfig;
use crate::error::ResolveError;
use crate::output::BoundControl;
use crate::value::{OptionItem, Path, normalize_options};
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Everything the resolver computed for a leaf before its control is built.
///
/// All properties are already resolved against the pass snapshot, so a
/// strategy never sees a computed property.
#[derive(Debug, Clone, Default)]
pub struct ResolvedProps {
    /// The field's type tag as declared, e.g. `select` or an extension tag.
    pub tag: String,
    pub name: Path,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    /// The model value at `name`, or the initial value when the model has none.
    pub value: Option<Value>,
    /// Already composed with the form-wide disabled and loading flags.
    pub disabled: bool,
    pub options: Option<Vec<Value>>,
    pub label_key: Option<String>,
    pub value_key: Option<String>,
    pub control_props: Map<String, Value>,
}

/// How normalized options are handed to a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionShape {
    /// Every property of the source object is kept.
    Full,
    /// Only `label`, `value` and `disabled` are kept.
    Strict,
}

impl OptionShape {
    pub fn apply(self, options: Vec<OptionItem>) -> Vec<OptionItem> {
        match self {
            OptionShape::Full => options,
            OptionShape::Strict => options
                .into_iter()
                .map(|mut option| {
                    option.extra.retain(|key, _| key == "disabled");
                    option
                })
                .collect(),
        }
    }
}

/// Which verb prefixes an automatic placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderVerb {
    Enter,
    Select,
    /// The primitive has no placeholder.
    None,
}

/// Defines the contract for building a bound control for one field kind.
pub trait ControlStrategy: Send + Sync {
    fn kind(&self) -> &str;
    fn build(&self, props: &ResolvedProps, config: &EngineConfig) -> Result<BoundControl, ResolveError>;
}

/// The static description of a built-in presentation primitive.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveBinding {
    pub primitive: &'static str,
    pub value_prop: &'static str,
    pub verb: PlaceholderVerb,
    pub options: Option<OptionShape>,
}

fn placeholder_for(verb: PlaceholderVerb, props: &ResolvedProps, config: &EngineConfig) -> Option<String> {
    if let Some(explicit) = &props.placeholder {
        return Some(explicit.clone());
    }
    if !config.auto_placeholder {
        return None;
    }
    let label = props.label.as_deref()?;
    match verb {
        PlaceholderVerb::Enter => Some(format!("{} {}", config.enter_verb, label)),
        PlaceholderVerb::Select => Some(format!("{} {}", config.select_verb, label)),
        PlaceholderVerb::None => None,
    }
}

/// Binds resolved properties to a primitive.
///
/// Props merge in three layers: the strategy `defaults`, then the engine's
/// placeholder and disabled flag, then the caller's `controlProps`.
pub fn build_primitive(
    binding: &PrimitiveBinding,
    defaults: Map<String, Value>,
    props: &ResolvedProps,
    config: &EngineConfig,
) -> Result<BoundControl, ResolveError> {
    let mut merged = defaults;
    if let Some(placeholder) = placeholder_for(binding.verb, props, config) {
        merged.insert("placeholder".to_string(), Value::String(placeholder));
    }
    merged.insert("disabled".to_string(), Value::Bool(props.disabled));
    for (key, value) in &props.control_props {
        merged.insert(key.clone(), value.clone());
    }

    let options = binding.options.map(|shape| {
        let raw = props.options.as_deref().unwrap_or_default();
        shape.apply(normalize_options(
            raw,
            props.label_key.as_deref(),
            props.value_key.as_deref(),
        ))
    });

    let disabled = match merged.get("disabled") {
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(ResolveError::Control {
                strategy: props.tag.clone(),
                field: props.name.to_string(),
                message: format!("controlProps.disabled must be a boolean, found {}", other),
            });
        }
        None => props.disabled,
    };

    Ok(BoundControl {
        kind: props.tag.clone(),
        primitive: binding.primitive.to_string(),
        name: Some(props.name.clone()),
        value_prop: binding.value_prop.to_string(),
        value: props.value.clone(),
        disabled,
        options,
        props: merged,
    })
}

/// Master macro to define the built-in control strategies and their lookup by name.
macro_rules! define_control_strategies {
    ( $( ($struct_name:ident, $kind:expr, $primitive:expr, $value_prop:expr, $verb:ident, $shape:expr, |$config:ident| $defaults:expr) ),* $(,)? ) => {
        $(
            pub struct $struct_name;
            impl $struct_name {
                const BINDING: PrimitiveBinding = PrimitiveBinding {
                    primitive: $primitive,
                    value_prop: $value_prop,
                    verb: PlaceholderVerb::$verb,
                    options: $shape,
                };
            }
            impl ControlStrategy for $struct_name {
                fn kind(&self) -> &str { $kind }
                fn build(&self, props: &ResolvedProps, config: &EngineConfig) -> Result<BoundControl, ResolveError> {
                    let $config = config;
                    let defaults: Map<String, Value> = $defaults;
                    build_primitive(&Self::BINDING, defaults, props, $config)
                }
            }
        )*

        /// Creates a built-in strategy by its kind.
        pub fn create_strategy_by_name(name: &str) -> Option<Arc<dyn ControlStrategy>> {
            match name {
                $( $kind => Some(Arc::new($struct_name)), )*
                _ => None,
            }
        }
    };
}

fn clearable(config: &EngineConfig) -> Map<String, Value> {
    let mut defaults = Map::new();
    if config.allow_clear {
        defaults.insert("allowClear".to_string(), Value::Bool(true));
    }
    defaults
}

fn with_entry(mut defaults: Map<String, Value>, key: &str, value: Value) -> Map<String, Value> {
    defaults.insert(key.to_string(), value);
    defaults
}

define_control_strategies! {
    (TextStrategy, "text", "input", "value", Enter, None, |config| clearable(config)),
    (PasswordStrategy, "password", "input-password", "value", Enter, None, |_config| Map::new()),
    (TextAreaStrategy, "textarea", "textarea", "value", Enter, None, |_config| Map::new()),
    (NumberStrategy, "number", "input-number", "value", Enter, None, |_config| Map::new()),
    (SelectStrategy, "select", "select", "value", Select, Some(OptionShape::Full), |config| clearable(config)),
    (MultiSelectStrategy, "multiselect", "select", "value", Select, Some(OptionShape::Full),
        |config| with_entry(clearable(config), "mode", json!("multiple"))),
    (TagsStrategy, "tags", "select", "value", Select, Some(OptionShape::Full),
        |config| with_entry(clearable(config), "mode", json!("tags"))),
    (SwitchStrategy, "switch", "switch", "checked", None, None, |_config| Map::new()),
    (CheckboxStrategy, "checkbox", "checkbox", "checked", None, None, |_config| Map::new()),
    (CheckboxGroupStrategy, "checkbox-group", "checkbox-group", "value", None, Some(OptionShape::Strict), |_config| Map::new()),
    (RadioGroupStrategy, "radio-group", "radio-group", "value", None, Some(OptionShape::Strict), |_config| Map::new()),
    (DateStrategy, "date", "date-picker", "value", Select, None, |_config| Map::new()),
    (DateTimeStrategy, "datetime", "date-picker", "value", Select, None,
        |_config| with_entry(Map::new(), "showTime", json!(true))),
    (TimeStrategy, "time", "time-picker", "value", Select, None, |_config| Map::new()),
    (UploadStrategy, "upload", "upload", "fileList", None, None, |_config| Map::new()),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(tag: &str) -> ResolvedProps {
        ResolvedProps {
            tag: tag.to_string(),
            name: Path::parse("role"),
            label: Some("Role".to_string()),
            ..ResolvedProps::default()
        }
    }

    #[test]
    fn caller_props_win_over_engine_props() {
        let mut input = props("text");
        input.control_props.insert("placeholder".to_string(), json!("e.g. admin"));
        input.control_props.insert("allowClear".to_string(), json!(false));
        let control = TextStrategy.build(&input, &EngineConfig::default()).unwrap();
        assert_eq!(control.props["placeholder"], json!("e.g. admin"));
        assert_eq!(control.props["allowClear"], json!(false));
    }

    #[test]
    fn automatic_placeholders_follow_the_verb() {
        let config = EngineConfig::default();
        let text = TextStrategy.build(&props("text"), &config).unwrap();
        let select = SelectStrategy.build(&props("select"), &config).unwrap();
        let switch = SwitchStrategy.build(&props("switch"), &config).unwrap();
        assert_eq!(text.props["placeholder"], json!("Please enter Role"));
        assert_eq!(select.props["placeholder"], json!("Please select Role"));
        assert!(!switch.props.contains_key("placeholder"));
    }

    #[test]
    fn strict_options_drop_extra_properties() {
        let mut input = props("radio-group");
        input.options = Some(vec![json!({"label": "Yes", "value": 1, "color": "green", "disabled": true})]);
        let control = RadioGroupStrategy.build(&input, &EngineConfig::default()).unwrap();
        let options = control.options.unwrap();
        assert_eq!(options[0].extra.len(), 1);
        assert!(options[0].is_disabled());
    }

    #[test]
    fn non_boolean_disabled_override_is_rejected() {
        let mut input = props("text");
        input.control_props.insert("disabled".to_string(), json!("yes"));
        let err = TextStrategy.build(&input, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ResolveError::Control { .. }));
    }
}
