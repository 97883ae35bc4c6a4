use super::strategy::*;
use crate::config::EngineConfig;
use crate::error::ResolveError;
use crate::output::BoundControl;
use crate::spec::ControlKind;
use ahash::AHashMap;
use std::sync::Arc;

/// Maps leaf kinds to the strategy that binds them to a primitive.
///
/// Built-in kinds dispatch through an exhaustive match. Extension kinds are
/// looked up in the registry and fall back to a plain text input.
pub struct ControlFactory {
    registry: AHashMap<String, Arc<dyn ControlStrategy>>,
    fallback: Arc<dyn ControlStrategy>,
}

impl Default for ControlFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlFactory {
    pub fn new() -> Self {
        Self {
            registry: AHashMap::new(),
            fallback: Arc::new(TextStrategy),
        }
    }

    /// Routes an extension tag to a built-in strategy. Unknown built-in names are ignored.
    pub fn map_type(&mut self, user_type: &str, builtin: &str) -> bool {
        match create_strategy_by_name(builtin) {
            Some(strategy) => {
                self.registry.insert(user_type.to_string(), strategy);
                true
            }
            None => {
                log::warn!(
                    "cannot map '{}' to unknown control kind '{}'",
                    user_type,
                    builtin
                );
                false
            }
        }
    }

    /// Registers a strategy for its extension kind, replacing any earlier one.
    pub fn register(&mut self, strategy: Arc<dyn ControlStrategy>) {
        self.registry.insert(strategy.kind().to_string(), strategy);
    }

    pub fn has_strategy(&self, kind: &str) -> bool {
        self.registry.contains_key(kind)
    }

    fn builtin_strategy(kind: &ControlKind) -> Option<&'static dyn ControlStrategy> {
        let strategy: &'static dyn ControlStrategy = match kind {
            ControlKind::Text => &TextStrategy,
            ControlKind::Password => &PasswordStrategy,
            ControlKind::TextArea => &TextAreaStrategy,
            ControlKind::Number => &NumberStrategy,
            ControlKind::Select => &SelectStrategy,
            ControlKind::MultiSelect => &MultiSelectStrategy,
            ControlKind::Tags => &TagsStrategy,
            ControlKind::Switch => &SwitchStrategy,
            ControlKind::Checkbox => &CheckboxStrategy,
            ControlKind::CheckboxGroup => &CheckboxGroupStrategy,
            ControlKind::RadioGroup => &RadioGroupStrategy,
            ControlKind::Date => &DateStrategy,
            ControlKind::DateTime => &DateTimeStrategy,
            ControlKind::Time => &TimeStrategy,
            ControlKind::Upload => &UploadStrategy,
            ControlKind::Custom(_) | ControlKind::Extension(_) => return None,
        };
        Some(strategy)
    }

    /// Builds the bound control for a leaf.
    ///
    /// `custom` leaves never reach the factory; the resolver emits their content directly.
    pub fn build(
        &self,
        kind: &ControlKind,
        props: &ResolvedProps,
        config: &EngineConfig,
    ) -> Result<BoundControl, ResolveError> {
        if let Some(strategy) = Self::builtin_strategy(kind) {
            return strategy.build(props, config);
        }
        match kind {
            ControlKind::Extension(tag) => match self.registry.get(tag) {
                Some(strategy) => strategy.build(props, config),
                None => {
                    log::debug!("no strategy registered for '{}', rendering as text", tag);
                    self.fallback.build(props, config)
                }
            },
            other => Err(ResolveError::Control {
                strategy: other.tag().to_string(),
                field: props.name.to_string(),
                message: "custom content has no control strategy".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Path;
    use serde_json::{Map, Value, json};

    struct RatingStrategy;

    impl ControlStrategy for RatingStrategy {
        fn kind(&self) -> &str {
            "rating"
        }

        fn build(&self, props: &ResolvedProps, config: &EngineConfig) -> Result<BoundControl, ResolveError> {
            let binding = PrimitiveBinding {
                primitive: "rate",
                value_prop: "value",
                verb: PlaceholderVerb::None,
                options: None,
            };
            let mut defaults = Map::new();
            defaults.insert("count".to_string(), json!(5));
            build_primitive(&binding, defaults, props, config)
        }
    }

    fn props(tag: &str) -> ResolvedProps {
        ResolvedProps {
            tag: tag.to_string(),
            name: Path::parse("score"),
            ..ResolvedProps::default()
        }
    }

    #[test]
    fn unknown_extensions_fall_back_to_text() {
        let factory = ControlFactory::new();
        let kind = ControlKind::from_tag("colour-picker");
        let control = factory.build(&kind, &props("colour-picker"), &EngineConfig::default()).unwrap();
        assert_eq!(control.primitive, "input");
        assert_eq!(control.kind, "colour-picker");
    }

    #[test]
    fn registered_strategies_handle_their_extension() {
        let mut factory = ControlFactory::new();
        factory.register(Arc::new(RatingStrategy));
        let control = factory
            .build(&ControlKind::from_tag("rating"), &props("rating"), &EngineConfig::default())
            .unwrap();
        assert_eq!(control.primitive, "rate");
        assert_eq!(control.props.get("count"), Some(&json!(5)));
    }

    #[test]
    fn type_mappings_reuse_builtin_strategies() {
        let mut factory = ControlFactory::new();
        assert!(factory.map_type("yes-no", "switch"));
        assert!(!factory.map_type("stars", "rating"));
        let control = factory
            .build(&ControlKind::from_tag("yes-no"), &props("yes-no"), &EngineConfig::default())
            .unwrap();
        assert_eq!(control.value_prop, "checked");
    }

    #[test]
    fn disabled_is_forwarded_to_the_primitive() {
        let factory = ControlFactory::new();
        let mut input = props("number");
        input.disabled = true;
        let control = factory.build(&ControlKind::Number, &input, &EngineConfig::default()).unwrap();
        assert!(control.disabled);
        assert_eq!(control.props.get("disabled"), Some(&Value::Bool(true)));
    }
}
