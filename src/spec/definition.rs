use super::property::Prop;
use crate::context::ContextSnapshot;
use crate::value::Path;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Custom recompute decision for a dynamic node: `(prev, next, ctx) -> recompute?`.
pub type ShouldUpdate = Arc<dyn Fn(&Value, &Value, &ContextSnapshot) -> bool + Send + Sync>;

/// A complete form specification: the ordered top-level nodes of one screen.
#[derive(Debug, Clone, Default)]
pub struct FormSpec {
    pub nodes: Vec<FieldSpec>,
}

impl FormSpec {
    pub fn new(nodes: Vec<FieldSpec>) -> Self {
        Self { nodes }
    }
}

/// One node of the declarative specification tree.
#[derive(Clone)]
pub struct FieldSpec {
    /// Stable identity for the dynamic-boundary cache. Defaults to the tree position.
    pub key: Option<String>,
    pub hidden: Prop<bool>,
    pub dynamic: bool,
    /// The merged `watch` / `rerenderOn` path set.
    pub watch: Vec<Path>,
    pub should_update: Option<ShouldUpdate>,
    pub kind: SpecKind,
}

#[derive(Debug, Clone)]
pub enum SpecKind {
    Field(Box<LeafSpec>),
    Row(RowSpec),
    Group(GroupSpec),
    List(ListSpec),
    Section(SectionSpec),
    Title(TitleSpec),
    Divider(DividerSpec),
    /// A descriptor the wire conversion could not understand. Skipped at resolution.
    Malformed { reason: String },
}

impl SpecKind {
    pub fn tag(&self) -> &str {
        match self {
            SpecKind::Field(leaf) => leaf.control.tag(),
            SpecKind::Row(_) => "row",
            SpecKind::Group(_) => "group",
            SpecKind::List(_) => "list",
            SpecKind::Section(_) => "section",
            SpecKind::Title(_) => "title",
            SpecKind::Divider(_) => "divider",
            SpecKind::Malformed { .. } => "malformed",
        }
    }
}

/// The leaf-input kinds. Anything else is an `Extension`, dispatched through
/// the factory registry and falling back to a plain text input.
#[derive(Debug, Clone)]
pub enum ControlKind {
    Text,
    Password,
    TextArea,
    Number,
    Select,
    MultiSelect,
    Tags,
    Switch,
    Checkbox,
    CheckboxGroup,
    RadioGroup,
    Date,
    DateTime,
    Time,
    Upload,
    /// Fully custom content. The control factory and its guarantees do not apply.
    Custom(Prop<Value>),
    Extension(String),
}

impl ControlKind {
    /// Maps a built-in wire tag to its kind. `custom` is excluded since it carries content.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => ControlKind::Text,
            "password" => ControlKind::Password,
            "textarea" => ControlKind::TextArea,
            "number" => ControlKind::Number,
            "select" => ControlKind::Select,
            "multiselect" => ControlKind::MultiSelect,
            "tags" => ControlKind::Tags,
            "switch" => ControlKind::Switch,
            "checkbox" => ControlKind::Checkbox,
            "checkbox-group" => ControlKind::CheckboxGroup,
            "radio-group" => ControlKind::RadioGroup,
            "date" => ControlKind::Date,
            "datetime" => ControlKind::DateTime,
            "time" => ControlKind::Time,
            "upload" => ControlKind::Upload,
            other => ControlKind::Extension(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            ControlKind::Text => "text",
            ControlKind::Password => "password",
            ControlKind::TextArea => "textarea",
            ControlKind::Number => "number",
            ControlKind::Select => "select",
            ControlKind::MultiSelect => "multiselect",
            ControlKind::Tags => "tags",
            ControlKind::Switch => "switch",
            ControlKind::Checkbox => "checkbox",
            ControlKind::CheckboxGroup => "checkbox-group",
            ControlKind::RadioGroup => "radio-group",
            ControlKind::Date => "date",
            ControlKind::DateTime => "datetime",
            ControlKind::Time => "time",
            ControlKind::Upload => "upload",
            ControlKind::Custom(_) => "custom",
            ControlKind::Extension(tag) => tag,
        }
    }
}

/// A leaf field bound to one model path.
#[derive(Debug, Clone)]
pub struct LeafSpec {
    pub control: ControlKind,
    /// Required for every kind except `custom`. May be computed for list-like fields.
    pub name: Option<Prop<Path>>,
    pub label: Option<Prop<String>>,
    pub tooltip: Option<Prop<String>>,
    pub extra: Option<Prop<String>>,
    pub placeholder: Option<Prop<String>>,
    pub initial_value: Option<Prop<Value>>,
    pub disabled: Prop<bool>,
    /// Defaults to whether any rule declares `required: true`.
    pub required: Option<Prop<bool>>,
    /// Validation constraints, opaque to the engine.
    pub rules: Prop<Vec<Value>>,
    /// Fields revalidated when this one changes. Passed through untouched.
    pub dependencies: Vec<Path>,
    pub options: Option<Prop<Vec<Value>>>,
    pub label_key: Option<String>,
    pub value_key: Option<String>,
    /// Forwarded verbatim to the bound control, merged after engine defaults.
    pub control_props: Prop<Map<String, Value>>,
    pub item_props: Prop<Map<String, Value>>,
    pub no_item: bool,
}

impl LeafSpec {
    pub fn new(control: ControlKind, name: Option<Prop<Path>>) -> Self {
        Self {
            control,
            name,
            label: None,
            tooltip: None,
            extra: None,
            placeholder: None,
            initial_value: None,
            disabled: Prop::default(),
            required: None,
            rules: Prop::default(),
            dependencies: Vec::new(),
            options: None,
            label_key: None,
            value_key: None,
            control_props: Prop::default(),
            item_props: Prop::default(),
            no_item: false,
        }
    }
}

/// Column sizing for one child of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSize {
    /// Shorthand: full width on narrow viewports, `span` on wide ones.
    Span(u8),
    /// Breakpoint map used as given.
    Col(Map<String, Value>),
    Auto,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub size: ColumnSize,
    pub child: FieldSpec,
}

impl Column {
    pub fn span(span: u8, child: FieldSpec) -> Self {
        Self {
            size: ColumnSize::Span(span),
            child,
        }
    }

    pub fn col(layout: Map<String, Value>, child: FieldSpec) -> Self {
        Self {
            size: ColumnSize::Col(layout),
            child,
        }
    }

    pub fn auto(child: FieldSpec) -> Self {
        Self {
            size: ColumnSize::Auto,
            child,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RowSpec {
    /// Falls back to the configured row gutter.
    pub gutter: Option<Prop<Value>>,
    pub align: Option<Prop<String>>,
    pub justify: Option<Prop<String>>,
    pub props: Prop<Map<String, Value>>,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupSpec {
    pub gap: Option<Prop<Value>>,
    pub align: Option<Prop<String>>,
    pub wrap: bool,
    pub props: Prop<Map<String, Value>>,
    pub children: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct ListSpec {
    pub gap: Option<Prop<Value>>,
    pub props: Prop<Map<String, Value>>,
    pub children: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct SectionSpec {
    pub title: Option<Prop<String>>,
    pub subtitle: Option<Prop<String>>,
    pub card: Prop<bool>,
    pub props: Prop<Map<String, Value>>,
    pub children: Vec<FieldSpec>,
}

#[derive(Debug, Clone)]
pub struct TitleSpec {
    pub text: Prop<String>,
    pub subtitle: Option<Prop<String>>,
    pub level: u8,
}

#[derive(Debug, Clone, Default)]
pub struct DividerSpec {
    pub text: Option<Prop<String>>,
    pub dashed: bool,
    pub orientation: Option<String>,
}

impl FieldSpec {
    pub fn new(kind: SpecKind) -> Self {
        Self {
            key: None,
            hidden: Prop::default(),
            dynamic: false,
            watch: Vec::new(),
            should_update: None,
            kind,
        }
    }

    pub fn field(control: ControlKind, name: impl Into<Path>) -> Self {
        let name = Prop::Literal(name.into());
        Self::new(SpecKind::Field(Box::new(LeafSpec::new(control, Some(name)))))
    }

    /// A field whose path is computed from the context, e.g. `items.{index}.qty`.
    pub fn field_at<F>(control: ControlKind, name: F) -> Self
    where
        F: Fn(&ContextSnapshot) -> Path + Send + Sync + 'static,
    {
        let name = Prop::computed(name);
        Self::new(SpecKind::Field(Box::new(LeafSpec::new(control, Some(name)))))
    }

    pub fn text(name: impl Into<Path>) -> Self {
        Self::field(ControlKind::Text, name)
    }

    pub fn select(name: impl Into<Path>, options: Vec<Value>) -> Self {
        Self::field(ControlKind::Select, name).with_options(options)
    }

    /// Custom content without a model binding.
    pub fn custom(content: impl Into<Prop<Value>>) -> Self {
        Self::new(SpecKind::Field(Box::new(LeafSpec::new(
            ControlKind::Custom(content.into()),
            None,
        ))))
    }

    pub fn row(columns: Vec<Column>) -> Self {
        Self::new(SpecKind::Row(RowSpec {
            columns,
            ..RowSpec::default()
        }))
    }

    pub fn group(children: Vec<FieldSpec>) -> Self {
        Self::new(SpecKind::Group(GroupSpec {
            children,
            ..GroupSpec::default()
        }))
    }

    pub fn list(children: Vec<FieldSpec>) -> Self {
        Self::new(SpecKind::List(ListSpec {
            children,
            ..ListSpec::default()
        }))
    }

    pub fn section(title: impl Into<Prop<String>>, children: Vec<FieldSpec>) -> Self {
        Self::new(SpecKind::Section(SectionSpec {
            title: Some(title.into()),
            children,
            ..SectionSpec::default()
        }))
    }

    pub fn title(text: impl Into<Prop<String>>) -> Self {
        Self::new(SpecKind::Title(TitleSpec {
            text: text.into(),
            subtitle: None,
            level: 4,
        }))
    }

    pub fn divider() -> Self {
        Self::new(SpecKind::Divider(DividerSpec::default()))
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::new(SpecKind::Malformed {
            reason: reason.into(),
        })
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn hidden(mut self, hidden: impl Into<Prop<bool>>) -> Self {
        self.hidden = hidden.into();
        self
    }

    pub fn hidden_when<F>(self, f: F) -> Self
    where
        F: Fn(&ContextSnapshot) -> bool + Send + Sync + 'static,
    {
        self.hidden(Prop::computed(f))
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub fn watch<P: Into<Path>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        for path in paths {
            let path = path.into();
            if !self.watch.contains(&path) {
                self.watch.push(path);
            }
        }
        self
    }

    pub fn should_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value, &ContextSnapshot) -> bool + Send + Sync + 'static,
    {
        self.should_update = Some(Arc::new(f));
        self
    }

    /// Whether this node resolves inside a cached dynamic boundary.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic || !self.watch.is_empty() || self.should_update.is_some()
    }

    pub fn leaf(&self) -> Option<&LeafSpec> {
        match &self.kind {
            SpecKind::Field(leaf) => Some(&**leaf),
            _ => None,
        }
    }

    /// Applies `f` to the leaf descriptor. Structural nodes are returned unchanged.
    pub fn map_leaf(mut self, f: impl FnOnce(&mut LeafSpec)) -> Self {
        match &mut self.kind {
            SpecKind::Field(leaf) => f(&mut **leaf),
            other => log::warn!("leaf attribute set on a '{}' node, ignoring", other.tag()),
        }
        self
    }

    pub fn with_label(self, label: impl Into<Prop<String>>) -> Self {
        let label = label.into();
        self.map_leaf(|leaf| leaf.label = Some(label))
    }

    pub fn with_tooltip(self, tooltip: impl Into<Prop<String>>) -> Self {
        let tooltip = tooltip.into();
        self.map_leaf(|leaf| leaf.tooltip = Some(tooltip))
    }

    pub fn with_placeholder(self, placeholder: impl Into<Prop<String>>) -> Self {
        let placeholder = placeholder.into();
        self.map_leaf(|leaf| leaf.placeholder = Some(placeholder))
    }

    pub fn with_initial_value(self, value: impl Into<Prop<Value>>) -> Self {
        let value = value.into();
        self.map_leaf(|leaf| leaf.initial_value = Some(value))
    }

    pub fn with_disabled(self, disabled: impl Into<Prop<bool>>) -> Self {
        let disabled = disabled.into();
        self.map_leaf(|leaf| leaf.disabled = disabled)
    }

    pub fn with_rules(self, rules: impl Into<Prop<Vec<Value>>>) -> Self {
        let rules = rules.into();
        self.map_leaf(|leaf| leaf.rules = rules)
    }

    pub fn with_dependencies<P: Into<Path>>(self, paths: impl IntoIterator<Item = P>) -> Self {
        let paths: Vec<Path> = paths.into_iter().map(Into::into).collect();
        self.map_leaf(|leaf| leaf.dependencies = paths)
    }

    pub fn with_options(self, options: impl Into<Prop<Vec<Value>>>) -> Self {
        let options = options.into();
        self.map_leaf(|leaf| leaf.options = Some(options))
    }

    pub fn with_option_keys(self, label_key: &str, value_key: &str) -> Self {
        self.map_leaf(|leaf| {
            leaf.label_key = Some(label_key.to_string());
            leaf.value_key = Some(value_key.to_string());
        })
    }

    pub fn with_control_props(self, props: impl Into<Prop<Map<String, Value>>>) -> Self {
        let props = props.into();
        self.map_leaf(|leaf| leaf.control_props = props)
    }

    pub fn with_item_props(self, props: impl Into<Prop<Map<String, Value>>>) -> Self {
        let props = props.into();
        self.map_leaf(|leaf| leaf.item_props = props)
    }

    pub fn no_item(self) -> Self {
        self.map_leaf(|leaf| leaf.no_item = true)
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("hidden", &self.hidden)
            .field("dynamic", &self.dynamic)
            .field("watch", &self.watch)
            .field("should_update", &self.should_update.as_ref().map(|_| "<fn>"))
            .field("kind", &self.kind)
            .finish()
    }
}
