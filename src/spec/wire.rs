//! The JSON wire format of a form specification.
//!
//! Each node is parsed on its own, so a descriptor that fails to parse turns
//! into a [`SpecKind::Malformed`] placeholder instead of rejecting the whole
//! tree. Computed properties cannot be expressed on the wire; every property
//! parsed here is a literal.

use super::conversion::IntoFormSpec;
use super::definition::*;
use super::property::Prop;
use crate::error::{SpecConversionError, SpecError};
use crate::value::Path;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A wire descriptor. Unknown keys are ignored. Column sizing (`span`,
/// `col`) is read separately by `convert_column`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawNode {
    #[serde(rename = "type")]
    kind: Option<String>,
    key: Option<String>,
    name: Option<Value>,
    label: Option<String>,
    tooltip: Option<String>,
    extra: Option<String>,
    placeholder: Option<String>,
    initial_value: Option<Value>,
    hidden: Option<bool>,
    disabled: Option<bool>,
    required: Option<bool>,
    rules: Option<Vec<Value>>,
    dependencies: Option<Vec<Value>>,
    dynamic: Option<bool>,
    watch: Option<Vec<Value>>,
    rerender_on: Option<Vec<Value>>,
    options: Option<Vec<Value>>,
    label_key: Option<String>,
    value_key: Option<String>,
    control_props: Option<Map<String, Value>>,
    item_props: Option<Map<String, Value>>,
    props: Option<Map<String, Value>>,
    no_item: Option<bool>,
    component: Option<Value>,
    render: Option<Value>,
    children: Option<Vec<Value>>,
    gutter: Option<Value>,
    gap: Option<Value>,
    align: Option<String>,
    justify: Option<String>,
    wrap: Option<bool>,
    title: Option<String>,
    subtitle: Option<String>,
    text: Option<String>,
    card: Option<bool>,
    level: Option<u8>,
    dashed: Option<bool>,
    orientation: Option<String>,
}

/// The raw top-level document: either a bare array of nodes or `{ "fields": [...] }`.
#[derive(Debug)]
pub struct RawForm {
    nodes: Vec<Value>,
}

impl RawForm {
    pub fn from_value(document: Value) -> Result<Self, SpecError> {
        match document {
            Value::Array(nodes) => Ok(Self { nodes }),
            Value::Object(mut object) => match object.remove("fields") {
                Some(Value::Array(nodes)) => Ok(Self { nodes }),
                _ => Err(SpecError::InvalidRoot("an object without a 'fields' array".to_string())),
            },
            other => Err(SpecError::InvalidRoot(other.to_string())),
        }
    }
}

impl IntoFormSpec for RawForm {
    fn into_form_spec(self) -> Result<FormSpec, SpecConversionError> {
        Ok(FormSpec::new(self.nodes.iter().map(convert_node).collect()))
    }
}

impl FormSpec {
    /// Parses a JSON specification document.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let document: Value =
            serde_json::from_str(json).map_err(|e| SpecError::JsonParseError(e.to_string()))?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self, SpecError> {
        RawForm::from_value(document)?
            .into_form_spec()
            .map_err(|e| SpecError::InvalidRoot(e.to_string()))
    }
}

/// Converts one wire descriptor. Never fails: problems become a malformed node.
pub fn convert_node(raw: &Value) -> FieldSpec {
    let node = match RawNode::deserialize(raw) {
        Ok(node) => node,
        Err(e) => return FieldSpec::malformed(format!("unreadable descriptor: {}", e)),
    };
    match build_node(node) {
        Ok(spec) => spec,
        Err(reason) => FieldSpec::malformed(reason),
    }
}

fn build_node(mut raw: RawNode) -> Result<FieldSpec, String> {
    let kind = match raw.kind.take() {
        Some(tag) => build_kind(&tag, &mut raw)?,
        None if raw.name.is_some() => build_leaf(ControlKind::Text, &mut raw)?,
        None => return Err("descriptor has neither a type nor a name".to_string()),
    };

    let watch = raw
        .watch
        .iter()
        .flatten()
        .chain(raw.rerender_on.iter().flatten())
        .map(Path::from_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?
        .into_iter()
        .unique()
        .collect();

    Ok(FieldSpec {
        key: raw.key,
        hidden: Prop::Literal(raw.hidden.unwrap_or(false)),
        dynamic: raw.dynamic.unwrap_or(false),
        watch,
        should_update: None,
        kind,
    })
}

fn build_kind(tag: &str, raw: &mut RawNode) -> Result<SpecKind, String> {
    match tag {
        "row" => Ok(SpecKind::Row(RowSpec {
            gutter: raw.gutter.take().map(Prop::Literal),
            align: raw.align.take().map(Prop::Literal),
            justify: raw.justify.take().map(Prop::Literal),
            props: Prop::Literal(raw.props.take().unwrap_or_default()),
            columns: raw
                .children
                .take()
                .unwrap_or_default()
                .iter()
                .map(convert_column)
                .collect(),
        })),
        "group" => Ok(SpecKind::Group(GroupSpec {
            gap: raw.gap.take().map(Prop::Literal),
            align: raw.align.take().map(Prop::Literal),
            wrap: raw.wrap.unwrap_or(false),
            props: Prop::Literal(raw.props.take().unwrap_or_default()),
            children: convert_children(raw),
        })),
        "list" => Ok(SpecKind::List(ListSpec {
            gap: raw.gap.take().map(Prop::Literal),
            props: Prop::Literal(raw.props.take().unwrap_or_default()),
            children: convert_children(raw),
        })),
        "section" => Ok(SpecKind::Section(SectionSpec {
            title: raw.title.take().map(Prop::Literal),
            subtitle: raw.subtitle.take().map(Prop::Literal),
            card: Prop::Literal(raw.card.unwrap_or(false)),
            props: Prop::Literal(raw.props.take().unwrap_or_default()),
            children: convert_children(raw),
        })),
        "title" => {
            let text = raw
                .text
                .take()
                .or_else(|| raw.title.take())
                .ok_or_else(|| "title node without text".to_string())?;
            Ok(SpecKind::Title(TitleSpec {
                text: Prop::Literal(text),
                subtitle: raw.subtitle.take().map(Prop::Literal),
                level: raw.level.unwrap_or(4),
            }))
        }
        "divider" => Ok(SpecKind::Divider(DividerSpec {
            text: raw.text.take().or_else(|| raw.title.take()).map(Prop::Literal),
            dashed: raw.dashed.unwrap_or(false),
            orientation: raw.orientation.take(),
        })),
        "custom" => {
            let content = raw
                .component
                .take()
                .or_else(|| raw.render.take())
                .ok_or_else(|| "custom node without a component".to_string())?;
            build_leaf(ControlKind::Custom(Prop::Literal(content)), raw)
        }
        other => {
            let control = match raw.component.take().or_else(|| raw.render.take()) {
                Some(content) => ControlKind::Custom(Prop::Literal(content)),
                None => ControlKind::from_tag(other),
            };
            build_leaf(control, raw)
        }
    }
}

fn build_leaf(control: ControlKind, raw: &mut RawNode) -> Result<SpecKind, String> {
    let name = raw
        .name
        .take()
        .map(|n| Path::from_value(&n))
        .transpose()
        .map_err(|e| e.to_string())?;
    let dependencies = raw
        .dependencies
        .take()
        .unwrap_or_default()
        .iter()
        .map(Path::from_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let mut leaf = LeafSpec::new(control, name.map(Prop::Literal));
    leaf.label = raw.label.take().map(Prop::Literal);
    leaf.tooltip = raw.tooltip.take().map(Prop::Literal);
    leaf.extra = raw.extra.take().map(Prop::Literal);
    leaf.placeholder = raw.placeholder.take().map(Prop::Literal);
    leaf.initial_value = raw.initial_value.take().map(Prop::Literal);
    leaf.disabled = Prop::Literal(raw.disabled.unwrap_or(false));
    leaf.required = raw.required.map(Prop::Literal);
    leaf.rules = Prop::Literal(raw.rules.take().unwrap_or_default());
    leaf.dependencies = dependencies;
    leaf.options = raw.options.take().map(Prop::Literal);
    leaf.label_key = raw.label_key.take();
    leaf.value_key = raw.value_key.take();
    leaf.control_props = Prop::Literal(raw.control_props.take().unwrap_or_default());
    leaf.item_props = Prop::Literal(raw.item_props.take().unwrap_or_default());
    leaf.no_item = raw.no_item.unwrap_or(false);
    Ok(SpecKind::Field(Box::new(leaf)))
}

fn convert_children(raw: &mut RawNode) -> Vec<FieldSpec> {
    raw.children
        .take()
        .unwrap_or_default()
        .iter()
        .map(convert_node)
        .collect()
}

/// Row children carry their own `span` / `col` sizing next to the descriptor.
fn convert_column(raw: &Value) -> Column {
    let size = match (raw.get("col"), raw.get("span")) {
        (Some(Value::Object(col)), _) => ColumnSize::Col(col.clone()),
        (_, Some(span)) => match span.as_u64() {
            Some(span) if span <= u8::MAX as u64 => ColumnSize::Span(span as u8),
            _ => ColumnSize::Auto,
        },
        _ => ColumnSize::Auto,
    };
    Column {
        size,
        child: convert_node(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_type_with_name_defaults_to_text() {
        let spec = convert_node(&json!({"name": "email"}));
        assert_eq!(spec.kind.tag(), "text");
    }

    #[test]
    fn nodes_without_type_or_name_are_malformed() {
        let spec = convert_node(&json!({"label": "Orphan"}));
        assert!(matches!(spec.kind, SpecKind::Malformed { .. }));
    }

    #[test]
    fn unknown_types_become_extensions() {
        let spec = convert_node(&json!({"type": "currency", "name": "salary"}));
        assert!(matches!(
            spec.leaf().map(|l| &l.control),
            Some(ControlKind::Extension(tag)) if tag == "currency"
        ));
    }

    #[test]
    fn watch_and_rerender_on_merge() {
        let spec = convert_node(&json!({
            "type": "text",
            "name": "confirm",
            "watch": ["password"],
            "rerenderOn": ["password", "user.email"]
        }));
        assert_eq!(spec.watch, vec![Path::parse("password"), Path::parse("user.email")]);
        assert!(spec.is_dynamic());
    }

    #[test]
    fn out_of_range_spans_fall_back_to_auto_columns() {
        let column = convert_column(&json!({"type": "text", "name": "a", "span": 300}));
        assert_eq!(column.size, ColumnSize::Auto);
        assert_eq!(column.child.kind.tag(), "text");

        let column = convert_column(&json!({"type": "text", "name": "b", "span": 8}));
        assert_eq!(column.size, ColumnSize::Span(8));
    }

    #[test]
    fn oversized_name_indices_make_the_node_malformed() {
        let spec = convert_node(&json!({
            "type": "text",
            "name": "a.18446744073709551615",
            "initialValue": "x"
        }));
        assert!(matches!(spec.kind, SpecKind::Malformed { .. }));
    }

    #[test]
    fn a_broken_child_does_not_reject_its_siblings() {
        let spec = FormSpec::from_value(json!([
            {"type": "list", "children": [
                {"type": "text", "name": "a"},
                {"type": "text", "name": {"nested": true}},
                {"type": "text", "name": "c"}
            ]}
        ]))
        .unwrap();
        let SpecKind::List(list) = &spec.nodes[0].kind else {
            panic!("expected a list");
        };
        assert_eq!(list.children.len(), 3);
        assert!(matches!(list.children[1].kind, SpecKind::Malformed { .. }));
    }
}
