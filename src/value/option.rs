use super::compare::display_scalar;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The canonical choice entry used by every choice-based control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: String,
    pub value: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OptionItem {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }

    /// Whether the option was flagged as disabled by its source object.
    pub fn is_disabled(&self) -> bool {
        self.extra.get("disabled").and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Looks up `key` in `object`, treating JSON `null` like a missing entry.
fn present<'a>(object: &'a Map<String, Value>, key: Option<&str>) -> Option<&'a Value> {
    key.and_then(|k| object.get(k)).filter(|v| !v.is_null())
}

fn normalize_object(
    object: &Map<String, Value>,
    label_key: Option<&str>,
    value_key: Option<&str>,
) -> Option<OptionItem> {
    let raw_label = present(object, Some("label"))
        .or_else(|| present(object, label_key))
        .or_else(|| present(object, Some("name")))
        .or_else(|| present(object, Some("title")));

    let raw_value = present(object, Some("value"))
        .or_else(|| present(object, value_key))
        .or_else(|| present(object, Some("id")))
        .or_else(|| present(object, Some("key")))
        .or(raw_label);

    let value = raw_value?.clone();
    let label = display_scalar(raw_label.unwrap_or(&value));

    let extra = object
        .iter()
        .filter(|(k, _)| k.as_str() != "label" && k.as_str() != "value")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Some(OptionItem { label, value, extra })
}

/// Converts heterogeneous option inputs into canonical [`OptionItem`]s.
///
/// Strings and numbers become `{label, value}` pairs of themselves. Objects
/// take their label from `label`, `labelKey`, `name`, `title` or the value,
/// and their value from `value`, `valueKey`, `id`, `key` or the label; every
/// other property is kept. An object with neither a label nor a value
/// source yields no item at all, not a placeholder entry such as
/// `"undefined"`. Booleans, nulls and arrays are dropped as well.
pub fn normalize_options(
    options: &[Value],
    label_key: Option<&str>,
    value_key: Option<&str>,
) -> Vec<OptionItem> {
    options
        .iter()
        .filter_map(|option| match option {
            Value::String(_) | Value::Number(_) => {
                Some(OptionItem::new(display_scalar(option), option.clone()))
            }
            Value::Object(object) => {
                let item = normalize_object(object, label_key, value_key);
                if item.is_none() {
                    log::debug!("dropping option without label or value: {}", option);
                }
                item
            }
            other => {
                log::debug!("dropping unsupported option entry: {}", other);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_label_themselves() {
        let items = normalize_options(&[json!("A"), json!(2)], None, None);
        assert_eq!(items, vec![OptionItem::new("A", "A"), OptionItem::new("2", 2)]);
    }

    #[test]
    fn objects_fall_back_through_keys() {
        let items = normalize_options(
            &[
                json!({"name": "Finance", "id": 7, "head": "Rina"}),
                json!({"title": "Ops", "key": "ops"}),
                json!({"deptName": "HR", "deptId": 3}),
                json!({"label": "Only label"}),
            ],
            Some("deptName"),
            Some("deptId"),
        );
        assert_eq!(items[0].label, "Finance");
        assert_eq!(items[0].value, json!(7));
        assert_eq!(items[0].extra.get("head"), Some(&json!("Rina")));
        assert_eq!(items[1].label, "Ops");
        assert_eq!(items[1].value, json!("ops"));
        assert_eq!(items[2].label, "HR");
        assert_eq!(items[2].value, json!(3));
        assert_eq!(items[3].value, json!("Only label"));
    }

    #[test]
    fn label_falls_back_to_value() {
        let items = normalize_options(&[json!({"value": 4.0})], None, None);
        assert_eq!(items[0].label, "4");
    }

    #[test]
    fn normalizing_normalized_options_changes_nothing() {
        let raw = [
            json!("Draft"),
            json!(3),
            json!({"value": 2.5}),
            json!({"name": "Finance", "id": 7, "head": "Rina", "disabled": true}),
            json!({"deptName": "HR", "deptId": 3, "color": "green"}),
        ];
        let once = normalize_options(&raw, Some("deptName"), Some("deptId"));
        let serialized: Vec<Value> = once.iter().map(|item| serde_json::to_value(item).unwrap()).collect();
        let twice = normalize_options(&serialized, Some("deptName"), Some("deptId"));

        assert_eq!(once.len(), raw.len());
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_entries_are_dropped() {
        let items = normalize_options(&[json!(true), Value::Null, json!([1]), json!({}), json!("ok")], None, None);
        assert_eq!(items, vec![OptionItem::new("ok", "ok")]);
    }
}
