use crate::error::SpecError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// One step of a field path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Largest array index a path may address. Writes beyond it are refused
/// instead of growing the array.
pub const MAX_INDEX: usize = 65_535;

impl Segment {
    /// Parses a single dotted-string segment. All-digit segments within
    /// [`MAX_INDEX`] become indices.
    fn parse(raw: &str) -> Self {
        if is_digits(raw) {
            if let Some(index) = raw.parse().ok().filter(|i| *i <= MAX_INDEX) {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }

    /// The array position this segment addresses: an index, or an all-digit key.
    fn position(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(k) if is_digits(k) => k.parse().ok(),
            Segment::Key(_) => None,
        }
    }

    fn is_oversized(&self) -> bool {
        match self {
            Segment::Index(i) => *i > MAX_INDEX,
            Segment::Key(k) => is_digits(k) && self.position().is_none_or(|i| i > MAX_INDEX),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Segment::Key(k) => Value::String(k.clone()),
            Segment::Index(i) => Value::from(*i),
        }
    }
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{}", k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A normalized path into the form model.
///
/// Paths are built from a dotted string (`"address.lines.0"`), a single
/// number, or an explicit list of segments. Normalizing an already
/// normalized path is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Splits a dotted string into segments. Empty pieces are dropped.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split('.')
                .filter(|piece| !piece.is_empty())
                .map(Segment::parse)
                .collect(),
        )
    }

    /// Normalizes any JSON name representation (string, number or array) into a path.
    ///
    /// Index segments beyond [`MAX_INDEX`] are rejected.
    pub fn from_value(raw: &Value) -> Result<Self, SpecError> {
        let path = match raw {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => {
                let index = n.as_u64().ok_or_else(|| {
                    SpecError::InvalidPath(n.to_string(), "numeric names must be non-negative integers".to_string())
                })?;
                Self(vec![Self::index_segment(index)])
            }
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(Segment::Key(s.clone())),
                    Value::Number(n) => n.as_u64().map(Self::index_segment).ok_or_else(|| {
                        SpecError::InvalidPath(raw.to_string(), format!("invalid index segment {}", n))
                    }),
                    other => Err(SpecError::InvalidPath(
                        raw.to_string(),
                        format!("unsupported segment {}", other),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self)?,
            other => {
                return Err(SpecError::InvalidPath(
                    other.to_string(),
                    "expected a string, number or array".to_string(),
                ));
            }
        };

        match path.0.iter().find(|segment| segment.is_oversized()) {
            Some(segment) => Err(SpecError::InvalidPath(
                raw.to_string(),
                format!("index {} exceeds the maximum of {}", segment, MAX_INDEX),
            )),
            None => Ok(path),
        }
    }

    fn index_segment(index: u64) -> Segment {
        Segment::Index(usize::try_from(index).unwrap_or(usize::MAX))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a new path with `segment` appended.
    pub fn join(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Reads the value at this path. `None` means "undefined", distinct from JSON `null`.
    pub fn get<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.0.iter().try_fold(root, |current, segment| match (segment, current) {
            (Segment::Key(k), Value::Object(map)) => map.get(k),
            (Segment::Index(i), Value::Array(items)) => items.get(*i),
            (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
            (Segment::Key(k), Value::Array(items)) => k.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Writes `value` at this path, creating intermediate objects or arrays as needed.
    /// Non-container values met along the way are replaced. All-digit keys
    /// address array elements, matching [`Path::get`].
    ///
    /// Returns `false`, leaving `root` untouched, when the path addresses an
    /// index beyond [`MAX_INDEX`].
    pub fn set(&self, root: &mut Value, value: Value) -> bool {
        if let Some(segment) = self.0.iter().find(|segment| segment.is_oversized()) {
            log::warn!("refusing to write '{}': index {} exceeds {}", self, segment, MAX_INDEX);
            return false;
        }
        let Some((last, parents)) = self.0.split_last() else {
            *root = value;
            return true;
        };

        let mut current = root;
        for (depth, segment) in parents.iter().enumerate() {
            let next_is_index = matches!(self.0[depth + 1], Segment::Index(_));
            let empty = || if next_is_index { Value::Array(Vec::new()) } else { Value::Object(Map::new()) };
            let child = Self::slot(current, segment, empty);
            if child.is_null() {
                *child = empty();
            }
            current = child;
        }
        *Self::slot(current, last, || Value::Null) = value;
        true
    }

    /// The child slot `segment` addresses inside `current`, created with `empty` when absent.
    fn slot<'v>(current: &'v mut Value, segment: &Segment, empty: impl FnOnce() -> Value) -> &'v mut Value {
        match (segment.position(), current) {
            (Some(i), Value::Array(items)) => {
                if items.len() <= i {
                    items.resize(i + 1, Value::Null);
                }
                &mut items[i]
            }
            (_, Value::Object(map)) => map.entry(segment.to_string()).or_insert_with(empty),
            (Some(i), other) if matches!(segment, Segment::Index(_)) => {
                let items = Self::ensure_array(other);
                items.resize(i + 1, Value::Null);
                &mut items[i]
            }
            (_, other) => Self::ensure_object(other)
                .entry(segment.to_string())
                .or_insert_with(empty),
        }
    }

    fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
        if !value.is_object() {
            *value = Value::Object(Map::new());
        }
        match value {
            Value::Object(map) => map,
            _ => unreachable!("value was just replaced with an object"),
        }
    }

    fn ensure_array(value: &mut Value) -> &mut Vec<Value> {
        if !value.is_array() {
            *value = Value::Array(Vec::new());
        }
        match value {
            Value::Array(items) => items,
            _ => unreachable!("value was just replaced with an array"),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
            first = false;
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(raw: &str) -> Self {
        Path::parse(raw)
    }
}

impl From<String> for Path {
    fn from(raw: String) -> Self {
        Path::parse(&raw)
    }
}

impl From<usize> for Path {
    fn from(index: usize) -> Self {
        Path(vec![Segment::Index(index)])
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path(segments)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::Array(self.0.iter().map(Segment::to_value).collect()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Path::from_value(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_names_split_into_keys_and_indices() {
        let path = Path::parse("contacts.0.email");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("contacts".to_string()),
                Segment::Index(0),
                Segment::Key("email".to_string())
            ]
        );
        assert_eq!(path.to_string(), "contacts.0.email");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = Path::from_value(&json!("a.b.2")).unwrap();
        let serialized = serde_json::to_value(&once).unwrap();
        let twice = Path::from_value(&serialized).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn set_creates_intermediate_containers() {
        let mut model = json!({});
        Path::parse("contacts.1.email").set(&mut model, json!("x@y.z"));
        assert_eq!(model, json!({"contacts": [null, {"email": "x@y.z"}]}));
        assert_eq!(Path::parse("contacts.1.email").get(&model), Some(&json!("x@y.z")));
        assert_eq!(Path::parse("contacts.0.email").get(&model), None);
    }

    #[test]
    fn digit_keys_write_into_existing_arrays() {
        let mut model = json!({"items": [{"qty": 1}, {"qty": 2}]});
        let path = Path::from_value(&json!(["items", "1", "qty"])).unwrap();
        assert_eq!(path.get(&model), Some(&json!(2)));

        assert!(path.set(&mut model, json!(9)));
        assert_eq!(model, json!({"items": [{"qty": 1}, {"qty": 9}]}));
    }

    #[test]
    fn oversized_indices_are_rejected() {
        assert!(Path::from_value(&json!("a.18446744073709551615")).is_err());
        assert!(Path::from_value(&json!("a.100000000000")).is_err());
        assert!(Path::from_value(&json!(["a", 100_000])).is_err());
        assert!(Path::from_value(&json!(["a", "100000"])).is_err());
        assert!(Path::from_value(&json!("a.65535")).is_ok());

        let mut model = json!({"a": [1]});
        let huge = Path::from_segments(vec![Segment::Key("a".to_string()), Segment::Index(usize::MAX)]);
        assert!(!huge.set(&mut model, json!(2)));
        assert!(!Path::parse("a.100000000000").set(&mut model, json!(2)));
        assert_eq!(model, json!({"a": [1]}));
    }

    #[test]
    fn missing_differs_from_null() {
        let model = json!({"a": null});
        assert_eq!(Path::parse("a").get(&model), Some(&Value::Null));
        assert_eq!(Path::parse("b").get(&model), None);
    }
}
