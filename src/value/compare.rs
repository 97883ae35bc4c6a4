use serde_json::{Number, Value};

/// SameValue comparison for two model values.
///
/// Numbers compare by their float bit patterns after normalizing integers, so
/// `0` and `-0.0` differ while `1` and `1.0` match. Containers compare
/// structurally.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => same_number(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

fn same_number(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a.to_bits() == b.to_bits() || (a == b && a != 0.0),
        _ => false,
    }
}

/// Shallow equality of two optional model values read through the same path.
///
/// A missing value only equals another missing value (`undefined` is not
/// `null`). Objects and arrays are compared one level deep: same member set,
/// and each member pair is SameValue-equal.
pub fn shallow_equal(prev: Option<&Value>, next: Option<&Value>) -> bool {
    match (prev, next) {
        (None, None) => true,
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| same_value(x, y)))
        }
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_value(x, y))
        }
        (Some(a), Some(b)) => same_value(a, b),
        _ => false,
    }
}

/// Renders a scalar the way a label would show it: strings verbatim,
/// integral numbers without a fractional part.
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
