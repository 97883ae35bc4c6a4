use crate::config::EngineConfig;
use crate::spec::ColumnSize;
use serde_json::{Map, Value};

/// Expands a column's sizing into a breakpoint map.
///
/// `Span(n)` becomes full width on the narrow breakpoint and `n` on the wide
/// one. An explicit map is used as given. Unsized columns take the full width.
pub(crate) fn column_layout(size: &ColumnSize, config: &EngineConfig) -> Map<String, Value> {
    let mut layout = Map::new();
    match size {
        ColumnSize::Span(span) => {
            layout.insert(config.narrow_breakpoint.clone(), Value::from(config.grid_columns));
            layout.insert(config.wide_breakpoint.clone(), Value::from(*span));
        }
        ColumnSize::Col(col) => layout = col.clone(),
        ColumnSize::Auto => {
            layout.insert(config.narrow_breakpoint.clone(), Value::from(config.grid_columns));
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn span_shorthand_expands_to_breakpoints() {
        let layout = column_layout(&ColumnSize::Span(12), &EngineConfig::default());
        assert_eq!(Value::Object(layout), json!({"xs": 24, "md": 12}));
    }

    #[test]
    fn explicit_col_is_used_verbatim() {
        let col = json!({"xs": 12, "lg": 6});
        let Value::Object(map) = col.clone() else { unreachable!() };
        let layout = column_layout(&ColumnSize::Col(map), &EngineConfig::default());
        assert_eq!(Value::Object(layout), col);
    }

    #[test]
    fn unsized_columns_are_full_width() {
        let layout = column_layout(&ColumnSize::Auto, &EngineConfig::default());
        assert_eq!(Value::Object(layout), json!({"xs": 24}));
    }
}
