use crate::context::ContextSnapshot;
use crate::spec::{FieldSpec, ShouldUpdate};
use crate::value::{Path, shallow_equal};
use serde_json::Value;

/// Decides whether a dynamic node must be resolved again after a model change.
///
/// A `shouldUpdate` callback is authoritative when present. Otherwise the
/// node recomputes when any watched path differs between `prev` and `next`.
/// A node that watches nothing always recomputes.
pub fn should_recompute(spec: &FieldSpec, prev: &Value, next: &Value, ctx: &ContextSnapshot) -> bool {
    dependencies_changed(&spec.watch, spec.should_update.as_ref(), prev, next, ctx)
}

/// The gate over a node's declared dependencies, without the rest of its spec.
pub(crate) fn dependencies_changed(
    watch: &[Path],
    should_update: Option<&ShouldUpdate>,
    prev: &Value,
    next: &Value,
    ctx: &ContextSnapshot,
) -> bool {
    if let Some(should_update) = should_update {
        let decision = should_update(prev, next, ctx);
        log::debug!("shouldUpdate decided {}", decision);
        return decision;
    }

    if watch.is_empty() {
        // Fail-open: nothing declared, so nothing can be proven unchanged.
        return true;
    }

    match watch.iter().find(|path| !shallow_equal(path.get(prev), path.get(next))) {
        Some(path) => {
            log::debug!("watched path '{}' changed", path);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(values: &Value) -> ContextSnapshot {
        ContextSnapshot::new(values.clone())
    }

    #[test]
    fn unchanged_watched_path_is_not_recomputed() {
        let spec = FieldSpec::text("confirm").watch(["password"]);
        let prev = json!({"password": "a"});
        let next = json!({"password": "a", "other": 1});
        assert!(!should_recompute(&spec, &prev, &next, &ctx(&next)));
    }

    #[test]
    fn changed_watched_path_is_recomputed() {
        let spec = FieldSpec::text("confirm").watch(["password"]);
        let prev = json!({"password": "a"});
        let next = json!({"password": "b"});
        assert!(should_recompute(&spec, &prev, &next, &ctx(&next)));
    }

    #[test]
    fn missing_and_null_are_different() {
        let spec = FieldSpec::text("x").watch(["a.b"]);
        let prev = json!({"a": {}});
        let next = json!({"a": {"b": null}});
        assert!(should_recompute(&spec, &prev, &next, &ctx(&next)));
    }

    #[test]
    fn should_update_overrides_watched_paths() {
        let spec = FieldSpec::text("x")
            .watch(["password"])
            .should_update(|_, _, _| false);
        let prev = json!({"password": "a"});
        let next = json!({"password": "b"});
        assert!(!should_recompute(&spec, &prev, &next, &ctx(&next)));
    }

    #[test]
    fn nested_members_compare_one_level_deep() {
        let spec = FieldSpec::text("x").watch(["address"]);
        let prev = json!({"address": {"city": "Bandung", "tags": [1, 2]}});
        let same = json!({"address": {"city": "Bandung", "tags": [1, 2]}});
        let moved = json!({"address": {"city": "Jakarta", "tags": [1, 2]}});
        assert!(!should_recompute(&spec, &prev, &same, &ctx(&same)));
        assert!(should_recompute(&spec, &prev, &moved, &ctx(&moved)));
    }
}
