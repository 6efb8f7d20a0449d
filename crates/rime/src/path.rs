//! Deep reads and structurally shared writes across nested containers.
//!
//! A write along a path rebuilds exactly the containers on that path, from
//! the target up to the root. Every sibling branch of the new tree is the
//! same instance as in the old tree, so a write costs O(depth) new nodes
//! plus the copy of each rebuilt node's own slots.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::metrics::inc_metric;
use crate::record::Record;
use crate::sequence::Sequence;
use crate::value::Value;
use crate::wrap::Wrap;

/// Value at `path`, or `None` when any step is missing or hits a scalar.
///
/// The empty path yields the root itself.
pub fn get_in(root: &Container, path: &[Key]) -> Option<Value> {
    let Some((first, rest)) = path.split_first() else {
        return Some(Value::from(root.clone()));
    };
    let mut current = root.get(first)?;
    for key in rest {
        current = match current {
            Value::Record(record) => record.get_key(key)?,
            Value::Sequence(sequence) => sequence.get_key(key)?,
            _ => return None,
        };
    }
    Some(current.clone())
}

/// New root with `value` stored at `path`.
///
/// Missing intermediate containers are created: a record when the next key is
/// a name, a sequence when it is a position. With an empty path `value`
/// becomes the new root and must itself be a container.
pub fn set_in(root: &Container, path: &[Key], value: impl Wrap) -> Result<Container> {
    let value = value.wrap();
    update_in(root, path, |_| Ok(value))
}

/// New root where the value at `path` is combined with `patch`.
///
/// Two records combine by field union (patch wins), two sequences by
/// positional overwrite. With `deep`, fields or positions that hold records
/// on both sides are merged recursively instead of replaced. Any other
/// pairing, including a missing target, stores `patch` as is.
pub fn merge_in(root: &Container, path: &[Key], patch: impl Wrap, deep: bool) -> Result<Container> {
    let patch = patch.wrap();
    update_in(root, path, |existing| Ok(merge_values(existing, patch, deep)))
}

/// Applies several patches at `path`, left to right, in one rebuild.
///
/// An empty patch list returns `root` unchanged.
pub fn merge_all_in<T: Wrap>(
    root: &Container,
    path: &[Key],
    patches: impl IntoIterator<Item = T>,
    deep: bool,
) -> Result<Container> {
    let patches: Vec<Value> = patches.into_iter().map(Wrap::wrap).collect();
    if patches.is_empty() {
        return Ok(root.clone());
    }
    update_in(root, path, |existing| {
        let mut combined = existing.cloned();
        for patch in patches {
            combined = Some(merge_values(combined.as_ref(), patch, deep));
        }
        Ok(combined.unwrap_or(Value::Null))
    })
}

/// Writes `value` at `path`: a plain overwrite unless `deep`, in which case it
/// is merged recursively into what is already there.
///
/// With `deep`, a sequence `value` aimed at a record is read as a list of
/// patches to merge in order.
pub fn assign_on_deep_match(
    root: &Container,
    path: &[Key],
    value: impl Wrap,
    deep: bool,
) -> Result<Container> {
    let value = value.wrap();
    if !deep {
        return set_in(root, path, value);
    }
    match (&value, get_in(root, path)) {
        (Value::Sequence(patches), Some(Value::Record(_))) => {
            merge_all_in(root, path, patches.iter().cloned(), true)
        }
        _ => merge_in(root, path, value, true),
    }
}

/// Terminal combination rule shared by the merge entry points.
pub(crate) fn merge_values(existing: Option<&Value>, patch: Value, deep: bool) -> Value {
    match (existing, patch) {
        (Some(Value::Record(base)), Value::Record(patch)) => Value::Record(base.merged(&patch, deep)),
        (Some(Value::Sequence(base)), Value::Sequence(patch)) => {
            Value::Sequence(base.merged(&patch, deep))
        }
        (_, patch) => patch,
    }
}

/// Rule for slots below the merge target during a deep merge: only records
/// recurse, everything else is replaced.
pub(crate) fn merge_nested(existing: Option<&Value>, incoming: &Value) -> Value {
    match (existing, incoming) {
        (Some(Value::Record(base)), Value::Record(patch)) => Value::Record(base.merged(patch, true)),
        _ => incoming.clone(),
    }
}

fn update_in<F>(root: &Container, path: &[Key], update: F) -> Result<Container>
where
    F: FnOnce(Option<&Value>) -> Result<Value>,
{
    let Some((key, rest)) = path.split_first() else {
        let replacement = update(Some(&Value::from(root.clone())))?;
        return Container::try_from(replacement);
    };
    let rebuilt = rebuild(root, key, rest, update)?;
    log::trace!("rebuilt {} container(s) for a write at {:?}", path.len(), path);
    Ok(rebuilt)
}

fn rebuild<F>(node: &Container, key: &Key, rest: &[Key], update: F) -> Result<Container>
where
    F: FnOnce(Option<&Value>) -> Result<Value>,
{
    node.check_key(key)?;
    let existing = node.get(key);
    let replacement = match rest.split_first() {
        None => update(existing)?,
        Some((next, tail)) => {
            let child = match existing {
                Some(Value::Record(record)) => Container::Record(record.clone()),
                Some(Value::Sequence(sequence)) => Container::Sequence(sequence.clone()),
                None => synthesize(key, next),
                Some(_) => {
                    log::debug!("refusing to descend through scalar at `{}`", key);
                    return Err(Error::ScalarInPath { key: key.clone() });
                }
            };
            Value::from(rebuild(&child, next, tail, update)?)
        }
    };
    inc_metric!(PATH_NODES_REBUILT);
    node.with_child(key, replacement)
}

fn synthesize(at: &Key, next: &Key) -> Container {
    inc_metric!(INTERMEDIATES_SYNTHESIZED);
    log::trace!("creating missing container at `{}`", at);
    match next {
        Key::Index(_) => Container::Sequence(Sequence::new()),
        Key::Name(_) => Container::Record(Record::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{path, wrap};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn container(json: serde_json::Value) -> Container {
        Container::wrap(json).expect("fixture is a container")
    }

    fn nested() -> Container {
        container(json!({"some": {"deeply": {"nested": "object"}}}))
    }

    #[test]
    fn get_in_walks_records_and_sequences() {
        let root = container(json!([{"foo": "bar"}]));
        assert_eq!(get_in(&root, &path![0usize, "foo"]), Some(Value::from("bar")));
        assert_eq!(get_in(&root, &path!["0", "foo"]), Some(Value::from("bar")));
        assert_eq!(get_in(&nested(), &path!["some", "deeply", "nested"]), Some(Value::from("object")));
    }

    #[test]
    fn get_in_reports_absence_without_failing() {
        let root = nested();
        assert_eq!(get_in(&root, &path!["some", "missing"]), None);
        assert_eq!(get_in(&root, &path!["some", "deeply", "nested", "further"]), None);
        assert!(get_in(&root, &path![]).unwrap().ptr_eq(&Value::from(root.clone())));
    }

    #[test]
    fn set_in_replaces_the_target() {
        let updated = set_in(&nested(), &path!["some", "deeply", "nested"], "thing").unwrap();
        assert_eq!(updated.thaw(), json!({"some": {"deeply": {"nested": "thing"}}}));
    }

    #[test]
    fn set_in_shares_siblings_and_rebuilds_ancestors() {
        let root = container(json!({
            "left": {"a": [1, 2, 3]},
            "right": {"b": {"c": 1}, "d": {"e": 2}}
        }));
        let updated = set_in(&root, &path!["right", "b", "c"], 5.0).unwrap();

        fn at(c: &Container, p: &[Key]) -> Value {
            get_in(c, p).unwrap()
        }
        assert!(at(&root, &path!["left"]).ptr_eq(&at(&updated, &path!["left"])));
        assert!(at(&root, &path!["right", "d"]).ptr_eq(&at(&updated, &path!["right", "d"])));
        assert!(!at(&root, &path!["right"]).ptr_eq(&at(&updated, &path!["right"])));
        assert!(!at(&root, &path!["right", "b"]).ptr_eq(&at(&updated, &path!["right", "b"])));

        assert_eq!(get_in(&root, &path!["right", "b", "c"]), Some(Value::from(1.0)));
        assert_eq!(get_in(&updated, &path!["right", "b", "c"]), Some(Value::from(5.0)));
    }

    #[test]
    fn set_in_synthesizes_missing_intermediates() {
        let root = container(json!({}));
        let updated = set_in(&root, &path!["a", "b", 1usize, "c"], true).unwrap();
        assert_eq!(updated.thaw(), json!({"a": {"b": [null, {"c": true}]}}));
    }

    #[test]
    fn set_in_refuses_to_descend_through_scalars() {
        let root = container(json!({"a": 1}));
        assert_eq!(
            set_in(&root, &path!["a", "b"], true),
            Err(Error::ScalarInPath { key: Key::from("a") })
        );
        let nulls = container(json!({"a": null}));
        assert!(set_in(&nulls, &path!["a", "b"], true).is_err());
    }

    #[test]
    fn set_in_rejects_names_on_sequences() {
        let root = container(json!({"list": [1, 2]}));
        assert_eq!(
            set_in(&root, &path!["list", "first"], 0.0),
            Err(Error::InvalidIndex { key: Key::from("first") })
        );
    }

    #[test]
    fn empty_path_targets_the_root() {
        let root = nested();
        let replacement = set_in(&root, &path![], json!(["x"])).unwrap();
        assert_eq!(replacement.thaw(), json!(["x"]));
        assert_eq!(set_in(&root, &path![], "scalar"), Err(Error::ScalarRoot));

        let merged = merge_in(&root, &path![], json!({"other": 1}), false).unwrap();
        assert_eq!(merged.thaw(), json!({"some": {"deeply": {"nested": "object"}}, "other": 1}));
    }

    #[test]
    fn merge_in_unions_records_at_the_target() {
        let merged = merge_in(&nested(), &path!["some", "deeply"], json!({"sanctimonious": "candidate"}), false)
            .unwrap();
        assert_eq!(
            merged.thaw(),
            json!({"some": {"deeply": {"nested": "object", "sanctimonious": "candidate"}}})
        );
    }

    #[test]
    fn merge_in_through_a_sequence() {
        let root = container(json!([{"some": {"deeply": {"nested": "array"}}}]));
        let merged = merge_in(&root, &path![0usize, "some", "deeply"], json!({"disturbed": "man"}), false).unwrap();
        assert_eq!(
            merged.thaw(),
            json!([{"some": {"deeply": {"nested": "array", "disturbed": "man"}}}])
        );
    }

    #[test]
    fn shallow_merge_replaces_nested_records_and_deep_merge_recurses() {
        let root = container(json!({"cfg": {"db": {"host": "a", "port": 1}}}));
        let patch = json!({"db": {"port": 2}});

        let shallow = merge_in(&root, &path!["cfg"], patch.clone(), false).unwrap();
        assert_eq!(shallow.thaw(), json!({"cfg": {"db": {"port": 2}}}));

        let deep = merge_in(&root, &path!["cfg"], patch, true).unwrap();
        assert_eq!(deep.thaw(), json!({"cfg": {"db": {"host": "a", "port": 2}}}));
    }

    #[test]
    fn merge_in_with_mismatched_kinds_replaces() {
        let root = container(json!({"a": [1, 2]}));
        let merged = merge_in(&root, &path!["a"], json!({"x": 1}), false).unwrap();
        assert_eq!(merged.thaw(), json!({"a": {"x": 1}}));

        let missing = merge_in(&root, &path!["b"], json!({"x": 1}), true).unwrap();
        assert_eq!(missing.thaw(), json!({"a": [1, 2], "b": {"x": 1}}));
    }

    #[test]
    fn merge_all_in_applies_patches_in_order() {
        let root = container(json!({"a": {"x": 1}}));
        let merged = merge_all_in(&root, &path!["a"], [json!({"y": 2}), json!({"x": 3})], false).unwrap();
        assert_eq!(merged.thaw(), json!({"a": {"x": 3, "y": 2}}));

        let untouched = merge_all_in(&root, &path!["a"], Vec::<Value>::new(), false).unwrap();
        assert!(untouched.ptr_eq(&root));
    }

    #[test]
    fn assign_on_deep_match_overwrites_when_shallow() {
        let assigned = assign_on_deep_match(&nested(), &path!["some", "deeply"], "nested object", false).unwrap();
        assert_eq!(assigned.thaw(), json!({"some": {"deeply": "nested object"}}));
    }

    #[test]
    fn assign_on_deep_match_merges_patch_lists_when_deep() {
        let patch = json!([{"other": {"deeply": {"nested": "object"}}}]);
        let assigned = assign_on_deep_match(&nested(), &path!["some", "deeply"], patch, true).unwrap();
        assert_eq!(
            assigned.thaw(),
            json!({"some": {"deeply": {
                "nested": "object",
                "other": {"deeply": {"nested": "object"}}
            }}})
        );
    }

    #[test]
    fn assign_on_deep_match_merges_single_records_when_deep() {
        let root = container(json!({"a": {"b": {"c": 1}}}));
        let assigned = assign_on_deep_match(&root, &path!["a"], json!({"b": {"d": 2}}), true).unwrap();
        assert_eq!(assigned.thaw(), json!({"a": {"b": {"c": 1, "d": 2}}}));
    }

    #[test]
    fn writes_never_touch_the_source_tree() {
        let root = nested();
        let before = root.thaw();
        let hash = root.hash_code();
        let _ = set_in(&root, &path!["some", "x"], 1.0).unwrap();
        let _ = merge_in(&root, &path!["some"], json!({"y": 2}), true).unwrap();
        assert_eq!(root.thaw(), before);
        assert_eq!(root.hash_code(), hash);
        assert_eq!(wrap(before), Value::from(root));
    }
}
