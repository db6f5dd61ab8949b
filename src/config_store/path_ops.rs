use serde_json::{Map, Value};

const SEPARATOR: char = '.';

/// Splits a dotted path into its segments.
///
/// The empty path is a single empty-string segment, so `""` addresses the
/// key `""` of the root mapping rather than the root itself.
pub(super) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR)
}

/// Navigates through a tree following a dot-separated path
///
/// Only mapping keys are followed. A missing key, a `null` or any other
/// non-mapping value on the way resolves to `None`. An explicit `null` leaf
/// is returned as `Some(&Value::Null)`.
///
/// # Arguments
/// * `tree` - The root value to navigate from
/// * `path` - Dot-separated path (e.g., "window.bounds.width")
pub fn resolve<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = tree;

    for part in segments(path) {
        match current {
            Value::Object(table) => current = table.get(part)?,
            _ => return None,
        }
    }

    Some(current)
}

/// Sets a value at the specified path, creating intermediate mappings
///
/// Every intermediate segment whose value is absent, falsy (`null`, `false`,
/// `0`, `""`) or not a mapping is replaced by an empty mapping before the
/// walk continues. A non-mapping root is replaced as well.
///
/// # Arguments
/// * `tree` - The root value to modify
/// * `path` - Dot-separated path to the target location
/// * `new_value` - The value to insert at the path
///
/// # Returns
/// The same tree, for chaining.
pub fn assign<'a>(tree: &'a mut Value, path: &str, new_value: Value) -> &'a mut Value {
    let parts: Vec<&str> = segments(path).collect();
    let (last_key, parents) = match parts.split_last() {
        Some(split) => split,
        None => return tree,
    };

    replace_non_table(tree);
    if let Value::Object(root) = tree {
        insert_at(root, parents, last_key, new_value);
    }

    tree
}

/// Checks whether a change at `changed` concerns a watcher registered on `watched`.
///
/// With `segment_boundary` off this is a plain string prefix test, so a
/// watcher on `"a"` also sees `"ab"`. With it on, the prefix must end on a
/// segment boundary. `deep` watchers see every change below their path,
/// shallow ones only an exact hit.
///
/// # Examples
/// * `"a.b.c"` matches `"a"` when deep
/// * `"a.b"` does not match `"a"` when shallow
/// * `"ab"` matches `"a"` only without segment boundaries
pub fn watch_matches(changed: &str, watched: &str, deep: bool, segment_boundary: bool) -> bool {
    if changed == watched {
        return true;
    }

    if !deep {
        return false;
    }

    match changed.strip_prefix(watched) {
        None => false,
        Some(_) if !segment_boundary || watched.is_empty() => true,
        Some(rest) => rest.starts_with(SEPARATOR),
    }
}

fn insert_at(table: &mut Map<String, Value>, parents: &[&str], key: &str, new_value: Value) {
    let Some((part, rest)) = parents.split_first() else {
        table.insert(key.to_string(), new_value);
        return;
    };

    let slot = table
        .entry((*part).to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    replace_non_table(slot);

    if let Value::Object(child) = slot {
        insert_at(child, rest, key, new_value);
    }
}

fn replace_non_table(slot: &mut Value) {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
}
