use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{Harness, recorded_paths, recorder};
use crate::config_store::WatchOptions;

#[test]
fn shallow_watcher_sees_exact_path_only() {
    let harness = Harness::new(json!({ "window": { "width": 800 } }));
    let (seen, callback) = recorder();
    harness
        .store
        .watch("window", callback, WatchOptions::shallow());

    harness.store.set("window.width", json!(1024)).unwrap();
    assert!(recorded_paths(&seen).is_empty());

    harness.store.set("window", json!({ "width": 1 })).unwrap();
    assert_eq!(recorded_paths(&seen), vec!["window"]);
}

#[test]
fn deep_watcher_sees_descendants() {
    let harness = Harness::new(json!({ "window": { "bounds": { "x": 0 } } }));
    let (seen, callback) = recorder();
    harness.store.watch("window", callback, WatchOptions::deep());

    harness.store.set("window.bounds.x", json!(10)).unwrap();
    harness.store.set("theme", json!("dark")).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "window.bounds.x");
    assert_eq!(seen[0].old_value, Some(json!(0)));
    assert_eq!(seen[0].new_value, Some(json!(10)));
}

#[test]
fn prefix_match_crosses_segments_by_default() {
    let harness = Harness::new(json!({}));
    let (seen, callback) = recorder();
    harness.store.watch("a", callback, WatchOptions::deep());

    harness.store.set("ab", json!(1)).unwrap();

    assert_eq!(recorded_paths(&seen), vec!["ab"]);
}

#[test]
fn segment_boundary_matching_excludes_siblings() {
    let harness = Harness::build(json!({}), Default::default(), |options| {
        options.segment_boundary_matching(true)
    });
    let (seen, callback) = recorder();
    harness.store.watch("a", callback, WatchOptions::deep());

    harness.store.set("ab", json!(1)).unwrap();
    harness.store.set("a.b", json!(2)).unwrap();

    assert_eq!(recorded_paths(&seen), vec!["a.b"]);
}

#[test]
fn watchers_fire_in_registration_order() {
    let harness = Harness::new(json!({}));
    let order = Arc::new(Mutex::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        harness.store.watch(
            "key",
            move |_| order.lock().unwrap().push(label),
            WatchOptions::shallow(),
        );
    }

    harness.store.set("key", json!(1)).unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn immediate_fires_with_current_value() {
    let harness = Harness::new(json!({ "theme": "light" }));
    let (seen, callback) = recorder();

    harness
        .store
        .watch("theme", callback, WatchOptions::shallow().immediate());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].old_value, Some(json!("light")));
    assert_eq!(seen[0].new_value, Some(json!("light")));
}

#[test]
fn immediate_on_missing_path_reports_none() {
    let harness = Harness::new(json!({}));
    let (seen, callback) = recorder();

    harness
        .store
        .watch("missing", callback, WatchOptions::deep().immediate());

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].old_value, None);
    assert_eq!(seen[0].new_value, None);
}

#[test]
fn unsubscribe_removes_only_that_watcher() {
    let harness = Harness::new(json!({}));
    let (kept, kept_callback) = recorder();
    let (removed, removed_callback) = recorder();

    harness
        .store
        .watch("key", kept_callback, WatchOptions::shallow());
    let handle = harness
        .store
        .watch("key", removed_callback, WatchOptions::shallow());
    assert_eq!(harness.store.watcher_count(), 2);

    assert!(handle.unsubscribe());
    harness.store.set("key", json!(1)).unwrap();

    assert_eq!(harness.store.watcher_count(), 1);
    assert_eq!(recorded_paths(&kept), vec!["key"]);
    assert!(recorded_paths(&removed).is_empty());
}

#[test]
fn unsubscribe_after_destroy_reports_false() {
    let harness = Harness::new(json!({}));
    let handle = harness.store.watch("key", |_| {}, WatchOptions::shallow());

    harness.store.destroy();

    assert!(!handle.unsubscribe());
}

#[test]
fn update_notifies_with_empty_path() {
    let harness = Harness::new(json!({ "window": { "width": 800 } }));
    let (root, root_callback) = recorder();
    let (window, window_callback) = recorder();

    harness.store.watch("", root_callback, WatchOptions::deep());
    harness
        .store
        .watch("window", window_callback, WatchOptions::deep());

    harness
        .store
        .update(|mut tree| {
            tree["window"]["width"] = json!(1024);
            tree
        })
        .unwrap();

    assert_eq!(recorded_paths(&root), vec![""]);
    assert!(recorded_paths(&window).is_empty());

    let root = root.lock().unwrap();
    assert_eq!(root[0].old_value, Some(json!({ "window": { "width": 800 } })));
    assert_eq!(root[0].new_value, Some(json!({ "window": { "width": 1024 } })));
}

#[test]
fn callback_can_read_and_write_store() {
    let harness = Harness::new(json!({ "source": 0, "mirror": 0 }));
    let store = harness.store.clone();

    harness.store.watch(
        "source",
        move |change| {
            let value = change.new_value.clone().unwrap_or_default();
            assert_eq!(store.get("source"), Some(value.clone()));
            store.set("mirror", value).unwrap();
        },
        WatchOptions::shallow(),
    );

    harness.store.set("source", json!(7)).unwrap();

    assert_eq!(harness.store.get("mirror"), Some(json!(7)));
}

#[test]
fn unchanged_set_does_not_notify() {
    let harness = Harness::new(json!({ "theme": "dark" }));
    let (seen, callback) = recorder();
    harness.store.watch("theme", callback, WatchOptions::deep());

    harness.store.set("theme", json!("dark")).unwrap();

    assert!(recorded_paths(&seen).is_empty());
}
