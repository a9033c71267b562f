//! Integration tests for override behavior across scans

use deadfiles::engine::CancelFlag;
use deadfiles::overrides::OverrideStore;
use deadfiles::scan::ScanOrchestrator;
use deadfiles::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn ts_only_config() -> Config {
    let mut config = Config {
        file_types: vec!["ts".into()],
        ignore_folders: vec![],
        ignore_root_files: vec![],
    };
    config.normalize();
    config
}

fn write(root: &Path, rel: &str, contents: &str) {
    std::fs::write(root.join(rel), contents).unwrap();
}

fn base_names(paths: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_mark_used_sticks_until_reset() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "orphan.ts", "");
    write(temp.path(), "other.ts", "");

    let root = temp.path().canonicalize().unwrap();
    let orphan = root.join("orphan.ts");

    let store = Arc::new(OverrideStore::new());
    let orchestrator =
        ScanOrchestrator::new(Arc::clone(&store)).with_config(ts_only_config());

    store.set(orphan.clone(), true);

    // Excluded on every scan while the override holds
    for _ in 0..3 {
        let outcome = orchestrator
            .scan(temp.path(), |_| {}, &CancelFlag::new())
            .unwrap();
        assert_eq!(base_names(&outcome.unused_files), vec!["other.ts"]);
    }

    // After reset, classification depends only on the heuristic again
    orchestrator.reset(&orphan);
    let outcome = orchestrator
        .scan(temp.path(), |_| {}, &CancelFlag::new())
        .unwrap();
    assert_eq!(
        base_names(&outcome.unused_files),
        vec!["orphan.ts", "other.ts"]
    );
}

#[test]
fn test_pinned_unused_overrides_heuristic() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "wanted.ts", "");
    write(temp.path(), "user.ts", r#"import "./wanted""#);

    let root = temp.path().canonicalize().unwrap();
    let wanted = root.join("wanted.ts");

    let store = Arc::new(OverrideStore::new());
    store.set(wanted.clone(), false);

    let orchestrator = ScanOrchestrator::new(store).with_config(ts_only_config());
    let outcome = orchestrator
        .scan(temp.path(), |_| {}, &CancelFlag::new())
        .unwrap();

    // wanted.ts is referenced by user.ts, but the pin wins
    assert!(outcome
        .unused_files
        .iter()
        .any(|p| p.ends_with("wanted.ts")));
}

#[test]
fn test_toggle_is_reflected_on_the_next_scan() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "orphan.ts", "");
    write(temp.path(), "other.ts", "");

    let root = temp.path().canonicalize().unwrap();
    let orphan = root.join("orphan.ts");

    let orchestrator =
        ScanOrchestrator::new(Arc::new(OverrideStore::new())).with_config(ts_only_config());

    let outcome = orchestrator
        .scan(temp.path(), |_| {}, &CancelFlag::new())
        .unwrap();
    assert_eq!(outcome.unused_files.len(), 2);

    // First toggle pins as used
    assert!(orchestrator.toggle(orphan.clone()));
    assert_eq!(orchestrator.override_status(&orphan), Some(true));

    let outcome = orchestrator
        .scan(temp.path(), |_| {}, &CancelFlag::new())
        .unwrap();
    assert_eq!(base_names(&outcome.unused_files), vec!["other.ts"]);

    // Second toggle pins as unused again
    assert!(!orchestrator.toggle(orphan.clone()));
    let outcome = orchestrator
        .scan(temp.path(), |_| {}, &CancelFlag::new())
        .unwrap();
    assert_eq!(
        base_names(&outcome.unused_files),
        vec!["orphan.ts", "other.ts"]
    );
}

#[test]
fn test_reset_all_gives_a_fresh_session() {
    let store = Arc::new(OverrideStore::new());
    store.set("/p/a.ts", true);
    store.set("/p/b.ts", false);

    // What process start does before the first scan
    store.reset_all();

    assert!(store.is_empty());
    assert_eq!(store.status(Path::new("/p/a.ts")), None);
    assert_eq!(store.status(Path::new("/p/b.ts")), None);
}
