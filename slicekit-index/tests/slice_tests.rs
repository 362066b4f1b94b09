mod common;

use common::{Todo, drain_deltas, drain_sizes, is_complete, key, names, titles};
use pretty_assertions::assert_eq;
use slicekit_index::{Config, DeltaKind, ObservableIndex, Predicate, Slice};
use std::sync::Arc;

fn complete_slice(seed: &[Todo]) -> Slice<Todo> {
    let predicate: Predicate<Todo> = Arc::new(is_complete);
    Slice::seeded("COMPLETE", predicate, Config::default(), seed)
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn seeded_slice_admits_only_matching() {
    let slice = complete_slice(&[
        Todo::keyed("a", "A", false),
        Todo::keyed("b", "B", true),
    ]);
    assert_eq!(slice.label(), "COMPLETE");
    assert_eq!(slice.count(), 1);
    assert!(slice.contains(&key("b")));
    assert!(!slice.contains(&key("a")));
}

#[test]
fn seeded_slice_publishes_initialize_with_admitted() {
    let slice = complete_slice(&[
        Todo::keyed("a", "A", false),
        Todo::keyed("b", "B", true),
    ]);
    let mut deltas = slice.observe_delta();
    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Initialize, names(&["B"]))]);
}

#[test]
fn empty_seed_still_publishes_initialize() {
    let slice = complete_slice(&[Todo::keyed("a", "A", false)]);
    assert!(slice.is_empty());

    let mut deltas = slice.observe_delta();
    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Initialize, vec![])]);

    let mut snapshots = slice.observe(None);
    assert_eq!(drain_sizes(&mut snapshots), vec![0]);
}

#[test]
fn new_slice_is_empty() {
    let slice = Slice::new("ALL", Arc::new(|_: &Todo| true), Config::default());
    assert!(slice.is_empty());
    assert!(slice.matches(&Todo::new("x", false)));
}

// ── Post ─────────────────────────────────────────────────────────

#[test]
fn post_all_admits_matching_subset() {
    let mut slice = complete_slice(&[]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.post_all(&[
        Todo::keyed("a", "A", true),
        Todo::keyed("b", "B", false),
        Todo::keyed("c", "C", true),
    ]);

    assert_eq!(titles(&slice.select_all()), names(&["A", "C"]));
    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Post, names(&["A", "C"]))]);
}

#[test]
fn post_without_matches_publishes_nothing() {
    let mut slice = complete_slice(&[]);
    let mut deltas = slice.observe_delta();
    let mut snapshots = slice.observe(None);
    deltas.drain();
    snapshots.drain();

    slice.post(&Todo::keyed("a", "A", false));

    assert!(slice.is_empty());
    assert!(deltas.try_next().is_none());
    assert!(snapshots.try_next().is_none());
}

#[test]
fn post_republishes_snapshot_after_delta() {
    let mut slice = complete_slice(&[]);
    let mut snapshots = slice.observe(None);
    slice.post(&Todo::keyed("a", "A", true));
    assert_eq!(drain_sizes(&mut snapshots), vec![0, 1]);
}

#[test]
fn post_of_member_that_no_longer_matches_removes_it() {
    let mut slice = complete_slice(&[Todo::keyed("a", "A", true)]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.post(&Todo::keyed("a", "A", false));

    assert!(slice.is_empty());
    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Delete, names(&["A"]))]);
}

#[test]
fn post_skips_keyless_entities() {
    let mut slice = complete_slice(&[]);
    slice.post(&Todo::new("A", true));
    assert!(slice.is_empty());
}

// ── Put: membership transitions ──────────────────────────────────

#[test]
fn put_absent_and_failing_is_noop() {
    let mut slice = complete_slice(&[]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.put(&Todo::keyed("a", "A", false));

    assert!(slice.is_empty());
    assert!(deltas.try_next().is_none());
}

#[test]
fn put_absent_and_matching_enters_with_put() {
    let mut slice = complete_slice(&[]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.put(&Todo::keyed("a", "A", true));

    assert!(slice.contains(&key("a")));
    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Put, names(&["A"]))]);
}

#[test]
fn put_member_still_matching_replaces_silently() {
    let mut slice = complete_slice(&[Todo::keyed("a", "A", true)]);
    let mut deltas = slice.observe_delta();
    let mut snapshots = slice.observe(None);
    deltas.drain();
    snapshots.drain();

    slice.put(&Todo::keyed("a", "A2", true));

    assert_eq!(slice.select_by_key(&key("a")).unwrap().title, "A2");
    assert!(deltas.try_next().is_none());
    assert!(snapshots.try_next().is_none());
}

#[test]
fn put_member_now_failing_leaves_with_delete() {
    let mut slice = complete_slice(&[Todo::keyed("a", "A", true)]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.put(&Todo::keyed("a", "A", false));

    assert!(slice.is_empty());
    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Delete, names(&["A"]))]);
}

#[test]
fn put_all_publishes_delete_then_put() {
    let mut slice = complete_slice(&[
        Todo::keyed("a", "A", true),
        Todo::keyed("b", "B", true),
    ]);
    let mut deltas = slice.observe_delta();
    let mut snapshots = slice.observe(None);
    deltas.drain();
    snapshots.drain();

    slice.put_all(&[
        Todo::keyed("a", "A", false),
        Todo::keyed("b", "B2", true),
        Todo::keyed("c", "C", true),
        Todo::keyed("d", "D", false),
    ]);

    assert_eq!(titles(&slice.select_all()), names(&["B2", "C"]));
    assert_eq!(
        drain_deltas(&mut deltas),
        vec![
            (DeltaKind::Delete, names(&["A"])),
            (DeltaKind::Put, names(&["C"])),
        ]
    );
    assert_eq!(drain_sizes(&mut snapshots), vec![1, 2]);
}

#[test]
fn put_all_with_only_leavers_publishes_single_delete() {
    let mut slice = complete_slice(&[Todo::keyed("a", "A", true)]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.put_all(&[Todo::keyed("a", "A", false), Todo::keyed("z", "Z", false)]);

    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Delete, names(&["A"]))]);
}

#[test]
fn put_all_folds_repeated_keys() {
    let mut slice = complete_slice(&[]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.put_all(&[Todo::keyed("a", "A", true), Todo::keyed("a", "A", false)]);

    assert!(slice.is_empty());
    assert!(deltas.try_next().is_none());
}

// ── Delete ───────────────────────────────────────────────────────

#[test]
fn delete_all_removes_members_only() {
    let mut slice = complete_slice(&[
        Todo::keyed("a", "A", true),
        Todo::keyed("b", "B", true),
    ]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.delete_all(&[Todo::keyed("a", "A", true), Todo::keyed("x", "X", false)]);

    assert_eq!(titles(&slice.select_all()), names(&["B"]));
    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Delete, names(&["A"]))]);
}

#[test]
fn delete_twice_is_noop_the_second_time() {
    let mut slice = complete_slice(&[Todo::keyed("a", "A", true)]);
    let mut deltas = slice.observe_delta();
    deltas.drain();

    slice.delete(&Todo::keyed("a", "A", true));
    slice.delete(&Todo::keyed("a", "A", true));

    assert_eq!(drain_deltas(&mut deltas).len(), 1);
}

#[test]
fn delete_removes_member_even_if_predicate_changed() {
    let mut slice = complete_slice(&[Todo::keyed("a", "A", true)]);
    slice.delete(&Todo::keyed("a", "A", false));
    assert!(slice.is_empty());
}

// ── Reset ────────────────────────────────────────────────────────

#[test]
fn reset_publishes_prior_membership_then_empty_snapshot() {
    let mut slice = complete_slice(&[
        Todo::keyed("a", "A", true),
        Todo::keyed("b", "B", true),
    ]);
    let mut deltas = slice.observe_delta();
    let mut snapshots = slice.observe(None);
    deltas.drain();
    snapshots.drain();

    slice.reset();

    assert!(slice.is_empty());
    assert_eq!(drain_deltas(&mut deltas), vec![(DeltaKind::Reset, names(&["A", "B"]))]);
    assert_eq!(drain_sizes(&mut snapshots), vec![0]);
}
