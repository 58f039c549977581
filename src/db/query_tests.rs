use super::*;
use crate::db::{DatabaseObject, GridDatabase, BUCKET_ROW_COUNT};

fn obj(tag: u8, x1: f32, y1: f32, x2: f32, y2: f32) -> DatabaseObject {
    DatabaseObject::new(tag).with_extent(Rect::from_coords(x1, y1, x2, y2))
}

fn sorted(mut keys: Vec<ObjectKey>) -> Vec<ObjectKey> {
    keys.sort();
    keys
}

// ============================================================================
// Rect query tests
// ============================================================================

#[test]
fn test_three_object_scenario() {
    // Small object near the origin, small object three cells out, and a
    // large object spanning both regions
    let mut db = GridDatabase::new();
    let near = db.insert(obj(1, 0.0, 0.0, 10.0, 10.0)).unwrap();
    let far = db.insert(obj(1, 300.0, 300.0, 310.0, 310.0)).unwrap();
    let big = db.insert(obj(1, 0.0, 0.0, 300.0, 300.0)).unwrap();

    let mut results = Vec::new();
    db.find_in_rect(1, &Rect::from_coords(0.0, 0.0, 50.0, 50.0), &mut results);
    assert_eq!(sorted(results), sorted(vec![near, big]));

    let mut results = Vec::new();
    db.find_in_rect(1, &Rect::from_coords(290.0, 290.0, 320.0, 320.0), &mut results);
    assert_eq!(sorted(results), sorted(vec![far, big]));
}

#[test]
fn test_multi_bucket_object_reported_once() {
    let mut db = GridDatabase::new();
    // Spans 3x3 buckets
    let key = db.insert(obj(1, 0.0, 0.0, 700.0, 700.0)).unwrap();

    // Query rect covering all of them
    let mut results = Vec::new();
    db.find_in_rect(1, &Rect::from_coords(0.0, 0.0, 700.0, 700.0), &mut results);
    assert_eq!(results, vec![key]);
}

#[test]
fn test_same_query_twice_same_set() {
    let mut db = GridDatabase::new();
    db.insert(obj(1, 0.0, 0.0, 500.0, 500.0)).unwrap();
    db.insert(obj(1, 100.0, 100.0, 120.0, 120.0)).unwrap();
    db.insert(obj(2, 200.0, 200.0, 220.0, 220.0)).unwrap();

    let rect = Rect::from_coords(0.0, 0.0, 500.0, 500.0);
    let mut first = Vec::new();
    db.find_in_rect(1, &rect, &mut first);
    let mut second = Vec::new();
    db.find_in_rect(1, &rect, &mut second);

    assert_eq!(sorted(first), sorted(second));
}

#[test]
fn test_type_filter_applies() {
    let mut db = GridDatabase::new();
    let a = db.insert(obj(1, 0.0, 0.0, 10.0, 10.0)).unwrap();
    db.insert(obj(2, 0.0, 0.0, 10.0, 10.0)).unwrap();

    let mut results = Vec::new();
    db.find_in_rect(1, &Rect::from_coords(0.0, 0.0, 50.0, 50.0), &mut results);
    assert_eq!(results, vec![a]);
}

#[test]
fn test_find_matching_predicate() {
    let mut db = GridDatabase::new();
    let a = db.insert(obj(3, 0.0, 0.0, 10.0, 10.0)).unwrap();
    let b = db.insert(obj(7, 0.0, 0.0, 10.0, 10.0)).unwrap();
    db.insert(obj(4, 0.0, 0.0, 10.0, 10.0)).unwrap();

    let mut results = Vec::new();
    db.find_matching(|t| t % 2 == 1, &Rect::from_coords(0.0, 0.0, 50.0, 50.0), &mut results);
    assert_eq!(sorted(results), sorted(vec![a, b]));
}

#[test]
fn test_boundary_contact_counts_as_overlap() {
    let mut db = GridDatabase::new();
    let key = db.insert(obj(1, 0.0, 0.0, 10.0, 10.0)).unwrap();

    let mut results = Vec::new();
    db.find_in_rect(1, &Rect::from_coords(10.0, 10.0, 20.0, 20.0), &mut results);
    assert_eq!(results, vec![key]);
}

#[test]
fn test_wraparound_alias_rejected_by_extent() {
    // 16 cells apart: same bucket, disjoint extents
    let mut db = GridDatabase::new();
    let near = db.insert(obj(1, 0.0, 0.0, 10.0, 10.0)).unwrap();
    let offset = (BUCKET_ROW_COUNT as f32) * 256.0;
    db.insert(obj(1, offset, offset, offset + 10.0, offset + 10.0)).unwrap();

    let mut results = Vec::new();
    db.find_in_rect(1, &Rect::from_coords(0.0, 0.0, 50.0, 50.0), &mut results);
    assert_eq!(results, vec![near]);
}

#[test]
fn test_query_appends_to_existing_results() {
    let mut db = GridDatabase::new();
    let key = db.insert(obj(1, 0.0, 0.0, 10.0, 10.0)).unwrap();

    let mut results = vec![key];
    db.find_in_rect(1, &Rect::from_coords(0.0, 0.0, 50.0, 50.0), &mut results);
    assert_eq!(results, vec![key, key]);
}

// ============================================================================
// Whole-collection query tests
// ============================================================================

#[test]
fn test_find_all_insertion_order() {
    let mut db = GridDatabase::new();
    let a = db.insert(obj(1, 0.0, 0.0, 1.0, 1.0)).unwrap();
    let b = db.insert(obj(2, 500.0, 500.0, 501.0, 501.0)).unwrap();

    let mut results = Vec::new();
    db.find_all(&mut results);
    assert_eq!(results, vec![a, b]);
    assert_eq!(db.all_objects(), &[a, b]);
}

#[test]
fn test_find_by_type_linear_sweep() {
    let mut db = GridDatabase::new();
    let a = db.insert(obj(1, 0.0, 0.0, 1.0, 1.0)).unwrap();
    db.insert(obj(2, 0.0, 0.0, 1.0, 1.0)).unwrap();
    let c = db.insert(obj(1, 900.0, 900.0, 901.0, 901.0)).unwrap();

    let mut results = Vec::new();
    db.find_by_type(1, &mut results);
    assert_eq!(results, vec![a, c]);
}

#[test]
fn test_fast_index_equals_linear_sweep() {
    let mut fast = GridDatabase::with_fast_indices(&[1]);
    let mut slow = GridDatabase::new();

    for i in 0..20 {
        let tag = if i % 3 == 0 { 1 } else { 2 };
        let x = i as f32 * 100.0;
        fast.insert(obj(tag, x, 0.0, x + 10.0, 10.0)).unwrap();
        slow.insert(obj(tag, x, 0.0, x + 10.0, 10.0)).unwrap();
    }

    let mut from_fast = Vec::new();
    fast.find_by_type(1, &mut from_fast);
    let mut from_slow = Vec::new();
    slow.find_by_type(1, &mut from_slow);

    // Keys come from different slot maps, so compare by index position
    let fast_positions: Vec<usize> = from_fast
        .iter()
        .map(|&k| fast.all_objects().iter().position(|&o| o == k).unwrap())
        .collect();
    let slow_positions: Vec<usize> = from_slow
        .iter()
        .map(|&k| slow.all_objects().iter().position(|&o| o == k).unwrap())
        .collect();
    assert_eq!(fast_positions, slow_positions);
}

#[test]
fn test_fast_index_tracks_removal() {
    let mut db = GridDatabase::with_fast_indices(&[1]);
    let a = db.insert(obj(1, 0.0, 0.0, 1.0, 1.0)).unwrap();
    let b = db.insert(obj(1, 5.0, 5.0, 6.0, 6.0)).unwrap();

    db.remove(a).unwrap();

    let mut results = Vec::new();
    db.find_by_type(1, &mut results);
    assert_eq!(results, vec![b]);
    assert_eq!(db.count(1), 1);
}

#[test]
fn test_count_and_has_any() {
    let mut db = GridDatabase::with_fast_indices(&[1]);
    assert_eq!(db.count(1), 0);
    assert!(!db.has_any(1));
    assert!(!db.has_any(9));

    db.insert(obj(1, 0.0, 0.0, 1.0, 1.0)).unwrap();
    db.insert(obj(9, 0.0, 0.0, 1.0, 1.0)).unwrap();

    assert_eq!(db.count(1), 1);
    assert_eq!(db.count(9), 1);
    assert!(db.has_any(1));
    assert!(db.has_any(9));
    assert!(!db.has_any(5));
}
