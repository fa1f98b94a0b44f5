//! End-to-end tests for R-Tree insertion and deletion.
//!
//! These tests drive the tree only through its public API and check the
//! structural invariants after every mutation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use spatial_rtree::{BoundingBox, RTree, Spatial, SpatialError};
use std::collections::HashSet;

#[ctor::ctor]
fn init() {
    colog::init();
}

#[derive(Debug, Clone, PartialEq)]
struct Marker {
    id: u32,
    location: BoundingBox,
}

impl Spatial for Marker {
    fn bounds(&self) -> BoundingBox {
        self.location.clone()
    }
}

fn marker(id: u32, coords: &[f64]) -> Marker {
    Marker {
        id,
        location: BoundingBox::from_point(coords).unwrap(),
    }
}

fn random_markers(rng: &mut StdRng, count: u32) -> Vec<Marker> {
    (0..count)
        .map(|id| {
            let x = rng.gen_range(-100.0..100.0);
            let y = rng.gen_range(-100.0..100.0);
            let w = rng.gen_range(0.0..5.0);
            let h = rng.gen_range(0.0..5.0);
            Marker {
                id,
                location: BoundingBox::from_point_and_lengths(&[x, y], &[w, h]).unwrap(),
            }
        })
        .collect()
}

fn stored_ids(tree: &RTree<Marker>) -> HashSet<u32> {
    tree.iter().map(|m| m.id).collect()
}

fn assert_valid(tree: &RTree<Marker>) {
    let report = tree.check_integrity();
    assert!(report.is_valid, "integrity errors: {:?}", report.errors);
    assert_eq!(report.items_counted, tree.size());
}

#[test]
fn test_grid_insert_splits_root() {
    let mut tree = RTree::new(2, 2, 3).unwrap();
    for (id, (x, y)) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)].iter().enumerate() {
        tree.insert(marker(id as u32, &[*x, *y])).unwrap();
    }

    assert_eq!(tree.size(), 4);
    assert_eq!(tree.height(), 2);
    let stats = tree.stats();
    assert_eq!(stats.node_count, 3, "root plus two leaves");
    assert_eq!(stats.leaf_count, 2);
    assert_eq!(
        tree.bounds().unwrap(),
        BoundingBox::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap()
    );
    assert_valid(&tree);
}

#[test]
fn test_delete_missing_returns_false() {
    let mut tree = RTree::new(2, 2, 3).unwrap();
    for (id, (x, y)) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)].iter().enumerate() {
        tree.insert(marker(id as u32, &[*x, *y])).unwrap();
    }
    let stats = tree.stats();

    assert!(!tree.delete(&marker(99, &[5.0, 5.0])).unwrap());
    // Same location as a stored marker but a different identity
    assert!(!tree.delete(&marker(99, &[0.0, 0.0])).unwrap());

    assert_eq!(tree.size(), 4);
    assert_eq!(tree.stats(), stats);
    assert_valid(&tree);
}

#[test]
fn test_insert_then_delete_everything() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree = RTree::new(2, 2, 4).unwrap();
    let mut markers = random_markers(&mut rng, 50);

    for m in &markers {
        tree.insert(m.clone()).unwrap();
        assert_valid(&tree);
    }
    assert_eq!(tree.size(), 50);

    markers.shuffle(&mut rng);
    for (deleted, m) in markers.iter().enumerate() {
        assert!(tree.delete(m).unwrap(), "marker {} missing", m.id);
        assert_eq!(tree.size(), 50 - deleted - 1);
        assert_valid(&tree);
    }

    assert_eq!(tree.size(), 0);
    assert_eq!(tree.height(), 1);
    let stats = tree.stats();
    assert_eq!(stats.node_count, 1);
    assert_eq!(stats.leaf_count, 1);
    assert!(tree.bounds().is_none());
}

#[test]
fn test_root_collapse_lowers_height_by_one() {
    let mut tree = RTree::new(2, 2, 3).unwrap();
    let markers: Vec<_> = (0..20)
        .map(|i| marker(i, &[(i % 5) as f64 * 3.0, (i / 5) as f64 * 3.0]))
        .collect();
    tree.insert_all(markers.clone()).unwrap();
    assert!(tree.height() >= 3, "height {}", tree.height());

    let mut remaining = markers.clone();
    let mut collapses = 0;
    while let Some(m) = remaining.pop() {
        let before = tree.height();
        assert!(tree.delete(&m).unwrap());
        let after = tree.height();

        if after < before {
            assert_eq!(before - after, 1, "height {} -> {}", before, after);
            collapses += 1;
            for r in &remaining {
                assert!(tree.contains(r).unwrap(), "marker {} lost after collapse", r.id);
            }
        }
        assert_valid(&tree);
    }
    assert!(collapses >= 2);
    assert_eq!(tree.height(), 1);
}

#[test]
fn test_insert_delete_round_trip() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut tree = RTree::new(2, 2, 5).unwrap();
    tree.insert_all(random_markers(&mut rng, 60)).unwrap();
    let before = stored_ids(&tree);

    let extra = marker(1000, &[0.5, 0.5]);
    tree.insert(extra.clone()).unwrap();
    assert!(tree.contains(&extra).unwrap());
    assert!(tree.delete(&extra).unwrap());

    assert_eq!(stored_ids(&tree), before);
    assert_eq!(tree.size(), 60);
    assert_valid(&tree);
}

#[test]
fn test_dimension_mismatch_is_idempotent() {
    let mut tree = RTree::new(2, 2, 4).unwrap();
    tree.insert_all((0..10).map(|i| marker(i, &[i as f64, 0.0]))).unwrap();
    let stats = tree.stats();
    let ids = stored_ids(&tree);

    let wrong = marker(50, &[1.0, 2.0, 3.0]);
    for _ in 0..5 {
        assert_eq!(
            tree.insert(wrong.clone()),
            Err(SpatialError::DimensionMismatch { expected: 2, actual: 3 })
        );
        assert!(matches!(
            tree.delete(&wrong),
            Err(SpatialError::DimensionMismatch { .. })
        ));
        assert!(tree.contains(&wrong).is_err());
    }

    assert_eq!(tree.stats(), stats);
    assert_eq!(stored_ids(&tree), ids);
}

#[test]
fn test_insert_all_stops_at_first_error() {
    let mut tree = RTree::new(2, 2, 4).unwrap();
    let items = vec![
        marker(0, &[0.0, 0.0]),
        marker(1, &[1.0, 1.0]),
        marker(2, &[1.0, 1.0, 1.0]),
        marker(3, &[2.0, 2.0]),
    ];
    assert!(tree.insert_all(items).is_err());
    assert_eq!(stored_ids(&tree), HashSet::from([0, 1]));
}

#[test]
fn test_random_interleaved_operations() {
    let mut rng = StdRng::seed_from_u64(1234);
    let mut tree = RTree::new(2, 3, 7).unwrap();
    let pool = random_markers(&mut rng, 400);
    let mut stored: Vec<Marker> = Vec::new();

    for step in 0..1500 {
        let insert = stored.is_empty() || rng.gen_bool(0.55);
        if insert {
            let m = pool[rng.gen_range(0..pool.len())].clone();
            tree.insert(m.clone()).unwrap();
            stored.push(m);
        } else {
            let idx = rng.gen_range(0..stored.len());
            let m = stored.swap_remove(idx);
            assert!(tree.delete(&m).unwrap(), "step {}: marker {} missing", step, m.id);
        }
        assert_eq!(tree.size(), stored.len());
        if step % 25 == 0 {
            assert_valid(&tree);
        }
    }

    assert_valid(&tree);
    let mut expected: Vec<u32> = stored.iter().map(|m| m.id).collect();
    let mut actual: Vec<u32> = tree.iter().map(|m| m.id).collect();
    expected.sort_unstable();
    actual.sort_unstable();
    assert_eq!(actual, expected);
}

#[test]
fn test_three_dimensional_tree() {
    let mut tree = RTree::new(3, 2, 4).unwrap();
    let mut markers = Vec::new();
    for i in 0..64u32 {
        let coords = [(i % 4) as f64, ((i / 4) % 4) as f64, (i / 16) as f64];
        markers.push(marker(i, &coords));
    }
    tree.insert_all(markers.clone()).unwrap();
    assert_eq!(tree.size(), 64);
    assert_eq!(
        tree.bounds().unwrap(),
        BoundingBox::new(vec![0.0; 3], vec![3.0; 3]).unwrap()
    );
    assert_valid(&tree);

    for m in markers.iter().step_by(2) {
        assert!(tree.delete(m).unwrap());
    }
    assert_eq!(tree.size(), 32);
    assert_valid(&tree);
}

#[test]
fn test_stores_borrowed_handles() {
    let markers: Vec<_> = (0..30).map(|i| marker(i, &[i as f64, -(i as f64)])).collect();
    let mut tree: RTree<&Marker> = RTree::new(2, 2, 4).unwrap();
    for m in &markers {
        tree.insert(m).unwrap();
    }
    assert!(tree.contains(&&markers[7]).unwrap());
    assert!(tree.delete(&&markers[7]).unwrap());
    assert!(!tree.contains(&&markers[7]).unwrap());
    assert_eq!(tree.size(), 29);
    // The caller still owns every marker
    assert_eq!(markers.len(), 30);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    assert!(matches!(
        RTree::<Marker>::new(2, 0, 3),
        Err(SpatialError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        RTree::<Marker>::new(2, 3, 5),
        Err(SpatialError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        RTree::<Marker>::new(0, 2, 4),
        Err(SpatialError::InvalidConfiguration(_))
    ));
    assert!(RTree::<Marker>::new(2, 1, 2).is_ok());
}
