//! Quadratic-cost node split (Guttman, "R-trees: A Dynamic Index Structure
//! for Spatial Searching", SIGMOD 1984, section 3.5.2).

use crate::bounding_box::BoundingBox;

use super::rtree_types::{Entry, LeafEntry};

/// Anything a node holds: leaf objects and child references both carry a box.
pub trait Bounded {
    fn bbox(&self) -> &BoundingBox;
}

impl<T> Bounded for LeafEntry<T> {
    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

impl Bounded for Entry {
    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

/// A split group under construction and the box covering it.
struct Group<E> {
    items: Vec<E>,
    bbox: BoundingBox,
}

impl<E: Bounded> Group<E> {
    fn seeded(seed: E) -> Self {
        let bbox = seed.bbox().clone();
        Self {
            items: vec![seed],
            bbox,
        }
    }

    fn push(&mut self, item: E) {
        self.bbox.expand(item.bbox());
        self.items.push(item);
    }
}

/// Split an overflowing set of items into two groups, each holding at least
/// `min_children` items, trying to keep the total covered size small.
///
/// `items` must hold at least `2 * min_children` items. Relative order of
/// items within each group follows the order they were assigned.
pub fn quadratic_split<E: Bounded>(mut items: Vec<E>, min_children: usize) -> (Vec<E>, Vec<E>) {
    debug_assert!(items.len() >= 2);
    debug_assert!(items.len() >= 2 * min_children);

    let (i, j) = pick_seeds(&items);
    // j > i, so removing j first leaves i in place
    let right_seed = items.remove(j);
    let left_seed = items.remove(i);
    let mut left = Group::seeded(left_seed);
    let mut right = Group::seeded(right_seed);

    while !items.is_empty() {
        // Forced assignment: a group that needs everything left to reach
        // the minimum fill takes all of it.
        if left.items.len() + items.len() <= min_children {
            for item in items.drain(..) {
                left.push(item);
            }
            break;
        }
        if right.items.len() + items.len() <= min_children {
            for item in items.drain(..) {
                right.push(item);
            }
            break;
        }

        let next = pick_next(&left.bbox, &right.bbox, &items);
        let item = items.remove(next);
        if prefers_left(&left, &right, item.bbox()) {
            left.push(item);
        } else {
            right.push(item);
        }
    }

    (left.items, right.items)
}

/// Choose the pair that would waste the most space if put in the same group.
/// Ties keep the first pair found.
fn pick_seeds<E: Bounded>(items: &[E]) -> (usize, usize) {
    let mut seeds = (0, 1);
    let mut max_waste = f64::NEG_INFINITY;
    for (i, a) in items.iter().enumerate() {
        for (j, b) in items.iter().enumerate().skip(i + 1) {
            let waste = a.bbox().merged_size(b.bbox()) - a.bbox().size() - b.bbox().size();
            if waste > max_waste {
                max_waste = waste;
                seeds = (i, j);
            }
        }
    }
    seeds
}

/// Choose the item with the strongest preference for one group over the other.
/// Ties keep the first item found.
fn pick_next<E: Bounded>(left: &BoundingBox, right: &BoundingBox, items: &[E]) -> usize {
    let mut next = 0;
    let mut max_diff = f64::NEG_INFINITY;
    for (i, item) in items.iter().enumerate() {
        let d_left = left.enlargement(item.bbox());
        let d_right = right.enlargement(item.bbox());
        let diff = (d_left - d_right).abs();
        if diff > max_diff {
            max_diff = diff;
            next = i;
        }
    }
    next
}

/// Smaller enlargement wins, then the smaller group box, then the group with
/// fewer items, then the left group.
fn prefers_left<E>(left: &Group<E>, right: &Group<E>, bbox: &BoundingBox) -> bool {
    let d_left = left.bbox.enlargement(bbox);
    let d_right = right.bbox.enlargement(bbox);
    if d_left != d_right {
        return d_left < d_right;
    }
    let (size_left, size_right) = (left.bbox.size(), right.bbox.size());
    if size_left != size_right {
        return size_left < size_right;
    }
    left.items.len() <= right.items.len()
}
