//! In-place heap sort.
//!
//! Works on any slice of records exposing a distance, not just the records
//! stored in grid cells. Ties between equal keys end up in whatever order the
//! heap leaves them; the sort is not stable.

use std::cmp::Ordering;

/// A record that can be ordered by its distance.
pub trait DistanceKey {
    fn distance(&self) -> f64;
}

impl DistanceKey for f64 {
    fn distance(&self) -> f64 {
        *self
    }
}

impl<T: DistanceKey> DistanceKey for &T {
    fn distance(&self) -> f64 {
        (**self).distance()
    }
}

/// Sorts `records` by ascending distance.
///
/// NaN distances are ordered with [`f64::total_cmp`], so they sort after every
/// other value instead of breaking the heap.
pub fn heap_sort_by_distance<T: DistanceKey>(records: &mut [T]) {
    heap_sort_by(records, |a, b| a.distance().total_cmp(&b.distance()));
}

/// Returns a copy of `records`, sorted by ascending distance.
pub fn sorted_by_distance<T: DistanceKey + Clone>(records: &[T]) -> Vec<T> {
    let mut sorted = records.to_vec();
    heap_sort_by_distance(&mut sorted);
    sorted
}

/// Sorts `items` in ascending order of `cmp`.
pub fn heap_sort_by<T, F>(items: &mut [T], mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();

    // Build a max-heap bottom-up, starting at the last node with children
    for root in (0..len / 2).rev() {
        sift_down(items, root, len, &mut cmp);
    }

    // Move the current maximum behind the shrinking heap
    for end in (1..len).rev() {
        items.swap(0, end);
        sift_down(items, 0, end, &mut cmp);
    }
}

/// Restores the max-heap property of `items[..end]` below `root`.
fn sift_down<T, F>(items: &mut [T], mut root: usize, end: usize, cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        let left = 2 * root + 1;
        if left >= end {
            return;
        }
        let right = left + 1;

        let mut largest = root;
        if cmp(&items[left], &items[largest]).is_gt() {
            largest = left;
        }
        if right < end && cmp(&items[right], &items[largest]).is_gt() {
            largest = right;
        }
        if largest == root {
            return;
        }

        items.swap(root, largest);
        root = largest;
    }
}
