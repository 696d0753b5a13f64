//! Set algebra over sorted posting lists.
//!
//! Every input slice must be strictly ascending; every output is strictly
//! ascending too.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::types::EntryId;

/// Intersection of two ascending lists. Linear merge.
pub fn intersect(a: &[EntryId], b: &[EntryId]) -> Vec<EntryId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Union of two ascending lists, deduplicated. Linear merge.
pub fn union(a: &[EntryId], b: &[EntryId]) -> Vec<EntryId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// K-way union of ascending lists, deduplicated.
pub fn union_all<'a, I>(lists: I) -> Vec<EntryId>
where
    I: IntoIterator<Item = &'a [EntryId]>,
{
    let lists: Vec<&[EntryId]> = lists.into_iter().filter(|l| !l.is_empty()).collect();
    match lists.len() {
        0 => return Vec::new(),
        1 => return lists[0].to_vec(),
        2 => return union(lists[0], lists[1]),
        _ => {}
    }

    let total: usize = lists.iter().map(|l| l.len()).sum();
    let mut out = Vec::with_capacity(total);

    // (next value, list index, position in list)
    let mut heap: BinaryHeap<Reverse<(EntryId, usize, usize)>> = lists
        .iter()
        .enumerate()
        .map(|(li, l)| Reverse((l[0], li, 0)))
        .collect();

    while let Some(Reverse((value, li, pos))) = heap.pop() {
        if out.last() != Some(&value) {
            out.push(value);
        }
        let next = pos + 1;
        if let Some(&v) = lists[li].get(next) {
            heap.push(Reverse((v, li, next)));
        }
    }
    out
}

/// Intersection of many ascending lists, smallest first.
pub fn intersect_all(mut lists: Vec<Vec<EntryId>>) -> Vec<EntryId> {
    if lists.is_empty() {
        return Vec::new();
    }
    lists.sort_by_key(|l| l.len());
    let mut iter = lists.into_iter();
    let mut acc = iter.next().unwrap_or_default();
    for list in iter {
        if acc.is_empty() {
            break;
        }
        acc = intersect(&acc, &list);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect() {
        assert_eq!(intersect(&[1, 3, 5, 7], &[2, 3, 4, 7, 9]), vec![3, 7]);
        assert_eq!(intersect(&[], &[1, 2]), Vec::<EntryId>::new());
        assert_eq!(intersect(&[1, 2], &[3, 4]), Vec::<EntryId>::new());
    }

    #[test]
    fn test_union() {
        assert_eq!(union(&[1, 3, 5], &[2, 3, 6]), vec![1, 2, 3, 5, 6]);
        assert_eq!(union(&[], &[4]), vec![4]);
        assert_eq!(union(&[4], &[]), vec![4]);
    }

    #[test]
    fn test_union_all_many_lists() {
        let a: &[EntryId] = &[0, 10, 20];
        let b: &[EntryId] = &[5, 15];
        let c: &[EntryId] = &[];
        let d: &[EntryId] = &[1, 10, 30];
        assert_eq!(union_all([a, b, c, d]), vec![0, 1, 5, 10, 15, 20, 30]);
        assert_eq!(union_all(Vec::<&[EntryId]>::new()), Vec::<EntryId>::new());
        assert_eq!(union_all([a]), vec![0, 10, 20]);
    }

    #[test]
    fn test_intersect_all_orders_by_size() {
        let lists: Vec<Vec<EntryId>> = vec![
            (0..100).collect(),
            vec![3, 50, 99, 200],
            (0..100).step_by(3).collect(),
        ];
        assert_eq!(intersect_all(lists), vec![3, 99]);
        assert_eq!(intersect_all(vec![]), Vec::<EntryId>::new());
        assert_eq!(intersect_all(vec![vec![], vec![1, 2]]), Vec::<EntryId>::new());
    }
}
