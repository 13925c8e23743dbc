//! Ordered set of keys, with or without duplicates.

use std::{fmt, iter::FusedIterator};

use compare::{Compare, Natural};
use rb_tree::RbTree;

pub use rb_tree::{Handle, HandleError};

#[derive(Clone)]
pub struct RbSet<K, C = Natural> {
    tree: RbTree<K, (), C>,
}

pub struct SetIter<'a, K>(rb_tree::Iter<'a, K, ()>);

pub struct SetIntoIter<K>(rb_tree::IntoIter<K, ()>);

impl<K: Ord> RbSet<K> {
    pub fn new() -> Self { Self::with_compare(Natural) }
    pub fn new_multi() -> Self { Self::multi_with_compare(Natural) }
}

impl<K: Ord> Default for RbSet<K> {
    fn default() -> Self { Self::new() }
}

impl<K, C> RbSet<K, C> {
    pub fn with_compare(cmp: C) -> Self {
        Self { tree: RbTree::with_compare(true, cmp) }
    }
    pub fn multi_with_compare(cmp: C) -> Self {
        Self { tree: RbTree::with_compare(false, cmp) }
    }

    pub fn as_tree(&self) -> &RbTree<K, (), C> { &self.tree }

    pub fn len(&self) -> usize { self.tree.len() }
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }
    pub fn is_unique(&self) -> bool { self.tree.is_unique() }
    pub fn clear(&mut self) { self.tree.clear() }

    pub fn begin(&self) -> Handle { self.tree.begin() }
    pub fn end(&self) -> Handle { self.tree.end() }
    pub fn next(&self, h: Handle) -> Handle { self.tree.next(h) }
    pub fn prev(&self, h: Handle) -> Handle { self.tree.prev(h) }
    pub fn is_valid(&self, h: Handle) -> bool { self.tree.is_valid(h) }

    /// The key at `h`, or `None` for `end()`.
    pub fn at(&self, h: Handle) -> Option<&K> { self.tree.key_at(h) }
    pub fn first(&self) -> Option<&K> { self.tree.first().map(|(k, _)| k) }
    pub fn last(&self) -> Option<&K> { self.tree.last().map(|(k, _)| k) }

    pub fn erase_node(&mut self, h: Handle) -> K { self.tree.erase_node(h).0 }
    pub fn try_erase_node(&mut self, h: Handle) -> Result<K, HandleError> {
        self.tree.try_erase_node(h).map(|(k, ())| k)
    }
    pub fn erase_range(&mut self, first: Handle, last: Handle) -> usize {
        self.tree.erase_range(first, last)
    }

    pub fn iter(&self) -> SetIter<'_, K> { SetIter(self.tree.iter()) }
}

impl<K, C: Compare<K>> RbSet<K, C> {
    /// Inserts `key`. A unique set already holding an equal key returns
    /// the stored key's handle and `false`.
    pub fn insert(&mut self, key: K) -> (Handle, bool) {
        self.tree.insert(key, ())
    }

    pub fn find(&self, key: &K) -> Handle { self.tree.find(key) }
    pub fn contains(&self, key: &K) -> bool { self.tree.contains_key(key) }
    pub fn lower_bound(&self, key: &K) -> Handle { self.tree.lower_bound(key) }
    pub fn upper_bound(&self, key: &K) -> Handle { self.tree.upper_bound(key) }
    pub fn equal_range(&self, key: &K) -> (Handle, Handle) {
        self.tree.equal_range(key)
    }
    pub fn count(&self, key: &K) -> usize { self.tree.count(key) }
    pub fn erase(&mut self, key: &K) -> usize { self.tree.erase(key) }
}

impl<K: fmt::Debug, C> fmt::Debug for RbSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for RbSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut res = Self::new();
        res.extend(iter);
        res
    }
}

impl<K, C: Compare<K>> Extend<K> for RbSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.tree.extend(iter.into_iter().map(|k| (k, ())));
    }
}

impl<'a, K> Iterator for SetIter<'a, K> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> { self.0.next().map(|(k, _)| k) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K> DoubleEndedIterator for SetIter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<K> Iterator for SetIntoIter<K> {
    type Item = K;
    fn next(&mut self) -> Option<K> { self.0.next().map(|(k, _)| k) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K> DoubleEndedIterator for SetIntoIter<K> {
    fn next_back(&mut self) -> Option<K> { self.0.next_back().map(|(k, _)| k) }
}

impl<K> ExactSizeIterator for SetIter<'_, K> {}
impl<K> ExactSizeIterator for SetIntoIter<K> {}
impl<K> FusedIterator for SetIter<'_, K> {}
impl<K> FusedIterator for SetIntoIter<K> {}

impl<K, C> IntoIterator for RbSet<K, C> {
    type Item = K;
    type IntoIter = SetIntoIter<K>;
    fn into_iter(self) -> SetIntoIter<K> { SetIntoIter(self.tree.into_iter()) }
}

impl<'a, K, C> IntoIterator for &'a RbSet<K, C> {
    type Item = &'a K;
    type IntoIter = SetIter<'a, K>;
    fn into_iter(self) -> SetIter<'a, K> { self.iter() }
}

#[test]
fn scenario() {
    let mut set = RbSet::new();
    for k in [1, 4, 6, 5, 3, 7, 2, 9] {
        set.insert(k);
    }
    let a: Vec<_> = set.iter().copied().collect();
    assert_eq!(a, [1, 2, 3, 4, 5, 6, 7, 9]);

    let mut it = set.begin();
    while it != set.end() {
        let next = set.next(it);
        set.erase_node(it);
        it = next;
    }
    assert_eq!(set.len(), 0);
    assert_eq!(set.begin(), set.end());
    set.as_tree().assert_invariants();
}

#[test]
fn unique() {
    let mut set = RbSet::new();
    assert!(set.insert("b").1);
    assert!(set.insert("a").1);
    let (h, inserted) = set.insert("b");
    assert!(!inserted);
    assert_eq!(set.at(h), Some(&"b"));
    assert_eq!(set.len(), 2);
    assert_eq!(set.count(&"b"), 1);
    assert!(set.contains(&"a"));
    assert!(!set.contains(&"c"));
    assert_eq!(format!("{set:?}"), r#"{"a", "b"}"#);
}

#[test]
fn multi() {
    let mut set: RbSet<_> = RbSet::new_multi();
    set.extend([3, 1, 3, 2, 3]);
    assert!(!set.is_unique());
    assert_eq!(set.len(), 5);
    assert_eq!(set.count(&3), 3);

    let (lo, hi) = set.equal_range(&3);
    assert_eq!(set.at(lo), Some(&3));
    assert_eq!(hi, set.end());
    assert_eq!(set.erase_range(lo, hi), 3);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2]);
    assert_eq!(set.erase(&3), 0);
    set.as_tree().assert_invariants();
}

#[test]
fn bounds() {
    let set: RbSet<_> = [1, 2, 3, 5, 7].into_iter().collect();
    assert_eq!(set.at(set.lower_bound(&4)), Some(&5));
    assert_eq!(set.at(set.upper_bound(&5)), Some(&7));
    assert_eq!(set.at(set.prev(set.end())), Some(&7));
    assert!(set.find(&4).is_end());
    assert_eq!(set.first(), Some(&1));
    assert_eq!(set.last(), Some(&7));
}

#[test]
fn stale_handle() {
    let mut set = RbSet::new();
    let (h, _) = set.insert(10);
    set.insert(20);
    assert_eq!(set.erase_node(h), 10);
    assert!(!set.is_valid(h));
    assert_eq!(set.try_erase_node(h), Err(HandleError::Stale(h)));
    assert_eq!(set.try_erase_node(set.end()), Err(HandleError::End));
    assert_eq!(set.len(), 1);
}

#[test]
fn custom_order() {
    use compare::{Reverse, Signed};

    let mut set: RbSet<i32, _> = RbSet::with_compare(Reverse(Natural));
    set.extend([2, 7, 1, 8]);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [8, 7, 2, 1]);

    let mut set: RbSet<i64, _> =
        RbSet::multi_with_compare(Signed(|a: &i64, b: &i64| a - b));
    set.extend([5, -3, 5, 0]);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [-3, 0, 5, 5]);
    assert_eq!(set.count(&5), 2);
}

#[test]
fn random_keys() {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use randgen::{Gen, Repeated};

    let mut rng = ChaCha20Rng::from_seed([
        0x1E, 0x7E, 0x29, 0x77, 0x38, 0x9A, 0xF5, 0x67, 0xF5, 0xDD, 0x07, 0x06,
        0xAE, 0xE4, 0x5A, 0xDC, 0x55, 0xEF, 0xE0, 0x3C, 0x71, 0xDA, 0xFC, 0xAB,
        0x5C, 0x1A, 0x9F, 0xEB, 0xA4, 0x9E, 0x61, 0xE6,
    ]);
    let a = Repeated { bound: 0..100, len: 500 }.generate(&mut rng);

    let mut sorted = a.clone();
    sorted.sort_unstable();
    let multi: RbSet<_> = {
        let mut set = RbSet::new_multi();
        set.extend(a.iter().copied());
        set
    };
    assert!(multi.iter().copied().eq(sorted.iter().copied()));

    sorted.dedup();
    let set: RbSet<_> = a.iter().copied().collect();
    assert!(set.into_iter().eq(sorted));
    multi.as_tree().assert_invariants();
}
