//! Ordered map, with or without duplicate keys.
//!
//! ```
//! use rb_map::RbMap;
//!
//! let mut map = RbMap::new();
//! map.insert(2, "two");
//! let (v, inserted) = map.get_or_insert(2, "zwei");
//! assert!(!inserted);
//! assert_eq!(*v, "two");
//! ```

use std::{fmt, iter::FusedIterator};

use compare::{Compare, Natural};
use rb_tree::RbTree;

pub use rb_tree::{Handle, HandleError};

#[derive(Clone)]
pub struct RbMap<K, V, C = Natural> {
    tree: RbTree<K, V, C>,
}

pub struct MapIter<'a, K, V>(rb_tree::Iter<'a, K, V>);
pub struct MapIterMut<'a, K, V>(rb_tree::IterMut<'a, K, V>);
pub struct MapIntoIter<K, V>(rb_tree::IntoIter<K, V>);
pub struct Keys<'a, K, V>(rb_tree::Iter<'a, K, V>);
pub struct Values<'a, K, V>(rb_tree::Iter<'a, K, V>);
pub struct ValuesMut<'a, K, V>(rb_tree::IterMut<'a, K, V>);

impl<K: Ord, V> RbMap<K, V> {
    pub fn new() -> Self { Self::with_compare(Natural) }
    pub fn new_multi() -> Self { Self::multi_with_compare(Natural) }
}

impl<K: Ord, V> Default for RbMap<K, V> {
    fn default() -> Self { Self::new() }
}

impl<K, V, C> RbMap<K, V, C> {
    pub fn with_compare(cmp: C) -> Self {
        Self { tree: RbTree::with_compare(true, cmp) }
    }
    pub fn multi_with_compare(cmp: C) -> Self {
        Self { tree: RbTree::with_compare(false, cmp) }
    }

    pub fn as_tree(&self) -> &RbTree<K, V, C> { &self.tree }

    pub fn len(&self) -> usize { self.tree.len() }
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }
    pub fn is_unique(&self) -> bool { self.tree.is_unique() }
    pub fn clear(&mut self) { self.tree.clear() }

    pub fn begin(&self) -> Handle { self.tree.begin() }
    pub fn end(&self) -> Handle { self.tree.end() }
    pub fn next(&self, h: Handle) -> Handle { self.tree.next(h) }
    pub fn prev(&self, h: Handle) -> Handle { self.tree.prev(h) }
    pub fn is_valid(&self, h: Handle) -> bool { self.tree.is_valid(h) }

    pub fn at(&self, h: Handle) -> Option<(&K, &V)> { self.tree.at(h) }
    pub fn at_mut(&mut self, h: Handle) -> Option<(&K, &mut V)> {
        self.tree.at_mut(h)
    }
    pub fn first(&self) -> Option<(&K, &V)> { self.tree.first() }
    pub fn last(&self) -> Option<(&K, &V)> { self.tree.last() }

    pub fn erase_node(&mut self, h: Handle) -> (K, V) { self.tree.erase_node(h) }
    pub fn try_erase_node(&mut self, h: Handle) -> Result<(K, V), HandleError> {
        self.tree.try_erase_node(h)
    }
    pub fn erase_range(&mut self, first: Handle, last: Handle) -> usize {
        self.tree.erase_range(first, last)
    }

    pub fn iter(&self) -> MapIter<'_, K, V> { MapIter(self.tree.iter()) }
    pub fn iter_mut(&mut self) -> MapIterMut<'_, K, V> {
        MapIterMut(self.tree.iter_mut())
    }
    pub fn keys(&self) -> Keys<'_, K, V> { Keys(self.tree.iter()) }
    pub fn values(&self) -> Values<'_, K, V> { Values(self.tree.iter()) }
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.tree.iter_mut())
    }
}

impl<K, V, C: Compare<K>> RbMap<K, V, C> {
    /// Inserts `(key, value)`. A unique map already holding `key` keeps
    /// its stored value and returns that entry's handle with `false`.
    pub fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        self.tree.insert(key, value)
    }

    /// Stores `value` under `key` unless `key` is present, then returns
    /// the value now associated with `key`. On a multi map this always
    /// stores.
    pub fn get_or_insert(&mut self, key: K, value: V) -> (&mut V, bool) {
        let (h, inserted) = self.tree.insert(key, value);
        match self.tree.at_mut(h) {
            Some((_, v)) => (v, inserted),
            None => unreachable!("insertion yields a live handle"),
        }
    }

    pub fn find(&self, key: &K) -> Handle { self.tree.find(key) }
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.value_at(self.tree.find(key))
    }
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let h = self.tree.find(key);
        self.tree.at_mut(h).map(|(_, v)| v)
    }
    pub fn contains_key(&self, key: &K) -> bool { self.tree.contains_key(key) }
    pub fn lower_bound(&self, key: &K) -> Handle { self.tree.lower_bound(key) }
    pub fn upper_bound(&self, key: &K) -> Handle { self.tree.upper_bound(key) }
    pub fn equal_range(&self, key: &K) -> (Handle, Handle) {
        self.tree.equal_range(key)
    }
    pub fn count(&self, key: &K) -> usize { self.tree.count(key) }
    pub fn erase(&mut self, key: &K) -> usize { self.tree.erase(key) }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut res = Self::new();
        res.extend(iter);
        res
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RbMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

macro_rules! impl_iter {
    ( $( $name:ident <$($lt:lifetime)?> : $item:ty = |$x:pat_param| $f:expr; )* ) => { $(
        impl<$($lt,)? K, V> Iterator for $name<$($lt,)? K, V> {
            type Item = $item;
            fn next(&mut self) -> Option<$item> { self.0.next().map(|$x| $f) }
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.0.size_hint()
            }
        }
        impl<$($lt,)? K, V> DoubleEndedIterator for $name<$($lt,)? K, V> {
            fn next_back(&mut self) -> Option<$item> {
                self.0.next_back().map(|$x| $f)
            }
        }
        impl<$($lt,)? K, V> ExactSizeIterator for $name<$($lt,)? K, V> {}
        impl<$($lt,)? K, V> FusedIterator for $name<$($lt,)? K, V> {}
    )* };
}

impl_iter! {
    MapIter<'a>: (&'a K, &'a V) = |e| e;
    MapIterMut<'a>: (&'a K, &'a mut V) = |e| e;
    MapIntoIter<>: (K, V) = |e| e;
    Keys<'a>: &'a K = |(k, _)| k;
    Values<'a>: &'a V = |(_, v)| v;
    ValuesMut<'a>: &'a mut V = |(_, v)| v;
}

impl<K, V, C> IntoIterator for RbMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = MapIntoIter<K, V>;
    fn into_iter(self) -> MapIntoIter<K, V> {
        MapIntoIter(self.tree.into_iter())
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapIter<'a, K, V>;
    fn into_iter(self) -> MapIter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut RbMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = MapIterMut<'a, K, V>;
    fn into_iter(self) -> MapIterMut<'a, K, V> { self.iter_mut() }
}

#[test]
fn insertion_order() {
    let slice = [1, 4, 6, 5, 3, 7, 2, 9];
    let mut map = RbMap::new();
    for (i, &k) in slice.iter().enumerate() {
        map.insert(k, i);
    }
    let actual: Vec<_> = map.iter().map(|(&k, &i)| (k, i)).collect();
    assert_eq!(
        actual,
        [(1, 0), (2, 6), (3, 4), (4, 1), (5, 3), (6, 2), (7, 5), (9, 7)]
    );
}

#[test]
fn store_or_load() {
    let slice = [1, 4, 6, 5, 3, 7, 2, 9];
    let mut map = RbMap::with_compare(|a: &i32, b: &i32| a.cmp(b));
    for &k in &slice {
        let (v, inserted) = map.get_or_insert(k, k * 10);
        assert!(inserted);
        assert_eq!(*v, k * 10);
    }
    let (v, inserted) = map.get_or_insert(4, 0);
    assert!(!inserted);
    assert_eq!(*v, 40);
    *v += 1;
    assert_eq!(map.get(&4), Some(&41));

    let mut sorted = slice;
    sorted.sort_unstable();
    assert!(map.keys().eq(sorted.iter()));
    for &k in &sorted {
        assert_eq!(map.erase(&k), 1);
    }
    assert!(map.is_empty());
    assert_eq!(map.get(&4), None);
}

#[test]
fn unique_keeps_value() {
    use maplit::btreemap;

    let mut map = RbMap::new();
    map.insert("a", 1);
    let (h, inserted) = map.insert("a", 2);
    assert!(!inserted);
    assert_eq!(map.at(h), Some((&"a", &1)));
    if let Some((_, v)) = map.at_mut(h) {
        *v = 3;
    }
    map.insert("b", 4);
    if let Some(v) = map.get_mut(&"b") {
        *v *= 10;
    }

    let expected = btreemap! { "a" => 3, "b" => 40 };
    let actual: std::collections::BTreeMap<_, _> = map.clone().into_iter().collect();
    assert_eq!(actual, expected);
    assert_eq!(format!("{map:?}"), r#"{"a": 3, "b": 40}"#);
}

#[test]
fn multi() {
    let mut map = RbMap::new_multi();
    map.extend([(2, 'x'), (1, 'a'), (2, 'y'), (2, 'z')]);
    assert_eq!(map.len(), 4);
    assert_eq!(map.count(&2), 3);
    assert_eq!(map.get(&2), Some(&'x'));

    let (lo, hi) = map.equal_range(&2);
    let mut vs = vec![];
    let mut it = lo;
    while it != hi {
        vs.push(*map.at(it).unwrap().1);
        it = map.next(it);
    }
    assert_eq!(vs, ['x', 'y', 'z']);

    let (_, inserted) = map.get_or_insert(1, 'b');
    assert!(inserted);
    assert_eq!(map.values().copied().collect::<String>(), "abxyz");

    assert_eq!(map.erase_node(lo), (2, 'x'));
    assert_eq!(map.get(&2), Some(&'y'));
    map.as_tree().assert_invariants();
}

#[test]
fn iterators() {
    let mut map: RbMap<_, _> = (0..10).map(|i| (i, i * i)).collect();
    for v in map.values_mut() {
        *v += 1;
    }
    for (&k, v) in &mut map {
        assert_eq!(*v, k * k + 1);
        *v -= 1;
    }
    assert!(map.iter().rev().map(|(&k, _)| k).eq((0..10).rev()));
    assert_eq!(map.keys().len(), 10);
    assert_eq!(map.values().nth(3), Some(&9));
    let back: Vec<_> = map.iter_mut().rev().take(2).map(|(&k, _)| k).collect();
    assert_eq!(back, [9, 8]);
    for (k, v) in &map {
        assert_eq!(*v, k * k);
    }
    assert_eq!(map.first(), Some((&0, &0)));
    assert_eq!(map.last(), Some((&9, &81)));

    let h = map.lower_bound(&5);
    assert_eq!(map.erase_range(h, map.end()), 5);
    assert_eq!(map.at(map.prev(map.end())), Some((&4, &16)));
    map.clear();
    assert!(map.is_empty());
    assert!(!map.is_valid(h));
}

#[test]
fn random_ops() {
    use std::collections::BTreeMap;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_seed([
        0xA4, 0x9E, 0x61, 0xE6, 0x1E, 0x7E, 0x29, 0x77, 0x55, 0xEF, 0xE0, 0x3C,
        0x71, 0xDA, 0xFC, 0xAB, 0x38, 0x9A, 0xF5, 0x67, 0xF5, 0xDD, 0x07, 0x06,
        0xAE, 0xE4, 0x5A, 0xDC, 0x5C, 0x1A, 0x9F, 0xEB,
    ]);
    let mut actual = RbMap::new();
    let mut expected = BTreeMap::new();
    for t in 0..2000 {
        let k = rng.gen_range(0..200);
        if rng.gen_bool(0.6) {
            let (v, inserted) = actual.get_or_insert(k, t);
            let e = expected.entry(k);
            let vacant = matches!(e, std::collections::btree_map::Entry::Vacant(_));
            assert_eq!(inserted, vacant);
            assert_eq!(v, e.or_insert(t));
        } else {
            assert_eq!(actual.erase(&k), expected.remove(&k).map_or(0, |_| 1));
        }
    }
    assert!(actual.iter().eq(expected.iter()));
    actual.as_tree().assert_invariants();
}
