pub struct SortedSeq<K, V> {
    buf: Vec<(K, V)>,
    unique: bool,
}

impl<K: Ord, V> SortedSeq<K, V> {
    pub fn new(unique: bool) -> Self { Self { buf: vec![], unique } }

    pub fn is_empty(&self) -> bool { self.buf.is_empty() }
    pub fn len(&self) -> usize { self.buf.len() }

    pub fn lower_bound(&self, key: &K) -> usize {
        self.buf.partition_point(|(k, _)| k < key)
    }
    pub fn upper_bound(&self, key: &K) -> usize {
        self.buf.partition_point(|(k, _)| k <= key)
    }
    pub fn count(&self, key: &K) -> usize {
        self.upper_bound(key) - self.lower_bound(key)
    }

    /// Returns the position of the stored entry and whether it is new.
    pub fn insert(&mut self, key: K, value: V) -> (usize, bool) {
        let i = self.lower_bound(&key);
        if self.unique && i < self.buf.len() && self.buf[i].0 == key {
            return (i, false);
        }
        let i = self.upper_bound(&key);
        self.buf.insert(i, (key, value));
        (i, true)
    }

    pub fn erase(&mut self, key: &K) -> usize {
        let lo = self.lower_bound(key);
        let hi = self.upper_bound(key);
        self.buf.drain(lo..hi).count()
    }

    pub fn remove(&mut self, i: usize) -> (K, V) { self.buf.remove(i) }

    pub fn get(&self, i: usize) -> Option<(&K, &V)> {
        self.buf.get(i).map(|(k, v)| (k, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buf.iter().map(|(k, v)| (k, v))
    }
}

#[test]
fn sanity_check() {
    let mut seq = SortedSeq::new(false);
    for (i, k) in [3, 1, 3, 2, 3].into_iter().enumerate() {
        assert!(seq.insert(k, i).1);
    }
    let a: Vec<_> = seq.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(a, [(1, 1), (2, 3), (3, 0), (3, 2), (3, 4)]);
    assert_eq!(seq.count(&3), 3);
    assert_eq!(seq.lower_bound(&3), 2);
    assert_eq!(seq.upper_bound(&2), 2);
    assert_eq!(seq.erase(&3), 3);
    assert_eq!(seq.len(), 2);

    let mut seq = SortedSeq::new(true);
    assert_eq!(seq.insert(5, 'a'), (0, true));
    assert_eq!(seq.insert(5, 'b'), (0, false));
    assert_eq!(seq.get(0), Some((&5, &'a')));
}
