//! Red-black tree with stable handles.
//!
//! Nodes live in an arena and are addressed by index. Slot `0` is the
//! black sentinel: it stands for every missing child and for the
//! past-the-end position. A [`Handle`] names one node and stays valid
//! until that node is erased; neither insertions nor the erasure of
//! other nodes change which element a handle denotes.
//!
//! ```
//! use rb_tree::RbTree;
//!
//! let mut tree = RbTree::new(true);
//! for (k, v) in [(3, 'c'), (1, 'a'), (2, 'b')] {
//!     tree.insert(k, v);
//! }
//! let h = tree.find(&2);
//! tree.erase(&1);
//! assert_eq!(tree.at(h), Some((&2, &'b')));
//! assert_eq!(tree.at(tree.next(h)), Some((&3, &'c')));
//! ```

use std::{cmp::Ordering, fmt};

use compare::{Compare, Natural};

mod debug;
mod iter;
mod navigate;

pub use iter::{IntoIter, Iter, IterMut};

use navigate::{minimum, predecessor, successor};

const NIL: usize = 0;

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
    };
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    fn opp(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone, Debug)]
struct Link {
    parent: usize,
    children: [usize; 2],
    color: Color,
    // bumped whenever the slot is vacated
    gen: u64,
}

impl Link {
    fn new(parent: usize, color: Color, gen: u64) -> Self {
        Self { parent, children: [NIL; 2], color, gen }
    }
    fn left(&self) -> usize { self.children[Side::Left as usize] }
    fn right(&self) -> usize { self.children[Side::Right as usize] }
}

/// A position in a tree: either a live node or the end.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    idx: usize,
    gen: u64,
}

impl Handle {
    const END: Self = Self { idx: NIL, gen: 0 };

    pub fn is_end(self) -> bool { self.idx == NIL }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandleError {
    End,
    Stale(Handle),
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::End => {
                write!(f, "the end handle does not denote an element")
            }
            HandleError::Stale(h) => {
                write!(f, "handle {h:?} refers to an erased element")
            }
        }
    }
}

impl std::error::Error for HandleError {}

#[derive(Clone)]
pub struct RbTree<K, V, C = Natural> {
    links: Vec<Link>,
    elems: Vec<Option<(K, V)>>,
    free: Vec<usize>,
    root: usize,
    leftmost: usize,
    rightmost: usize,
    len: usize,
    unique: bool,
    cmp: C,
}

impl<K: Ord, V> RbTree<K, V> {
    /// An empty tree ordered by [`Ord`]. With `unique`, inserting a key
    /// equal to a stored one is rejected.
    pub fn new(unique: bool) -> Self { Self::with_compare(unique, Natural) }
}

impl<K: Ord, V> Default for RbTree<K, V> {
    fn default() -> Self { Self::new(true) }
}

impl<K, V, C> RbTree<K, V, C> {
    pub fn with_compare(unique: bool, cmp: C) -> Self {
        Self {
            links: vec![Link::new(NIL, Color::Black, 0)],
            elems: vec![None],
            free: vec![],
            root: NIL,
            leftmost: NIL,
            rightmost: NIL,
            len: 0,
            unique,
            cmp,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn is_unique(&self) -> bool { self.unique }
    pub fn comparator(&self) -> &C { &self.cmp }

    /// Removes every element. All handles obtained so far become stale.
    pub fn clear(&mut self) {
        trace!("clearing {} elements", self.len);
        let mut stack = vec![self.root];
        while let Some(x) = stack.pop() {
            if x == NIL {
                continue;
            }
            stack.extend(self.links[x].children);
            self.elems[x] = None;
            self.vacate(x);
        }
        self.links[NIL] = Link::new(NIL, Color::Black, 0);
        self.root = NIL;
        self.leftmost = NIL;
        self.rightmost = NIL;
        self.len = 0;
    }

    pub fn begin(&self) -> Handle { self.handle(self.leftmost) }
    pub fn end(&self) -> Handle { Handle::END }

    /// The in-order successor of `h`; `next(end())` is `end()`.
    ///
    /// # Panics
    /// Panics if `h` is stale.
    pub fn next(&self, h: Handle) -> Handle {
        match self.position(h) {
            NIL => Handle::END,
            x => self.handle(successor(&self.links, x)),
        }
    }

    /// The in-order predecessor of `h`; `prev(end())` is the last element
    /// and `prev(begin())` is `end()`.
    ///
    /// # Panics
    /// Panics if `h` is stale.
    pub fn prev(&self, h: Handle) -> Handle {
        match self.position(h) {
            NIL => self.handle(self.rightmost),
            x => self.handle(predecessor(&self.links, x)),
        }
    }

    /// Whether `h` denotes a live element of this tree.
    pub fn is_valid(&self, h: Handle) -> bool { self.checked_index(h).is_ok() }

    /// The element at `h`, or `None` for `end()`.
    ///
    /// # Panics
    /// Panics if `h` is stale.
    pub fn at(&self, h: Handle) -> Option<(&K, &V)> {
        let x = self.position(h);
        self.elems[x].as_ref().map(|(k, v)| (k, v))
    }
    pub fn at_mut(&mut self, h: Handle) -> Option<(&K, &mut V)> {
        let x = self.position(h);
        self.elems[x].as_mut().map(|(k, v)| (&*k, v))
    }
    pub fn key_at(&self, h: Handle) -> Option<&K> { self.at(h).map(|(k, _)| k) }
    pub fn value_at(&self, h: Handle) -> Option<&V> {
        self.at(h).map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.elems[self.leftmost].as_ref().map(|(k, v)| (k, v))
    }
    pub fn last(&self) -> Option<(&K, &V)> {
        self.elems[self.rightmost].as_ref().map(|(k, v)| (k, v))
    }

    /// Removes the element at `h` and returns it. Only `h` (and its
    /// copies) is invalidated.
    ///
    /// # Panics
    /// Panics if `h` is `end()` or stale.
    pub fn erase_node(&mut self, h: Handle) -> (K, V) {
        match self.try_erase_node(h) {
            Ok(elem) => elem,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_erase_node(&mut self, h: Handle) -> Result<(K, V), HandleError> {
        let x = self.checked_index(h)?;
        Ok(self.remove(x))
    }

    /// Removes every element in `[first, last)` and returns how many.
    ///
    /// # Panics
    /// Panics if either handle is stale or if `last` is not reachable
    /// from `first`; nothing is removed in that case.
    pub fn erase_range(&mut self, first: Handle, last: Handle) -> usize {
        let mut x = self.position(first);
        let end = self.position(last);
        if x == self.leftmost && end == NIL {
            let len = self.len;
            self.clear();
            return len;
        }

        let mut count = 0;
        let mut y = x;
        while y != end {
            assert_ne!(y, NIL, "`last` is not reachable from `first`");
            y = successor(&self.links, y);
            count += 1;
        }
        trace!("erasing a range of {count} elements");
        for _ in 0..count {
            let next = successor(&self.links, x);
            self.remove(x);
            x = next;
        }
        count
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.links, &self.elems, self.leftmost, self.rightmost, self.len)
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(
            &self.links,
            &mut self.elems,
            self.leftmost,
            self.rightmost,
            self.len,
        )
    }

    fn handle(&self, x: usize) -> Handle {
        Handle { idx: x, gen: self.links[x].gen }
    }

    fn checked_index(&self, h: Handle) -> Result<usize, HandleError> {
        if h.is_end() {
            return Err(HandleError::End);
        }
        match (self.links.get(h.idx), self.elems.get(h.idx)) {
            (Some(link), Some(Some(_))) if link.gen == h.gen => Ok(h.idx),
            _ => Err(HandleError::Stale(h)),
        }
    }

    // Like `checked_index`, but `end()` maps to the sentinel.
    fn position(&self, h: Handle) -> usize {
        match self.checked_index(h) {
            Ok(x) => x,
            Err(HandleError::End) => NIL,
            Err(e) => panic!("{e}"),
        }
    }

    fn key_of(&self, x: usize) -> &K {
        match &self.elems[x] {
            Some((k, _)) => k,
            None => unreachable!("slot {x} holds no element"),
        }
    }

    fn color(&self, x: usize) -> Color { self.links[x].color }
    fn parent(&self, x: usize) -> usize { self.links[x].parent }
    fn child(&self, x: usize, side: Side) -> usize {
        self.links[x].children[side as usize]
    }
    fn set_child(&mut self, x: usize, side: Side, c: usize) {
        self.links[x].children[side as usize] = c;
    }
    fn side_of(&self, x: usize) -> Side {
        if self.child(self.parent(x), Side::Left) == x {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn alloc(&mut self, key: K, value: V, parent: usize) -> usize {
        if let Some(x) = self.free.pop() {
            let gen = self.links[x].gen;
            self.links[x] = Link::new(parent, Color::Red, gen);
            self.elems[x] = Some((key, value));
            x
        } else {
            self.links.push(Link::new(parent, Color::Red, 0));
            self.elems.push(Some((key, value)));
            self.links.len() - 1
        }
    }

    fn vacate(&mut self, x: usize) {
        let gen = self.links[x].gen + 1;
        self.links[x] = Link::new(NIL, Color::Black, gen);
        self.free.push(x);
    }

    fn replace_child(&mut self, p: usize, old: usize, new: usize) {
        if p == NIL {
            self.root = new;
        } else if self.child(p, Side::Left) == old {
            self.set_child(p, Side::Left, new);
        } else {
            self.set_child(p, Side::Right, new);
        }
    }

    /// Moves `x` down toward `side`; its child on the other side takes
    /// its place.
    fn rotate(&mut self, x: usize, side: Side) {
        let y = self.child(x, side.opp());
        debug_assert_ne!(y, NIL);
        let inner = self.child(y, side);
        self.set_child(x, side.opp(), inner);
        if inner != NIL {
            self.links[inner].parent = x;
        }
        let p = self.parent(x);
        self.links[y].parent = p;
        self.replace_child(p, x, y);
        self.set_child(y, side, x);
        self.links[x].parent = y;
    }

    /// Puts the subtree `v` where the subtree `u` was. `v` may be the
    /// sentinel, whose parent is then used by the deletion fix-up.
    fn transplant(&mut self, u: usize, v: usize) {
        let p = self.parent(u);
        self.replace_child(p, u, v);
        self.links[v].parent = p;
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while self.color(self.parent(z)) == Color::Red {
            // a red parent is never the root, so the grandparent exists
            let p = self.parent(z);
            let g = self.parent(p);
            let side = self.side_of(p);
            let uncle = self.child(g, side.opp());
            if self.color(uncle) == Color::Red {
                self.links[p].color = Color::Black;
                self.links[uncle].color = Color::Black;
                self.links[g].color = Color::Red;
                z = g;
            } else {
                if z == self.child(p, side.opp()) {
                    z = p;
                    self.rotate(z, side);
                }
                let p = self.parent(z);
                let g = self.parent(p);
                self.links[p].color = Color::Black;
                self.links[g].color = Color::Red;
                self.rotate(g, side.opp());
            }
        }
        let root = self.root;
        self.links[root].color = Color::Black;
    }

    fn remove(&mut self, z: usize) -> (K, V) {
        if z == self.leftmost {
            self.leftmost = successor(&self.links, z);
        }
        if z == self.rightmost {
            self.rightmost = predecessor(&self.links, z);
        }

        let [zl, zr] = self.links[z].children;
        let mut removed = self.color(z);
        let x = if zl == NIL {
            self.transplant(z, zr);
            zr
        } else if zr == NIL {
            self.transplant(z, zl);
            zl
        } else {
            // The successor takes over `z`'s position and color, so no
            // other node changes identity.
            let y = minimum(&self.links, zr);
            removed = self.color(y);
            let x = self.child(y, Side::Right);
            if self.parent(y) == z {
                self.links[x].parent = y;
            } else {
                self.transplant(y, x);
                self.set_child(y, Side::Right, zr);
                self.links[zr].parent = y;
            }
            self.transplant(z, y);
            self.set_child(y, Side::Left, zl);
            self.links[zl].parent = y;
            self.links[y].color = self.color(z);
            x
        };
        if removed == Color::Black {
            self.delete_fixup(x);
        }
        self.links[NIL].parent = NIL;

        self.len -= 1;
        let elem = self.elems[z].take();
        self.vacate(z);
        match elem {
            Some(elem) => elem,
            None => unreachable!("slot {z} holds no element"),
        }
    }

    // `x` carries an extra black.
    fn delete_fixup(&mut self, mut x: usize) {
        while x != self.root && self.color(x) == Color::Black {
            let p = self.parent(x);
            let side = if self.child(p, Side::Left) == x {
                Side::Left
            } else {
                Side::Right
            };
            let mut w = self.child(p, side.opp());
            if self.color(w) == Color::Red {
                self.links[w].color = Color::Black;
                self.links[p].color = Color::Red;
                self.rotate(p, side);
                w = self.child(p, side.opp());
            }
            let near = self.child(w, side);
            let far = self.child(w, side.opp());
            if self.color(near) == Color::Black
                && self.color(far) == Color::Black
            {
                self.links[w].color = Color::Red;
                x = p;
            } else {
                if self.color(far) == Color::Black {
                    self.links[near].color = Color::Black;
                    self.links[w].color = Color::Red;
                    self.rotate(w, side.opp());
                    w = self.child(p, side.opp());
                }
                let color = self.color(p);
                self.links[w].color = color;
                self.links[p].color = Color::Black;
                let far = self.child(w, side.opp());
                self.links[far].color = Color::Black;
                self.rotate(p, side);
                x = self.root;
            }
        }
        self.links[x].color = Color::Black;
    }
}

impl<K, V, C: Compare<K>> RbTree<K, V, C> {
    /// Inserts `(key, value)`.
    ///
    /// In a unique tree holding a key equal to `key`, nothing changes
    /// and the handle of the stored element is returned with `false`;
    /// the stored value is left untouched. Otherwise the new element is
    /// placed after every element equal to it.
    pub fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        let mut parent = NIL;
        let mut side = Side::Left;
        let mut x = self.root;
        while x != NIL {
            parent = x;
            side = match self.cmp.compare(&key, self.key_of(x)) {
                Ordering::Less => Side::Left,
                Ordering::Equal if self.unique => {
                    trace!("rejected a duplicate key");
                    return (self.handle(x), false);
                }
                _ => Side::Right,
            };
            x = self.child(x, side);
        }

        let z = self.alloc(key, value, parent);
        if parent == NIL {
            self.root = z;
            self.leftmost = z;
            self.rightmost = z;
        } else {
            self.set_child(parent, side, z);
            if side == Side::Left && parent == self.leftmost {
                self.leftmost = z;
            }
            if side == Side::Right && parent == self.rightmost {
                self.rightmost = z;
            }
        }
        self.len += 1;
        self.insert_fixup(z);
        (self.handle(z), true)
    }

    /// The first element equal to `key`, or `end()`.
    pub fn find(&self, key: &K) -> Handle {
        let x = self.lower_index(key);
        if x != NIL && !self.cmp.lt(key, self.key_of(x)) {
            self.handle(x)
        } else {
            Handle::END
        }
    }

    pub fn contains_key(&self, key: &K) -> bool { !self.find(key).is_end() }

    /// The first element not less than `key`, or `end()`.
    pub fn lower_bound(&self, key: &K) -> Handle {
        self.handle(self.lower_index(key))
    }

    /// The first element greater than `key`, or `end()`.
    pub fn upper_bound(&self, key: &K) -> Handle {
        self.handle(self.upper_index(key))
    }

    pub fn equal_range(&self, key: &K) -> (Handle, Handle) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    pub fn count(&self, key: &K) -> usize {
        let mut x = self.lower_index(key);
        let mut count = 0;
        while x != NIL && !self.cmp.lt(key, self.key_of(x)) {
            count += 1;
            x = successor(&self.links, x);
        }
        count
    }

    /// Removes every element equal to `key` and returns how many.
    pub fn erase(&mut self, key: &K) -> usize {
        let (first, last) = self.equal_range(key);
        self.erase_range(first, last)
    }

    fn lower_index(&self, key: &K) -> usize {
        let mut x = self.root;
        let mut res = NIL;
        while x != NIL {
            if self.cmp.lt(self.key_of(x), key) {
                x = self.child(x, Side::Right);
            } else {
                res = x;
                x = self.child(x, Side::Left);
            }
        }
        res
    }

    fn upper_index(&self, key: &K) -> usize {
        let mut x = self.root;
        let mut res = NIL;
        while x != NIL {
            if self.cmp.lt(key, self.key_of(x)) {
                res = x;
                x = self.child(x, Side::Left);
            } else {
                x = self.child(x, Side::Right);
            }
        }
        res
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RbTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C> IntoIterator for RbTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.links, self.elems, self.leftmost, self.rightmost, self.len)
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut RbTree<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

#[cfg(test)]
fn keys<K: Clone, V, C>(tree: &RbTree<K, V, C>) -> Vec<K> {
    tree.iter().map(|(k, _)| k.clone()).collect()
}

#[test]
fn sanity_check() {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use randgen::Gen;
    use sorted_seq::SortedSeq;

    let mut rng = ChaCha20Rng::from_seed([
        0x55, 0xEF, 0xE0, 0x3C, 0x71, 0xDA, 0xFC, 0xAB, 0x5C, 0x1A, 0x9F, 0xEB,
        0xA4, 0x9E, 0x61, 0xE6, 0x1E, 0x7E, 0x29, 0x77, 0x38, 0x9A, 0xF5, 0x67,
        0xF5, 0xDD, 0x07, 0x06, 0xAE, 0xE4, 0x5A, 0xDC,
    ]);

    for unique in [true, false] {
        let mut actual: RbTree<i32, usize> = RbTree::new(unique);
        let mut expected = SortedSeq::new(unique);
        // handles[i] denotes the i-th element of `expected`
        let mut handles: Vec<Handle> = vec![];
        let handle_at = |handles: &[Handle], i: usize| {
            handles.get(i).copied().unwrap_or(Handle::END)
        };
        for t in 0..3000 {
            let key = (0..50_i32).generate(&mut rng);
            match rng.gen_range(0..12) {
                0..=5 => {
                    let (h, inserted) = actual.insert(key, t);
                    let (i, ins) = expected.insert(key, t);
                    assert_eq!(inserted, ins);
                    assert_eq!(actual.at(h), expected.get(i));
                    if inserted {
                        handles.insert(i, h);
                    }
                }
                6..=7 => {
                    let lo = expected.lower_bound(&key);
                    let hi = expected.upper_bound(&key);
                    assert_eq!(actual.erase(&key), expected.erase(&key));
                    handles.drain(lo..hi);
                }
                8..=9 => {
                    let h = actual.find(&key);
                    if !h.is_end() {
                        let (k, v) = actual.erase_node(h);
                        let i = expected.lower_bound(&key);
                        assert_eq!(handles.remove(i), h);
                        assert_eq!(expected.remove(i), (k, v));
                    }
                }
                _ => {
                    let len = expected.len();
                    let i = rng.gen_range(0..=len);
                    let j = rng.gen_range(i..=len);
                    let first = handle_at(&handles, i);
                    let last = handle_at(&handles, j);
                    assert_eq!(actual.erase_range(first, last), j - i);
                    for _ in i..j {
                        expected.remove(i);
                    }
                    for h in handles.drain(i..j) {
                        assert!(!actual.is_valid(h));
                    }
                }
            }
            actual.assert_invariants();
            assert_eq!(actual.len(), expected.len());
            assert_eq!(handles.len(), expected.len());
            for (i, &h) in handles.iter().enumerate() {
                assert_eq!(actual.at(h), expected.get(i));
            }

            let probe = (-1..51_i32).generate(&mut rng);
            assert_eq!(actual.count(&probe), expected.count(&probe));
            assert_eq!(
                actual.at(actual.lower_bound(&probe)),
                expected.get(expected.lower_bound(&probe)),
            );
            assert_eq!(
                actual.at(actual.upper_bound(&probe)),
                expected.get(expected.upper_bound(&probe)),
            );
        }
        // equal keys keep their insertion order
        assert!(actual.iter().eq(expected.iter()));
    }
}

#[test]
fn ordered_insert() {
    const N: usize = 1000;
    let mut tree: RbTree<usize, ()> = RbTree::new(true);
    for i in 0..N {
        tree.insert(i, ());
        tree.assert_invariants();
    }
    assert!(keys(&tree).into_iter().eq(0..N));

    let mut tree: RbTree<usize, ()> = RbTree::new(true);
    for i in (0..N).rev() {
        tree.insert(i, ());
        tree.assert_invariants();
    }
    assert!(keys(&tree).into_iter().eq(0..N));

    for i in (0..N).step_by(2) {
        assert_eq!(tree.erase(&i), 1);
        tree.assert_invariants();
    }
    assert!(keys(&tree).into_iter().eq((1..N).step_by(2)));
}

#[test]
fn bounds() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    for k in [1, 2, 3, 5, 7] {
        tree.insert(k, ());
    }
    assert_eq!(tree.key_at(tree.lower_bound(&4)), Some(&5));
    assert_eq!(tree.key_at(tree.upper_bound(&5)), Some(&7));
    assert_eq!(tree.key_at(tree.lower_bound(&5)), Some(&5));
    assert_eq!(tree.key_at(tree.lower_bound(&0)), Some(&1));
    assert!(tree.lower_bound(&8).is_end());
    assert!(tree.upper_bound(&8).is_end());
    assert!(tree.upper_bound(&7).is_end());
    assert!(tree.find(&4).is_end());
    assert_eq!(tree.key_at(tree.find(&3)), Some(&3));

    let (lo, hi) = tree.equal_range(&3);
    assert_eq!(tree.next(lo), hi);
    let (lo, hi) = tree.equal_range(&4);
    assert_eq!(lo, hi);
}

#[test]
fn empty_tree() {
    let mut tree: RbTree<i32, i32> = RbTree::default();
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.prev(tree.end()), tree.end());
    assert_eq!(tree.next(tree.end()), tree.end());
    assert!(tree.find(&1).is_end());
    assert!(tree.lower_bound(&1).is_end());
    assert!(tree.upper_bound(&1).is_end());
    assert_eq!(tree.count(&1), 0);
    assert_eq!(tree.erase(&1), 0);
    assert_eq!(tree.erase_range(tree.begin(), tree.end()), 0);
    assert_eq!(tree.first(), None);
    assert_eq!(tree.at(tree.end()), None);
    assert_eq!(tree.try_erase_node(tree.end()), Err(HandleError::End));
    tree.assert_invariants();
}

#[test]
fn duplicate_policy() {
    let mut tree: RbTree<i32, &str> = RbTree::new(true);
    let (h, inserted) = tree.insert(1, "old");
    assert!(inserted);
    let (h2, inserted) = tree.insert(1, "new");
    assert!(!inserted);
    assert_eq!(h, h2);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.at(h), Some((&1, &"old")));

    let mut tree: RbTree<i32, &str> = RbTree::new(false);
    let (h1, _) = tree.insert(1, "a");
    let (h2, inserted) = tree.insert(1, "b");
    assert!(inserted);
    assert_ne!(h1, h2);
    assert_eq!(tree.len(), 2);
    let (lo, hi) = tree.equal_range(&1);
    assert_eq!(lo, h1);
    assert_eq!(tree.next(lo), h2);
    assert_eq!(tree.next(h2), hi);
    assert_eq!(tree.find(&1), h1);
    assert_eq!(tree.count(&1), 2);
}

#[test]
fn handle_stability() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    for k in [1, 2, 3] {
        tree.insert(k, ());
    }
    let it = tree.find(&2);
    tree.erase(&1);
    assert_eq!(tree.key_at(it), Some(&2));
    assert_eq!(tree.key_at(tree.next(it)), Some(&3));

    // Erasing a node with two children must not relocate its successor.
    let mut tree: RbTree<i32, i32> = RbTree::new(true);
    let handles: Vec<_> = (0..64).map(|k| tree.insert(k, -k).0).collect();
    let root = tree.root;
    let victim = tree.handle(root);
    let (k, _) = tree.at(victim).map(|(&k, &v)| (k, v)).unwrap();
    assert_ne!(tree.links[root].left(), NIL);
    assert_ne!(tree.links[root].right(), NIL);
    tree.erase_node(victim);
    tree.assert_invariants();
    for (i, &h) in handles.iter().enumerate() {
        let i = i as i32;
        if i == k {
            assert!(!tree.is_valid(h));
        } else {
            assert_eq!(tree.at(h), Some((&i, &-i)));
        }
    }
}

#[test]
#[should_panic(expected = "erased")]
fn stale_handle() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    let (h, _) = tree.insert(1, ());
    tree.erase_node(h);
    tree.insert(2, ()); // reuses the slot
    tree.next(h);
}

#[test]
fn stale_after_clear() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    let (h, _) = tree.insert(1, ());
    tree.clear();
    assert!(tree.is_empty());
    let (h2, _) = tree.insert(1, ());
    assert!(!tree.is_valid(h));
    assert!(tree.is_valid(h2));
    assert_eq!(tree.try_erase_node(h), Err(HandleError::Stale(h)));
    tree.assert_invariants();
}

#[test]
fn scenario() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    for k in [1, 4, 6, 5, 3, 7, 2, 9] {
        tree.insert(k, ());
    }
    assert_eq!(keys(&tree), [1, 2, 3, 4, 5, 6, 7, 9]);

    let mut it = tree.begin();
    while it != tree.end() {
        let next = tree.next(it);
        tree.erase_node(it);
        tree.assert_invariants();
        it = next;
    }
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.begin(), tree.end());
}

#[test]
fn reverse_traversal() {
    let mut tree: RbTree<i32, ()> = RbTree::new(false);
    for k in [5, 1, 3, 3, 9, 7] {
        tree.insert(k, ());
    }
    let mut a = vec![];
    let mut it = tree.prev(tree.end());
    while it != tree.end() {
        a.push(*tree.key_at(it).unwrap());
        it = tree.prev(it);
    }
    assert_eq!(a, [9, 7, 5, 3, 3, 1]);
    assert_eq!(tree.prev(tree.begin()), tree.end());
    assert_eq!(tree.first(), Some((&1, &())));
    assert_eq!(tree.last(), Some((&9, &())));
}

#[test]
fn erase_range() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    for k in 0..20 {
        tree.insert(k, ());
    }
    let h = tree.find(&5);
    assert_eq!(tree.erase_range(h, h), 0);
    assert_eq!(tree.len(), 20);

    let first = tree.find(&5);
    let last = tree.find(&15);
    assert_eq!(tree.erase_range(first, last), 10);
    tree.assert_invariants();
    assert_eq!(keys(&tree), [0, 1, 2, 3, 4, 15, 16, 17, 18, 19]);
    assert_eq!(tree.key_at(last), Some(&15));

    let first = tree.find(&17);
    assert_eq!(tree.erase_range(first, tree.end()), 3);
    tree.assert_invariants();
    assert_eq!(tree.last(), Some((&16, &())));

    assert_eq!(tree.erase_range(tree.begin(), tree.end()), 7);
    tree.assert_invariants();
    assert!(tree.is_empty());
    assert_eq!(tree.root, NIL);
    assert_eq!(tree.begin(), tree.end());
}

#[test]
#[should_panic(expected = "not reachable")]
fn erase_range_reversed() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    for k in 0..5 {
        tree.insert(k, ());
    }
    let first = tree.find(&3);
    let last = tree.find(&1);
    tree.erase_range(first, last);
}

#[test]
fn erase_all_multi() {
    let mut tree: RbTree<i32, usize> = RbTree::new(false);
    for (i, k) in [2, 1, 2, 3, 2, 2].into_iter().enumerate() {
        tree.insert(k, i);
    }
    let h = tree.find(&3);
    assert_eq!(tree.erase(&2), 4);
    tree.assert_invariants();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.at(h), Some((&3, &3)));
    assert_eq!(tree.erase(&2), 0);
}

#[test]
fn custom_order() {
    use compare::Reverse;

    let mut tree = RbTree::with_compare(true, Reverse(Natural));
    for k in [3, 1, 4, 1, 5, 9, 2, 6] {
        tree.insert(k, ());
    }
    tree.assert_invariants();
    assert_eq!(keys(&tree), [9, 6, 5, 4, 3, 2, 1]);
    assert_eq!(tree.key_at(tree.lower_bound(&7)), Some(&6));
    assert_eq!(tree.key_at(tree.upper_bound(&6)), Some(&5));

    let by_len =
        |a: &&str, b: &&str| a.len().cmp(&b.len());
    let mut tree = RbTree::with_compare(false, by_len);
    for (i, s) in ["ccc", "a", "bb", "dd", "e"].into_iter().enumerate() {
        tree.insert(s, i);
    }
    tree.assert_invariants();
    let a: Vec<_> = tree.iter().map(|(&k, _)| k).collect();
    assert_eq!(a, ["a", "e", "bb", "dd", "ccc"]);
    assert_eq!(tree.count(&"xx"), 2);
}

#[test]
fn iterators() {
    let mut tree: RbTree<i32, i32> = RbTree::new(true);
    for k in [4, 2, 6, 1, 3, 5, 7] {
        tree.insert(k, k * 10);
    }
    let mut iter = tree.iter();
    assert_eq!(iter.len(), 7);
    assert_eq!(iter.next(), Some((&1, &10)));
    assert_eq!(iter.next_back(), Some((&7, &70)));
    assert_eq!(iter.len(), 5);
    let rest: Vec<_> = iter.map(|(&k, _)| k).collect();
    assert_eq!(rest, [2, 3, 4, 5, 6]);

    for (_, v) in tree.iter_mut() {
        *v += 1;
    }
    for (&k, v) in &mut tree {
        assert_eq!(*v, k * 10 + 1);
    }
    let h = tree.find(&3);
    if let Some((_, v)) = tree.at_mut(h) {
        *v = 0;
    }
    assert_eq!(tree.value_at(h), Some(&0));

    let back: Vec<_> = tree.iter().rev().map(|(&k, _)| k).collect();
    assert_eq!(back, [7, 6, 5, 4, 3, 2, 1]);

    let owned: Vec<_> = tree.clone().into_iter().collect();
    assert_eq!(owned.len(), 7);
    assert_eq!(owned[2], (3, 0));
    let mut into = tree.into_iter();
    assert_eq!(into.next_back(), Some((7, 71)));
    assert_eq!(into.next(), Some((1, 11)));
    assert_eq!(into.len(), 5);
}

#[test]
fn slot_reuse() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    for k in 0..10 {
        tree.insert(k, ());
    }
    for k in 0..10 {
        tree.erase(&k);
    }
    for k in 10..20 {
        tree.insert(k, ());
    }
    tree.assert_invariants();
    assert_eq!(tree.links.len(), 11);
    assert_eq!(keys(&tree), (10..20).collect::<Vec<_>>());
}

#[test]
fn clear_after_peak() {
    const N: i32 = 1000;
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    let handles: Vec<_> = (0..N).map(|k| tree.insert(k, ()).0).collect();
    assert_eq!(tree.erase_range(tree.find(&1), tree.end()), N as usize - 1);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.free.len(), N as usize - 1);

    for k in 0..100 {
        let old = tree.begin();
        assert_eq!(tree.erase_range(tree.begin(), tree.end()), 1);
        assert!(!tree.is_valid(old));
        assert_eq!(tree.free.len() + 1, tree.links.len());
        assert_eq!(tree.root, NIL);
        tree.assert_invariants();
        tree.insert(k, ());
        assert_eq!(tree.links.len(), N as usize + 1);
        assert_eq!(tree.free.len(), N as usize - 1);
        tree.assert_invariants();
    }
    tree.clear();
    assert_eq!(tree.free.len(), N as usize);
    assert!(handles.iter().all(|&h| !tree.is_valid(h)));
    tree.assert_invariants();
}

#[test]
fn generation_past_u32() {
    let mut tree: RbTree<i32, ()> = RbTree::new(true);
    let (h, _) = tree.insert(1, ());
    let stale = Handle { idx: h.idx, gen: 0 };
    tree.links[h.idx].gen = u32::MAX as u64;
    let h = tree.handle(h.idx);
    tree.erase_node(h);
    let (h2, _) = tree.insert(2, ());
    assert_eq!(h2.idx, h.idx);
    assert_eq!(h2.gen, u32::MAX as u64 + 1);
    assert!(!tree.is_valid(h));
    assert!(!tree.is_valid(stale));
    assert!(tree.is_valid(h2));
}

#[test]
fn debug_fmt() {
    let mut tree: RbTree<i32, char> = RbTree::new(true);
    tree.extend([(2, 'b'), (1, 'a'), (3, 'c')]);
    assert_eq!(format!("{tree:?}"), "{1: 'a', 2: 'b', 3: 'c'}");
    tree.visualize();
}
