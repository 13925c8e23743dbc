use std::{iter::FusedIterator, marker::PhantomData};

use super::{
    navigate::{predecessor, successor},
    Link,
};

/// In-order iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    links: &'a [Link],
    elems: &'a [Option<(K, V)>],
    front: usize,
    back: usize,
    len: usize,
}

/// In-order iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    links: &'a [Link],
    elems: *mut Option<(K, V)>,
    front: usize,
    back: usize,
    len: usize,
    _marker: PhantomData<&'a mut [Option<(K, V)>]>,
}

/// In-order iterator over owned `(K, V)`.
pub struct IntoIter<K, V> {
    links: Vec<Link>,
    elems: Vec<Option<(K, V)>>,
    front: usize,
    back: usize,
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(
        links: &'a [Link],
        elems: &'a [Option<(K, V)>],
        front: usize,
        back: usize,
        len: usize,
    ) -> Self {
        Self { links, elems, front, back, len }
    }

    fn get(&self, x: usize) -> (&'a K, &'a V) {
        let elems: &'a [_] = self.elems;
        match &elems[x] {
            Some((k, v)) => (k, v),
            None => unreachable!("slot {x} holds no element"),
        }
    }
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(
        links: &'a [Link],
        elems: &'a mut [Option<(K, V)>],
        front: usize,
        back: usize,
        len: usize,
    ) -> Self {
        let elems = elems.as_mut_ptr();
        Self { links, elems, front, back, len, _marker: PhantomData }
    }

    fn get(&mut self, x: usize) -> (&'a K, &'a mut V) {
        // SAFETY: `x < links.len() == elems.len()`, and every slot is
        // visited at most once since `len` bounds the number of steps
        // taken from either end.
        match unsafe { &mut *self.elems.add(x) } {
            Some((k, v)) => (k, v),
            None => unreachable!("slot {x} holds no element"),
        }
    }
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(
        links: Vec<Link>,
        elems: Vec<Option<(K, V)>>,
        front: usize,
        back: usize,
        len: usize,
    ) -> Self {
        Self { links, elems, front, back, len }
    }

    fn take(&mut self, x: usize) -> (K, V) {
        match self.elems[x].take() {
            Some(elem) => elem,
            None => unreachable!("slot {x} holds no element"),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let x = self.front;
        self.len -= 1;
        if self.len > 0 {
            self.front = successor(self.links, x);
        }
        Some(self.get(x))
    }
    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let x = self.back;
        self.len -= 1;
        if self.len > 0 {
            self.back = predecessor(self.links, x);
        }
        Some(self.get(x))
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let x = self.front;
        self.len -= 1;
        if self.len > 0 {
            self.front = successor(self.links, x);
        }
        Some(self.get(x))
    }
    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let x = self.back;
        self.len -= 1;
        if self.len > 0 {
            self.back = predecessor(self.links, x);
        }
        Some(self.get(x))
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let x = self.front;
        self.len -= 1;
        if self.len > 0 {
            self.front = successor(&self.links, x);
        }
        Some(self.take(x))
    }
    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let x = self.back;
        self.len -= 1;
        if self.len > 0 {
            self.back = predecessor(&self.links, x);
        }
        Some(self.take(x))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        let Self { links, elems, front, back, len } = *self;
        Self { links, elems, front, back, len }
    }
}
