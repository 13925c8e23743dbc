//! Total orders over keys.
//!
//! A comparator is fixed when a container is built and must stay
//! consistent for the container's whole lifetime.

use std::cmp::Ordering;

pub trait Compare<T: ?Sized> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;

    fn lt(&self, lhs: &T, rhs: &T) -> bool {
        self.compare(lhs, rhs) == Ordering::Less
    }
}

/// The order given by [`Ord`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

/// The reversed order of the inner comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reverse<C>(pub C);

/// Adapts a three-way function returning negative, zero or positive.
///
/// ```
/// use compare::{Compare, Signed};
///
/// let cmp = Signed(|a: &i64, b: &i64| a - b);
/// assert!(cmp.lt(&1, &2));
/// ```
#[derive(Clone, Copy)]
pub struct Signed<F>(pub F);

impl<T: Ord + ?Sized> Compare<T> for Natural {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering { lhs.cmp(rhs) }
}

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reverse<C> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self.0.compare(rhs, lhs)
    }
}

impl<T: ?Sized, F, I> Compare<T> for Signed<F>
where
    F: Fn(&T, &T) -> I,
    I: Ord + Default,
{
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        (self.0)(lhs, rhs).cmp(&I::default())
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering { self(lhs, rhs) }
}

#[test]
fn natural() {
    assert_eq!(Natural.compare(&1, &2), Ordering::Less);
    assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
    assert_eq!(Natural.compare(&[1, 2][..], &[1, 2][..]), Ordering::Equal);
}

#[test]
fn reverse() {
    let cmp = Reverse(Natural);
    assert_eq!(cmp.compare(&1, &2), Ordering::Greater);
    assert!(cmp.lt(&3, &2));
    assert!(!cmp.lt(&2, &2));

    let twice = Reverse(Reverse(Natural));
    assert_eq!(twice.compare(&1, &2), Ordering::Less);
}

#[test]
fn signed() {
    let cmp = Signed(|a: &i32, b: &i32| a - b);
    assert_eq!(cmp.compare(&3, &5), Ordering::Less);
    assert_eq!(cmp.compare(&5, &5), Ordering::Equal);
    assert_eq!(cmp.compare(&7, &5), Ordering::Greater);

    // only the sign matters
    let cmp = Signed(|a: &i32, b: &i32| (a - b) * 100);
    assert_eq!(cmp.compare(&4, &5), Ordering::Less);
}

#[test]
fn closure() {
    let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
    assert_eq!(by_len.compare(&"abc", &"de"), Ordering::Greater);
    assert!(by_len.lt(&"", &"x"));
}
