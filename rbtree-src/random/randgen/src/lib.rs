use std::ops::Range;

use rand::{
    distributions::{Distribution, Uniform},
    seq::SliceRandom,
    Rng,
};

pub trait Gen {
    type Output;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output;
}

/// A uniformly shuffled `0..len`.
pub struct Permutation {
    pub len: usize,
}

/// `len` values drawn independently from `bound`, so duplicates are
/// expected when `len` is close to the width of `bound`.
pub struct Repeated<B> {
    pub bound: B,
    pub len: usize,
}

impl Gen for Range<i32> {
    type Output = i32;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let between = Uniform::from(self.clone());
        between.sample(rng)
    }
}

impl Gen for Permutation {
    type Output = Vec<usize>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let mut res: Vec<_> = (0..self.len).collect();
        res.shuffle(rng);
        res
    }
}

impl Gen for Repeated<Range<i32>> {
    type Output = Vec<i32>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let Self { bound, len } = self;
        let between = Uniform::from(bound.clone());
        (0..*len).map(|_| between.sample(rng)).collect()
    }
}

/// Deterministic key stream for reproducible benchmarks.
///
/// Yields `first`, then repeatedly advances the state to
/// `(state * first + add) % modulo`.
#[derive(Clone, Debug)]
pub struct AffineSeq {
    state: u64,
    first: u64,
    add: u64,
    modulo: u64,
}

impl AffineSeq {
    pub fn new(first: u64, add: u64, modulo: u64) -> Self {
        assert!(modulo > 0, "`modulo` must be positive");
        Self { state: first % modulo, first, add, modulo }
    }
}

impl Default for AffineSeq {
    fn default() -> Self { Self::new(23456, 12345, 1_000_000_007) }
}

impl Iterator for AffineSeq {
    type Item = u64;
    fn next(&mut self) -> Option<u64> {
        let Self { state, first, add, modulo } = *self;
        let next = (state as u128 * first as u128 + add as u128)
            % modulo as u128;
        self.state = next as u64;
        Some(state)
    }
}

#[test]
fn affine_seq() {
    let a: Vec<_> = AffineSeq::new(2, 1, 100).take(6).collect();
    // 2 -> 2*2+1 = 5 -> 11 -> 23 -> 47 -> 95
    assert_eq!(a, [2, 5, 11, 23, 47, 95]);

    let b: Vec<_> = AffineSeq::new(2, 1, 10).take(4).collect();
    assert_eq!(b, [2, 5, 1, 3]);

    // reproducible across clones
    let seq = AffineSeq::default();
    assert!(seq.clone().take(1000).eq(seq.take(1000)));
}

#[test]
fn affine_seq_large() {
    let modulo = 1_000_000_007;
    for x in AffineSeq::default().take(10_000) {
        assert!(x < modulo);
    }
}

#[test]
fn permutation() {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_seed([0; 32]);
    for len in [0, 1, 2, 10, 1000] {
        let mut p = Permutation { len }.generate(&mut rng);
        p.sort_unstable();
        assert!(p.into_iter().eq(0..len));
    }
}

#[test]
fn repeated() {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_seed([0; 32]);
    let n = 10_usize.pow(5);
    let a = Repeated { bound: 0..4, len: n }.generate(&mut rng);
    assert_eq!(a.len(), n);

    let mut map = BTreeMap::new();
    for x in a {
        *map.entry(x).or_insert(0) += 1;
    }
    let k = 4;
    assert_eq!(map.len(), k);
    for &v in map.values() {
        assert!(v >= (n / k) * 95 / 100);
        assert!(v <= (n / k) * 105 / 100);
    }
}
