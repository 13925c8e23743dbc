//! Ordered containers backed by a red-black tree.
//!
//! - [`ds`] holds the tree engine and the set/map adapters built on it.
//! - [`ops`] holds the comparators.
//! - [`random`] provides seeded generators for tests and benchmarks.
//! - [`naive`] has slow reference implementations.

#[doc(inline)]
pub use ds;
#[doc(inline)]
pub use naive;
#[doc(inline)]
pub use ops;
#[doc(inline)]
pub use random;
