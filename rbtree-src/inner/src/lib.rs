/// Re-exports each listed crate both as a module and glob-inlined, so
/// that a category crate documents its members on a single page.
///
/// ```ignore
/// doc_inline_reexport! {
///     rb_set,
///     rb_map,
/// }
/// ```
#[macro_export]
macro_rules! doc_inline_reexport {
    ( $($lib:ident,)* ) => { $(
        #[doc(inline)]
        pub use $lib::{self, *};
    )* };
}
