//! Row-parallel execution that degrades to plain iteration.
//!
//! With the `parallel` feature this is rayon's prelude. Without it (single-threaded
//! builds) `into_par_iter()` simply becomes `into_iter()`, so call sites
//! chaining `.map(...).collect()` compile unchanged either way.
#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
