//! Debug-only detection of nested lookups.
//!
//! Mutating operations take `&mut self`, so a key callback cannot reach the
//! table while slots are being moved. Lookups only need `&self`, and a
//! table shared through `RefCell` or a thread-local can be probed again from
//! inside its own hash or equality function. Such a nested lookup panics in
//! debug builds; release builds keep no state.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct LookupGuard {
    #[cfg(debug_assertions)]
    probing: Cell<bool>,
    // Keeps tables !Send + !Sync in every build.
    _single_thread: PhantomData<*mut ()>,
}

impl LookupGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            probing: Cell::new(false),
            _single_thread: PhantomData,
        }
    }

    /// Mark a lookup as running until the returned token drops.
    #[inline]
    pub(crate) fn probe(&self) -> Probing<'_> {
        #[cfg(debug_assertions)]
        assert!(
            !self.probing.replace(true),
            "hash table re-entered from a key callback"
        );
        Probing { guard: self }
    }
}

pub(crate) struct Probing<'a> {
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    guard: &'a LookupGuard,
}

impl Drop for Probing<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.guard.probing.set(false);
    }
}
