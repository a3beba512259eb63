//! Slot-order traversal.
//!
//! Items come back in physical slot order, which changes after deletes and
//! resizes. The borrow of the table rules out mutation mid-iteration.

use crate::item::ItemStore;
use crate::ops::KeyOps;
use crate::table::HashTable;
use core::fmt;
use core::marker::PhantomData;

/// Iterator over `(key, handle)` pairs of a table.
pub struct Iter<'a, K, I, S: ?Sized> {
    slots: core::slice::Iter<'a, Option<I>>,
    store: &'a S,
    _pd: PhantomData<&'a K>,
}

impl<'a, K, I, S> Iterator for Iter<'a, K, I, S>
where
    I: Copy + Eq + fmt::Debug,
    S: ItemStore<K, Handle = I> + ?Sized,
{
    type Item = (&'a K, I);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let store: &'a S = self.store;
        self.slots
            .by_ref()
            .find_map(|slot| slot.map(|h| (store.attached_key(h), h)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

impl<K, I, O> HashTable<K, I, O>
where
    I: Copy + Eq + fmt::Debug,
    O: KeyOps<K>,
{
    /// The raw slot array, one entry per slot.
    pub fn slots(&self) -> &[Option<I>] {
        &self.raw().slots
    }

    /// Occupied handles in slot order.
    pub fn handles(&self) -> impl Iterator<Item = I> + '_ {
        self.raw().slots.iter().filter_map(|s| *s)
    }

    pub fn iter<'a, S>(&'a self, store: &'a S) -> Iter<'a, K, I, S>
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        Iter {
            slots: self.raw().slots.iter(),
            store,
            _pd: PhantomData,
        }
    }

    /// Call `f` with the key and handle of every stored item.
    pub fn for_each<S, F>(&self, store: &S, mut f: F)
    where
        S: ItemStore<K, Handle = I> + ?Sized,
        F: FnMut(&K, I),
    {
        for (k, h) in self.iter(store) {
            f(k, h);
        }
    }
}
