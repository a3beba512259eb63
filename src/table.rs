//! HashTable: public API over the raw slot array, with capacity management.

use crate::config::{Management, DEFAULT_CAPACITY};
use crate::error::Result;
use crate::item::{ItemStore, TableId};
use crate::ops::{KeyFns, KeyOps};
use crate::raw::RawSlots;
use crate::reentrancy::LookupGuard;
use core::fmt;
use core::marker::PhantomData;
use slotmap::DefaultKey;

/// Outcome of a capacity management check.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Resize {
    Unchanged,
    Grew,
    Shrunk,
}

/// Open-addressing hash table over caller-owned items.
///
/// `K` is the key type stored in each item's marker, `I` the handle type of
/// the item store, `O` the key operations.
pub struct HashTable<K, I = DefaultKey, O = KeyFns<K>> {
    raw: RawSlots<I>,
    ops: O,
    management: Option<Management>,
    lookups: LookupGuard,
    _key: PhantomData<fn(&K)>,
}

impl<K, I, O> HashTable<K, I, O>
where
    I: Copy + Eq + fmt::Debug,
    O: KeyOps<K>,
{
    /// Managed table with the default capacity and thresholds.
    pub fn new(ops: O) -> Self {
        Self::with_management(ops, DEFAULT_CAPACITY, Management::default())
    }

    /// Table that never resizes on its own. Callers must keep
    /// `len() < capacity()` before every `set`.
    pub fn unmanaged(ops: O, capacity: usize) -> Self {
        Self {
            raw: RawSlots::with_capacity(capacity),
            ops,
            management: None,
            lookups: LookupGuard::new(),
            _key: PhantomData,
        }
    }

    pub fn with_management(ops: O, capacity: usize, management: Management) -> Self {
        let mut t = Self::unmanaged(ops, capacity);
        t.enable_management(management);
        t
    }

    /// Panics if `management` has invalid bounds.
    pub fn enable_management(&mut self, management: Management) {
        management.validate();
        self.management = Some(management);
    }

    pub fn disable_management(&mut self) {
        self.management = None;
    }

    pub fn management(&self) -> Option<Management> {
        self.management
    }

    pub fn is_managed(&self) -> bool {
        self.management.is_some()
    }

    pub fn id(&self) -> TableId {
        self.raw.id
    }

    pub fn len(&self) -> usize {
        self.raw.len
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// `len / capacity`, in `[0, 1]`.
    pub fn load_factor(&self) -> f32 {
        self.raw.len as f32 / self.raw.capacity() as f32
    }

    /// Probe steps taken by the most recent insertion, including the
    /// re-insertions done by a resize or rehash.
    pub fn last_set_collisions(&self) -> usize {
        self.raw.last_set_collisions
    }

    pub fn key_ops(&self) -> &O {
        &self.ops
    }

    pub(crate) fn raw(&self) -> &RawSlots<I> {
        &self.raw
    }

    /// Associate `key` with the unattached item `h`, replacing any item
    /// stored under an equal key. The replaced item is detached and
    /// returned.
    ///
    /// Panics if the table is full or `h` is attached to any table.
    pub fn set<S>(&mut self, store: &mut S, key: K, h: I) -> Option<I>
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let displaced = self.raw.insert(&self.ops, store, key, h);
        if displaced.is_none() {
            self.manage_after_mutation(store);
        }
        displaced
    }

    pub fn get<S>(&self, store: &S, key: &K) -> Option<I>
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let _g = self.lookups.probe();
        let index = self.raw.find(&self.ops, store, key)?;
        self.raw.slots[index]
    }

    pub fn has<S>(&self, store: &S, key: &K) -> bool
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        self.get(store, key).is_some()
    }

    /// Detach and return the item stored under `key`.
    pub fn delete<S>(&mut self, store: &mut S, key: &K) -> Option<I>
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let removed = self.raw.remove(&self.ops, store, key)?;
        self.manage_after_mutation(store);
        Some(removed)
    }

    /// True if item `h` is currently stored in this table.
    pub fn holds<S>(&self, store: &S, h: I) -> bool
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        store.marker(h).in_table(self.raw.id)
    }

    /// Apply the management thresholds once: halve below `min_load`,
    /// double above `max_load`. Unmanaged tables are left alone.
    pub fn manage<S>(&mut self, store: &mut S) -> Result<Resize>
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let Some(m) = self.management else {
            return Ok(Resize::Unchanged);
        };
        let from = self.capacity();
        let Some(to) = m.target(self.len(), from) else {
            return Ok(Resize::Unchanged);
        };
        // The raw layer never consults management, so the re-inserts below
        // cannot trigger a nested resize.
        self.rebuild(store, to)?;
        let outcome = if to > from {
            Resize::Grew
        } else {
            Resize::Shrunk
        };
        log::debug!(
            "{}: {:?} from {} to {} slots holding {} items",
            self.raw.id,
            outcome,
            from,
            to,
            self.len()
        );
        Ok(outcome)
    }

    fn manage_after_mutation<S>(&mut self, store: &mut S)
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        if self.management.is_none() {
            return;
        }
        if let Err(e) = self.manage(store) {
            log::warn!("{}: automatic resize skipped: {}", self.raw.id, e);
        }
    }

    fn rebuild<S>(&mut self, store: &mut S, capacity: usize) -> Result<()>
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        self.raw.rebuild(&self.ops, store, capacity)
    }

    /// Move every item into a new slot array of `capacity` slots.
    ///
    /// Panics if `capacity` is zero or below `len()`, or if the array
    /// cannot be allocated.
    pub fn adjust_capacity<S>(&mut self, store: &mut S, capacity: usize)
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        if let Err(e) = self.try_adjust_capacity(store, capacity) {
            panic!("{}", e);
        }
    }

    /// Like `adjust_capacity`, but reports allocation failure. On error the
    /// table is unchanged.
    pub fn try_adjust_capacity<S>(&mut self, store: &mut S, capacity: usize) -> Result<()>
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let from = self.capacity();
        self.rebuild(store, capacity)?;
        log::debug!(
            "{}: capacity adjusted from {} to {}",
            self.raw.id,
            from,
            capacity
        );
        Ok(())
    }

    /// Swap in new key operations and reposition every item under them.
    /// Returns the previous operations.
    pub fn rehash<S>(&mut self, store: &mut S, ops: O) -> O
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let old = core::mem::replace(&mut self.ops, ops);
        let capacity = self.capacity();
        self.adjust_capacity(store, capacity);
        log::debug!("{}: rehashed {} items", self.raw.id, self.len());
        old
    }

    /// Move every item into `target`, leaving this table empty.
    ///
    /// Panics unless `target` is managed or has room for all items.
    pub fn rehash_to<S, O2>(&mut self, store: &mut S, target: &mut HashTable<K, I, O2>)
    where
        S: ItemStore<K, Handle = I> + ?Sized,
        O2: KeyOps<K>,
    {
        assert!(
            target.is_managed() || self.len() <= target.capacity() - target.len(),
            "target {} has room for {} items, {} needed",
            target.id(),
            target.capacity() - target.len(),
            self.len()
        );
        let moved = self.len();
        for index in 0..self.capacity() {
            if let Some((key, h)) = self.raw.take_for_drain(store, index) {
                target.set(store, key, h);
            }
        }
        debug_assert_eq!(self.len(), 0);
        log::debug!("{}: moved {} items to {}", self.raw.id, moved, target.id());
    }

    /// Detach every item. Capacity is kept.
    pub fn clear<S>(&mut self, store: &mut S)
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        for index in 0..self.capacity() {
            let _ = self.raw.take_for_drain(store, index);
        }
    }

    /// Detach every item and release the slot array. Dropping a table
    /// without calling this leaves its items marked as attached.
    pub fn destroy<S>(mut self, store: &mut S)
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        self.clear(store);
    }
}

impl<K, I, O> fmt::Debug for HashTable<K, I, O>
where
    I: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("id", &self.raw.id)
            .field("len", &self.raw.len)
            .field("capacity", &self.raw.slots.len())
            .field("management", &self.management)
            .finish()
    }
}
