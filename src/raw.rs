//! RawSlots: the fixed-size slot array with linear probing.
//!
//! This layer knows nothing about capacity management. It probes, inserts,
//! removes with backward shift, and rebuilds into a new array; callers pass
//! in the key operations and the item store on every call.

use crate::error::{Result, TableError};
use crate::item::{ItemStore, TableId};
use crate::ops::KeyOps;

/// Cyclic forward distance from slot `from` to slot `to`.
#[inline]
fn distance(from: usize, to: usize, capacity: usize) -> usize {
    (to + capacity - from) % capacity
}

fn alloc_slots<I: Copy>(capacity: usize) -> Result<Vec<Option<I>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|source| TableError::AllocFailed { capacity, source })?;
    slots.resize(capacity, None);
    Ok(slots)
}

#[derive(Debug)]
pub(crate) struct RawSlots<I> {
    pub(crate) id: TableId,
    pub(crate) slots: Vec<Option<I>>,
    pub(crate) len: usize,
    pub(crate) last_set_collisions: usize,
}

impl<I: Copy + Eq + core::fmt::Debug> RawSlots<I> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "table capacity must be positive");
        Self {
            id: TableId::fresh(),
            slots: vec![None; capacity],
            len: 0,
            last_set_collisions: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn home<K, O: KeyOps<K> + ?Sized>(&self, ops: &O, key: &K) -> usize {
        ops.hash(key) % self.capacity()
    }

    /// Slot index holding `key`. Probing stops at the first empty slot or
    /// after one full cycle.
    pub(crate) fn find<K, O, S>(&self, ops: &O, store: &S, key: &K) -> Option<usize>
    where
        O: KeyOps<K> + ?Sized,
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        if self.len == 0 {
            return None;
        }
        let capacity = self.capacity();
        let mut index = self.home(ops, key);
        for _ in 0..capacity {
            let h = self.slots[index]?;
            if ops.equals_opt(store.marker(h).key(), Some(key)) {
                return Some(index);
            }
            index = (index + 1) % capacity;
        }
        None
    }

    /// Store `h` under `key`. Returns the item that previously held an equal
    /// key, already detached.
    pub(crate) fn insert<K, O, S>(&mut self, ops: &O, store: &mut S, key: K, h: I) -> Option<I>
    where
        O: KeyOps<K> + ?Sized,
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        assert!(
            self.capacity() > self.len,
            "set on a full table ({} of {} slots used)",
            self.len,
            self.capacity()
        );
        if let Some(owner) = store.marker(h).table() {
            panic!("item {:?} is already attached to {}", h, owner);
        }

        let capacity = self.capacity();
        let mut index = self.home(ops, &key);
        let mut collisions = 0;
        while let Some(occupant) = self.slots[index] {
            if ops.equals_opt(store.marker(occupant).key(), Some(&key)) {
                break;
            }
            index = (index + 1) % capacity;
            collisions += 1;
        }

        let displaced = self.slots[index].take();
        match displaced {
            Some(old) => {
                store.marker_mut(old).detach();
            }
            None => self.len += 1,
        }
        store.marker_mut(h).attach(self.id, key);
        self.slots[index] = Some(h);
        self.last_set_collisions = collisions;
        if collisions > capacity / 2 {
            log::trace!(
                "{}: insert probed {} of {} slots",
                self.id,
                collisions,
                capacity
            );
        }
        displaced
    }

    /// Detach and return the item stored under `key`, closing the gap it
    /// leaves behind.
    pub(crate) fn remove<K, O, S>(&mut self, ops: &O, store: &mut S, key: &K) -> Option<I>
    where
        O: KeyOps<K> + ?Sized,
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let index = self.find(ops, &*store, key)?;
        let h = self.slots[index].take()?;
        store.marker_mut(h).detach();
        self.len -= 1;
        self.shift_back(ops, &*store, index);
        Some(h)
    }

    /// Walk the run after the emptied slot `gap` and pull back every item
    /// whose probe sequence passes through the gap. The scan ends at the
    /// next empty slot and never covers more than one cycle.
    fn shift_back<K, O, S>(&mut self, ops: &O, store: &S, mut gap: usize)
    where
        O: KeyOps<K> + ?Sized,
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let capacity = self.capacity();
        let mut next = (gap + 1) % capacity;
        for _ in 1..capacity {
            let Some(h) = self.slots[next] else { break };
            let home = self.home(ops, store.attached_key(h));
            // The gap lies in [home, next) when the item's probe distance
            // reaches back at least as far as the gap.
            if distance(home, next, capacity) >= distance(gap, next, capacity) {
                self.slots[gap] = self.slots[next].take();
                gap = next;
            }
            next = (next + 1) % capacity;
        }
    }

    /// Move every live item into a fresh array of `capacity` slots. The new
    /// array is allocated before anything is touched, so an allocation
    /// failure leaves the table as it was.
    pub(crate) fn rebuild<K, O, S>(&mut self, ops: &O, store: &mut S, capacity: usize) -> Result<()>
    where
        O: KeyOps<K> + ?Sized,
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        assert!(capacity > 0, "table capacity must be positive");
        assert!(
            capacity >= self.len,
            "capacity {} cannot hold {} items",
            capacity,
            self.len
        );
        let fresh = alloc_slots(capacity)?;
        let old = core::mem::replace(&mut self.slots, fresh);
        let expected = self.len;
        self.len = 0;
        for h in old.into_iter().flatten() {
            let key = match store.marker_mut(h).detach() {
                Some(k) => k,
                None => panic!("slot refers to detached item {:?}", h),
            };
            self.insert(ops, store, key, h);
        }
        debug_assert_eq!(self.len, expected);
        Ok(())
    }

    /// Empty slot `index`, detaching its item. Leaves the run unrepaired;
    /// only valid while draining the whole array.
    pub(crate) fn take_for_drain<K, S>(&mut self, store: &mut S, index: usize) -> Option<(K, I)>
    where
        S: ItemStore<K, Handle = I> + ?Sized,
    {
        let h = self.slots[index].take()?;
        self.len -= 1;
        match store.marker_mut(h).detach() {
            Some(key) => Some((key, h)),
            None => panic!("slot refers to detached item {:?}", h),
        }
    }
}
