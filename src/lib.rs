//! slot-hashmap: an open-addressing hash table whose entries live in
//! caller-owned records.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: deterministic, allocation-light key/value storage where the
//!   table never owns or copies the stored values.
//! - Layers:
//!   - `RawSlots<I>`: the slot array. Linear probing, insertion with
//!     collision counting, backward-shift removal, rebuild into a fresh
//!     array. Knows nothing about load factors.
//!   - `HashTable<K, I, O>`: public API. Carries the key operations, the
//!     optional capacity management, and a debug-only check against nested
//!     lookups from key callbacks.
//!
//! Records and markers
//! - A record embeds a `MapItem<K>` and implements `Linked<K>` to expose it.
//! - Records live in an `ItemStore<K>`: a `slotmap::SlotMap` (generational
//!   handles) or a `Vec`/slice (index handles). The table keeps only
//!   handles; reading a slot's key or resetting a marker goes through the
//!   store passed to each call.
//! - An attached marker names its table by `TableId` and holds the key.
//!   Attaching an attached item panics. Detaching never frees the record.
//!
//! Probing and removal
//! - Start at `hash(key) % capacity` and walk forward one slot at a time,
//!   wrapping. Lookups stop at an empty slot or after one full cycle.
//! - Removal uses no tombstones: the run after the removed slot is scanned
//!   and every item whose probe sequence crosses the gap moves back into
//!   it. The scan stops at the next empty slot.
//!
//! Capacity management
//! - A managed table checks `len / capacity` after every length-changing
//!   mutation and halves below `min_load` (never under `min_capacity`) or
//!   doubles above `max_load`. Comparisons are strict.
//! - A resize allocates the new array first; allocation failure leaves the
//!   previous array in place.
//!
//! Errors
//! - Contract violations panic. Absent keys are `None`. Allocation failure
//!   is the only `TableError`.
//!
//! Notes and non-goals
//! - Single-threaded: tables are `!Send`/`!Sync`.
//! - No default hash or equality is provided.
//! - Dropping a table does not touch the markers of its items; use
//!   `destroy` or `clear` to detach them.
//!
//! ```
//! use slot_hashmap::{HashTable, KeyFns, Linked, MapItem};
//! use slotmap::SlotMap;
//!
//! struct Person {
//!     age: u32,
//!     item: MapItem<&'static str>,
//! }
//!
//! impl Linked<&'static str> for Person {
//!     fn map_item(&self) -> &MapItem<&'static str> { &self.item }
//!     fn map_item_mut(&mut self) -> &mut MapItem<&'static str> { &mut self.item }
//! }
//!
//! fn first_byte(k: &&'static str) -> usize { k.bytes().next().unwrap_or(0) as usize }
//! fn same(a: &&'static str, b: &&'static str) -> bool { a == b }
//!
//! let mut people = SlotMap::new();
//! let alex = people.insert(Person { age: 31, item: MapItem::new() });
//!
//! let mut table = HashTable::new(KeyFns::new(first_byte, same));
//! table.set(&mut people, "alex", alex);
//!
//! let found = table.get(&people, &"alex").unwrap();
//! assert_eq!(people[found].age, 31);
//! ```

mod config;
mod error;
pub mod item;
mod iter;
pub mod ops;
mod raw;
mod reentrancy;
mod table;
mod table_proptest;

// Public surface
pub use config::{Management, DEFAULT_CAPACITY, DEFAULT_MAX_LOAD, DEFAULT_MIN_LOAD};
pub use error::TableError;
pub use item::{ItemStore, Linked, MapItem, TableId};
pub use iter::Iter;
pub use ops::{KeyFns, KeyOps};
pub use table::{HashTable, Resize};
