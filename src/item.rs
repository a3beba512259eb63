//! Intrusive markers and the stores that own the records carrying them.
//!
//! A record embeds one [`MapItem`] and exposes it through [`Linked`]. The
//! records themselves live in a caller-owned [`ItemStore`]; the table only
//! keeps store handles in its slots and goes through the store to read or
//! reset a marker. Recovering the record from a handle is plain store
//! indexing, so no pointer arithmetic or record hashing is involved.

use core::fmt;
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};
use slotmap::{Key, SlotMap};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a table, recorded by every marker attached to it.
///
/// Ids are unique for the lifetime of the process and never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TableId(NonZeroU64);

impl TableId {
    pub(crate) fn fresh() -> Self {
        let raw = NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed);
        match NonZeroU64::new(raw) {
            Some(id) => TableId(id),
            None => panic!("table id space exhausted"),
        }
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

/// Map linkage embedded in a caller record.
///
/// Both fields are empty while unattached. `table` is a weak back-reference:
/// it names the table holding the item but keeps nothing alive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapItem<K> {
    table: Option<TableId>,
    key: Option<K>,
}

impl<K> MapItem<K> {
    pub const fn new() -> Self {
        Self {
            table: None,
            key: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.table.is_some()
    }

    /// The key the item is currently stored under.
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn table(&self) -> Option<TableId> {
        self.table
    }

    /// True if the item is currently held by the table with identity `id`.
    pub fn in_table(&self, id: TableId) -> bool {
        self.table == Some(id)
    }

    pub(crate) fn attach(&mut self, table: TableId, key: K) {
        if let Some(current) = self.table {
            panic!("item is already attached to {}", current);
        }
        self.table = Some(table);
        self.key = Some(key);
    }

    /// Reset both fields and hand back the key that was stored.
    pub(crate) fn detach(&mut self) -> Option<K> {
        self.table = None;
        self.key.take()
    }
}

impl<K> Default for MapItem<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A record type carrying an embedded [`MapItem`].
pub trait Linked<K> {
    fn map_item(&self) -> &MapItem<K>;
    fn map_item_mut(&mut self) -> &mut MapItem<K>;
}

/// Caller-owned storage that resolves item handles to markers.
///
/// Resolving a handle that does not name a live record is a contract
/// violation and panics.
pub trait ItemStore<K> {
    type Handle: Copy + Eq + fmt::Debug;

    fn marker(&self, h: Self::Handle) -> &MapItem<K>;
    fn marker_mut(&mut self, h: Self::Handle) -> &mut MapItem<K>;

    /// Key of an item that is known to be attached.
    #[inline]
    fn attached_key(&self, h: Self::Handle) -> &K {
        match self.marker(h).key() {
            Some(k) => k,
            None => panic!("slot refers to detached item {:?}", h),
        }
    }
}

impl<Id, R, K> ItemStore<K> for SlotMap<Id, R>
where
    Id: Key,
    R: Linked<K>,
{
    type Handle = Id;

    #[inline]
    fn marker(&self, h: Id) -> &MapItem<K> {
        match self.get(h) {
            Some(r) => r.map_item(),
            None => panic!("stale item handle {:?}", h),
        }
    }

    #[inline]
    fn marker_mut(&mut self, h: Id) -> &mut MapItem<K> {
        match self.get_mut(h) {
            Some(r) => r.map_item_mut(),
            None => panic!("stale item handle {:?}", h),
        }
    }
}

impl<R, K> ItemStore<K> for [R]
where
    R: Linked<K>,
{
    type Handle = usize;

    #[inline]
    fn marker(&self, h: usize) -> &MapItem<K> {
        self[h].map_item()
    }

    #[inline]
    fn marker_mut(&mut self, h: usize) -> &mut MapItem<K> {
        self[h].map_item_mut()
    }
}

impl<R, K> ItemStore<K> for Vec<R>
where
    R: Linked<K>,
{
    type Handle = usize;

    #[inline]
    fn marker(&self, h: usize) -> &MapItem<K> {
        self.as_slice().marker(h)
    }

    #[inline]
    fn marker_mut(&mut self, h: usize) -> &mut MapItem<K> {
        self.as_mut_slice().marker_mut(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::DefaultKey;

    #[derive(Default)]
    struct Person {
        age: u32,
        item: MapItem<&'static str>,
    }

    impl Linked<&'static str> for Person {
        fn map_item(&self) -> &MapItem<&'static str> {
            &self.item
        }
        fn map_item_mut(&mut self) -> &mut MapItem<&'static str> {
            &mut self.item
        }
    }

    #[test]
    fn new_marker_is_unattached() {
        let m: MapItem<u32> = MapItem::new();
        assert!(!m.is_attached());
        assert!(m.key().is_none());
        assert!(m.table().is_none());
    }

    #[test]
    fn attach_then_detach_resets_both_fields() {
        let id = TableId::fresh();
        let mut m = MapItem::new();
        m.attach(id, 7u32);
        assert!(m.in_table(id));
        assert_eq!(m.key(), Some(&7));
        assert_eq!(m.detach(), Some(7));
        assert_eq!(m, MapItem::new());
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn double_attach_panics() {
        let mut m = MapItem::new();
        m.attach(TableId::fresh(), 1u32);
        m.attach(TableId::fresh(), 2u32);
    }

    #[test]
    fn table_ids_are_distinct() {
        let a = TableId::fresh();
        let b = TableId::fresh();
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn slotmap_store_resolves_records() {
        let mut people: SlotMap<DefaultKey, Person> = SlotMap::new();
        let h = people.insert(Person {
            age: 31,
            ..Default::default()
        });
        people.marker_mut(h).attach(TableId::fresh(), "alex");
        assert_eq!(*people.attached_key(h), "alex");
        assert_eq!(people[h].age, 31);
    }

    #[test]
    #[should_panic(expected = "stale item handle")]
    fn stale_slotmap_handle_panics() {
        let mut people: SlotMap<DefaultKey, Person> = SlotMap::new();
        let h = people.insert(Person::default());
        people.remove(h);
        let _ = people.marker(h);
    }

    #[test]
    fn vec_store_uses_indices() {
        let mut people = vec![Person::default(), Person::default()];
        people.marker_mut(1).attach(TableId::fresh(), "riley");
        assert!(!people.marker(0).is_attached());
        assert!(people.marker(1).is_attached());
    }
}
