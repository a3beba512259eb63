//! Caller-supplied key hashing and equality.

/// Hash and equality over keys.
///
/// The table never hashes keys on its own; every instance carries the
/// operations it was built with until they are swapped by `rehash`.
pub trait KeyOps<K: ?Sized> {
    fn hash(&self, key: &K) -> usize;
    fn equals(&self, a: &K, b: &K) -> bool;

    /// Equality over possibly-empty keys: two empties are equal, an empty
    /// and a present key are not.
    #[inline]
    fn equals_opt(&self, a: Option<&K>, b: Option<&K>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.equals(a, b),
            _ => false,
        }
    }
}

/// Key operations as a pair of plain function pointers.
///
/// Every `KeyFns<K>` has the same type regardless of which functions it
/// holds, so a table can switch to a different hash at runtime.
pub struct KeyFns<K: ?Sized> {
    pub hash: fn(&K) -> usize,
    pub equals: fn(&K, &K) -> bool,
}

impl<K: ?Sized> KeyFns<K> {
    pub const fn new(hash: fn(&K) -> usize, equals: fn(&K, &K) -> bool) -> Self {
        Self { hash, equals }
    }
}

// Manual impls: derives would require `K: Clone`.
impl<K: ?Sized> Clone for KeyFns<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for KeyFns<K> {}

impl<K: ?Sized> core::fmt::Debug for KeyFns<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyFns")
            .field("hash", &(self.hash as *const ()))
            .field("equals", &(self.equals as *const ()))
            .finish()
    }
}

impl<K: ?Sized> KeyOps<K> for KeyFns<K> {
    #[inline]
    fn hash(&self, key: &K) -> usize {
        (self.hash)(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.equals)(a, b)
    }
}

impl<K: ?Sized, T: KeyOps<K> + ?Sized> KeyOps<K> for &T {
    #[inline]
    fn hash(&self, key: &K) -> usize {
        (**self).hash(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (**self).equals(a, b)
    }
}

impl<K: ?Sized, T: KeyOps<K> + ?Sized> KeyOps<K> for Box<T> {
    #[inline]
    fn hash(&self, key: &K) -> usize {
        (**self).hash(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (**self).equals(a, b)
    }
}
