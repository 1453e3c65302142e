use std::marker::PhantomData;

/// Keys that can be minted from a plain counter value.
pub trait KeyType: Copy + Eq + std::hash::Hash {
    fn from_u64(value: u64) -> Self;
}

/// Hands out monotonically increasing keys. Keys are never recycled, so a
/// stale key can never alias a newer anchor or connection.
pub struct KeyGenerator<K: KeyType> {
    next: u64,
    phantom: PhantomData<K>,
}

impl<K: KeyType> KeyGenerator<K> {
    pub fn new() -> Self {
        Self {
            next: 0,
            phantom: PhantomData,
        }
    }

    pub fn generate(&mut self) -> K {
        let key = K::from_u64(self.next);
        self.next += 1;
        key
    }
}

impl<K: KeyType> Default for KeyGenerator<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FastenerKey(u64);

impl KeyType for FastenerKey {
    fn from_u64(value: u64) -> Self {
        FastenerKey(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionKey(u64);

impl KeyType for ConnectionKey {
    fn from_u64(value: u64) -> Self {
        ConnectionKey(value)
    }
}
