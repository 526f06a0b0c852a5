//! # Identity Newtypes
//!
//! Newtype wrappers for the handles formkit hands out. These prevent
//! confusing an arena handle with an array item key, and both with a
//! positional index.
//!
//! ## Invariant
//!
//! Item keys are minted by an [`ItemKeyAllocator`] owned by exactly one
//! array controller. The allocator only counts up, so a key is never
//! reused or reassigned within that controller's lifetime, no matter how
//! items are added or removed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of an array item, independent of its current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey(u64);

impl ItemKey {
    /// The raw key value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// Monotonic source of [`ItemKey`]s for one array controller.
#[derive(Debug, Clone, Default)]
pub struct ItemKeyAllocator {
    next: u64,
}

impl ItemKeyAllocator {
    /// Create an allocator whose first key is `item:0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a key that this allocator has never returned before.
    pub fn mint(&mut self) -> ItemKey {
        let key = ItemKey(self.next);
        self.next += 1;
        key
    }

    /// Number of keys minted so far.
    pub fn minted(&self) -> u64 {
        self.next
    }
}

/// Handle of a field controller inside a session's arena.
///
/// Slots are never recycled, so a handle to a removed controller stays
/// dead instead of aliasing a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub usize);

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field:{}", self.0)
    }
}

/// Unique identifier for a form session, used to correlate log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_mints_increasing_keys() {
        let mut alloc = ItemKeyAllocator::new();
        let a = alloc.mint();
        let b = alloc.mint();
        let c = alloc.mint();
        assert!(a < b && b < c);
        assert_eq!(alloc.minted(), 3);
    }

    #[test]
    fn test_item_key_display() {
        let mut alloc = ItemKeyAllocator::new();
        alloc.mint();
        assert_eq!(alloc.mint().to_string(), "item:1");
    }

    #[test]
    fn test_session_ids_are_distinct() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
