//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stores key their records by `Entity::id`, which lets the in-memory backend
/// share one table implementation between users and dreams.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug + From<i64>;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
