//! Entity trait: identity that survives changes to the rest of the state.

/// Entity marker + minimal interface.
///
/// A product group is an entity: two groups holding different records are
/// still the same product when their ids match.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
