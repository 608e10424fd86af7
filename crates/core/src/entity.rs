//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Records cached on the client (products, categories, customers) are keyed by
/// this identifier; two records with the same id are the same entity even when
/// their fields differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
