/// Marker for types compared by value and never mutated in place.
///
/// Every per-request input of the query engine (filter, sort, page, price) is
/// one, which keeps the engine free of shared mutable state.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Slug(String);
///
/// impl ValueObject for Slug {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
