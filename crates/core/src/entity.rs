/// Something the store keeps one record of per identifier.
///
/// Catalog ids are small `Copy` values, so the id is handed out by value.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}
