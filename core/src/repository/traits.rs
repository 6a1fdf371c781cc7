use anyhow::Result;
use uuid::Uuid;

/// Anything a [`Repository`] can store: records keyed by a stable id.
pub trait Entity {
    fn id(&self) -> Uuid;
}

pub trait Repository<T: Entity> {
    /// Inserts the item, or replaces the stored item with the same id.
    fn save(&self, item: &T) -> Result<()>;
    fn get(&self, id: &Uuid) -> Result<T>;
    fn delete(&self, id: &Uuid) -> Result<()>;
    fn list(&self) -> Result<Vec<T>>;
}
