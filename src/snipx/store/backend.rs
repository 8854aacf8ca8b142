use crate::error::Result;
use crate::model::StoreData;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while SnippetStore handles the "what" (the live collection and its rules).
pub trait StorageBackend {
    /// Load the persisted record.
    /// Returns Ok(None) if nothing has been saved yet.
    /// Returns Err only on actual I/O or decoding errors.
    fn load(&self) -> Result<Option<StoreData>>;

    /// Persist the whole record.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save(&self, data: &StoreData) -> Result<()>;
}
