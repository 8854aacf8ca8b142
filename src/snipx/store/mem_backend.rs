use super::backend::StorageBackend;
use crate::error::{Result, SnipxError};
use crate::model::StoreData;
use std::cell::{Cell, RefCell};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since snipx is single-threaded,
/// which lets the `StorageBackend` trait take `&self` everywhere.
#[derive(Default)]
pub struct MemBackend {
    data: RefCell<Option<StoreData>>,
    saves: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already persisted record.
    pub fn with_data(data: StoreData) -> Self {
        Self {
            data: RefCell::new(Some(data)),
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// The last record that was saved, if any.
    pub fn saved(&self) -> Option<StoreData> {
        self.data.borrow().clone()
    }
}

impl StorageBackend for MemBackend {
    fn load(&self) -> Result<Option<StoreData>> {
        Ok(self.data.borrow().clone())
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(SnipxError::Store("Simulated write error".to_string()));
        }
        *self.data.borrow_mut() = Some(data.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
