use std::sync::{Mutex, MutexGuard};

use super::{SheetGateway, StoreError};

/// Sheet held in process memory.
#[derive(Debug, Default)]
pub struct MemorySheetGateway {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemorySheetGateway {
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Vec<String>>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Backend("memory sheet lock poisoned".to_string()))
    }
}

impl SheetGateway for MemorySheetGateway {
    fn header(&self) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.lock()?.first().cloned())
    }

    fn append_row(&self, row: &[String]) -> Result<(), StoreError> {
        self.lock()?.push(row.to_vec());
        Ok(())
    }
}
