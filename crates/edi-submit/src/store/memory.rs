use std::collections::HashMap;
use std::sync::RwLock;

use edi_model::EdiTransaction;

use super::{TransactionStore, UpdateFn};
use crate::error::{LifecycleError, StoreError, StoreResult};

/// In-process store. Every update holds the write lock for the whole
/// read-modify-write, so concurrent updates to one record serialize.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, EdiTransaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map_or(0, |records| records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for MemoryStore {
    fn insert(&self, transaction: &EdiTransaction) -> StoreResult<()> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if records.contains_key(&transaction.transaction_id) {
            return Err(StoreError::Conflict(transaction.transaction_id.clone()));
        }
        records.insert(transaction.transaction_id.clone(), transaction.clone());
        Ok(())
    }

    fn get(&self, transaction_id: &str) -> StoreResult<EdiTransaction> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        records
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(transaction_id.to_string()))
    }

    fn update(
        &self,
        transaction_id: &str,
        apply: &mut UpdateFn<'_>,
    ) -> Result<EdiTransaction, LifecycleError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let stored = records
            .get_mut(transaction_id)
            .ok_or_else(|| StoreError::NotFound(transaction_id.to_string()))?;
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    fn list(&self) -> StoreResult<Vec<EdiTransaction>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<_> = records.values().cloned().collect();
        all.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });
        Ok(all)
    }
}
