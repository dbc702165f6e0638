//! Transaction persistence.
//!
//! The orchestrator and the lifecycle manager only see [`TransactionStore`];
//! records live in memory ([`MemoryStore`]) or as one JSON file per
//! transaction ([`JsonFileStore`]).

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use edi_model::EdiTransaction;

use crate::error::{LifecycleError, StoreResult};

/// Mutation applied by [`TransactionStore::update`].
pub type UpdateFn<'a> = dyn FnMut(&mut EdiTransaction) -> Result<(), LifecycleError> + 'a;

/// Storage for transaction records, keyed by `transaction_id`.
pub trait TransactionStore: Send + Sync {
    /// Persist a new record; fails with `Conflict` if the id is taken.
    fn insert(&self, transaction: &EdiTransaction) -> StoreResult<()>;

    fn get(&self, transaction_id: &str) -> StoreResult<EdiTransaction>;

    /// Apply `apply` to a copy of the record and commit it only when `apply`
    /// succeeds. Returns the committed record.
    fn update(
        &self,
        transaction_id: &str,
        apply: &mut UpdateFn<'_>,
    ) -> Result<EdiTransaction, LifecycleError>;

    /// All records, oldest submission first.
    fn list(&self) -> StoreResult<Vec<EdiTransaction>>;
}
