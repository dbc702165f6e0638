use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use edi_model::EdiTransaction;
use fs2::FileExt;

use super::{TransactionStore, UpdateFn};
use crate::error::{LifecycleError, StoreError, StoreResult};

const RECORD_EXTENSION: &str = "json";
const LOCK_EXTENSION: &str = "lock";
const TEMP_EXTENSION: &str = "json.tmp";

/// One pretty-printed JSON file per transaction under a directory.
///
/// Every insert and update holds an exclusive OS lock on `<id>.lock` for the
/// whole read-modify-write, so separate handles and separate processes on one
/// directory serialize per record. Records are published atomically and
/// readers never see a half-written file.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io("create directory", &dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, transaction_id: &str) -> StoreResult<PathBuf> {
        let valid = !transaction_id.is_empty()
            && transaction_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::NotFound(transaction_id.to_string()));
        }
        Ok(self
            .dir
            .join(format!("{transaction_id}.{RECORD_EXTENSION}")))
    }

    /// Block until this handle owns the record's lock. The lock is released
    /// when the returned file is dropped.
    fn lock_record(&self, record_path: &Path) -> StoreResult<File> {
        let lock_path = record_path.with_extension(LOCK_EXTENSION);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StoreError::io("open lock", &lock_path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| StoreError::io("lock", &lock_path, e))?;
        Ok(file)
    }

    fn read_record(&self, path: &Path, transaction_id: &str) -> StoreResult<EdiTransaction> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(transaction_id.to_string()));
            }
            Err(e) => return Err(StoreError::io("open", path, e)),
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Serialization {
            id: transaction_id.to_string(),
            source,
        })
    }

    /// Write the record next to its final path and return the temp path.
    fn write_temp(&self, path: &Path, transaction: &EdiTransaction) -> StoreResult<PathBuf> {
        let bytes = serde_json::to_vec_pretty(transaction).map_err(|source| {
            StoreError::Serialization {
                id: transaction.transaction_id.clone(),
                source,
            }
        })?;

        let temp_path = path.with_extension(TEMP_EXTENSION);
        let mut file =
            File::create(&temp_path).map_err(|e| StoreError::io("create", &temp_path, e))?;
        file.write_all(&bytes)
            .map_err(|e| StoreError::io("write", &temp_path, e))?;
        file.sync_all()
            .map_err(|e| StoreError::io("sync", &temp_path, e))?;
        Ok(temp_path)
    }
}

impl TransactionStore for JsonFileStore {
    fn insert(&self, transaction: &EdiTransaction) -> StoreResult<()> {
        let path = self.record_path(&transaction.transaction_id)?;
        let _lock = self.lock_record(&path)?;
        let temp_path = self.write_temp(&path, transaction)?;

        // hard_link refuses to replace an existing record.
        let published = fs::hard_link(&temp_path, &path);
        if let Err(error) = fs::remove_file(&temp_path) {
            tracing::warn!(path = %temp_path.display(), %error, "failed to remove temp record");
        }
        match published {
            Ok(()) => {
                tracing::debug!(
                    transaction_id = %transaction.transaction_id,
                    path = %path.display(),
                    "inserted transaction record"
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::Conflict(transaction.transaction_id.clone()))
            }
            Err(e) => Err(StoreError::io("publish", &path, e)),
        }
    }

    fn get(&self, transaction_id: &str) -> StoreResult<EdiTransaction> {
        let path = self.record_path(transaction_id)?;
        self.read_record(&path, transaction_id)
    }

    fn update(
        &self,
        transaction_id: &str,
        apply: &mut UpdateFn<'_>,
    ) -> Result<EdiTransaction, LifecycleError> {
        let path = self.record_path(transaction_id)?;
        let _lock = self.lock_record(&path)?;
        let mut record = self.read_record(&path, transaction_id)?;
        apply(&mut record)?;

        let temp_path = self.write_temp(&path, &record)?;
        fs::rename(&temp_path, &path).map_err(|e| StoreError::io("rename", &path, e))?;
        tracing::debug!(
            transaction_id,
            status = %record.status,
            "updated transaction record"
        );
        Ok(record)
    }

    fn list(&self) -> StoreResult<Vec<EdiTransaction>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io("list", &self.dir, e))?;
        let mut records = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| StoreError::io("list", &self.dir, e))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            records.push(self.read_record(&path, id)?);
        }
        records.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });
        Ok(records)
    }
}
