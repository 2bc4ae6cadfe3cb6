//! Append-only writer for the document record file
//!
//! A write is acknowledged only after the record has been fsynced.
//! There are no in-place updates.
//!
//! Bytes past the last acknowledged offset belong to an append that failed.
//! They are cut off before the error is returned, and again before the next
//! append if they are still there. If cutting fails the writer is poisoned
//! and refuses every further append.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::DocumentRecord;

/// Writer that appends records to `<data_dir>/data/documents.dat`.
pub struct StorageWriter {
    storage_path: PathBuf,
    file: File,
    current_offset: u64,
    failed: bool,
}

impl StorageWriter {
    /// Opens or creates the record file, creating `data/` when missing.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let data_subdir = data_dir.join("data");
        let storage_path = data_subdir.join("documents.dat");

        if !data_subdir.exists() {
            fs::create_dir_all(&data_subdir).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create data directory: {}", data_subdir.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open storage file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path,
            file,
            current_offset,
            failed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// True once a failed append could not be rolled back.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Appends a record and fsyncs.
    ///
    /// Returns the byte offset the record was written at. On error the file
    /// is truncated back to the last acknowledged record.
    pub fn append(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        if self.failed {
            return Err(StorageError::write_failed(
                "Writer disabled after a failed rollback",
                io::Error::new(io::ErrorKind::Other, "storage writer poisoned"),
            ));
        }
        self.discard_uncommitted_tail()?;

        let serialized = record.serialize();
        let offset = self.current_offset;

        match self.write_and_sync(&serialized) {
            Ok(()) => {
                self.current_offset += serialized.len() as u64;
                Ok(offset)
            }
            Err(e) => {
                let err = StorageError::write_failed(
                    format!(
                        "Failed to persist document {}:{}",
                        record.collection, record.document_id
                    ),
                    e,
                );
                // Poisons the writer if the rollback fails
                let _ = self.truncate_to_committed();
                Err(err)
            }
        }
    }

    fn write_and_sync(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)?;
        self.file.sync_all()
    }

    /// Cuts off bytes left behind by an earlier failed append.
    fn discard_uncommitted_tail(&mut self) -> StorageResult<()> {
        let on_disk = self
            .file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();
        if on_disk == self.current_offset {
            return Ok(());
        }
        self.truncate_to_committed()
    }

    fn truncate_to_committed(&mut self) -> StorageResult<()> {
        let result = self
            .file
            .set_len(self.current_offset)
            .and_then(|()| self.file.sync_all());

        result.map_err(|e| {
            self.failed = true;
            StorageError::write_failed(
                format!(
                    "Failed to truncate {} to offset {}",
                    self.storage_path.display(),
                    self.current_offset
                ),
                e,
            )
        })
    }
}
