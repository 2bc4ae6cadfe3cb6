//! Sequential reader over the document record file
//!
//! Every record is checksum-verified as it is read. Any framing or checksum
//! failure is reported as `DAKIA_DATA_CORRUPTION` and the scan stops.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{DocumentRecord, MIN_RECORD_SIZE};

/// Reads records front to back, used when the store replays its file on open.
pub struct StorageReader {
    storage_path: PathBuf,
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl StorageReader {
    /// Opens the record file for reading.
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file = File::open(storage_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open storage file: {}", storage_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path: storage_path.to_path_buf(),
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Opens `<data_dir>/data/documents.dat`.
    pub fn open_from_data_dir(data_dir: &Path) -> StorageResult<Self> {
        Self::open(&data_dir.join("data").join("documents.dat"))
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    pub fn has_more(&self) -> bool {
        self.current_offset < self.file_size
    }

    /// Reads the next record.
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(DAKIA_DATA_CORRUPTION)` on a truncated or corrupt record
    pub fn read_next(&mut self) -> StorageResult<Option<DocumentRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        if remaining < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated storage: {} bytes remaining, minimum record size is {}",
                    remaining, MIN_RECORD_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Record length {} exceeds remaining file size {}",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[..4].copy_from_slice(&len_buf);
        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, consumed) = DocumentRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += consumed as u64;
        Ok(Some(record))
    }

    /// Reads every remaining record.
    pub fn read_all(&mut self) -> StorageResult<Vec<DocumentRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::super::writer::StorageWriter;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(id: &str) -> DocumentRecord {
        DocumentRecord::new("users", id, format!(r#"{{"_id":"{}"}}"#, id).into_bytes())
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        StorageWriter::open(temp_dir.path()).unwrap();

        let mut reader = StorageReader::open_from_data_dir(temp_dir.path()).unwrap();
        assert!(!reader.has_more());
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_reads_records_in_append_order() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer.append(&record("a")).unwrap();
            writer.append(&record("b")).unwrap();
            writer.append(&record("c")).unwrap();
        }

        let mut reader = StorageReader::open_from_data_dir(temp_dir.path()).unwrap();
        let ids: Vec<String> = reader
            .read_all()
            .unwrap()
            .into_iter()
            .map(|r| r.document_id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trailing_garbage_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer.append(&record("a")).unwrap();
            writer.path().to_path_buf()
        };

        let mut contents = fs::read(&path).unwrap();
        contents.extend_from_slice(&[1, 2, 3]);
        fs::write(&path, contents).unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());

        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let temp_dir = TempDir::new().unwrap();
        let result = StorageReader::open(&temp_dir.path().join("nope.dat"));
        assert!(matches!(result, Err(e) if !e.is_fatal()));
    }
}
