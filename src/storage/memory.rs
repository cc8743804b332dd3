//! In-memory storage implementation, primarily for tests.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CaselexError, Result};
use crate::storage::traits::{Storage, StorageInput, StorageOutput};

type FileMap = Arc<RwLock<HashMap<String, Vec<u8>>>>;

/// A storage backend that keeps all files in memory.
///
/// Readers see a snapshot of a file taken when the input is opened; writers
/// publish their buffer on flush (and on drop), mirroring the close-then-open
/// discipline of the file backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: FileMap,
}

impl MemoryStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Overwrite a file's raw contents directly (test helper for corruption
    /// scenarios).
    pub fn put_raw(&self, name: &str, bytes: Vec<u8>) {
        self.files.write().insert(name.to_string(), bytes);
    }

    /// Read a file's raw contents directly.
    pub fn get_raw(&self, name: &str) -> Option<Vec<u8>> {
        self.files.read().get(name).cloned()
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let files = self.files.read();
        let data = files
            .get(name)
            .ok_or_else(|| CaselexError::storage(format!("file not found: {name}")))?
            .clone();

        Ok(Box::new(MemoryInput {
            cursor: Cursor::new(data),
        }))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        // Visible immediately as an empty file, like truncating open.
        self.files.write().insert(name.to_string(), Vec::new());

        Ok(Box::new(MemoryOutput {
            files: Arc::clone(&self.files),
            name: name.to_string(),
            cursor: Cursor::new(Vec::new()),
        }))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files.write().remove(name);
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.files.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        self.files
            .read()
            .get(name)
            .map(|data| data.len() as u64)
            .ok_or_else(|| CaselexError::storage(format!("file not found: {name}")))
    }
}

#[derive(Debug)]
struct MemoryInput {
    cursor: Cursor<Vec<u8>>,
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemoryInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.cursor.get_ref().len() as u64)
    }
}

#[derive(Debug)]
struct MemoryOutput {
    files: FileMap,
    name: String,
    cursor: Cursor<Vec<u8>>,
}

impl MemoryOutput {
    fn publish(&self) {
        self.files
            .write()
            .insert(self.name.clone(), self.cursor.get_ref().clone());
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.publish();
        Ok(())
    }
}

impl Seek for MemoryOutput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.publish();
        Ok(())
    }

    fn position(&mut self) -> Result<u64> {
        Ok(self.cursor.position())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        self.publish();
    }
}
