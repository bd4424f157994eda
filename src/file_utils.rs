use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// File and directory utilities

/// File operations utility
pub struct FileManager;

impl FileManager {
    /// Check file existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Check directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Create a directory and its parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read at most `limit` bytes from the start of a file.
    ///
    /// With no limit the whole file is read.
    pub fn read_prefix<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        match limit {
            None => fs::read(path).with_context(|| format!("Failed to read file: {:?}", path)),
            Some(limit) => {
                let file = fs::File::open(path)
                    .with_context(|| format!("Failed to open file: {:?}", path))?;
                let mut data = Vec::with_capacity(limit.min(64 * 1024));
                file.take(limit as u64)
                    .read_to_end(&mut data)
                    .with_context(|| format!("Failed to read file: {:?}", path))?;
                Ok(data)
            }
        }
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
