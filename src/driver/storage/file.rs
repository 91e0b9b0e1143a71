// src/driver/storage/file.rs
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::common::error::{AppError, Result};
use crate::driver::storage::ConfigStorage;

/// 基于文件的配置存储
pub struct FileConfigStorage {
    file_path: PathBuf,
}

impl FileConfigStorage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl ConfigStorage for FileConfigStorage {
    fn read_config_block(&mut self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.file_path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StorageError(format!(
                "read {}: {}",
                self.file_path.display(),
                e
            ))),
        }
    }

    fn write_config_block(&mut self, data: &[u8]) -> Result<()> {
        fs::write(&self.file_path, data).map_err(|e| {
            AppError::StorageError(format!("write {}: {}", self.file_path.display(), e))
        })
    }

    fn erase_config(&mut self) -> Result<()> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StorageError(format!(
                "remove {}: {}",
                self.file_path.display(),
                e
            ))),
        }
    }
}
