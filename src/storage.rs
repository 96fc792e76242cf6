use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::models::TaskCollection;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of reading the task file at start-up.
#[derive(Debug)]
pub enum Loaded {
    Tasks(TaskCollection),
    Missing,
    Unreadable(StorageError),
}

impl Loaded {
    /// Missing and unreadable files both start from an empty collection.
    pub fn into_tasks(self) -> TaskCollection {
        match self {
            Loaded::Tasks(tasks) => tasks,
            Loaded::Missing | Loaded::Unreadable(_) => TaskCollection::new(),
        }
    }
}

pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_tasks(&self) -> Result<TaskCollection, StorageError> {
        let mut file = File::open(&self.path)?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(serde_json::from_str(&buf)?)
    }

    /// Reads the task file, telling apart a missing file from a broken one.
    pub fn load(&self) -> Loaded {
        if !self.path.exists() {
            log::info!("no task file at {}, starting empty", self.path.display());
            return Loaded::Missing;
        }
        match self.load_tasks() {
            Ok(tasks) => {
                log::info!(
                    "loaded tasks path={} count={}",
                    self.path.display(),
                    tasks.len()
                );
                Loaded::Tasks(tasks)
            }
            Err(error) => {
                log::warn!(
                    "could not read task file {}: {error}; starting empty",
                    self.path.display()
                );
                Loaded::Unreadable(error)
            }
        }
    }

    pub fn save(&self, tasks: &TaskCollection) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(tasks)?;
        write_atomic(&self.path, &json)?;
        log::debug!("saved tasks path={} count={}", self.path.display(), tasks.len());
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(temp_path, path)?;
    Ok(())
}
