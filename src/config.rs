use std::path::{Path, PathBuf};

pub const DATA_FILE_ENV: &str = "TASKLIST_FILE";
pub const LOG_SPEC_ENV: &str = "TASKLIST_LOG";
pub const DEFAULT_DATA_FILE: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_spec: String,
}

impl Config {
    pub fn new(data_file: PathBuf) -> Self {
        Self {
            data_file,
            log_spec: default_log_spec().to_string(),
        }
    }

    /// `TASKLIST_FILE` picks the task file; `TASKLIST_LOG` or `RUST_LOG` the log filter.
    #[cfg(not(test))]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let data_file = non_empty(DATA_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        let log_spec = non_empty(LOG_SPEC_ENV)
            .or_else(|| non_empty("RUST_LOG"))
            .unwrap_or_else(|| default_log_spec().to_string());
        Self {
            data_file,
            log_spec,
        }
    }

    /// Logs live next to the task file.
    pub fn log_dir(&self) -> &Path {
        match self.data_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_DATA_FILE))
    }
}

fn default_log_spec() -> &'static str {
    if cfg!(debug_assertions) {
        "warn,tasklist_lib=debug"
    } else {
        "warn,tasklist_lib=info"
    }
}
