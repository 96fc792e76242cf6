mod commands;
mod config;
mod ids;
mod logging;
mod menu;
mod models;
mod prompt;
mod state;
mod storage;

use std::io;

pub use crate::commands::Session;
pub use crate::config::Config;
pub use crate::models::{Level, Priority, Status, Task, TaskCollection};
pub use crate::prompt::Prompter;
pub use crate::storage::{Storage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("console error: {0}")]
    Console(#[from] io::Error),
}

/// Runs the interactive menu on stdin/stdout until the user exits.
#[cfg(not(test))]
pub fn run() -> Result<(), AppError> {
    let config = Config::from_env();
    let _logger = match logging::init_logging(&config) {
        Ok(handle) => Some(handle),
        Err(error) => {
            eprintln!("logging disabled: {error}");
            None
        }
    };
    log::info!("starting data_file={}", config.data_file.display());

    let stdin = io::stdin();
    let console = Prompter::new(stdin.lock(), io::stdout());
    let mut session = Session::open(Storage::new(config.data_file), console)?;
    session.run_menu()?;
    Ok(())
}
