#![cfg(not(test))]

use std::path::Path;

use flexi_logger::{
    detailed_format, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};

use crate::config::Config;

const LOG_FILE_BASENAME: &str = "tasklist";
const LOG_FILE_SUFFIX: &str = "log";
const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const LOG_ROTATE_KEEP_FILES: usize = 5;

/// File-only logger; the console belongs to the menu. Keep the returned handle
/// alive until the program ends so buffered lines are flushed.
pub fn init_logging(config: &Config) -> Result<LoggerHandle, FlexiLoggerError> {
    std::fs::create_dir_all(config.log_dir())?;

    let handle = Logger::try_with_str(&config.log_spec)?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir())
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .start()?;

    install_panic_hook(config.log_dir());

    log::info!(
        "logger initialized dir={} spec={} rotate_size_bytes={} keep_files={}",
        config.log_dir().display(),
        config.log_spec,
        LOG_ROTATE_SIZE_BYTES,
        LOG_ROTATE_KEEP_FILES
    );
    Ok(handle)
}

/// Logs the panic with a backtrace and points the user at the log directory,
/// since the console is mid-prompt when it happens.
fn install_panic_hook(log_dir: &Path) {
    let log_dir = log_dir.to_path_buf();
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info: &std::panic::PanicHookInfo<'_>| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        let location = info
            .location()
            .map_or_else(|| "<unknown>".to_string(), |loc| loc.to_string());

        log::error!(
            "panic while running the menu: {payload} at {location}\nbacktrace:\n{}",
            std::backtrace::Backtrace::force_capture()
        );
        eprintln!(
            "\ntasklist stopped unexpectedly; see the {LOG_FILE_BASENAME} logs in {}",
            log_dir.display()
        );
        default_hook(info);
    }));
}
