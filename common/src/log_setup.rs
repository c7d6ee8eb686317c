use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
};

/// Directory the rotated log files are written to, relative to the working directory.
pub const LOG_DIRECTORY: &str = "logs";

/// Starts file logging under [`LOG_DIRECTORY`] with warnings duplicated to stderr.
///
/// `RUST_LOG` takes precedence over `base_level`. The returned handle must be
/// kept alive for as long as logging is needed.
pub fn setup_logging(base_level: &str, basename: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(base_level)?
        .log_to_file(
            FileSpec::default()
                .directory(LOG_DIRECTORY)
                .basename(basename),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
}
