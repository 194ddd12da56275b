//! Opt-in file logging.
//!
//! The compiler only talks to the `log` facade. Callers with their own logger
//! need nothing from here; [`init_logger`] is for those who just want the
//! parser and renderer records in a file:
//!
//! ```text
//! [TRACE] jes::parser: open Plain block ["nav"] @ line 1, column 5
//! [DEBUG] jes_css: compiled 42 bytes of CSS
//! ```

use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;

use crate::error::Result;

struct FileLogger {
    file_path: String,
    level: LevelFilter,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
        {
            let _ = writeln!(
                file,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Appends every log record down to `level` to the file at `path`.
///
/// Fails with [`JesError::Logger`](crate::JesError::Logger) if another logger
/// was installed first.
pub fn init_logger(path: &str, level: LevelFilter) -> Result<()> {
    let logger = FileLogger {
        file_path: path.to_string(),
        level,
    };
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
