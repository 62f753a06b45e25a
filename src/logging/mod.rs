use std::{
    fs,
    fs::File,
    io,
    io::prelude::Write as _,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
    time::SystemTime,
};

use log::{LevelFilter, Log, SetLoggerError};
use thiserror::Error;

const LOG_PATH: &str = "./logs/";

#[derive(Debug, Error)]
pub enum LogInitErr {
    #[error("unable to create log file: {}", .0)]
    Io(#[from] io::Error),
    #[error(transparent)]
    SetLogger(#[from] SetLoggerError),
}

/// installs a [`Logger`] for `session` (typically the network or server name) as the global logger
pub fn init(session: impl AsRef<str>, max_level: LevelFilter) -> Result<(), LogInitErr> {
    log::set_boxed_logger(Box::new(Logger::new(LOG_PATH, session, max_level)?))?;
    log::set_max_level(max_level);
    Ok(())
}

/// appends log lines to one file per session
pub struct Logger {
    max_level: LevelFilter,
    path: PathBuf,
    log_file: Mutex<File>,
}

impl Logger {
    pub fn new(
        log_folder: impl AsRef<Path>,
        session: impl AsRef<str>,
        max_level: LevelFilter,
    ) -> io::Result<Self> {
        let folder = log_folder.as_ref();
        fs::create_dir_all(folder)?;
        let path = folder.join(format!(
            "{}-{}.txt",
            session.as_ref(),
            humantime::format_rfc3339_seconds(SystemTime::now())
        ));
        Ok(Self {
            log_file: Mutex::new(File::options().create(true).append(true).open(&path)?),
            path,
            max_level,
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn file(&self) -> MutexGuard<'_, File> {
        self.log_file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let _ = self.file().write_fmt(format_args!(
            "[{}] [{:<5}] [{}] {}\n",
            humantime::format_rfc3339_millis(SystemTime::now()),
            record.level(),
            record.target(),
            record.args(),
        ));
    }

    fn flush(&self) {
        let _ = self.file().flush();
    }
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use log::{Level, Record};

    use super::*;

    #[test]
    fn writes_enabled_records_only() {
        let folder = env::temp_dir().join(format!("irc_membership-logs-{}", process::id()));
        let logger = Logger::new(&folder, "irc.example.org", LevelFilter::Debug).unwrap();

        for (level, text) in [(Level::Debug, "joined #rust"), (Level::Trace, "applying")] {
            logger.log(
                &Record::builder()
                    .level(level)
                    .target("irc_membership::roster")
                    .args(format_args!("{}", text))
                    .build(),
            );
        }
        logger.flush();

        let contents = fs::read_to_string(logger.path()).unwrap();
        assert!(contents.contains("[DEBUG] [irc_membership::roster] joined #rust"));
        assert!(!contents.contains("applying"));
        assert!(
            logger
                .path()
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("irc.example.org-"))
        );

        let _ = fs::remove_dir_all(folder);
    }
}
