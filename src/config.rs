use crate::season::YearMonth;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "sassowitz-calendar";

const LOG_FILE: &str = "sassowitz.log";

/// Environment variable holding the log filter
const LOG_ENV: &str = "SASSOWITZ_LOG";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Config {
    /// Directory holding the event snapshot and the log file
    pub(crate) data_dir: PathBuf,
    /// Directory PDF exports are written to
    pub(crate) export_dir: PathBuf,
    /// Month to show first; clamped into the season by the caller
    pub(crate) start: Option<YearMonth>,
}

impl Config {
    /// Fills in the platform defaults for whatever was not given on the
    /// command line
    pub(crate) fn resolve(
        data_dir: Option<PathBuf>,
        export_dir: Option<PathBuf>,
        start: Option<YearMonth>,
    ) -> Result<Config, ConfigError> {
        let data_dir = match data_dir {
            Some(d) => d,
            None => dirs::data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join(APP_DIR),
        };
        let export_dir = match export_dir {
            Some(d) => d,
            None => match dirs::download_dir() {
                Some(d) => d,
                None => std::env::current_dir().map_err(ConfigError::NoExportDir)?,
            },
        };
        Ok(Config {
            data_dir,
            export_dir,
            start,
        })
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("could not determine the user data directory; pass --data-dir")]
    NoDataDir,
    #[error("could not determine a directory for exports; pass --export-dir")]
    NoExportDir(#[source] std::io::Error),
}

/// Sends log records to `path`, filtered by `$SASSOWITZ_LOG` (default
/// `info`).  If the file cannot be opened, logging stays off.
pub(crate) fn init_logging(path: &Path) {
    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| OpenOptions::new().create(true).append(true).open(path));
    match file {
        Ok(fp) => {
            let r = env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info"))
                .target(env_logger::Target::Pipe(Box::new(fp)))
                .format_timestamp_millis()
                .try_init();
            if let Err(e) = r {
                eprintln!("Warning: could not set up logging: {e}");
            }
        }
        Err(e) => eprintln!("Warning: could not open log file {}: {e}", path.display()),
    }
}
