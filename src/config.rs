//! Runtime settings resolved from the environment.
//!
//! | Variable     | Meaning                                   |
//! |--------------|-------------------------------------------|
//! | `FINMAN_DB`  | Database file (default: platform data dir)|
//! | `FINMAN_LOG` | `tracing` filter (default `finman=warn`)  |
//! | `NO_COLOR`   | Disable ANSI styling when set             |

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

pub(crate) const DB_ENV: &str = "FINMAN_DB";
pub(crate) const LOG_ENV: &str = "FINMAN_LOG";
pub(crate) const DEFAULT_LOG_FILTER: &str = "finman=warn";
const DB_FILE_NAME: &str = "finman.db";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) db_path: PathBuf,
    pub(crate) log_filter: String,
    pub(crate) color: bool,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        let db_path = resolve_db_path(std::env::var_os(DB_ENV).map(PathBuf::from))?;
        let log_filter = log_filter(std::env::var(LOG_ENV).ok());
        let color = std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
        Ok(Self {
            db_path,
            log_filter,
            color,
        })
    }
}

/// An explicit path wins; otherwise the platform data directory is used
/// and created on demand.
pub(crate) fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        return Ok(path);
    }

    let proj_dirs = directories::ProjectDirs::from("com", "finman", "Finman")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join(DB_FILE_NAME))
}

pub(crate) fn log_filter(from_env: Option<String>) -> String {
    from_env
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Install the global `tracing` subscriber. Logs go to stderr so they never
/// mix with menu output on stdout.
pub(crate) fn init_logging(settings: &Settings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
