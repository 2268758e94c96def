use std::path::PathBuf;

/// Order desk configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | `.` | Directory holding `menu.json` and `orders.json` |
/// | LOG_LEVEL | info | Log filter (`EnvFilter` syntax) |
/// | LOG_DIR | unset | Write daily rolling log files here instead of stdout |
///
/// The document file names are fixed; only their directory is configurable.
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/var/lib/order-desk LOG_LEVEL=debug cargo run -- 5
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the catalog and order-book documents
    pub work_dir: PathBuf,
    pub log_level: String,
    /// Rolling log file directory (stdout when unset)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Configuration rooted at `work_dir`, everything else default
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_work_dir(".")
    }
}
