use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default fetch timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default number of fetches allowed in flight at once
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 1;

/// Resolved configuration for one archive run
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the markdown tree to scan
    pub input_dir: PathBuf,

    /// Directory holding archive entries and the checked-links cache
    pub output_dir: PathBuf,

    pub fetcher: FetcherConfig,
}

impl Config {
    /// Builds a config with default fetcher settings
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            fetcher: FetcherConfig::default(),
        }
    }
}

/// On-disk configuration file layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// Input and output locations, both optional in the file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Content fetcher behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Upper bound on a single fetch, in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of fetches allowed in flight at once (1 = sequential)
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: usize,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            user_agent: default_user_agent(),
        }
    }
}

/// Values supplied on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub max_concurrent_fetches: Option<usize>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
