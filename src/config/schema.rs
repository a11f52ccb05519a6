use serde::{Deserialize, Serialize};
use validator::Validate;

/// One mirror job, loadable from JSON/YAML/TOML or assembled from CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobConfig {
    /// Seed URL; `https://` is assumed when no scheme is given.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub url: String,

    /// Directory the mirror tree is written into.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub output: String,

    /// Also download resources outside the seed's origin.
    #[serde(default)]
    pub external: bool,

    #[serde(default = "default_concurrency")]
    #[validate(range(min = 1, max = 16))]
    pub concurrency: usize,

    /// Politeness delay between fetch rounds.
    #[serde(default = "default_delay")]
    pub delay_ms: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Optional cap on fetched resources. The crawl is unbounded when unset;
    /// cyclic or very large sites are the caller's risk.
    #[serde(default)]
    pub max_pages: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            output: String::new(),
            external: false,
            concurrency: default_concurrency(),
            delay_ms: default_delay(),
            timeout_secs: default_timeout(),
            max_pages: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_delay() -> u64 {
    0
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "sitemirror/0.1".to_string()
}
