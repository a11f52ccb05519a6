pub mod config;
pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod mirror;
pub mod paths;
pub mod scope;

pub use crawler::{CrawlEvent, CrawlerEngine, CrawlerState, MirrorJob};
pub use error::{Error, Result};
pub use fetcher::{DiscoveredRef, FetchedResource, Fetcher, RefKind};
pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use mirror::MirrorWriter;
