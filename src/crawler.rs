use crate::config::JobConfig;
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::mirror::MirrorWriter;
use crate::{paths, scope};
use futures::stream::StreamExt;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::sleep;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlerState {
    Idle,
    Running,
    Stopped,
}

/// Events consumed by the presentation shell. Per crawl: any number of
/// `Status` and `Progress` interleaved, then exactly one `Done`.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    Status(String),
    Progress(f64),
    Done { ok: bool, message: String },
}

/// A resolved mirror job: validated seed, fixed origin, target directory.
#[derive(Debug, Clone)]
pub struct MirrorJob {
    pub seed: Url,
    pub origin: String,
    pub allow_external: bool,
    pub save_path: PathBuf,
    pub host_dir: String,
    pub max_pages: Option<u64>,
}

impl MirrorJob {
    pub fn from_config(config: &JobConfig) -> Result<Self> {
        let seed = scope::normalize_seed(&config.url)?;
        let origin = scope::origin_of(&seed);

        if config.output.trim().is_empty() {
            return Err(Error::Config("save path must not be empty".to_string()));
        }

        let host_dir = seed.host_str().unwrap_or_default().replace('.', "_");

        Ok(Self {
            seed,
            origin,
            allow_external: config.external,
            save_path: PathBuf::from(config.output.trim()),
            host_dir,
            max_pages: config.max_pages,
        })
    }

    /// Directory the mirrored files land in.
    pub fn target_dir(&self) -> PathBuf {
        self.save_path.join(&self.host_dir)
    }
}

pub struct CrawlerEngine {
    fetcher: Fetcher,
    delay: Duration,
    concurrency: usize,
    metrics: Arc<MetricsCollector>,
    state: Arc<Mutex<CrawlerState>>,
    state_watcher: watch::Sender<CrawlerState>,
    cancel: watch::Sender<bool>,
}

impl CrawlerEngine {
    pub fn new(
        fetcher: Fetcher,
        delay: Duration,
        concurrency: usize,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        let (state_tx, _) = watch::channel(CrawlerState::Idle);
        let (cancel_tx, _) = watch::channel(false);

        Self {
            fetcher,
            delay,
            concurrency: concurrency.max(1),
            metrics: metrics.unwrap_or_else(|| Arc::new(MetricsCollector::new())),
            state: Arc::new(Mutex::new(CrawlerState::Idle)),
            state_watcher: state_tx,
            cancel: cancel_tx,
        }
    }

    /// Requests a cooperative stop. The crawl loop checks the flag at least
    /// once per round; the flag latches, so an engine drives at most one
    /// crawl after cancellation.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub fn watch_state(&self) -> watch::Receiver<CrawlerState> {
        self.state_watcher.subscribe()
    }

    /// Drives one crawl to its terminal event. Per-URL failures are logged
    /// and skipped; everything else ends the crawl with `Done { ok: false }`.
    pub async fn run(&self, job: &MirrorJob, events: mpsc::Sender<CrawlEvent>) {
        self.set_state(CrawlerState::Running).await;
        let _ = events
            .send(CrawlEvent::Status("starting download...".to_string()))
            .await;

        let done = match self.crawl(job, &events).await {
            Ok(()) => {
                let _ = events.send(CrawlEvent::Progress(100.0)).await;
                CrawlEvent::Done {
                    ok: true,
                    message: format!(
                        "download complete, saved under {}",
                        job.target_dir().display()
                    ),
                }
            }
            Err(Error::Cancelled) => {
                log::info!("crawl cancelled");
                CrawlEvent::Done {
                    ok: false,
                    message: "download cancelled".to_string(),
                }
            }
            Err(e) => {
                log::error!("crawl failed: {}", e);
                CrawlEvent::Done {
                    ok: false,
                    message: format!("download failed: {}", e),
                }
            }
        };

        let _ = events.send(done).await;
        self.set_state(CrawlerState::Stopped).await;
    }

    async fn crawl(&self, job: &MirrorJob, events: &mpsc::Sender<CrawlEvent>) -> Result<()> {
        let writer = MirrorWriter::create(&job.save_path, &job.host_dir)?;
        let mut cancel_rx = self.cancel.subscribe();

        // Frontier: FIFO queue plus the set of ever-enqueued URLs. Checking
        // `enqueued` before every push keeps each URL in the queue at most
        // once per crawl; `visited` marks URLs whose fetch has started.
        let mut queue: VecDeque<Url> = VecDeque::new();
        let mut enqueued: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();

        enqueued.insert(job.seed.to_string());
        queue.push_back(job.seed.clone());
        self.metrics.record_discovered();

        while !queue.is_empty() {
            if *cancel_rx.borrow_and_update() {
                return Err(Error::Cancelled);
            }

            let mut batch_limit = self.concurrency;
            if let Some(cap) = job.max_pages {
                let remaining = (cap as usize).saturating_sub(visited.len());
                if remaining == 0 {
                    log::warn!("page cap of {} reached, stopping", cap);
                    let _ = events
                        .send(CrawlEvent::Status(format!("page cap of {} reached", cap)))
                        .await;
                    break;
                }
                batch_limit = batch_limit.min(remaining);
            }

            let mut batch: Vec<Url> = Vec::with_capacity(batch_limit);
            while batch.len() < batch_limit {
                let Some(url) = queue.pop_front() else { break };
                // Dedup-on-enqueue keeps the queue duplicate-free, so this
                // re-check never fires in practice.
                if visited.contains(url.as_str()) {
                    continue;
                }
                visited.insert(url.to_string());
                batch.push(url);
            }
            if batch.is_empty() {
                continue;
            }

            // Bounded concurrent fetches; `buffered` keeps results in
            // submission order, so the frontier stays single-writer FIFO.
            // Concurrency 1 is a strictly sequential crawl.
            let fetched = futures::stream::iter(batch.into_iter().map(|url| {
                let fetcher = &self.fetcher;
                async move {
                    let started = Instant::now();
                    let result = fetcher.fetch(&url).await;
                    (url, result, started.elapsed())
                }
            }))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

            for (url, result, duration) in fetched {
                self.metrics.record_visited();

                match result {
                    Ok(resource) => {
                        self.metrics.record_fetch_success(duration);

                        let relative = paths::local_path(&url, &job.origin);
                        match writer.save(&relative, &resource.bytes) {
                            Ok(path) => {
                                self.metrics.record_saved(resource.bytes.len() as u64);
                                log::debug!("saved {} -> {}", url, path.display());
                            }
                            Err(e) => {
                                // The URL stays visited; writes are not retried.
                                self.metrics.record_write_failure();
                                log::error!("saving {} failed: {}", url, e);
                            }
                        }

                        for discovered in resource.refs {
                            if !scope::in_scope(&discovered.url, &job.origin, job.allow_external) {
                                continue;
                            }
                            if enqueued.insert(discovered.url.to_string()) {
                                log::debug!("queued {:?} {}", discovered.kind, discovered.url);
                                queue.push_back(discovered.url);
                                self.metrics.record_discovered();
                            }
                        }
                    }
                    Err(e) => {
                        self.metrics.record_fetch_failure(duration);
                        log::error!("downloading {} failed: {}", url, e);
                    }
                }

                let snapshot = self.metrics.snapshot();
                let _ = events
                    .send(CrawlEvent::Progress(snapshot.progress_percent))
                    .await;
                let _ = events
                    .send(CrawlEvent::Status(format!(
                        "downloaded {}/{} resources",
                        snapshot.urls_visited, snapshot.urls_discovered
                    )))
                    .await;
            }

            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
        }

        Ok(())
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<MetricsSnapshot> {
        let (tx, rx) = watch::channel(self.metrics.snapshot());
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(500));
            loop {
                interval.tick().await;
                if tx.send(metrics.snapshot()).is_err() {
                    break;
                }
            }
        });
        rx
    }

    async fn set_state(&self, state: CrawlerState) {
        let mut guard = self.state.lock().await;
        *guard = state;
        let _ = self.state_watcher.send(state);
    }
}
