use clap::{Parser, Subcommand};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use sitemirror::config::{ConfigLoader, JobConfig};
use sitemirror::{CrawlEvent, CrawlerEngine, Fetcher, MirrorJob};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use validator::Validate;

#[derive(Parser)]
#[command(name = "sitemirror")]
#[command(version = "0.1.0")]
#[command(about = "Mirror a website to a local directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a site starting from a seed URL
    Run {
        /// Seed URL (https:// is assumed when no scheme is given)
        #[arg(short, long)]
        url: Option<String>,

        /// Directory the mirror is written into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also download resources outside the seed's origin
        #[arg(short, long, default_value_t = false)]
        external: bool,

        /// Path to a job file (JSON/YAML/TOML); flags override its fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Concurrent fetches (1 crawls strictly sequentially)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Stop after this many resources
        #[arg(long)]
        max_pages: Option<u64>,

        /// Show progress bar (stderr)
        #[arg(short, long, default_value_t = true)]
        progress: bool,
    },
    /// Validate a job file
    Check {
        /// Path to the job file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    let cli = Cli::parse();
    let logger = env_logger::Builder::from_default_env().build();
    let multi = Arc::new(indicatif::MultiProgress::new());

    match cli.command {
        Commands::Run {
            url,
            output,
            external,
            config,
            concurrency,
            max_pages,
            progress,
        } => {
            if progress {
                indicatif_log_bridge::LogWrapper::new((*multi).clone(), logger).try_init()?;
            } else {
                log::set_boxed_logger(Box::new(logger))?;
                log::set_max_level(log::LevelFilter::Info);
            }

            let mut job_config = match config {
                Some(path) => {
                    log::info!("loading job from {:?}", path);
                    ConfigLoader::load(&path)?
                }
                None => JobConfig::default(),
            };
            if let Some(url) = url {
                job_config.url = url;
            }
            if let Some(output) = output {
                job_config.output = output.display().to_string();
            }
            if external {
                job_config.external = true;
            }
            if let Some(n) = concurrency {
                job_config.concurrency = n;
            }
            if let Some(cap) = max_pages {
                job_config.max_pages = Some(cap);
            }
            job_config.validate()?;

            let job = MirrorJob::from_config(&job_config)?;
            log::info!("mirroring {} into {}", job.seed, job.target_dir().display());

            let fetcher = Fetcher::new(
                Duration::from_secs(job_config.timeout_secs),
                &job_config.user_agent,
            )?;
            let engine = Arc::new(CrawlerEngine::new(
                fetcher,
                Duration::from_millis(job_config.delay_ms),
                job_config.concurrency,
                None,
            ));

            let mut progress_bar: Option<ProgressBar> = None;
            if progress {
                let pb = multi.add(ProgressBar::new(100));
                pb.set_style(ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")?
                    .progress_chars("#>-"));
                progress_bar = Some(pb);
            }

            let engine_signal = engine.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("shutting down...");
                    engine_signal.cancel();
                }
            });

            let (events_tx, events_rx) = mpsc::channel(100);
            let engine_crawl = engine.clone();
            let crawl_job = job.clone();
            let crawl = tokio::spawn(async move {
                engine_crawl.run(&crawl_job, events_tx).await;
            });

            let mut ok = false;
            let mut message = String::new();
            let mut events = ReceiverStream::new(events_rx);
            while let Some(event) = events.next().await {
                match event {
                    CrawlEvent::Status(text) => {
                        if let Some(pb) = &progress_bar {
                            pb.set_message(text);
                        } else {
                            log::info!("{}", text);
                        }
                    }
                    CrawlEvent::Progress(percent) => {
                        if let Some(pb) = &progress_bar {
                            pb.set_position(percent.round() as u64);
                        }
                    }
                    CrawlEvent::Done {
                        ok: done_ok,
                        message: done_message,
                    } => {
                        ok = done_ok;
                        message = done_message;
                    }
                }
            }
            crawl.await?;

            if let Some(pb) = progress_bar {
                if ok {
                    pb.finish_with_message(message.clone());
                } else {
                    pb.abandon_with_message(message.clone());
                }
            }

            let final_metrics = engine.metrics();
            if ok {
                println!("\n✅ {}", message);
                println!("   Resources visited: {}", final_metrics.urls_visited);
                println!("   Files written: {}", final_metrics.pages_saved);
                println!("   Fetch failures: {}", final_metrics.fetch_failures);
                println!("   Write failures: {}", final_metrics.write_failures);
                println!("   Bytes written: {}", final_metrics.bytes_written);
                println!("   Total time: {:.1}s", final_metrics.elapsed_seconds);
            } else {
                eprintln!("\n❌ {}", message);
                std::process::exit(1);
            }
        }
        Commands::Check { config } => {
            let resolved = ConfigLoader::load(&config).and_then(|cfg| {
                let job = MirrorJob::from_config(&cfg)?;
                Ok((cfg, job))
            });
            match resolved {
                Ok((cfg, job)) => {
                    println!("✅ Job is valid:");
                    println!("   Seed: {}", job.seed);
                    println!("   Origin: {}", job.origin);
                    println!("   Target: {}", job.target_dir().display());
                    println!("   External resources: {}", job.allow_external);
                    println!("   Concurrency: {}", cfg.concurrency);
                }
                Err(e) => {
                    eprintln!("❌ Config error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
