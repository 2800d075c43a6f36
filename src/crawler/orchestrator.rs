//! Scrape orchestrator - bounded worker pool over discovered URLs
//!
//! This module drives the scraping phase:
//! - Sizing the worker pool from the job size
//! - Distributing URLs through a single shared queue
//! - Fetching, host-guarding and extracting each page
//! - Streaming progress and documents to an optional observer
//! - Collecting documents in completion order

use crate::config::ScrapeConfig;
use crate::crawler::extractor::{extract, ScrapedDocument};
use crate::crawler::fetcher::{fetch_page, FetchFailure, PageOutcome};
use crate::url::extract_domain;
use futures::future::join_all;
use reqwest::Client;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::Url;

/// Event streamed to an observer while a scrape runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    /// Progress update
    ///
    /// Sent once before any work (`url` empty, `done` 0), when a worker claims
    /// a URL, and when that URL's handling finishes (with `done` incremented).
    /// `done` never decreases and never exceeds `total`.
    Progress {
        url: String,
        done: usize,
        total: usize,
    },

    /// A retained document, in completion order
    Item(ScrapedDocument),
}

/// Result of scraping a single URL
#[derive(Debug)]
pub enum ScrapeOutcome {
    /// HTML page fetched and extracted
    Scraped(ScrapedDocument),

    /// Binary response; kept as an empty document
    Skipped {
        document: ScrapedDocument,
        content_type: String,
    },

    /// No usable response; kept as an empty document
    Failed {
        document: ScrapedDocument,
        reason: FetchFailure,
    },

    /// Response came from another host (e.g. an off-site redirect); dropped
    OffHost { final_url: Url },
}

/// Summary of a finished scrape
#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    /// Retained documents, in completion order
    pub documents: Vec<ScrapedDocument>,
    /// Pages fetched and extracted
    pub scraped: usize,
    /// Binary responses kept as empty documents
    pub skipped: usize,
    /// Failed fetches kept as empty documents
    pub failed: usize,
    /// Off-host responses dropped from the results
    pub off_host: usize,
}

/// Computes the worker count for a job of `total` URLs
///
/// One worker per `urls_per_worker` URLs (rounded up), clamped to
/// `[min_workers, max_workers]`. With the defaults: 4 workers up to 200 URLs,
/// growing to a hard cap of 8.
///
/// # Examples
///
/// ```
/// use site_harvest::config::ScrapeConfig;
/// use site_harvest::crawler::scrape_worker_count;
///
/// let config = ScrapeConfig::default();
/// assert_eq!(scrape_worker_count(10, &config), 4);
/// assert_eq!(scrape_worker_count(500, &config), 8);
/// ```
pub fn scrape_worker_count(total: usize, config: &ScrapeConfig) -> usize {
    total
        .div_ceil(config.urls_per_worker.max(1))
        .max(config.min_workers)
        .min(config.max_workers)
}

/// Bounded-concurrency page scraper
#[derive(Debug, Clone)]
pub struct ScrapeOrchestrator {
    client: Client,
    config: ScrapeConfig,
}

impl ScrapeOrchestrator {
    /// Creates an orchestrator sharing the given HTTP client
    pub fn new(client: Client, config: ScrapeConfig) -> Self {
        Self { client, config }
    }

    /// Scrapes every URL and returns the retained documents
    ///
    /// Documents come back in completion order, not input order. Pages whose
    /// response lands on a host other than `hostname` are dropped but still
    /// counted as done. An empty `urls` returns immediately with no events.
    ///
    /// # Arguments
    ///
    /// * `urls` - Absolute page URLs to scrape
    /// * `hostname` - The only host whose pages are kept
    /// * `events` - Optional observer channel for progress and items
    pub async fn scrape_all(
        &self,
        urls: Vec<String>,
        hostname: &str,
        events: Option<UnboundedSender<ScrapeEvent>>,
    ) -> Vec<ScrapedDocument> {
        self.scrape_all_with_report(urls, hostname, events)
            .await
            .documents
    }

    /// Like [`scrape_all`](Self::scrape_all), returning per-outcome counts too
    pub async fn scrape_all_with_report(
        &self,
        urls: Vec<String>,
        hostname: &str,
        events: Option<UnboundedSender<ScrapeEvent>>,
    ) -> ScrapeReport {
        let total = urls.len();
        if total == 0 {
            return ScrapeReport::default();
        }

        let workers = scrape_worker_count(total, &self.config).min(total);
        tracing::info!("Scraping {} URL(s) for {} with {} workers", total, hostname, workers);

        let job = CrawlJob::new(urls, events);
        job.announce_start();

        join_all((0..workers).map(|_| self.run_worker(&job, hostname))).await;

        let report = job.into_report();
        tracing::info!(
            "Scrape finished: {} scraped, {} skipped, {} failed, {} off-host",
            report.scraped,
            report.skipped,
            report.failed,
            report.off_host
        );
        report
    }

    /// Fetches and extracts a single page
    pub async fn scrape_page(&self, url: &str, hostname: &str) -> ScrapeOutcome {
        let outcome = fetch_page(
            &self.client,
            url,
            self.config.fetch_timeout(),
            self.config.max_attempts,
        )
        .await;

        match outcome {
            PageOutcome::Html { final_url, .. } if !is_on_host(&final_url, hostname) => {
                ScrapeOutcome::OffHost { final_url }
            }
            PageOutcome::Html { body, .. } => ScrapeOutcome::Scraped(extract(&body, url)),
            PageOutcome::Binary { final_url, .. } if !is_on_host(&final_url, hostname) => {
                ScrapeOutcome::OffHost { final_url }
            }
            PageOutcome::Binary { content_type, .. } => ScrapeOutcome::Skipped {
                document: ScrapedDocument::empty(url),
                content_type,
            },
            PageOutcome::Failed(reason) => match Url::parse(url) {
                Ok(requested) if !is_on_host(&requested, hostname) => {
                    ScrapeOutcome::OffHost { final_url: requested }
                }
                _ => ScrapeOutcome::Failed {
                    document: ScrapedDocument::empty(url),
                    reason,
                },
            },
        }
    }

    /// Drains the shared queue until it is empty
    async fn run_worker(&self, job: &CrawlJob, hostname: &str) {
        while let Some(url) = job.claim().await {
            job.claimed(&url);
            let outcome = self.scrape_page(&url, hostname).await;
            job.finished(&url, outcome);
        }
    }
}

fn is_on_host(url: &Url, hostname: &str) -> bool {
    extract_domain(url).is_some_and(|host| host.eq_ignore_ascii_case(hostname))
}

/// Shared state of one scrape call
///
/// The queue is filled once and closed, so it never grows; each URL is
/// received by exactly one worker. Counter updates and event emission happen
/// under one lock so observers see `done` in order.
struct CrawlJob {
    pending: tokio::sync::Mutex<UnboundedReceiver<String>>,
    total: usize,
    ledger: Mutex<Ledger>,
    events: Option<UnboundedSender<ScrapeEvent>>,
}

#[derive(Default)]
struct Ledger {
    completed: usize,
    report: ScrapeReport,
}

impl CrawlJob {
    fn new(urls: Vec<String>, events: Option<UnboundedSender<ScrapeEvent>>) -> Self {
        let total = urls.len();
        let (queue, pending) = mpsc::unbounded_channel();
        for url in urls {
            // The receiver is alive, so sending cannot fail
            let _ = queue.send(url);
        }

        Self {
            pending: tokio::sync::Mutex::new(pending),
            total,
            ledger: Mutex::new(Ledger::default()),
            events,
        }
    }

    /// Claims the next URL; `None` once the queue is drained
    async fn claim(&self) -> Option<String> {
        self.pending.lock().await.recv().await
    }

    fn announce_start(&self) {
        self.emit(ScrapeEvent::Progress {
            url: String::new(),
            done: 0,
            total: self.total,
        });
    }

    fn claimed(&self, url: &str) {
        let ledger = self.ledger();
        self.emit(ScrapeEvent::Progress {
            url: url.to_string(),
            done: ledger.completed,
            total: self.total,
        });
    }

    fn finished(&self, url: &str, outcome: ScrapeOutcome) {
        let mut ledger = self.ledger();

        let retained = match outcome {
            ScrapeOutcome::Scraped(document) => {
                ledger.report.scraped += 1;
                Some(document)
            }
            ScrapeOutcome::Skipped {
                document,
                content_type,
            } => {
                tracing::debug!("Skipped binary page {} ({})", url, content_type);
                ledger.report.skipped += 1;
                Some(document)
            }
            ScrapeOutcome::Failed { document, reason } => {
                tracing::warn!("Failed to scrape {}: {}", url, reason);
                ledger.report.failed += 1;
                Some(document)
            }
            ScrapeOutcome::OffHost { final_url } => {
                tracing::debug!("Discarding {}: response came from {}", url, final_url);
                ledger.report.off_host += 1;
                None
            }
        };

        if let Some(document) = retained {
            self.emit(ScrapeEvent::Item(document.clone()));
            ledger.report.documents.push(document);
        }

        ledger.completed += 1;
        self.emit(ScrapeEvent::Progress {
            url: url.to_string(),
            done: ledger.completed,
            total: self.total,
        });
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ScrapeEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is watching
            let _ = events.send(event);
        }
    }

    fn into_report(self) -> ScrapeReport {
        self.ledger
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .report
    }
}
