use crate::common::{article_page, host_of, html};
use reqwest::Client;
use site_harvest::config::ScrapeConfig;
use site_harvest::crawler::{FetchFailure, ScrapeEvent, ScrapeOrchestrator, ScrapeOutcome};
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator(config: ScrapeConfig) -> ScrapeOrchestrator {
    ScrapeOrchestrator::new(Client::new(), config)
}

async fn mount_pages(server: &MockServer, count: usize) -> Vec<String> {
    let mut urls = Vec::new();
    for i in 0..count {
        Mock::given(method("GET"))
            .and(path(format!("/page-{}", i)))
            .respond_with(html(article_page(
                &format!("Page {}", i),
                "This paragraph is long enough to count as a real block of content.",
            )))
            .mount(server)
            .await;
        urls.push(format!("{}/page-{}", server.uri(), i));
    }
    urls
}

async fn collect_events(mut receiver: mpsc::UnboundedReceiver<ScrapeEvent>) -> Vec<ScrapeEvent> {
    let mut events = Vec::new();
    while let Some(event) = receiver.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_scrape_extracts_pages() {
    let server = MockServer::start().await;
    let urls = mount_pages(&server, 3).await;

    let documents = orchestrator(ScrapeConfig::default())
        .scrape_all(urls.clone(), &host_of(&server.uri()), None)
        .await;

    assert_eq!(documents.len(), 3);
    for doc in &documents {
        assert!(urls.contains(&doc.url));
        assert!(doc.title.starts_with("Page "));
        assert!(doc.description.starts_with("About Page "));
        assert!(doc.content.contains("long enough to count"));
    }
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let server = MockServer::start().await;
    let urls = mount_pages(&server, 12).await;
    let (events, receiver) = mpsc::unbounded_channel();

    let documents = orchestrator(ScrapeConfig::default())
        .scrape_all(urls, &host_of(&server.uri()), Some(events))
        .await;

    let events = collect_events(receiver).await;
    let progress: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|e| match e {
            ScrapeEvent::Progress { done, total, .. } => Some((*done, *total)),
            ScrapeEvent::Item(_) => None,
        })
        .collect();
    let items = events
        .iter()
        .filter(|e| matches!(e, ScrapeEvent::Item(_)))
        .count();

    assert_eq!(progress.first(), Some(&(0, 12)));
    assert_eq!(progress.last(), Some(&(12, 12)));
    assert!(progress.windows(2).all(|w| w[0].0 <= w[1].0));
    assert!(progress.iter().all(|(done, total)| done <= total && *total == 12));
    assert_eq!(items, documents.len());
    assert_eq!(documents.len(), 12);
}

#[tokio::test]
async fn test_timeout_retries_then_keeps_empty_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html(article_page("Slow", "Never arrives")).set_delay(Duration::from_secs(3)))
        .expect(2)
        .mount(&server)
        .await;

    let config = ScrapeConfig {
        fetch_timeout_ms: 200,
        max_attempts: 2,
        ..ScrapeConfig::default()
    };
    let url = format!("{}/slow", server.uri());

    let report = orchestrator(config)
        .scrape_all_with_report(vec![url.clone()], &host_of(&server.uri()), None)
        .await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.documents[0].url, url);
    assert!(report.documents[0].is_blank());
}

#[tokio::test]
async fn test_error_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let report = orchestrator(ScrapeConfig::default())
        .scrape_all_with_report(
            vec![format!("{}/gone", server.uri())],
            &host_of(&server.uri()),
            None,
        )
        .await;

    assert_eq!(report.failed, 1);
    assert!(report.documents[0].is_blank());
}

#[tokio::test]
async fn test_error_status_reported_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw("<html><body><p>Sorry, this page does not exist.</p></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let outcome = orchestrator(ScrapeConfig::default())
        .scrape_page(&format!("{}/missing", server.uri()), &host_of(&server.uri()))
        .await;

    match outcome {
        ScrapeOutcome::Failed { document, reason } => {
            assert_eq!(reason, FetchFailure::HttpStatus(404));
            assert!(document.is_blank());
        }
        other => panic!("expected a failed outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_binary_page_kept_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/manual"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x25, 0x50, 0x44, 0x46], "application/pdf"))
        .mount(&server)
        .await;

    let report = orchestrator(ScrapeConfig::default())
        .scrape_all_with_report(
            vec![format!("{}/manual", server.uri())],
            &host_of(&server.uri()),
            None,
        )
        .await;

    assert_eq!(report.skipped, 1);
    assert_eq!(report.documents.len(), 1);
    assert!(report.documents[0].is_blank());
}

#[tokio::test]
async fn test_off_host_pages_discarded_but_counted() {
    let server = MockServer::start().await;
    let urls = mount_pages(&server, 3).await;
    let (events, receiver) = mpsc::unbounded_channel();

    let report = orchestrator(ScrapeConfig::default())
        .scrape_all_with_report(urls, "example.invalid", Some(events))
        .await;

    let events = collect_events(receiver).await;

    assert!(report.documents.is_empty());
    assert_eq!(report.off_host, 3);
    assert!(!events.iter().any(|e| matches!(e, ScrapeEvent::Item(_))));
    assert!(events
        .iter()
        .any(|e| matches!(e, ScrapeEvent::Progress { done: 3, total: 3, .. })));
}

#[tokio::test]
async fn test_redirect_to_other_host_discarded() {
    let server = MockServer::start().await;
    let port = url::Url::parse(&server.uri()).unwrap().port().unwrap();

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("http://localhost:{}/landing", port).as_str()),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(html(article_page(
            "Landing",
            "This page lives on a different host name than the one requested.",
        )))
        .mount(&server)
        .await;

    let (events, receiver) = mpsc::unbounded_channel();
    let report = orchestrator(ScrapeConfig::default())
        .scrape_all_with_report(
            vec![format!("{}/moved", server.uri())],
            &host_of(&server.uri()),
            Some(events),
        )
        .await;

    let events = collect_events(receiver).await;

    assert_eq!(report.off_host, 1);
    assert!(report.documents.is_empty());
    assert!(events
        .iter()
        .any(|e| matches!(e, ScrapeEvent::Progress { done: 1, total: 1, .. })));
}

#[tokio::test]
async fn test_empty_input_is_silent() {
    let (events, receiver) = mpsc::unbounded_channel();

    let documents = orchestrator(ScrapeConfig::default())
        .scrape_all(Vec::new(), "example.com", Some(events))
        .await;

    assert!(documents.is_empty());
    assert!(collect_events(receiver).await.is_empty());
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let server = MockServer::start().await;

    for i in 0..20 {
        Mock::given(method("GET"))
            .and(path(format!("/item-{}", i)))
            .respond_with(html(format!("<html><head><title>Item {}</title></head></html>", i)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let urls: Vec<_> = (0..20).map(|i| format!("{}/item-{}", server.uri(), i)).collect();
    let config = ScrapeConfig {
        min_workers: 3,
        max_workers: 3,
        ..ScrapeConfig::default()
    };

    let documents = orchestrator(config)
        .scrape_all(urls, &host_of(&server.uri()), None)
        .await;

    assert_eq!(documents.len(), 20);
}
