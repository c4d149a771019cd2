//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use orpheus_crawler::config::{Config, CrawlerConfig, DomainsConfig, OutputConfig, OutputFormat, StoreConfig};
use orpheus_crawler::crawler::Coordinator;
use orpheus_crawler::output::{read_records, FineTuneEntry};
use orpheus_crawler::storage::{SqliteStorage, Storage};
use orpheus_crawler::{AllowedDomains, CrawlRecord, DomainRegistry, PageOutcome};
use std::path::Path;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &Path, format: OutputFormat) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_requests: 4,
            request_timeout_secs: 1,
            ..CrawlerConfig::default()
        },
        domains: DomainsConfig {
            directory: dir.join("domains").display().to_string(),
            shortlink_domain: "hack.af".to_string(),
        },
        output: OutputConfig {
            records_path: dir.join("records.json").display().to_string(),
            format,
            finetune_path: None,
            finetune_topic: "Hack Club".to_string(),
        },
        store: None,
    }
}

/// Registry that allows the mock server's host and seeds the given paths
fn create_registry(base_url: &str, seed_paths: &[&str]) -> DomainRegistry {
    let host = url::Url::parse(base_url)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    DomainRegistry::from_parts(
        AllowedDomains::new([host]),
        seed_paths
            .iter()
            .map(|p| format!("{}{}", base_url, p))
            .collect(),
    )
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn records_by_url(records: &[CrawlRecord], base_url: &str) -> Vec<String> {
    let mut urls: Vec<String> = records
        .iter()
        .map(|r| r.url.trim_start_matches(base_url).to_string())
        .collect();
    urls.sort();
    urls
}

#[tokio::test]
async fn test_full_crawl_follows_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <h1>Welcome</h1>
            <p>Start here.</p>
            <a href="/page1">Page 1</a>
            <a href="/page2#top">Page 2</a>
            <a href="https://other.org/away">Elsewhere</a>
            <a href="mailto:hi@example.com">Mail</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        &mock_server,
        "/page1",
        r#"<html><head><title>Page 1</title></head><body>
            <p>Content 1</p>
            <a href="/">Home</a>
            <a href="/page2">Page 2</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        &mock_server,
        "/page2",
        r#"<html><head><title>Page 2</title></head><body><p>Content 2</p></body></html>"#
            .to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path(), OutputFormat::Lines);
    let registry = create_registry(&base_url, &["/"]);

    let mut coordinator = Coordinator::new(&config, &registry).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.count(PageOutcome::Recorded), 3);
    assert_eq!(stats.total_errors(), 0);
    assert_eq!(coordinator.frontier().visited_len(), 3);

    let records = read_records(Path::new(&config.output.records_path)).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records_by_url(&records, &base_url), vec!["/", "/page1", "/page2"]);

    let home = records.iter().find(|r| r.title == "Home").unwrap();
    assert_eq!(home.metadata.headings, vec!["Welcome"]);
    assert_eq!(home.content, "Start here.");
}

#[tokio::test]
async fn test_failing_pages_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/broken">Broken</a>
            <a href="/slow">Slow</a>
            <a href="/missing">Missing</a>
            <a href="/ok">Ok</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><title>Slow</title></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/ok",
        r#"<html><head><title>Ok</title></head><body><p>Fine</p></body></html>"#.to_string(),
    )
    .await;

    // Unmatched paths get wiremock's default 404

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path(), OutputFormat::Lines);
    let registry = create_registry(&base_url, &["/"]);

    let mut coordinator = Coordinator::new(&config, &registry).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.count(PageOutcome::Recorded), 2);
    assert_eq!(stats.count(PageOutcome::FetchFailed), 3);

    let records = read_records(Path::new(&config.output.records_path)).unwrap();
    assert_eq!(records_by_url(&records, &base_url), vec!["/", "/ok"]);
}

#[tokio::test]
async fn test_shortlink_is_recorded_once_under_resolved_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for short in ["/s/abc", "/s/def"] {
        Mock::given(method("HEAD"))
            .and(path(short))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/page"))
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/page",
        r#"<html><head><title>Target</title></head><body><p>Resolved</p></body></html>"#
            .to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path(), OutputFormat::Lines);
    config.domains.shortlink_domain = "127.0.0.1".to_string();
    let registry = create_registry(&base_url, &["/s/abc", "/s/def"]);

    let mut coordinator = Coordinator::new(&config, &registry).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.count(PageOutcome::Recorded), 1);
    assert_eq!(stats.count(PageOutcome::Duplicate), 1);

    let records = read_records(Path::new(&config.output.records_path)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{}/page", base_url));
    assert_eq!(records[0].title, "Target");
}

#[tokio::test]
async fn test_unresolved_shortlink_is_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/s/dead"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path(), OutputFormat::Lines);
    config.domains.shortlink_domain = "127.0.0.1".to_string();
    let registry = create_registry(&base_url, &["/s/dead"]);

    let mut coordinator = Coordinator::new(&config, &registry).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.count(PageOutcome::ShortlinkUnresolved), 1);
    assert_eq!(stats.count(PageOutcome::Recorded), 0);
}

#[tokio::test]
async fn test_record_fields_for_sparse_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><meta name="keywords" content="a, b, c"></head>
           <body><h2>Only heading</h2></body></html>"#
            .to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path(), OutputFormat::Array);
    let registry = create_registry(&base_url, &["/"]);

    let mut coordinator = Coordinator::new(&config, &registry).unwrap();
    coordinator.run().await.unwrap();

    let records = read_records(Path::new(&config.output.records_path)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "No Title");
    assert_eq!(records[0].content, "");
    assert_eq!(records[0].metadata.headings, vec!["Only heading"]);
    assert_eq!(records[0].metadata.keywords, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_all_sinks_receive_the_same_records() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <h1>Clubs</h1><h2>Events</h2><h3>Extra</h3>
            <p>Join us.</p>
            <a href="/about">About</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        &mock_server,
        "/about",
        r#"<html><head><title>About</title></head><body><p>Us.</p></body></html>"#.to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path(), OutputFormat::Array);
    let finetune_path = dir.path().join("finetune.jsonl");
    let db_path = dir.path().join("records.db");
    config.output.finetune_path = Some(finetune_path.display().to_string());
    config.store = Some(StoreConfig {
        database_path: db_path.display().to_string(),
    });
    let registry = create_registry(&base_url, &["/"]);

    let mut coordinator = Coordinator::new(&config, &registry).unwrap();
    let stats = coordinator.run().await.unwrap();
    assert_eq!(stats.sink_errors, 0);
    drop(coordinator);

    let records = read_records(Path::new(&config.output.records_path)).unwrap();
    assert_eq!(records.len(), 2);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_records().unwrap(), 2);
    for record in &records {
        assert_eq!(storage.get_record(&record.id).unwrap().as_ref(), Some(record));
    }

    let entries: Vec<FineTuneEntry> = std::fs::read_to_string(&finetune_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(entries.len(), 2);

    let home = entries
        .iter()
        .find(|e| e.messages[1].content == "Tell me about Home")
        .unwrap();
    assert_eq!(
        home.messages[0].content,
        "You are an expert in Hack Club topics related to Clubs, Events."
    );
    assert_eq!(home.messages[2].content, "Join us.");
}

async fn mount_slow_page(server: &MockServer, page: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><head><title>{}</title></head></html>", page))
                .insert_header("content-type", "text/html")
                .set_delay(delay),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_concurrency_cap_limits_in_flight_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let pages = ["/p1", "/p2", "/p3", "/p4", "/p5", "/p6"];
    for page in pages {
        mount_slow_page(&mock_server, page, Duration::from_millis(400)).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path(), OutputFormat::Lines);
    config.crawler.max_concurrent_requests = 2;
    config.crawler.request_timeout_secs = 5;
    let registry = create_registry(&base_url, &pages);

    let started = Instant::now();
    let mut coordinator = Coordinator::new(&config, &registry).unwrap();
    let stats = coordinator.run().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(stats.count(PageOutcome::Recorded), 6);
    // Six pages two at a time take at least three full delays
    assert!(
        elapsed >= Duration::from_millis(1200),
        "crawl finished in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_dispatch_delay_spaces_out_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let pages = ["/a", "/b", "/c"];
    for page in pages {
        mount_page(
            &mock_server,
            page,
            format!("<html><head><title>{}</title></head></html>", page),
        )
        .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path(), OutputFormat::Lines);
    config.crawler.max_concurrent_requests = 1;
    config.crawler.dispatch_delay_ms = 300;
    let registry = create_registry(&base_url, &pages);

    let started = Instant::now();
    let mut coordinator = Coordinator::new(&config, &registry).unwrap();
    let stats = coordinator.run().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(stats.count(PageOutcome::Recorded), 3);
    assert!(
        elapsed >= Duration::from_millis(600),
        "crawl finished in {:?}",
        elapsed
    );

    let records = read_records(Path::new(&config.output.records_path)).unwrap();
    assert_eq!(records_by_url(&records, &base_url), vec!["/a", "/b", "/c"]);
}
