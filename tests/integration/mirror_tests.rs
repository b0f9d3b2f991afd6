//! End-to-end mirror tests over mock HTTP servers
//!
//! These tests run full crawls against wiremock servers into temporary
//! mirror roots, covering the page/media layout, re-run incrementality,
//! redirect handling, failure isolation, and the depth knob.

use mirrorpress::config::{Config, CrawlConfig, FetchConfig, OutputConfig, RenderConfig};
use mirrorpress::crawler::Coordinator;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawl configuration pointing at a mock server and a temp mirror root
fn test_config(start_url: String, mirror_root: &std::path::Path) -> Config {
    Config {
        crawl: CrawlConfig {
            start_urls: vec![start_url],
            allowed_domains: vec!["127.0.0.1".to_string()],
            blocked_substrings: vec![],
            workers: 1,
            max_depth: None,
        },
        render: RenderConfig::default(),
        fetch: FetchConfig::default(),
        output: OutputConfig {
            mirror_root: mirror_root.display().to_string(),
        },
    }
}

async fn run_crawl(config: Config) -> mirrorpress::crawler::CrawlReport {
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed")
}

#[tokio::test]
async fn test_mirror_page_media_and_link() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let index_body = r#"<html><body>
        <a href="/about">About</a>
        <img src="logo.png">
        </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_body))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>About us</body></html>"))
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGBYTES".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mirror");
    let report = run_crawl(test_config(format!("{}/", base_url), &root)).await;

    // Root page stored at the directory-page sentinel
    let index_path = root.join("127.0.0.1/index");
    assert_eq!(std::fs::read_to_string(&index_path).unwrap(), index_body);

    // Relative media nested next to the page that referenced it
    let logo_path = root.join("127.0.0.1/logo.png");
    assert_eq!(std::fs::read(&logo_path).unwrap(), b"PNGBYTES");

    // The followed link got its own directory page
    let about_path = root.join("127.0.0.1/about/index");
    assert_eq!(
        std::fs::read_to_string(&about_path).unwrap(),
        "<html><body>About us</body></html>"
    );

    assert_eq!(report.mirrored, 2);
    assert_eq!(report.from_cache, 0);
    assert_eq!(report.fetch_failed, 0);
    assert_eq!(report.discovered, 2);
    assert_eq!(report.processed, 2);

    // No staging residue anywhere in the tree
    assert!(!index_path.with_extension("temp").exists());
    assert!(!root.join("127.0.0.1/logo.png.temp").exists());
}

#[tokio::test]
async fn test_rerun_is_fully_cached() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/about">About</a><img src="logo.png"></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>about</html>"))
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mirror");
    let config = test_config(format!("{}/", base_url), &root);

    let first = run_crawl(config.clone()).await;
    assert_eq!(first.mirrored, 2);

    let requests_after_first = server.received_requests().await.unwrap().len();
    let index_bytes = std::fs::read(root.join("127.0.0.1/index")).unwrap();
    let logo_bytes = std::fs::read(root.join("127.0.0.1/logo.png")).unwrap();

    // Second run against the populated mirror: everything is a cache hit
    let second = run_crawl(config).await;
    assert_eq!(second.mirrored, 0);
    assert_eq!(second.from_cache, 2);
    assert_eq!(second.fetch_failed, 0);

    let requests_after_second = server.received_requests().await.unwrap().len();
    assert_eq!(
        requests_after_first, requests_after_second,
        "re-run must perform zero network fetches"
    );

    // Bytes untouched
    assert_eq!(std::fs::read(root.join("127.0.0.1/index")).unwrap(), index_bytes);
    assert_eq!(std::fs::read(root.join("127.0.0.1/logo.png")).unwrap(), logo_bytes);
}

#[tokio::test]
async fn test_redirecting_link_stored_under_final_url() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/old">Moved</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    // The probe follows the chain to /new
    Mock::given(method("HEAD"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>new home</html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mirror");
    let report = run_crawl(test_config(format!("{}/", base_url), &root)).await;

    assert!(root.join("127.0.0.1/new/index").is_file());
    assert!(!root.join("127.0.0.1/old").exists());

    // Root page plus the redirect target, nothing else
    assert_eq!(report.mirrored, 2);
    assert_eq!(report.processed, 2);
}

#[tokio::test]
async fn test_failed_page_does_not_abort_crawl() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <a href="/broken">Broken</a>
            <a href="/ok">Fine</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    for p in ["/broken", "/ok"] {
        Mock::given(method("HEAD"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>fine</html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mirror");
    let report = run_crawl(test_config(format!("{}/", base_url), &root)).await;

    assert_eq!(report.fetch_failed, 1);
    assert_eq!(report.mirrored, 2);
    assert!(root.join("127.0.0.1/ok/index").is_file());
    assert!(!root.join("127.0.0.1/broken").exists());
}

#[tokio::test]
async fn test_max_depth_knob_bounds_traversal() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/level1">One</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/level2">Two</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    for p in ["/level1", "/level2"] {
        Mock::given(method("HEAD"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mirror");
    let mut config = test_config(format!("{}/", base_url), &root);
    config.crawl.max_depth = Some(1);

    let report = run_crawl(config).await;

    assert!(root.join("127.0.0.1/level1/index").is_file());
    assert!(!root.join("127.0.0.1/level2").exists());
    assert_eq!(report.processed, 2);
}

#[tokio::test]
async fn test_out_of_scope_links_are_not_followed() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <a href="http://elsewhere.example.org/page">External</a>
            <a href="mailto:admin@example.com">Mail</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mirror");
    let report = run_crawl(test_config(format!("{}/", base_url), &root)).await;

    // Only the start URL was ever admitted
    assert_eq!(report.discovered, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(report.mirrored, 1);

    // Nothing was fetched beyond the root page
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}
