//! End-to-end tests for the rendering-proxy fetch path
//!
//! Pages must go through the mocked render.html endpoint — never directly to
//! the site — while media assets still stream over the direct transport.

use mirrorpress::config::{Config, CrawlConfig, FetchConfig, OutputConfig, RenderConfig};
use mirrorpress::crawler::Coordinator;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn render_config(
    start_url: String,
    endpoint: String,
    mirror_root: &std::path::Path,
) -> Config {
    Config {
        crawl: CrawlConfig {
            start_urls: vec![start_url],
            allowed_domains: vec!["127.0.0.1".to_string()],
            blocked_substrings: vec![],
            workers: 1,
            max_depth: None,
        },
        render: RenderConfig {
            enabled: true,
            endpoint,
            wait: 0.25,
            resource_timeout: 2,
            timeout: 10,
            strict_domains: true,
        },
        fetch: FetchConfig::default(),
        output: OutputConfig {
            mirror_root: mirror_root.display().to_string(),
        },
    }
}

#[tokio::test]
async fn test_pages_fetch_through_render_proxy() {
    let site = MockServer::start().await;
    let proxy = MockServer::start().await;
    let site_url = site.uri();

    let rendered_index = r#"<html><body>
        <a href="/about">About</a>
        <img src="logo.png">
        </body></html>"#
        .to_string();

    // The proxy returns fully rendered HTML per target URL
    Mock::given(method("GET"))
        .and(path("/render.html"))
        .and(query_param("url", format!("{}/", site_url)))
        .respond_with(ResponseTemplate::new(200).set_body_string(rendered_index.clone()))
        .mount(&proxy)
        .await;

    Mock::given(method("GET"))
        .and(path("/render.html"))
        .and(query_param("url", format!("{}/about", site_url)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rendered about</html>"))
        .mount(&proxy)
        .await;

    // The site itself only answers the probe and the media download
    Mock::given(method("HEAD"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .mount(&site)
        .await;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mirror");
    let config = render_config(
        format!("{}/", site_url),
        format!("{}/render.html", proxy.uri()),
        &root,
    );

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.mirrored, 2);
    assert_eq!(
        std::fs::read_to_string(root.join("127.0.0.1/index")).unwrap(),
        rendered_index
    );
    assert_eq!(
        std::fs::read_to_string(root.join("127.0.0.1/about/index")).unwrap(),
        "<html>rendered about</html>"
    );
    assert_eq!(std::fs::read(root.join("127.0.0.1/logo.png")).unwrap(), b"PNG");

    // No page body was requested from the site directly
    let direct_page_gets = site
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.to_string() == "GET" && r.url.path() != "/logo.png")
        .count();
    assert_eq!(direct_page_gets, 0);
}

#[tokio::test]
async fn test_render_proxy_failure_marks_page_failed() {
    let site = MockServer::start().await;
    let proxy = MockServer::start().await;

    // The proxy cannot render the page
    Mock::given(method("GET"))
        .and(path("/render.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&proxy)
        .await;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mirror");
    let config = render_config(
        format!("{}/", site.uri()),
        format!("{}/render.html", proxy.uri()),
        &root,
    );

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.fetch_failed, 1);
    assert_eq!(report.mirrored, 0);
    assert!(!root.join("127.0.0.1").exists());
}
