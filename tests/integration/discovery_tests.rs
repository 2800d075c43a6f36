use crate::common::{html, sitemap_index, test_config, urlset, xml};
use reqwest::Client;
use site_harvest::config::DiscoveryConfig;
use site_harvest::crawler::{Discoverer, Harvester};
use site_harvest::sitemap::SitemapResolver;
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_sitemap_index_discovery() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(sitemap_index(&[
            format!("{}/sitemap-pages.xml", base),
            format!("{}/sitemap-posts.xml", base),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-pages.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/about", base),
            format!("{}/contact", base),
            "https://elsewhere.example/offsite".to_string(),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-posts.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/blog/one", base),
            format!("{}/about", base),
        ])))
        .mount(&server)
        .await;

    let harvester = Harvester::new(test_config()).unwrap();
    let urls = harvester.discover(&format!("{}/blog/one", base)).await.unwrap();

    let found: HashSet<_> = urls.iter().cloned().collect();
    let expected: HashSet<_> = ["/about", "/contact", "/blog/one"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();

    assert_eq!(urls.len(), 3, "duplicates must be removed: {:?}", urls);
    assert_eq!(found, expected);
}

#[tokio::test]
async fn test_homepage_fallback() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r##"<html><body>
            <a href="/guide">Guide</a>
            <a href="{base}/faq#shipping">FAQ</a>
            <a href="/guide">Guide again</a>
            <a href="/brochure.pdf">Brochure</a>
            <a href="https://elsewhere.example/">Partner</a>
            <a href="mailto:team@example.com">Mail</a>
            </body></html>"##
        )))
        .mount(&server)
        .await;

    let harvester = Harvester::new(test_config()).unwrap();
    let urls = harvester.discover(&base).await.unwrap();

    assert_eq!(urls, vec![format!("{}/guide", base), format!("{}/faq", base)]);
}

#[tokio::test]
async fn test_homepage_fallback_cap() {
    let server = MockServer::start().await;
    let links: String = (0..30).map(|i| format!(r#"<a href="/p{}">p</a>"#, i)).collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!("<html><body>{}</body></html>", links)))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.discovery.fallback_link_cap = 10;
    let harvester = Harvester::new(config).unwrap();

    let urls = harvester.discover(&server.uri()).await.unwrap();
    assert_eq!(urls.len(), 10);
}

#[tokio::test]
async fn test_robots_declared_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow:\n\nSitemap: {}/maps/custom.xml\n",
            base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/maps/custom.xml"))
        .respond_with(xml(urlset(&[format!("{}/hidden-gem", base)])))
        .expect(1)
        .mount(&server)
        .await;

    let harvester = Harvester::new(test_config()).unwrap();
    let urls = harvester.discover(&base).await.unwrap();

    assert_eq!(urls, vec![format!("{}/hidden-gem", base)]);
}

#[tokio::test]
async fn test_respect_robots_filters_disallowed() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/public", base),
            format!("{}/private/report", base),
        ])))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.discovery.respect_robots = true;
    let discoverer = Discoverer::new(Client::new(), &config);

    let urls = discoverer.discover(&base).await.unwrap();
    assert_eq!(urls, vec![format!("{}/public", base)]);

    config.discovery.respect_robots = false;
    let discoverer = Discoverer::new(Client::new(), &config);
    assert_eq!(discoverer.discover(&base).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_cyclic_sitemap_index_terminates() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(sitemap_index(&[
            format!("{}/sitemap.xml", base),
            format!("{}/child.xml", base),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/child.xml"))
        .respond_with(xml(sitemap_index(&[
            format!("{}/sitemap.xml#again", base),
            format!("{}/pages.xml", base),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages.xml"))
        .respond_with(xml(urlset(&[format!("{}/only-page", base)])))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = SitemapResolver::new(Client::new(), &DiscoveryConfig::default());
    let pages = resolver.resolve(&format!("{}/sitemap.xml", base)).await.unwrap();

    assert_eq!(pages, vec![format!("{}/only-page", base)]);
}

#[tokio::test]
async fn test_sitemap_depth_limit() {
    let server = MockServer::start().await;
    let base = server.uri();

    // /level-0.xml -> /level-1.xml -> ... each an index of the next
    for level in 0..4 {
        Mock::given(method("GET"))
            .and(path(format!("/level-{}.xml", level)))
            .respond_with(xml(sitemap_index(&[format!("{}/level-{}.xml", base, level + 1)])))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/level-4.xml"))
        .respond_with(xml(urlset(&[format!("{}/deep", base)])))
        .mount(&server)
        .await;

    let shallow = DiscoveryConfig {
        max_sitemap_depth: 2,
        ..DiscoveryConfig::default()
    };
    let resolver = SitemapResolver::new(Client::new(), &shallow);
    let pages = resolver.resolve(&format!("{}/level-0.xml", base)).await.unwrap();
    assert!(pages.is_empty());

    let resolver = SitemapResolver::new(Client::new(), &DiscoveryConfig::default());
    let pages = resolver.resolve(&format!("{}/level-0.xml", base)).await.unwrap();
    assert_eq!(pages, vec![format!("{}/deep", base)]);
}

#[tokio::test]
async fn test_sitemap_failures_are_soft() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(sitemap_index(&[
            format!("{}/missing.xml", base),
            format!("{}/broken.xml", base),
            format!("{}/good.xml", base),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(xml("<urlset><url><loc>oops</url>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/good.xml"))
        .respond_with(xml(urlset(&[format!("{}/ok", base)])))
        .mount(&server)
        .await;

    let resolver = SitemapResolver::new(Client::new(), &DiscoveryConfig::default());

    let pages = resolver.resolve(&format!("{}/sitemap.xml", base)).await.unwrap();
    assert_eq!(pages, vec![format!("{}/ok", base)]);

    // The root itself failing is reported
    assert!(resolver.resolve(&format!("{}/absent.xml", base)).await.is_err());
}

#[tokio::test]
async fn test_nothing_reachable_yields_empty() {
    let server = MockServer::start().await;

    let harvester = Harvester::new(test_config()).unwrap();
    let urls = harvester.discover(&server.uri()).await.unwrap();

    assert!(urls.is_empty());
}
