use site_harvest::config::HarvestConfig;
use wiremock::ResponseTemplate;

/// A 200 response carrying an HTML body
pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

/// A 200 response carrying sitemap XML
pub fn xml(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "application/xml")
}

/// `<urlset>` listing the given page URLs
pub fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

/// `<sitemapindex>` listing the given child sitemap URLs
pub fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

/// A simple article page
pub fn article_page(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title><meta name="description" content="About {title}"></head>
<body><nav>Home | Docs | Blog</nav><main><h1>{title}</h1><p>{body}</p></main><footer>Copyright</footer></body></html>"#
    )
}

/// Test configuration with short timeouts
pub fn test_config() -> HarvestConfig {
    let mut config = HarvestConfig::default();
    config.scrape.fetch_timeout_ms = 2_000;
    config.user_agent.name = "TestBot".to_string();
    config
}

/// Hostname of a mock server URI
pub fn host_of(uri: &str) -> String {
    url::Url::parse(uri)
        .expect("Failed to parse mock server URI")
        .host_str()
        .expect("Mock server URI has no host")
        .to_string()
}
