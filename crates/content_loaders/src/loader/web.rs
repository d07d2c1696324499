//! Web page loader: fetches a URL and extracts readable text.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::{header, Client, Url};
use scraper::{Html, Selector};

use crate::{Document, LoaderError};

const USER_AGENT: &str = "Mozilla/5.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article, main, [role='main']").unwrap());
static TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h1, h2, h3, h4, h5, h6, li").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

#[derive(Debug)]
pub struct WebPageLoader {
    client: Client,
}

impl WebPageLoader {
    pub fn new(client: Client) -> Self {
        WebPageLoader { client }
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<Document>, LoaderError> {
        let parsed = Url::parse(url)
            .map_err(|_| LoaderError::InvalidSource(format!("not a valid URL: {url}")))?;

        let html = self
            .client
            .get(parsed)
            .header(header::USER_AGENT, USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch page"))?
            .text()
            .await?;

        let (title, text) = extract_page_text(&html);
        if text.trim().is_empty() {
            return Err(LoaderError::Fetch {
                source_id: url.to_string(),
                reason: "no readable content found on page".into(),
            });
        }

        let mut doc = Document::new(text, url);
        if let Some(title) = title {
            doc = doc.with_metadata("title", title);
        }
        Ok(vec![doc])
    }
}

/// Extracts the page title and readable text from raw HTML, preferring a
/// dedicated content container over the full body.
fn extract_page_text(html: &str) -> (Option<String>, String) {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    if let Some(container) = document.select(&CONTAINER_SELECTOR).next() {
        let fragment = Html::parse_fragment(&container.html());
        let text = collect_block_text(&fragment);
        if !text.trim().is_empty() {
            return (title, text);
        }
    }

    (title, collect_block_text(&document))
}

fn collect_block_text(document: &Html) -> String {
    let mut blocks = Vec::new();
    for element in document.select(&TEXT_SELECTOR) {
        let text = element.text().collect::<Vec<_>>().join(" ");
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !cleaned.is_empty() {
            blocks.push(cleaned);
        }
    }
    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PAGE: &str = r#"<html>
<head><title>Release Notes</title><style>p { color: red }</style></head>
<body>
  <nav><li>Home</li></nav>
  <article>
    <h1>Version 2.0</h1>
    <p>The   parser was rewritten.</p>
    <li>Faster startup</li>
  </article>
</body>
</html>"#;

    #[test]
    fn prefers_article_content_over_navigation() {
        let (title, text) = extract_page_text(PAGE);
        assert_eq!(title.as_deref(), Some("Release Notes"));
        assert_eq!(text, "Version 2.0\n\nThe parser was rewritten.\n\nFaster startup");
        assert!(!text.contains("Home"));
    }

    #[test]
    fn falls_back_to_body_text_without_container() {
        let html = "<html><body><p>plain paragraph</p></body></html>";
        let (title, text) = extract_page_text(html);
        assert!(title.is_none());
        assert_eq!(text, "plain paragraph");
    }

    #[tokio::test]
    async fn fetches_page_into_document_with_title() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/post");
                then.status(200).body(PAGE);
            })
            .await;

        let loader = WebPageLoader::new(Client::new());
        let docs = loader
            .fetch(&format!("{}/post", server.base_url()))
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.contains("parser was rewritten"));
        assert_eq!(docs[0].metadata.get("title").map(String::as_str), Some("Release Notes"));
    }

    #[tokio::test]
    async fn empty_page_is_a_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/empty");
                then.status(200).body("<html><body></body></html>");
            })
            .await;

        let loader = WebPageLoader::new(Client::new());
        let err = loader
            .fetch(&format!("{}/empty", server.base_url()))
            .await
            .unwrap_err();
        assert!(matches!(err, LoaderError::Fetch { .. }));
    }
}
