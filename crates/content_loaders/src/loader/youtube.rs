//! YouTube transcript loader.
//!
//! Extracts a canonical video id from either URL shape YouTube uses
//! (`youtube.com/watch?v=<id>` and `youtu.be/<id>`), fetches the timedtext
//! transcript for it, and concatenates the timed entries into one document.

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, Url};

use crate::{Document, LoaderError};

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";
const TRANSCRIPT_LANG: &str = "en";

/// One timed caption entry, in transcript order.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

#[derive(Debug)]
pub struct YouTubeTranscriptLoader {
    client: Client,
    base_url: String,
}

impl YouTubeTranscriptLoader {
    pub fn new(client: Client) -> Self {
        YouTubeTranscriptLoader {
            client,
            base_url: YOUTUBE_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<Document>, LoaderError> {
        let video_id = extract_video_id(url)?;

        let resp = self
            .client
            .get(format!("{}/api/timedtext", self.base_url))
            .query(&[("v", video_id.as_str()), ("lang", TRANSCRIPT_LANG)])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch transcript"))?;

        if !resp.status().is_success() {
            return Err(LoaderError::Fetch {
                source_id: url.to_string(),
                reason: format!("transcript endpoint returned {}", resp.status()),
            });
        }

        let xml = resp.text().await?;
        let entries = parse_transcript_xml(&xml).map_err(|reason| LoaderError::Fetch {
            source_id: url.to_string(),
            reason,
        })?;

        if entries.is_empty() {
            return Err(LoaderError::Fetch {
                source_id: url.to_string(),
                reason: "no transcript available for this video".into(),
            });
        }

        // entries are already time-ordered; no re-sorting
        let text = entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(vec![Document::new(text, url)
            .with_metadata("video_id", video_id)
            .with_metadata("transcript_entries", entries.len().to_string())])
    }
}

/// Pulls the canonical video id out of a YouTube URL.
///
/// Accepts the query-parameter form (`youtube.com/watch?v=<id>`) and the
/// short-link path form (`youtu.be/<id>`); anything else is an invalid
/// source.
pub fn extract_video_id(url: &str) -> Result<String, LoaderError> {
    let parsed = Url::parse(url)
        .map_err(|_| LoaderError::InvalidSource(format!("not a valid URL: {url}")))?;
    let host = parsed.host_str().unwrap_or_default();

    if host == "youtu.be" {
        let id = parsed.path().trim_matches('/');
        if id.is_empty() {
            return Err(LoaderError::InvalidSource(format!(
                "short-link URL has no video id: {url}"
            )));
        }
        return Ok(id.to_string());
    }

    if host.ends_with("youtube.com") {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                LoaderError::InvalidSource(format!("URL has no 'v' parameter: {url}"))
            });
    }

    Err(LoaderError::InvalidSource(format!(
        "not a recognized video URL: {url}"
    )))
}

/// Parses the timedtext XML (`<transcript><text start=".." dur="..">..`)
/// into ordered entries, unescaping XML entities in caption text.
fn parse_transcript_xml(xml: &str) -> Result<Vec<TranscriptEntry>, String> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut current: Option<TranscriptEntry> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                let mut entry = TranscriptEntry {
                    start: 0.0,
                    duration: 0.0,
                    text: String::new(),
                };
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| e.to_string())?;
                    let value = attr.unescape_value().map_err(|e| e.to_string())?;
                    match attr.key.as_ref() {
                        b"start" => entry.start = value.parse().unwrap_or(0.0),
                        b"dur" => entry.duration = value.parse().unwrap_or(0.0),
                        _ => {}
                    }
                }
                current = Some(entry);
            }
            Ok(Event::Text(t)) => {
                if let Some(entry) = current.as_mut() {
                    entry.text.push_str(&t.unescape().map_err(|e| e.to_string())?);
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                if let Some(mut entry) = current.take() {
                    entry.text = entry.text.trim().to_string();
                    if !entry.text.is_empty() {
                        entries.push(entry);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("malformed transcript XML: {e}")),
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn extracts_id_from_watch_url() {
        let id = extract_video_id("https://www.youtube.com/watch?v=abc123").unwrap();
        assert_eq!(id, "abc123");
    }

    #[test]
    fn extracts_id_from_short_link() {
        let id = extract_video_id("https://youtu.be/abc123").unwrap();
        assert_eq!(id, "abc123");
    }

    #[test]
    fn rejects_watch_url_without_v_parameter() {
        let err = extract_video_id("https://www.youtube.com/watch?list=xyz").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidSource(_)), "{err:?}");
    }

    #[test]
    fn rejects_non_video_url() {
        let err = extract_video_id("https://example.com/watch?v=abc123").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidSource(_)));
    }

    #[test]
    fn rejects_non_url_identifier() {
        let err = extract_video_id("not a url").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidSource(_)));
    }

    #[test]
    fn parses_transcript_entries_in_order() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<transcript>
  <text start="0.0" dur="2.5">first line</text>
  <text start="2.5" dur="3.0">second &amp; third</text>
</transcript>"#;

        let entries = parse_transcript_xml(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "first line");
        assert_eq!(entries[0].start, 0.0);
        assert_eq!(entries[1].text, "second & third");
        assert_eq!(entries[1].duration, 3.0);
    }

    #[tokio::test]
    async fn fetches_transcript_as_single_document() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/timedtext")
                    .query_param("v", "abc123");
                then.status(200).body(
                    r#"<transcript><text start="0" dur="1">hello</text><text start="1" dur="1">world</text></transcript>"#,
                );
            })
            .await;

        let loader = YouTubeTranscriptLoader::new(Client::new()).with_base_url(server.base_url());
        let docs = loader
            .fetch("https://www.youtube.com/watch?v=abc123")
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "hello\nworld");
        assert_eq!(docs[0].metadata.get("video_id").map(String::as_str), Some("abc123"));
    }

    #[tokio::test]
    async fn empty_transcript_is_a_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/timedtext");
                then.status(200).body("<transcript></transcript>");
            })
            .await;

        let loader = YouTubeTranscriptLoader::new(Client::new()).with_base_url(server.base_url());
        let err = loader
            .fetch("https://youtu.be/abc123")
            .await
            .unwrap_err();

        assert!(matches!(err, LoaderError::Fetch { .. }), "{err:?}");
    }
}
