use std::future::Future;

use crate::{Document, SourceInput, SourceKind};

pub mod docx;
pub mod pdf;
pub mod web;
pub mod youtube;

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("invalid source identifier: {0}")]
    InvalidSource(String),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to extract content from {source_id}: {reason}")]
    Fetch { source_id: String, reason: String },
}

/// Capability consumed by the summarization pipeline: resolve a source
/// identifier into an ordered sequence of documents.
pub trait ContentSource {
    fn fetch(
        &self,
        kind: SourceKind,
        input: &SourceInput,
    ) -> impl Future<Output = Result<Vec<Document>, LoaderError>> + Send;
}

impl<T: ContentSource + Sync> ContentSource for &T {
    async fn fetch(
        &self,
        kind: SourceKind,
        input: &SourceInput,
    ) -> Result<Vec<Document>, LoaderError> {
        (**self).fetch(kind, input).await
    }
}

/// Maps each [`SourceKind`] to its loader. Read-only after construction and
/// safe to share across concurrent pipeline invocations.
#[derive(Debug)]
pub struct LoaderRegistry {
    youtube: youtube::YouTubeTranscriptLoader,
    web: web::WebPageLoader,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        let client = reqwest::Client::new();
        LoaderRegistry {
            youtube: youtube::YouTubeTranscriptLoader::new(client.clone()),
            web: web::WebPageLoader::new(client),
        }
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSource for LoaderRegistry {
    #[tracing::instrument(skip(self))]
    async fn fetch(
        &self,
        kind: SourceKind,
        input: &SourceInput,
    ) -> Result<Vec<Document>, LoaderError> {
        match kind {
            SourceKind::Video => self.youtube.fetch(expect_url(input)?).await,
            SourceKind::WebPage => self.web.fetch(expect_url(input)?).await,
            SourceKind::Pdf => {
                let (name, data) = expect_bytes(input)?;
                pdf::load(name, data)
            }
            SourceKind::Docx => {
                let (name, data) = expect_bytes(input)?;
                docx::load(name, data)
            }
        }
    }
}

fn expect_url(input: &SourceInput) -> Result<&str, LoaderError> {
    match input {
        SourceInput::Url(url) => Ok(url),
        SourceInput::Bytes { name, .. } => Err(LoaderError::InvalidSource(format!(
            "expected a URL, got uploaded file {name}"
        ))),
    }
}

fn expect_bytes(input: &SourceInput) -> Result<(&str, &[u8]), LoaderError> {
    match input {
        SourceInput::Bytes { name, data } => Ok((name, data)),
        SourceInput::Url(url) => Err(LoaderError::InvalidSource(format!(
            "expected an uploaded file, got URL {url}"
        ))),
    }
}
