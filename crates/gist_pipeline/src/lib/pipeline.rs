use content_loaders::{ContentSource, SourceInput, SourceKind};
use reqwest::Url;
use tokio_util::sync::CancellationToken;

use crate::engine::SummaryEngine;
use crate::error::PipelineError;
use crate::llm::CompletionModel;
use crate::progress::{ProgressEvent, ProgressObserver};
use crate::splitter::ChunkSplitter;
use crate::tokens::TokenBudgeter;
use crate::types::{Chunk, Document, SummarizeRequest, SummaryResult};

pub mod builder;

/// Per-chunk token cap applied after splitting, before the engine sees a
/// chunk.
pub const DEFAULT_CHUNK_TOKEN_BUDGET: usize = 3_000;

// The content-to-summary pipeline: validate, load, split + budget, summarize.
pub struct SummaryPipeline<L, M, O>
where
    L: ContentSource + Send + Sync + 'static,
    M: CompletionModel + Send + Sync + 'static,
    O: ProgressObserver + Send + Sync + 'static,
{
    loader: L,
    model: M,
    observer: O,
    splitter: ChunkSplitter,
    chunk_token_budget: usize,
    map_concurrency: usize,
}

impl<L, M, O> SummaryPipeline<L, M, O>
where
    L: ContentSource + Send + Sync + 'static,
    M: CompletionModel + Send + Sync + 'static,
    O: ProgressObserver + Send + Sync + 'static,
{
    /// Runs one summarization request to completion.
    ///
    /// Documents and chunks created here are owned by this invocation; the
    /// loader and tokenizer are read-only, so concurrent invocations need no
    /// coordination.
    #[tracing::instrument(skip_all, fields(source_kind = ?request.source_kind))]
    pub async fn run(
        &self,
        request: &SummarizeRequest,
        cancel: &CancellationToken,
    ) -> Result<SummaryResult, PipelineError> {
        validate(request)?;

        self.observer.on_event(ProgressEvent::LoadStarted);
        let documents = self
            .loader
            .fetch(request.source_kind, &request.input)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to load source content"))?;
        self.observer.on_event(ProgressEvent::LoadComplete {
            documents: documents.len(),
        });

        let budgeter = TokenBudgeter::for_model(&request.model_config.model_name)?;
        let chunks = self.prepare_chunks(&documents, &budgeter);
        self.observer.on_event(ProgressEvent::ChunksPrepared {
            chunks: chunks.len(),
        });

        let engine = SummaryEngine::new(&self.model, budgeter)
            .with_map_concurrency(self.map_concurrency);
        let summary = engine
            .summarize(&chunks, &request.model_config, &self.observer, cancel)
            .await?;

        self.observer.on_event(ProgressEvent::Done);
        Ok(summary)
    }

    // Split every document, renumber chunk order globally across the
    // document sequence, and truncate each chunk to the per-chunk token
    // budget.
    fn prepare_chunks(&self, documents: &[Document], budgeter: &TokenBudgeter) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for document in documents {
            for mut chunk in self.splitter.split(document) {
                chunk.order_index = chunks.len();
                chunk.text = budgeter.truncate(&chunk.text, self.chunk_token_budget);
                chunks.push(chunk);
            }
        }
        chunks
    }
}

// Precondition checks; any failure here is reported to the caller without
// invoking the loader or the engine.
fn validate(request: &SummarizeRequest) -> Result<(), PipelineError> {
    if request.credential.trim().is_empty() {
        return Err(PipelineError::Validation("API credential is missing".into()));
    }
    if request.model_config.max_context_tokens == 0 {
        return Err(PipelineError::Validation(
            "model context budget must be greater than zero".into(),
        ));
    }

    match (request.source_kind, &request.input) {
        (SourceKind::Video | SourceKind::WebPage, SourceInput::Url(url)) => {
            if url.trim().is_empty() {
                return Err(PipelineError::Validation("URL is empty".into()));
            }
            if Url::parse(url).is_err() {
                return Err(PipelineError::Validation(format!(
                    "not a valid URL: {url}"
                )));
            }
        }
        (SourceKind::Video | SourceKind::WebPage, SourceInput::Bytes { .. }) => {
            return Err(PipelineError::Validation(
                "this source kind expects a URL, not an uploaded file".into(),
            ));
        }
        (SourceKind::Pdf | SourceKind::Docx, SourceInput::Bytes { data, .. }) => {
            if data.is_empty() {
                return Err(PipelineError::Validation("uploaded file is empty".into()));
            }
        }
        (SourceKind::Pdf | SourceKind::Docx, SourceInput::Url(_)) => {
            return Err(PipelineError::Validation(
                "this source kind expects an uploaded file, not a URL".into(),
            ));
        }
    }

    Ok(())
}
