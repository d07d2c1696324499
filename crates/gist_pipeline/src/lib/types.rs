pub use content_loaders::{Document, SourceInput, SourceKind};

/// Model parameters supplied by the caller for one pipeline invocation.
///
/// `temperature` defaults to `0.0`: summarization is intended to be
/// deterministic for a given input.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_name: String,
    pub max_context_tokens: usize,
    pub temperature: f32,
}

impl ModelConfig {
    pub fn new(model_name: impl Into<String>, max_context_tokens: usize) -> Self {
        ModelConfig {
            model_name: model_name.into(),
            max_context_tokens,
            temperature: 0.0,
        }
    }
}

/// Which strategy produced the final summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStrategy {
    MapReduce,
    StuffFallback,
}

/// Terminal artifact of a pipeline invocation.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    pub text: String,
    pub strategy_used: SummaryStrategy,
}

impl SummaryResult {
    /// The summary as a plain-text byte stream, ready to be written out as a
    /// `.txt` download.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

/// A bounded slice of a document, in document order.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub text: String,
    pub order_index: usize,
    pub origin_document_id: String,
}

/// One summarization request at the orchestrator boundary.
#[derive(Debug)]
pub struct SummarizeRequest {
    pub source_kind: SourceKind,
    pub input: SourceInput,
    pub model_config: ModelConfig,
    pub credential: String,
}
