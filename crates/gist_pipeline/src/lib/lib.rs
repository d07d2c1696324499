//! # Gist Pipeline
//!
//! Content-to-summary pipeline: loads raw text from a heterogeneous source,
//! splits it into model-sized chunks under a token budget, summarizes chunks
//! independently, and recursively combines the partial summaries into one
//! final summary, degrading to a single bounded "stuff" call when the
//! map-reduce path fails.

mod engine;
mod error;
mod llm;
mod pipeline;
pub mod progress;
mod splitter;
mod tokens;
pub mod tracing;
pub mod types;

pub use engine::{EngineError, SummaryEngine, DEFAULT_MAP_CONCURRENCY};
pub use error::PipelineError;
pub use llm::{openai, CompletionModel};
pub use pipeline::{
    builder::SummaryPipelineBuilder, SummaryPipeline, DEFAULT_CHUNK_TOKEN_BUDGET,
};
pub use splitter::{ChunkSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use tokens::{TokenBudgeter, TokenizerError};
