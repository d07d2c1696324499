use content_loaders::LoaderError;

use crate::engine::EngineError;
use crate::tokens::TokenizerError;

/// Terminal failures of one pipeline invocation.
///
/// Validation errors are raised before any collaborator is touched; loader
/// errors abort before the summarization engine is invoked; LLM-call failures
/// are recovered inside the engine via the fallback strategy and only surface
/// here once the fallback itself has failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
