use std::future::Future;

use crate::types::ModelConfig;

/// The LLM capability consumed by the summarization engine: one prompt in,
/// one completion out. Any failure is treated uniformly by the engine as a
/// trigger for the fallback strategy.
pub trait CompletionModel {
    type Error: std::error::Error + Send + Sync + 'static;

    fn complete(
        &self,
        prompt: &str,
        config: &ModelConfig,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

impl<T: CompletionModel + Sync> CompletionModel for &T {
    type Error = T::Error;

    async fn complete(&self, prompt: &str, config: &ModelConfig) -> Result<String, Self::Error> {
        (**self).complete(prompt, config).await
    }
}
