//! Map-reduce summarization with a single-call fallback.
//!
//! One invocation walks a small state machine: MAP summarizes every chunk
//! independently, REDUCE recursively combines the partial summaries until one
//! remains, and any LLM failure in either stage degrades to the FALLBACK
//! ("stuff") strategy: one bounded call over a prefix of the content. Only a
//! fallback failure is terminal.

use futures::{stream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;

use crate::llm::CompletionModel;
use crate::progress::{ProgressEvent, ProgressObserver};
use crate::tokens::TokenBudgeter;
use crate::types::{Chunk, ModelConfig, SummaryResult, SummaryStrategy};

pub const DEFAULT_MAP_CONCURRENCY: usize = 4;

// headroom for prompt scaffolding and the completion itself
const RESPONSE_RESERVE_TOKENS: usize = 2_000;
// the fallback trades completeness for reliability: a bounded content prefix
const STUFF_CHUNK_LIMIT: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no chunks to summarize")]
    EmptyInput,
    #[error("summarization failed after fallback: {source}")]
    Summarization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("summarization was cancelled")]
    Cancelled,
}

#[derive(Debug)]
pub struct SummaryEngine<M> {
    model: M,
    budgeter: TokenBudgeter,
    map_concurrency: usize,
}

impl<M> SummaryEngine<M>
where
    M: CompletionModel + Sync,
{
    pub fn new(model: M, budgeter: TokenBudgeter) -> Self {
        SummaryEngine {
            model,
            budgeter,
            map_concurrency: DEFAULT_MAP_CONCURRENCY,
        }
    }

    pub fn with_map_concurrency(mut self, limit: usize) -> Self {
        self.map_concurrency = limit.max(1);
        self
    }

    /// Summarizes `chunks` into one result, tagged with the strategy that
    /// produced it. Cancellation abandons in-flight calls and discards any
    /// partial summaries.
    #[tracing::instrument(skip_all, fields(chunks = chunks.len()))]
    pub async fn summarize<O: ProgressObserver>(
        &self,
        chunks: &[Chunk],
        config: &ModelConfig,
        progress: &O,
        cancel: &CancellationToken,
    ) -> Result<SummaryResult, EngineError> {
        if chunks.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let map_reduce = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
            result = self.map_reduce(chunks, config, progress) => result,
        };

        match map_reduce {
            Ok(text) => Ok(SummaryResult {
                text,
                strategy_used: SummaryStrategy::MapReduce,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Map-reduce failed; degrading to stuff fallback");
                let fallback = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                    result = self.stuff(chunks, config) => result,
                };
                match fallback {
                    Ok(text) => Ok(SummaryResult {
                        text,
                        strategy_used: SummaryStrategy::StuffFallback,
                    }),
                    Err(e) => Err(EngineError::Summarization {
                        source: Box::new(e),
                    }),
                }
            }
        }
    }

    async fn map_reduce<O: ProgressObserver>(
        &self,
        chunks: &[Chunk],
        config: &ModelConfig,
        progress: &O,
    ) -> Result<String, M::Error> {
        let partials = self.map_chunks(chunks, config).await?;
        progress.on_event(ProgressEvent::MapComplete {
            partial_summaries: partials.len(),
        });
        self.reduce(partials, config).await
    }

    // The map step has no ordering requirement, so chunk calls run with
    // bounded concurrency; `buffered` still yields results in chunk order,
    // which the reduce step relies on. The first failure aborts the stage
    // and abandons in-flight calls.
    async fn map_chunks(
        &self,
        chunks: &[Chunk],
        config: &ModelConfig,
    ) -> Result<Vec<String>, M::Error> {
        stream::iter(chunks)
            .map(|chunk| self.model.complete(&chunk.text, config))
            .buffered(self.map_concurrency)
            .try_collect()
            .await
    }

    // Combination follows original chunk order so chronological narratives
    // stay monotonic across reduction rounds. A single partial summary needs
    // no combine call at all.
    async fn reduce(
        &self,
        mut summaries: Vec<String>,
        config: &ModelConfig,
    ) -> Result<String, M::Error> {
        while summaries.len() > 1 {
            let batches = self.pack_batches(&summaries, config);
            tracing::debug!(
                input = summaries.len(),
                batches = batches.len(),
                "Combining partial summaries"
            );
            summaries = stream::iter(batches)
                .map(|batch| async move { self.model.complete(&batch, config).await })
                .buffered(self.map_concurrency)
                .try_collect()
                .await?;
        }
        Ok(summaries.pop().unwrap_or_default())
    }

    // Greedy in-order packing: every batch takes at least two summaries while
    // more than one remains, so each round strictly shrinks; after that it
    // keeps filling while the joined text stays within the reduction budget.
    // Oversized batches are truncated to the budget before the call.
    fn pack_batches(&self, summaries: &[String], config: &ModelConfig) -> Vec<String> {
        let budget = self.reduce_budget(config);
        let mut batches = Vec::new();
        let mut i = 0;

        while i < summaries.len() {
            let mut batch = summaries[i].clone();
            i += 1;
            if i < summaries.len() {
                batch.push_str("\n\n");
                batch.push_str(&summaries[i]);
                i += 1;
            }
            while i < summaries.len()
                && self.budgeter.count(&batch) + self.budgeter.count(&summaries[i]) <= budget
            {
                batch.push_str("\n\n");
                batch.push_str(&summaries[i]);
                i += 1;
            }
            batches.push(self.budgeter.truncate(&batch, budget));
        }
        batches
    }

    async fn stuff(&self, chunks: &[Chunk], config: &ModelConfig) -> Result<String, M::Error> {
        let prefix = chunks
            .iter()
            .take(STUFF_CHUNK_LIMIT)
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = self.budgeter.truncate(&prefix, self.reduce_budget(config));
        self.model.complete(&prompt, config).await
    }

    fn reduce_budget(&self, config: &ModelConfig) -> usize {
        config
            .max_context_tokens
            .saturating_sub(RESPONSE_RESERVE_TOKENS)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoModel;

    impl CompletionModel for EchoModel {
        type Error = std::convert::Infallible;

        async fn complete(
            &self,
            prompt: &str,
            _config: &ModelConfig,
        ) -> Result<String, Self::Error> {
            Ok(prompt.to_string())
        }
    }

    fn engine() -> SummaryEngine<EchoModel> {
        SummaryEngine::new(EchoModel, TokenBudgeter::for_model("gpt-4").unwrap())
    }

    #[test]
    fn packing_keeps_order_and_shrinks_the_round() {
        let engine = engine();
        let config = ModelConfig::new("gpt-4", 10_000);
        let summaries: Vec<String> = (0..7).map(|i| format!("summary {i}")).collect();

        let batches = engine.pack_batches(&summaries, &config);
        assert!(batches.len() < summaries.len());

        let joined = batches.join("\n\n");
        let positions: Vec<_> = (0..7)
            .map(|i| joined.find(&format!("summary {i}")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn packing_pairs_summaries_even_under_a_tiny_budget() {
        let engine = engine();
        let config = ModelConfig::new("gpt-4", 1);
        let summaries: Vec<String> = (0..5).map(|i| format!("s{i}")).collect();

        // pairs of two with a trailing singleton: the round still shrinks
        let batches = engine.pack_batches(&summaries, &config);
        assert_eq!(batches.len(), 3);
    }
}
