use content_loaders::ContentSource;

use crate::engine::DEFAULT_MAP_CONCURRENCY;
use crate::llm::CompletionModel;
use crate::pipeline::{SummaryPipeline, DEFAULT_CHUNK_TOKEN_BUDGET};
use crate::progress::ProgressObserver;
use crate::splitter::ChunkSplitter;

pub struct SummaryPipelineBuilder<L = (), M = (), O = ()> {
    loader: L,
    model: M,
    observer: O,
    splitter: ChunkSplitter,
    chunk_token_budget: usize,
    map_concurrency: usize,
}

impl SummaryPipelineBuilder {
    pub fn new() -> Self {
        Self {
            loader: (),
            model: (),
            observer: (),
            splitter: ChunkSplitter::default(),
            chunk_token_budget: DEFAULT_CHUNK_TOKEN_BUDGET,
            map_concurrency: DEFAULT_MAP_CONCURRENCY,
        }
    }
}

impl Default for SummaryPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, M, O> SummaryPipelineBuilder<L, M, O> {
    pub fn loader<L2: ContentSource + Send + Sync + 'static>(
        self,
        loader: L2,
    ) -> SummaryPipelineBuilder<L2, M, O> {
        SummaryPipelineBuilder {
            loader,
            model: self.model,
            observer: self.observer,
            splitter: self.splitter,
            chunk_token_budget: self.chunk_token_budget,
            map_concurrency: self.map_concurrency,
        }
    }

    pub fn model<M2: CompletionModel + Send + Sync + 'static>(
        self,
        model: M2,
    ) -> SummaryPipelineBuilder<L, M2, O> {
        SummaryPipelineBuilder {
            loader: self.loader,
            model,
            observer: self.observer,
            splitter: self.splitter,
            chunk_token_budget: self.chunk_token_budget,
            map_concurrency: self.map_concurrency,
        }
    }

    pub fn observer<O2: ProgressObserver + Send + Sync + 'static>(
        self,
        observer: O2,
    ) -> SummaryPipelineBuilder<L, M, O2> {
        SummaryPipelineBuilder {
            loader: self.loader,
            model: self.model,
            observer,
            splitter: self.splitter,
            chunk_token_budget: self.chunk_token_budget,
            map_concurrency: self.map_concurrency,
        }
    }

    pub fn with_chunking(mut self, chunk_size: usize, overlap: usize) -> Self {
        self.splitter = ChunkSplitter::new(chunk_size, overlap);
        self
    }

    pub fn chunk_token_budget(mut self, budget: usize) -> Self {
        self.chunk_token_budget = budget.max(1);
        self
    }

    pub fn map_concurrency(mut self, limit: usize) -> Self {
        self.map_concurrency = limit.max(1);
        self
    }
}

impl<L, M, O> SummaryPipelineBuilder<L, M, O>
where
    L: ContentSource + Send + Sync + 'static,
    M: CompletionModel + Send + Sync + 'static,
    O: ProgressObserver + Send + Sync + 'static,
{
    pub fn build(self) -> SummaryPipeline<L, M, O> {
        SummaryPipeline {
            loader: self.loader,
            model: self.model,
            observer: self.observer,
            splitter: self.splitter,
            chunk_token_budget: self.chunk_token_budget,
            map_concurrency: self.map_concurrency,
        }
    }
}
