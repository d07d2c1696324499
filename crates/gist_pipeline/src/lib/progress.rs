//! Progress reporting for pipeline invocations.
//!
//! Observers receive ordered milestone events, fire-and-forget; no
//! acknowledgment is expected and the pipeline never blocks on them.

/// Milestones of one pipeline invocation, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    LoadStarted,
    LoadComplete { documents: usize },
    ChunksPrepared { chunks: usize },
    MapComplete { partial_summaries: usize },
    Done,
}

pub trait ProgressObserver {
    fn on_event(&self, event: ProgressEvent);
}

impl<T: ProgressObserver> ProgressObserver for &T {
    fn on_event(&self, event: ProgressEvent) {
        (**self).on_event(event)
    }
}

/// Logs each milestone via `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::LoadStarted => tracing::info!("Loading source content"),
            ProgressEvent::LoadComplete { documents } => {
                tracing::info!(documents, "Content loaded")
            }
            ProgressEvent::ChunksPrepared { chunks } => {
                tracing::info!(chunks, "Content split and budgeted")
            }
            ProgressEvent::MapComplete { partial_summaries } => {
                tracing::info!(partial_summaries, "Per-chunk summaries complete")
            }
            ProgressEvent::Done => tracing::info!("Summary ready"),
        }
    }
}
