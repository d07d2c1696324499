//! # Content Loaders
//!
//! This crate turns heterogeneous content sources (YouTube video
//! transcripts, web pages, PDF and Word documents) into plain-text
//! [`Document`]s for downstream summarization.
//!
//! Each source kind has its own loader; [`LoaderRegistry`] dispatches on
//! [`SourceKind`] and implements the [`ContentSource`] capability consumed by
//! the pipeline. Loaders perform no retries: upstream services are treated as
//! best-effort single-shot, and failures are surfaced as [`LoaderError`].

mod document;
mod loader;

pub use document::{Document, SourceInput, SourceKind};
pub use loader::youtube::{extract_video_id, TranscriptEntry, YouTubeTranscriptLoader};
pub use loader::{ContentSource, LoaderError, LoaderRegistry};
