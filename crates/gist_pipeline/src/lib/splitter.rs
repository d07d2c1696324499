//! Document chunking with bounded windows and overlap.
//!
//! Splitting recursively prefers larger semantic boundaries (paragraph, then
//! line, then sentence, then word) before falling back to a hard character
//! cut, so chunk edges land on broken sentences as rarely as possible while
//! the length bound stays hard. Lengths are counted in characters; UTF-8
//! boundaries are never split.

use crate::types::{Chunk, Document};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

// larger boundaries first; the hard cut is the last resort
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl Default for ChunkSplitter {
    fn default() -> Self {
        ChunkSplitter::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl ChunkSplitter {
    /// Window and overlap in characters. Overlap is clamped below the window.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        ChunkSplitter {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Splits a document into ordered chunks with strictly increasing
    /// `order_index`. A document shorter than the window yields exactly one
    /// chunk.
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(order_index, text)| Chunk {
                text,
                order_index,
                origin_document_id: document.source_id.clone(),
            })
            .collect()
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut fragments = Vec::new();
        self.fragment(text, &SEPARATORS, &mut fragments);
        self.merge(fragments)
    }

    // Break text into fragments no longer than the window, descending the
    // separator hierarchy only for pieces that are still too long.
    fn fragment(&self, text: &str, separators: &[&str], out: &mut Vec<String>) {
        if char_len(text) <= self.chunk_size {
            if !text.is_empty() {
                out.push(text.to_string());
            }
            return;
        }

        let Some((sep, rest)) = separators.split_first() else {
            out.extend(hard_cut(text, self.chunk_size));
            return;
        };

        if !text.contains(sep) {
            self.fragment(text, rest, out);
            return;
        }

        for piece in text.split_inclusive(sep) {
            if char_len(piece) <= self.chunk_size {
                out.push(piece.to_string());
            } else {
                self.fragment(piece, rest, out);
            }
        }
    }

    // Greedily merge fragments into window-sized chunks, seeding each new
    // chunk with the trailing overlap of its predecessor. The seed shrinks
    // only when a fragment alone nearly fills the window, keeping the length
    // bound hard.
    fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for fragment in fragments {
            let fragment_len = char_len(&fragment);
            if current_len > 0 && current_len + fragment_len > self.chunk_size {
                chunks.push(current);
                let seed_len = self
                    .overlap
                    .min(self.chunk_size.saturating_sub(fragment_len));
                let previous = chunks.last().map(String::as_str).unwrap_or_default();
                current = tail_chars(previous, seed_len);
                current_len = char_len(&current);
            }
            current.push_str(&fragment);
            current_len += fragment_len;
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn tail_chars(text: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let len = char_len(text);
    if len <= n {
        return text.to_string();
    }
    text.chars().skip(len - n).collect()
}

fn hard_cut(text: &str, window: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(window)
        .map(|piece| piece.iter().collect())
        .collect()
}
