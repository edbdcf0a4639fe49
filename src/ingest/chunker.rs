//! Text cleaning and chunking for ingestion.

use serde::{Deserialize, Serialize};

/// A loaded source document, before splitting.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub source: String,
}

/// A bounded text segment carrying its source for citation. Order among
/// chunks does not matter downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source: String,
}

/// Collapse all whitespace runs (including newlines) into single spaces and
/// trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split `text` into overlapping chunks of at most `chunk_size`
    /// characters, preferring to cut at a sentence boundary.
    pub fn split(&self, text: &str, source: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let mut chunks = Vec::new();

        if total == 0 {
            return chunks;
        }

        let step = self.chunk_size.saturating_sub(self.overlap).max(1);
        let mut start = 0;

        while start < total {
            let end = (start + self.chunk_size).min(total);
            let window: String = chars[start..end].iter().collect();

            let text = if end < total {
                cut_at_sentence_boundary(&window)
            } else {
                window
            };

            let trimmed = text.trim();
            if !trimmed.is_empty() {
                chunks.push(Chunk {
                    text: trimmed.to_string(),
                    source: source.to_string(),
                });
            }

            start += step;
        }

        chunks
    }
}

/// Cut the window at the last sentence ending found in its final fifth, or
/// return it whole when none is found.
fn cut_at_sentence_boundary(window: &str) -> String {
    const ENDINGS: [&str; 6] = [". ", "! ", "? ", ".\n", "!\n", "?\n"];

    let char_count = window.chars().count();
    let search_from = window
        .char_indices()
        .nth(char_count * 4 / 5)
        .map(|(byte, _)| byte)
        .unwrap_or(0);

    let tail = &window[search_from..];
    for ending in ENDINGS {
        if let Some(pos) = tail.rfind(ending) {
            return window[..search_from + pos + ending.len()].to_string();
        }
    }
    window.to_string()
}
