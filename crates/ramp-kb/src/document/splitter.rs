//! Recursive character splitting with overlap.
//!
//! Splits along progressively finer separators (paragraphs, lines, sentence
//! endings, whitespace) so chunks stay within the size budget while breaking
//! at natural boundaries where possible.

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 600,
            chunk_overlap: 80,
        }
    }
}

/// Separator hierarchy, coarsest first.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

pub struct RecursiveSplitter {
    config: SplitterConfig,
}

impl RecursiveSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Split `text` into ordered chunks of at most `chunk_size` characters,
    /// adjacent chunks sharing up to `chunk_overlap` characters of trailing
    /// context. A single atomic piece longer than `chunk_size` is emitted
    /// alone, unsplit.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let pieces = split_recursive(text, &SEPARATORS, self.config.chunk_size);
        merge_pieces(&pieces, self.config.chunk_size, self.config.chunk_overlap)
    }
}

/// Break text into atomic pieces no longer than `chunk_size` where the
/// separator hierarchy allows it. Each piece keeps its trailing separator.
fn split_recursive(text: &str, separators: &[&str], chunk_size: usize) -> Vec<String> {
    if text.len() <= chunk_size {
        return vec![text.to_owned()];
    }

    let Some((idx, sep)) = separators
        .iter()
        .enumerate()
        .find(|(_, sep)| text.contains(**sep))
    else {
        // No separator applies: the text is one atomic oversize unit.
        return vec![text.to_owned()];
    };

    let mut pieces = Vec::new();
    for part in text.split_inclusive(sep) {
        if part.len() <= chunk_size {
            pieces.push(part.to_owned());
        } else {
            pieces.extend(split_recursive(part, &separators[idx + 1..], chunk_size));
        }
    }
    pieces
}

/// Merge pieces into chunks, respecting size and overlap.
fn merge_pieces(pieces: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Sliding window over the piece indices contributing to the current chunk.
    let mut window_start = 0;

    for (idx, piece) in pieces.iter().enumerate() {
        if piece.len() >= chunk_size {
            // Atomic oversize piece: flush and emit it on its own, without an
            // overlap prefix that would stretch it further.
            if !current.trim().is_empty() {
                chunks.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            chunks.push(piece.clone());
            window_start = idx + 1;
            continue;
        }

        if !current.is_empty() && current.len() + piece.len() > chunk_size {
            chunks.push(current.clone());

            // Build overlap from recent pieces, walking backwards.
            current.clear();
            let mut overlap_len = 0;
            let mut overlap_start = idx;
            for i in (window_start..idx).rev() {
                if overlap_len + pieces[i].len() > chunk_overlap {
                    break;
                }
                overlap_len += pieces[i].len();
                overlap_start = i;
            }
            for p in &pieces[overlap_start..idx] {
                current.push_str(p);
            }
            window_start = overlap_start;
        }

        current.push_str(piece);
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks
}
