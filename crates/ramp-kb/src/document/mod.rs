pub mod cleaner;
pub mod loader;
pub mod pipeline;
pub mod splitter;
pub mod tagger;
pub mod types;

pub use cleaner::clean_text;
pub use loader::PdfLoader;
pub use pipeline::{IngestReport, IngestionPipeline, PipelineConfig};
pub use splitter::{RecursiveSplitter, SplitterConfig};
pub use tagger::{DocumentProfile, PriorityTagger, ProfileTable};
pub use types::{Chunk, ChunkMetadata, DocType, Priority};

use crate::error::KbError;

/// Default maximum source file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Chunks shorter than this are discarded by the pipeline as extraction
/// noise (stray headers, page artifacts).
pub const MIN_CHUNK_CHARS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("embedding failed: {0}")]
    Embedding(#[from] ramp_llm::LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] KbError),
}

/// Extracts raw text from a source document on disk.
pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<Box<dyn Future<Output = Result<String, DocumentError>> + Send + '_>>;
}
