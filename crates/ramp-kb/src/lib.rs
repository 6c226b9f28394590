//! Document ingestion pipeline and vector store backends for the onboarding
//! knowledge base.

pub mod document;
pub mod error;
pub mod in_memory_store;
pub mod qdrant;
pub mod sources;
pub mod vector_store;

pub use document::{
    Chunk, ChunkMetadata, DocType, DocumentLoader, IngestReport, IngestionPipeline, PdfLoader,
    PipelineConfig, Priority, PriorityTagger, ProfileTable, RecursiveSplitter, SplitterConfig,
    clean_text,
};
pub use error::KbError;
pub use in_memory_store::InMemoryVectorStore;
pub use qdrant::QdrantOps;
pub use vector_store::{
    FieldCondition, FieldValue, ScoredVectorPoint, VectorFilter, VectorPoint, VectorStore,
    VectorStoreError,
};
