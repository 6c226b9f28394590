//! One-shot ingestion: extract, clean, tag, chunk, embed, load.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::PathBuf;

use ramp_llm::LlmProvider;
use uuid::Uuid;

use super::cleaner::clean_text;
use super::splitter::{RecursiveSplitter, SplitterConfig};
use super::tagger::{PriorityTagger, ProfileTable};
use super::types::{Chunk, ChunkMetadata, DocType, Priority};
use super::{DocumentError, DocumentLoader, MIN_CHUNK_CHARS};
use crate::sources::{checklist, roster};
use crate::vector_store::{VectorPoint, VectorStore};

/// The three policy documents the knowledge base is built from.
pub const POLICY_SOURCES: [&str; 3] = [
    "2018-shrm-public-policy-issues-guide-030518.pdf",
    "organization-coe.pdf",
    "shrm-hr-curriculum-guidelines-3.pdf",
];

const CHECKLIST_FILE: &str = "onboarding_master.json";
const ROSTER_FILE: &str = "employees.csv";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub collection: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_chars: usize,
    pub embed_batch_size: usize,
    pub vector_size: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            collection: "hr_onboarding_kb".into(),
            chunk_size: 600,
            chunk_overlap: 80,
            min_chunk_chars: MIN_CHUNK_CHARS,
            embed_batch_size: 50,
            vector_size: 1536,
        }
    }
}

/// Chunk counts after a pipeline run, grouped by document type and source
/// file.
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    pub total: usize,
    pub by_doc_type: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
}

impl IngestReport {
    fn record(&mut self, chunk: &Chunk) {
        self.total += 1;
        *self
            .by_doc_type
            .entry(chunk.metadata.doc_type.to_string())
            .or_default() += 1;
        *self
            .by_source
            .entry(chunk.metadata.source_file.clone())
            .or_default() += 1;
    }
}

impl std::fmt::Display for IngestReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ingested {} chunks", self.total)?;
        for (doc_type, count) in &self.by_doc_type {
            writeln!(f, "  {doc_type:<20} {count}")?;
        }
        for (source, count) in &self.by_source {
            writeln!(f, "  {source:<50} {count}")?;
        }
        Ok(())
    }
}

/// Sequential batch pipeline populating the vector collection.
///
/// Source-level failures (missing files, extraction errors) are logged and
/// contribute zero chunks; embedding or storage failures abort the run. The
/// target collection is rebuilt from scratch on every run, so re-runs never
/// accumulate duplicates.
pub struct IngestionPipeline<'a, P, S> {
    config: PipelineConfig,
    splitter: RecursiveSplitter,
    profiles: ProfileTable,
    tagger: PriorityTagger,
    loader: Box<dyn DocumentLoader + 'a>,
    provider: &'a P,
    store: &'a S,
}

impl<'a, P: LlmProvider, S: VectorStore> IngestionPipeline<'a, P, S> {
    #[must_use]
    pub fn new(
        config: PipelineConfig,
        loader: Box<dyn DocumentLoader + 'a>,
        provider: &'a P,
        store: &'a S,
    ) -> Self {
        let splitter = RecursiveSplitter::new(SplitterConfig {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        });
        Self {
            config,
            splitter,
            profiles: ProfileTable::default(),
            tagger: PriorityTagger::default(),
            loader,
            provider,
            store,
        }
    }

    #[must_use]
    pub fn with_profiles(mut self, profiles: ProfileTable) -> Self {
        self.profiles = profiles;
        self
    }

    #[must_use]
    pub fn with_tagger(mut self, tagger: PriorityTagger) -> Self {
        self.tagger = tagger;
        self
    }

    /// Run the full pipeline: gather chunks from all three sources, then
    /// recreate and load the vector collection.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding or collection storage fails. Per-source
    /// read failures are logged and skipped.
    pub async fn run(&self) -> Result<IngestReport, DocumentError> {
        let mut chunks = Vec::new();

        self.process_policy_documents(&mut chunks).await;
        self.process_checklist(&mut chunks);
        self.process_roster(&mut chunks);

        let mut report = IngestReport::default();
        for chunk in &chunks {
            report.record(chunk);
        }
        tracing::info!(total = report.total, "chunks gathered, loading collection");

        self.load_collection(&chunks).await?;

        Ok(report)
    }

    async fn process_policy_documents(&self, chunks: &mut Vec<Chunk>) {
        let policies_dir = self.config.data_dir.join("policies");
        if !policies_dir.exists() {
            tracing::warn!(path = %policies_dir.display(), "policies directory not found, skipping");
            return;
        }

        for filename in POLICY_SOURCES {
            let path = policies_dir.join(filename);
            if !path.exists() {
                tracing::warn!(filename, "policy document not found, skipping");
                continue;
            }

            let raw = match self.loader.load(&path).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(filename, error = %e, "extraction failed, skipping");
                    continue;
                }
            };

            let content = clean_text(&raw);
            if content.is_empty() {
                tracing::warn!(filename, "no content extracted, skipping");
                continue;
            }

            let profile = self.profiles.lookup(filename);
            let stem = filename.trim_end_matches(".pdf");
            let pieces = self.splitter.split(&content);
            tracing::info!(filename, pieces = pieces.len(), "policy document split");

            let ingestion_date = chrono::Utc::now().to_rfc3339();
            for (i, piece) in pieces.iter().enumerate() {
                if piece.trim().len() < self.config.min_chunk_chars {
                    continue;
                }
                chunks.push(Chunk {
                    content: piece.clone(),
                    metadata: ChunkMetadata {
                        doc_type: profile.doc_type,
                        department: profile.department.clone(),
                        priority_level: self.tagger.apply(piece, profile.priority_level),
                        topic: profile.topic.clone(),
                        subtopics: profile.subtopics.clone(),
                        audience: profile.audience.clone(),
                        source_file: filename.to_owned(),
                        chunk_index: i,
                        chunk_id: format!("{stem}_{i}"),
                        ingestion_date: ingestion_date.clone(),
                        last_updated: profile.last_updated.clone(),
                        role: None,
                        employee_id: None,
                        task_id: None,
                    },
                });
            }
        }
    }

    fn process_checklist(&self, chunks: &mut Vec<Chunk>) {
        let path = self.config.data_dir.join("checklists").join(CHECKLIST_FILE);
        if !path.exists() {
            tracing::warn!(path = %path.display(), "checklist not found, skipping");
            return;
        }

        let file = match checklist::ChecklistFile::load(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(error = %e, "checklist unreadable, skipping");
                return;
            }
        };

        let now = chrono::Utc::now().to_rfc3339();
        let mut index = 0;
        for (role, role_checklist) in &file.roles {
            for task in &role_checklist.tasks {
                chunks.push(Chunk {
                    content: checklist::task_sentence(role, task),
                    metadata: ChunkMetadata {
                        doc_type: DocType::Checklist,
                        department: task.department.clone(),
                        priority_level: task.priority,
                        topic: "onboarding_task".into(),
                        subtopics: "onboarding".into(),
                        audience: role.to_lowercase().replace(' ', "_"),
                        source_file: CHECKLIST_FILE.into(),
                        chunk_index: index,
                        chunk_id: format!("onboarding_master_{index}"),
                        ingestion_date: now.clone(),
                        last_updated: now.clone(),
                        role: Some(role.clone()),
                        employee_id: None,
                        task_id: Some(task.id.clone()),
                    },
                });
                index += 1;
            }
        }
        tracing::info!(tasks = index, "checklist tasks converted");
    }

    fn process_roster(&self, chunks: &mut Vec<Chunk>) {
        let path = self.config.data_dir.join("raw").join(ROSTER_FILE);
        if !path.exists() {
            tracing::warn!(path = %path.display(), "roster not found, skipping");
            return;
        }

        let records = match roster::load_roster(&path) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "roster unreadable, skipping");
                return;
            }
        };

        let now = chrono::Utc::now().to_rfc3339();
        let count = records.len();
        for (i, record) in records.into_iter().enumerate() {
            chunks.push(Chunk {
                content: roster::profile_sentence(&record),
                metadata: ChunkMetadata {
                    doc_type: DocType::EmployeeRecord,
                    department: record.department.clone(),
                    priority_level: Priority::High,
                    topic: "new_hire_profile".into(),
                    subtopics: "onboarding".into(),
                    audience: "hr_coordinator".into(),
                    source_file: ROSTER_FILE.into(),
                    chunk_index: i,
                    chunk_id: format!("employees_{i}"),
                    ingestion_date: now.clone(),
                    last_updated: now.clone(),
                    role: Some(record.role.clone()),
                    employee_id: Some(record.employee_id.clone()),
                    task_id: None,
                },
            });
        }
        tracing::info!(records = count, "roster rows converted");
    }

    /// Recreate the collection and load all chunks in embedding-sized
    /// batches.
    async fn load_collection(&self, chunks: &[Chunk]) -> Result<(), DocumentError> {
        let collection = &self.config.collection;

        if self
            .store
            .collection_exists(collection)
            .await
            .map_err(crate::KbError::from)?
        {
            self.store
                .delete_collection(collection)
                .await
                .map_err(crate::KbError::from)?;
            tracing::info!(collection, "deleted existing collection");
        }
        self.store
            .ensure_collection(collection, self.config.vector_size)
            .await
            .map_err(crate::KbError::from)?;

        for batch in chunks.chunks(self.config.embed_batch_size.max(1)) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let vectors = self.provider.embed_batch(&texts).await?;

            let mut points = Vec::with_capacity(batch.len());
            for (chunk, vector) in batch.iter().zip(vectors) {
                points.push(VectorPoint {
                    id: point_id(&chunk.metadata.chunk_id),
                    vector,
                    payload: chunk_payload(chunk).map_err(crate::KbError::from)?,
                });
            }
            self.store
                .upsert(collection, points)
                .await
                .map_err(crate::KbError::from)?;
        }

        tracing::info!(collection, total = chunks.len(), "collection loaded");
        Ok(())
    }
}

/// Deterministic point ID derived from the chunk ID, so identical inputs
/// produce an identical collection across runs.
fn point_id(chunk_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, chunk_id.as_bytes()).to_string()
}

fn chunk_payload(chunk: &Chunk) -> Result<HashMap<String, serde_json::Value>, serde_json::Error> {
    let serde_json::Value::Object(map) = serde_json::to_value(&chunk.metadata)? else {
        unreachable!("ChunkMetadata serializes to an object");
    };
    let mut payload: HashMap<String, serde_json::Value> = map.into_iter().collect();
    payload.insert(
        "content".into(),
        serde_json::Value::String(chunk.content.clone()),
    );
    Ok(payload)
}
