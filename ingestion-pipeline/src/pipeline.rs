//! End-to-end document ingestion.
//!
//! Orchestrates the three stages per document: layout-aware extraction,
//! fixed-window splitting, and classifier-gated semantic merging. A
//! directory walk maps category subdirectories onto chunk metadata.

use std::path::Path;
use std::sync::Arc;

use common::error::AppError;
use tokio::task;
use tracing::{info, warn};

use crate::chunking::classifier::SameUnitClassifier;
use crate::chunking::merger::SemanticMerger;
use crate::chunking::splitter::split_fixed_windows;
use crate::chunking::token_count::CountTokens;
use crate::layout::pdf::PdfGlyphSource;
use crate::layout::LayoutExtractor;
use crate::types::Chunk;

/// Splitter and merger settings shared by every document in one run.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingParams {
    /// Fixed window length in characters.
    pub window_size: usize,
    /// Character overlap between adjacent windows.
    pub overlap: usize,
    /// Token ceiling a merged chunk may never exceed.
    pub max_tokens: usize,
}

impl ChunkingParams {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.window_size == 0 {
            return Err(AppError::Validation(
                "window size must be positive".to_string(),
            ));
        }
        if self.overlap >= self.window_size {
            return Err(AppError::Validation(format!(
                "overlap {} must be smaller than window size {}",
                self.overlap, self.window_size
            )));
        }
        if self.max_tokens == 0 {
            return Err(AppError::Validation(
                "token ceiling must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Turns a directory tree of PDF documents into semantically merged
/// chunks. The extractor, classifier and counter are shared read-only
/// across documents.
pub struct IngestionPipeline {
    extractor: Arc<LayoutExtractor>,
    classifier: Arc<dyn SameUnitClassifier>,
    counter: Arc<dyn CountTokens>,
    params: ChunkingParams,
}

impl IngestionPipeline {
    pub fn new(
        extractor: Arc<LayoutExtractor>,
        classifier: Arc<dyn SameUnitClassifier>,
        counter: Arc<dyn CountTokens>,
        params: ChunkingParams,
    ) -> Result<Self, AppError> {
        params.validate()?;
        Ok(Self {
            extractor,
            classifier,
            counter,
            params,
        })
    }

    /// Runs the full pipeline for a single document. A document whose
    /// extracted text is empty yields no chunks and no error.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub async fn process_document(
        &self,
        path: &Path,
        category: &str,
    ) -> Result<Vec<Chunk>, AppError> {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::Validation(format!("not a file path: {}", path.display()))
            })?;

        let bytes = tokio::fs::read(path).await?;
        let extractor = Arc::clone(&self.extractor);
        // PDF parsing and glyph extraction are CPU-bound.
        let text = task::spawn_blocking(move || -> Result<String, AppError> {
            let pdf = PdfGlyphSource::load(&bytes)?;
            extractor.extract_document(&pdf)
        })
        .await??;

        if text.trim().is_empty() {
            info!(source, "document yielded no text after extraction");
            return Ok(Vec::new());
        }

        let fragments = split_fixed_windows(
            &text,
            &source,
            category,
            self.params.window_size,
            self.params.overlap,
        )?;

        let merger = SemanticMerger::new(
            self.classifier.as_ref(),
            self.counter.as_ref(),
            self.params.max_tokens,
        )?;
        let chunks = merger.merge(fragments).await?;
        info!(source, chunks = chunks.len(), "document processed");
        Ok(chunks)
    }

    /// Walks `root`, treating each immediate subdirectory as a category
    /// and each `.pdf` file inside it as one document. A document that
    /// fails is logged and skipped; the walk continues.
    pub async fn ingest_directory(&self, root: &Path) -> Result<Vec<Chunk>, AppError> {
        if !root.is_dir() {
            return Err(AppError::SourceNotFound(root.display().to_string()));
        }

        let mut chunks = Vec::new();
        let mut documents = 0_usize;
        let mut failures = 0_usize;

        let mut categories = tokio::fs::read_dir(root).await?;
        while let Some(entry) = categories.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let category = entry.file_name().to_string_lossy().to_string();

            let mut files = tokio::fs::read_dir(entry.path()).await?;
            while let Some(file) = files.next_entry().await? {
                let path = file.path();
                let is_pdf = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
                if !is_pdf {
                    continue;
                }

                documents += 1;
                match self.process_document(&path, &category).await {
                    Ok(document_chunks) => chunks.extend(document_chunks),
                    Err(err) => {
                        failures += 1;
                        warn!(
                            path = %path.display(),
                            error = %err,
                            "skipping document after processing failure"
                        );
                    }
                }
            }
        }

        info!(
            documents,
            failures,
            chunks = chunks.len(),
            "directory ingestion finished"
        );
        Ok(chunks)
    }
}
