use std::path::Path;
use std::sync::Arc;

use common::utils::config::get_config;
use ingestion_pipeline::chunking::{TokenCounter, ZeroShotNliClassifier};
use ingestion_pipeline::layout::tables::NullTableDetector;
use ingestion_pipeline::layout::LayoutExtractor;
use ingestion_pipeline::{ChunkingParams, IngestionPipeline};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let config = get_config()?;

    let counter = TokenCounter::from_pretrained(&config.tokenizer_model)?;
    let classifier = ZeroShotNliClassifier::new(
        &config.nli_base_url,
        &config.nli_model,
        config.hf_api_token.clone(),
    );
    let extractor = Arc::new(LayoutExtractor::new(Arc::new(NullTableDetector)));

    let pipeline = IngestionPipeline::new(
        extractor,
        Arc::new(classifier),
        Arc::new(counter),
        ChunkingParams {
            window_size: config.chunk_size,
            overlap: config.chunk_overlap,
            max_tokens: config.max_chunk_tokens,
        },
    )?;

    let chunks = pipeline.ingest_directory(Path::new(&config.pdf_dir)).await?;
    info!(chunks = chunks.len(), "ingestion complete");

    serde_json::to_writer_pretty(std::io::stdout().lock(), &chunks)?;
    println!();
    Ok(())
}
