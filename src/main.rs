//! Medguard command-line entrypoint.
//!
//! Usage: `medguard [--prescriber <id>] <prescription text...>` or
//! `medguard --health-check`.

use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;

use medguard::cache::{GoldenLookup, GoldenResponses};
use medguard::config::Config;
use medguard::embedding::HashingEmbedder;
use medguard::extraction::LocalTextExtractor;
use medguard::pipeline::{GuardrailPipeline, ProcessRequest};
use medguard::retrieval::RetrievalConfig;
use medguard::store::InMemoryGroundTruth;
use medguard::vectordb::{QdrantIndex, VectorIndex};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

struct CliArgs {
    health_check: bool,
    prescriber_id: Option<String>,
    raw_text: String,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut health_check = false;
    let mut prescriber_id = None;
    let mut words = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--health-check" => health_check = true,
            "--prescriber" => {
                prescriber_id = Some(args.next().context("--prescriber requires a value")?);
            }
            _ => words.push(arg),
        }
    }

    Ok(CliArgs {
        health_check,
        prescriber_id,
        raw_text: words.join(" "),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = Config::from_env()?;
    config.validate()?;

    let index = Arc::new(QdrantIndex::new(&config.qdrant_url, &config.collection_name)?);

    if args.health_check {
        let ready = index.is_ready().await;
        tracing::info!(url = %index.url(), ready, "Health check");
        std::process::exit(if ready { 0 } else { 1 });
    }

    let store = match &config.ground_truth_path {
        Some(path) => InMemoryGroundTruth::from_json_file(path)
            .with_context(|| format!("loading ground truth from {}", path.display()))?,
        None => {
            tracing::warn!("No MEDGUARD_GROUND_TRUTH_PATH configured; every mention will need review");
            InMemoryGroundTruth::default()
        }
    };

    let golden: Arc<dyn GoldenLookup> = match &config.golden_path {
        Some(path) => Arc::new(GoldenResponses::from_json_file(path)?),
        None => Arc::new(GoldenResponses::empty()),
    };

    tracing::info!(
        qdrant_url = %config.qdrant_url,
        collection = %config.collection_name,
        records = store.len(),
        alpha = config.hybrid_alpha,
        top_k = config.top_k,
        "Medguard starting"
    );

    let pipeline = GuardrailPipeline::new(
        Arc::new(LocalTextExtractor::new()),
        golden,
        Arc::new(HashingEmbedder::default()),
        index,
        Arc::new(store),
        RetrievalConfig::from(&config),
    );

    let mut request = ProcessRequest::from_text(args.raw_text);
    request.prescriber_id = args.prescriber_id;

    let response = pipeline.process(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
