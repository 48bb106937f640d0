use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncWriteExt;

use qualmaster::config::{EmbeddingConfig, QualMasterConfig};
use qualmaster::knowledge::{corpus, KnowledgeBase};
use qualmaster::rubric::{self, CriteriaSelector, Rubric};
use qualmaster::semantic::index::{rebuild_index, BuildInfo};
use qualmaster::tools::QualMasterTools;
use qualmaster::{db, embedding, server};

const MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx";
const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";

/// Download the ONNX embedding model and tokenizer to the cache directory.
pub async fn model_download(config: &EmbeddingConfig) -> Result<()> {
    let cache_dir = qualmaster::config::expand_tilde(&config.cache_dir);
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("failed to create cache dir: {}", cache_dir.display()))?;

    let model_path = cache_dir.join("model.onnx");
    let tokenizer_path = cache_dir.join("tokenizer.json");

    if model_path.exists() {
        println!("Model already exists at {}", model_path.display());
    } else {
        println!("Downloading model.onnx (~90MB)...");
        download_file(MODEL_URL, &model_path).await?;
        println!("Model saved to {}", model_path.display());
    }

    if tokenizer_path.exists() {
        println!("Tokenizer already exists at {}", tokenizer_path.display());
    } else {
        println!("Downloading tokenizer.json...");
        download_file(TOKENIZER_URL, &tokenizer_path).await?;
        println!("Tokenizer saved to {}", tokenizer_path.display());
    }

    println!("Model ready. Run `qualmaster index build` to create the search index.");
    Ok(())
}

/// Download a file with a progress bar, writing to a temp file and renaming.
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let mut response = reqwest::get(url)
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "download failed with HTTP {}",
        response.status()
    );

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")
                    .context("invalid progress bar template")?
                    .progress_chars("##-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let tmp_path = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

    while let Some(chunk) = response.chunk().await.context("error reading response")? {
        file.write_all(&chunk)
            .await
            .context("error writing to file")?;
        pb.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .context("failed to rename temp file")?;

    pb.finish_and_clear();
    Ok(())
}

/// Render the knowledge corpus, embed it and rewrite the index.
pub fn index_build(config: &QualMasterConfig) -> Result<()> {
    let kb = KnowledgeBase::load(config.knowledge_path().as_deref())
        .context("failed to load knowledge base")?;
    let docs = corpus::documents(&kb);
    println!("Rendering {} documents from knowledge v{}", docs.len(), kb.version);

    let embedder =
        embedding::create_provider(&config.embedding).context("failed to load embedding model")?;

    let path = config.resolved_index_path();
    let mut conn = db::open_database(&path)?;

    let pb = ProgressBar::new_spinner();
    pb.set_message("embedding corpus...");
    let count = rebuild_index(
        &mut conn,
        &docs,
        embedder.as_ref(),
        &BuildInfo {
            embedding_model: &config.embedding.model,
            knowledge_version: &kb.version,
        },
    )?;
    pb.finish_and_clear();

    println!("Indexed {count} documents into {}", path.display());
    Ok(())
}

/// Print index metadata without loading the embedding model.
pub fn index_status(config: &QualMasterConfig) -> Result<()> {
    let path = config.resolved_index_path();
    println!("Index Status");
    println!("{}", "=".repeat(40));
    println!("  Path:              {}", path.display());
    println!("  Enabled:           {}", config.index.enabled);

    if !path.exists() {
        println!("  State:             missing (run `qualmaster index build`)");
        return Ok(());
    }

    let conn = db::open_database(&path)?;
    let meta = db::read_meta(&conn).context("failed to read index metadata")?;
    let count = db::document_count(&conn).context("failed to count documents")?;

    let show = |value: Option<&str>| value.unwrap_or("-").to_string();
    println!("  Documents:         {count}");
    println!("  Schema version:    {}", show(meta.schema_version.as_deref()));
    println!("  Embedding model:   {}", show(meta.embedding_model.as_deref()));
    println!("  Knowledge version: {}", show(meta.knowledge_version.as_deref()));
    println!("  Indexed at:        {}", show(meta.indexed_at.as_deref()));

    if meta.embedding_model.as_deref() != Some(config.embedding.model.as_str()) {
        println!();
        println!(
            "Configured model is {}; rebuild the index to match.",
            config.embedding.model
        );
    }
    Ok(())
}

/// Run `search_knowledge` from the terminal, with the index if available.
pub async fn search(config: QualMasterConfig, query: &str, category: Option<&str>) -> Result<()> {
    let state = server::setup_shared_state(config)?;
    let tools = QualMasterTools::new(state);
    let args = serde_json::json!({ "query": query, "category": category });

    match tools.call_by_name("search_knowledge", args).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => anyhow::bail!(e),
    }
}

/// Score a description against the rubric and print the JSON result.
pub fn assess(
    config: &QualMasterConfig,
    description: &str,
    strategies: &[String],
    criteria: &str,
) -> Result<()> {
    let rubric =
        Rubric::load(config.rubric_path().as_deref()).context("failed to load rubric")?;
    let selector: CriteriaSelector = criteria.parse().map_err(anyhow::Error::msg)?;
    let result =
        rubric::assess(&rubric, description, strategies, selector).map_err(anyhow::Error::msg)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
