#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use qualmaster::config::QualMasterConfig;
use qualmaster::db;
use qualmaster::embedding::{EmbeddingProvider, EMBEDDING_DIM};
use qualmaster::knowledge::{corpus, KnowledgeBase};
use qualmaster::rubric::Rubric;
use qualmaster::semantic::index::{rebuild_index, BuildInfo};
use qualmaster::semantic::SemanticSearch;
use qualmaster::tools::{QualMasterTools, SharedState};

pub const FAKE_MODEL: &str = "char-histogram";

/// Deterministic stand-in for the ONNX model: an L2-normalized histogram of
/// characters folded into 384 buckets. Identical texts embed identically.
pub struct CharHistogramEmbedder;

impl EmbeddingProvider for CharHistogramEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        for c in text.chars() {
            v[(c as usize).wrapping_mul(31) % EMBEDDING_DIM] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }
}

pub fn knowledge() -> KnowledgeBase {
    KnowledgeBase::builtin().unwrap()
}

/// Build a full index of the built-in corpus at `path`. Returns the document count.
pub fn build_index(path: &Path) -> usize {
    let kb = knowledge();
    let docs = corpus::documents(&kb);
    let mut conn = db::open_database(path).unwrap();
    rebuild_index(
        &mut conn,
        &docs,
        &CharHistogramEmbedder,
        &BuildInfo {
            embedding_model: FAKE_MODEL,
            knowledge_version: &kb.version,
        },
    )
    .unwrap()
}

fn state(semantic: SemanticSearch) -> SharedState {
    SharedState {
        knowledge: Arc::new(knowledge()),
        rubric: Arc::new(Rubric::builtin().unwrap()),
        semantic: Arc::new(semantic),
        config: Arc::new(QualMasterConfig::default()),
    }
}

/// Shared state with semantic search unavailable.
pub fn state_without_index() -> SharedState {
    state(SemanticSearch::Unavailable {
        reason: "no index in tests".into(),
    })
}

/// Shared state backed by a freshly built index under `dir`.
pub fn state_with_index(dir: &Path) -> SharedState {
    let path = dir.join("index.db");
    build_index(&path);
    let conn = db::open_database(&path).unwrap();
    state(SemanticSearch::from_parts(
        conn,
        Box::new(CharHistogramEmbedder),
    ))
}

pub fn tools_without_index() -> QualMasterTools {
    QualMasterTools::new(state_without_index())
}
