//! Optional semantic search over the knowledge corpus.
//!
//! [`SemanticSearch`] is chosen once at startup. When the index or the model
//! is missing it is `Unavailable` and every search returns nothing; callers
//! never see an error from this layer.

pub mod index;

use rusqlite::Connection;
use serde::Serialize;
use std::sync::Mutex;

use crate::config::QualMasterConfig;
use crate::db;
use crate::embedding::{self, EmbeddingProvider};
use crate::knowledge::Category;

/// One nearest-neighbour result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub content: String,
    pub source: String,
    pub category: String,
    /// 1-based position in the result list.
    pub rank: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexStats {
    pub document_count: u64,
    pub connection_status: String,
}

pub struct ReadyIndex {
    conn: Mutex<Connection>,
    embedder: Box<dyn EmbeddingProvider>,
}

pub enum SemanticSearch {
    Ready(ReadyIndex),
    Unavailable { reason: String },
}

impl SemanticSearch {
    /// Open the configured index and embedding model, falling back to
    /// `Unavailable` on any problem.
    pub fn initialize(config: &QualMasterConfig, knowledge_version: &str) -> Self {
        if !config.index.enabled {
            return Self::unavailable("semantic index disabled in config");
        }

        let path = config.resolved_index_path();
        if !path.exists() {
            return Self::unavailable(format!(
                "no index at {}; run `qualmaster index build`",
                path.display()
            ));
        }

        let conn = match db::open_database(&path) {
            Ok(conn) => conn,
            Err(e) => return Self::unavailable(format!("failed to open index: {e:#}")),
        };

        match db::read_meta(&conn) {
            Ok(meta) => {
                if let Some(model) = meta.embedding_model.as_deref() {
                    if model != config.embedding.model {
                        tracing::warn!(
                            indexed = model,
                            configured = %config.embedding.model,
                            "index was built with a different embedding model; rebuild with `qualmaster index build`"
                        );
                    }
                }
                if let Some(version) = meta.knowledge_version.as_deref() {
                    if version != knowledge_version {
                        tracing::warn!(
                            indexed = version,
                            loaded = knowledge_version,
                            "index is out of date with the knowledge base; rebuild with `qualmaster index build`"
                        );
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to read index metadata"),
        }

        let embedder = match embedding::create_provider(&config.embedding) {
            Ok(embedder) => embedder,
            Err(e) => return Self::unavailable(format!("embedding model unavailable: {e:#}")),
        };

        Self::from_parts(conn, embedder)
    }

    /// Wrap an open index and embedder. An empty index is unavailable.
    pub fn from_parts(conn: Connection, embedder: Box<dyn EmbeddingProvider>) -> Self {
        match db::document_count(&conn) {
            Ok(0) => Self::unavailable("index is empty; run `qualmaster index build`"),
            Ok(count) => {
                tracing::info!(documents = count, "semantic index ready");
                Self::Ready(ReadyIndex {
                    conn: Mutex::new(conn),
                    embedder,
                })
            }
            Err(e) => Self::unavailable(format!("failed to read index: {e}")),
        }
    }

    fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(reason = %reason, "semantic search unavailable");
        Self::Unavailable { reason }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Top-`k` hits for `query`. Blocks; errors are logged and yield no hits.
    pub fn search(&self, query: &str, k: usize, category: Option<Category>) -> Vec<SearchHit> {
        let Self::Ready(ready) = self else {
            return Vec::new();
        };
        match ready.search(query, k, category) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), query, "semantic search failed");
                Vec::new()
            }
        }
    }

    pub fn stats(&self) -> IndexStats {
        match self {
            Self::Ready(ready) => {
                let count = ready
                    .conn
                    .lock()
                    .map_err(|e| anyhow::anyhow!("index lock poisoned: {e}"))
                    .and_then(|conn| Ok(db::document_count(&conn)?));
                match count {
                    Ok(document_count) => IndexStats {
                        document_count,
                        connection_status: "connected".into(),
                    },
                    Err(e) => IndexStats {
                        document_count: 0,
                        connection_status: format!("error: {e}"),
                    },
                }
            }
            Self::Unavailable { reason } => IndexStats {
                document_count: 0,
                connection_status: format!("unavailable: {reason}"),
            },
        }
    }
}

impl ReadyIndex {
    fn search(
        &self,
        query: &str,
        k: usize,
        category: Option<Category>,
    ) -> anyhow::Result<Vec<SearchHit>> {
        let embedding = self.embedder.embed(query)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("index lock poisoned: {e}"))?;
        index::vector_search(&conn, &embedding, k, category.map(|c| c.index_tag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EMBEDDING_DIM;
    use crate::knowledge::{corpus, KnowledgeBase};

    struct ConstantEmbedder;

    impl EmbeddingProvider for ConstantEmbedder {
        fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            let mut v = vec![0.0; EMBEDDING_DIM];
            v[0] = 1.0;
            Ok(v)
        }
    }

    struct FailingEmbedder;

    impl EmbeddingProvider for FailingEmbedder {
        fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            anyhow::bail!("model crashed")
        }
    }

    fn built_index() -> Connection {
        let kb = KnowledgeBase::builtin().unwrap();
        let mut conn = db::open_memory_database().unwrap();
        index::rebuild_index(
            &mut conn,
            &corpus::documents(&kb),
            &ConstantEmbedder,
            &index::BuildInfo {
                embedding_model: "constant",
                knowledge_version: &kb.version,
            },
        )
        .unwrap();
        conn
    }

    #[test]
    fn disabled_config_is_unavailable() {
        let mut config = QualMasterConfig::default();
        config.index.enabled = false;
        let search = SemanticSearch::initialize(&config, "1.0.0");
        assert!(!search.is_ready());
        assert!(search.search("현상학", 3, None).is_empty());
        assert!(search.stats().connection_status.starts_with("unavailable"));
    }

    #[test]
    fn missing_index_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = QualMasterConfig::default();
        config.index.db_path = dir.path().join("absent.db").to_string_lossy().into_owned();
        let search = SemanticSearch::initialize(&config, "1.0.0");
        match search {
            SemanticSearch::Unavailable { reason } => assert!(reason.contains("index build")),
            SemanticSearch::Ready(_) => panic!("expected unavailable"),
        }
        // initialize must not create the file
        assert!(!dir.path().join("absent.db").exists());
    }

    #[test]
    fn empty_index_is_unavailable() {
        let conn = db::open_memory_database().unwrap();
        let search = SemanticSearch::from_parts(conn, Box::new(ConstantEmbedder));
        assert!(!search.is_ready());
    }

    #[test]
    fn ready_index_reports_stats_and_hits() {
        let search = SemanticSearch::from_parts(built_index(), Box::new(ConstantEmbedder));
        assert!(search.is_ready());
        assert_eq!(
            search.stats(),
            IndexStats {
                document_count: 21,
                connection_status: "connected".into()
            }
        );
        let hits = search.search("근거이론", 3, None);
        assert_eq!(hits.len(), 3);
        let journals = search.search("근거이론", 3, Some(Category::Journal));
        assert_eq!(journals.len(), 2);
        assert!(journals.iter().all(|h| h.category == "journal"));
    }

    #[test]
    fn embedding_failure_yields_no_hits() {
        let search = SemanticSearch::from_parts(built_index(), Box::new(FailingEmbedder));
        assert!(search.is_ready());
        assert!(search.search("현상학", 3, None).is_empty());
    }
}
