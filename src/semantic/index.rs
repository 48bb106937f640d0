//! Building and querying the vector index.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::SearchHit;
use crate::db;
use crate::embedding::EmbeddingProvider;
use crate::knowledge::corpus::Document;

/// Provenance recorded alongside a rebuilt index.
pub struct BuildInfo<'a> {
    pub embedding_model: &'a str,
    pub knowledge_version: &'a str,
}

/// Replace the whole index with `docs`. Embeds first, then rewrites every
/// table in one transaction so a failed build leaves the old index intact.
pub fn rebuild_index(
    conn: &mut Connection,
    docs: &[Document],
    embedder: &dyn EmbeddingProvider,
    info: &BuildInfo<'_>,
) -> Result<usize> {
    let texts: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
    let embeddings = embedder
        .embed_batch(&texts)
        .context("failed to embed corpus")?;
    anyhow::ensure!(
        embeddings.len() == docs.len(),
        "embedder returned {} vectors for {} documents",
        embeddings.len(),
        docs.len()
    );

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM documents", [])?;
    tx.execute("DELETE FROM documents_vec", [])?;
    {
        let mut insert_doc = tx.prepare(
            "INSERT INTO documents (id, title, source, category, content) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        let mut insert_vec =
            tx.prepare("INSERT INTO documents_vec (id, embedding) VALUES (?1, ?2)")?;
        for (doc, embedding) in docs.iter().zip(&embeddings) {
            anyhow::ensure!(
                embedding.len() == embedder.dimensions(),
                "embedding for {} has {} dimensions, expected {}",
                doc.id,
                embedding.len(),
                embedder.dimensions()
            );
            insert_doc.execute(params![doc.id, doc.title, doc.source, doc.category, doc.content])?;
            insert_vec.execute(params![doc.id, db::embedding_to_bytes(embedding)])?;
        }
    }
    db::set_meta(&tx, db::META_EMBEDDING_MODEL, info.embedding_model)?;
    db::set_meta(&tx, db::META_KNOWLEDGE_VERSION, info.knowledge_version)?;
    db::set_meta(&tx, db::META_DOCUMENT_COUNT, &docs.len().to_string())?;
    db::set_meta(&tx, db::META_INDEXED_AT, &chrono::Utc::now().to_rfc3339())?;
    tx.commit()?;

    tracing::info!(documents = docs.len(), "index rebuilt");
    Ok(docs.len())
}

/// KNN search over the index, nearest first.
///
/// With a `category` tag the whole index is ranked and post-filtered, so the
/// result still holds up to `k` hits of that category.
pub fn vector_search(
    conn: &Connection,
    embedding: &[f32],
    k: usize,
    category: Option<&str>,
) -> Result<Vec<SearchHit>> {
    if k == 0 {
        return Ok(Vec::new());
    }
    let candidates = match category {
        Some(_) => db::document_count(conn)? as usize,
        None => k,
    };
    if candidates == 0 {
        return Ok(Vec::new());
    }

    let mut knn = conn.prepare(
        "SELECT id, distance FROM documents_vec \
         WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2",
    )?;
    let neighbours = knn
        .query_map(
            params![db::embedding_to_bytes(embedding), candidates as i64],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
        )?
        .collect::<Result<Vec<_>, _>>()?;

    let mut fetch =
        conn.prepare("SELECT title, source, category, content FROM documents WHERE id = ?1")?;
    let mut hits = Vec::with_capacity(k);
    for (id, distance) in neighbours {
        let row = fetch
            .query_row([&id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()?;
        let Some((title, source, doc_category, content)) = row else {
            tracing::warn!(id = %id, "vector without document row, skipping");
            continue;
        };
        if category.is_some_and(|c| c != doc_category) {
            continue;
        }
        hits.push(SearchHit {
            rank: hits.len() + 1,
            id,
            title,
            content,
            source,
            category: doc_category,
            distance,
        });
        if hits.len() == k {
            break;
        }
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EMBEDDING_DIM;

    /// One-hot vector per document, selected by the first character's code.
    struct AxisEmbedder;

    fn axis(i: usize) -> Vec<f32> {
        let mut v = vec![0.0; EMBEDDING_DIM];
        v[i % EMBEDDING_DIM] = 1.0;
        v
    }

    impl EmbeddingProvider for AxisEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let first = text.chars().next().map(|c| c as usize).unwrap_or(0);
            Ok(axis(first))
        }
    }

    fn doc(id: &str, category: &str, content: &str) -> Document {
        Document {
            id: id.into(),
            title: id.to_uppercase(),
            source: format!("{category}s"),
            category: category.into(),
            content: content.into(),
        }
    }

    fn info() -> BuildInfo<'static> {
        BuildInfo {
            embedding_model: "axis",
            knowledge_version: "test",
        }
    }

    #[test]
    fn rebuild_writes_documents_and_meta() {
        let mut conn = db::open_memory_database().unwrap();
        let docs = vec![doc("a", "paradigm", "a"), doc("b", "tradition", "b")];
        assert_eq!(rebuild_index(&mut conn, &docs, &AxisEmbedder, &info()).unwrap(), 2);

        let meta = db::read_meta(&conn).unwrap();
        assert_eq!(meta.embedding_model.as_deref(), Some("axis"));
        assert_eq!(meta.knowledge_version.as_deref(), Some("test"));
        assert_eq!(meta.document_count, Some(2));
        assert!(meta.indexed_at.is_some());

        // Rebuilding replaces rather than appends.
        rebuild_index(&mut conn, &docs[..1], &AxisEmbedder, &info()).unwrap();
        assert_eq!(db::document_count(&conn).unwrap(), 1);
    }

    #[test]
    fn nearest_document_ranks_first() {
        let mut conn = db::open_memory_database().unwrap();
        let docs = vec![
            doc("a", "paradigm", "a"),
            doc("b", "tradition", "b"),
            doc("c", "tradition", "c"),
        ];
        rebuild_index(&mut conn, &docs, &AxisEmbedder, &info()).unwrap();

        let hits = vector_search(&conn, &axis('b' as usize), 2, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "b");
        assert_eq!(hits[0].rank, 1);
        assert_eq!(hits[0].title, "B");
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn category_filter_searches_whole_index() {
        let mut conn = db::open_memory_database().unwrap();
        let docs = vec![
            doc("a", "paradigm", "a"),
            doc("b", "tradition", "b"),
            doc("c", "tradition", "c"),
        ];
        rebuild_index(&mut conn, &docs, &AxisEmbedder, &info()).unwrap();

        let hits = vector_search(&conn, &axis('a' as usize), 1, Some("tradition")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "tradition");
        assert_eq!(hits[0].rank, 1);

        let none = vector_search(&conn, &axis('a' as usize), 3, Some("journal")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn empty_index_returns_nothing() {
        let conn = db::open_memory_database().unwrap();
        assert!(vector_search(&conn, &axis(0), 3, None).unwrap().is_empty());
        assert!(vector_search(&conn, &axis(0), 3, Some("paradigm")).unwrap().is_empty());
    }
}
