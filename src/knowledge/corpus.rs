//! Indexing corpus: one document per knowledge entry.

use super::KnowledgeBase;

/// A document as stored in the vector index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub source: String,
    pub category: String,
    pub content: String,
}

/// Every entry rendered with the same renderer the lookup tools use.
pub fn documents(kb: &KnowledgeBase) -> Vec<Document> {
    kb.all_entries()
        .into_iter()
        .map(|entry| {
            let category = entry.category();
            Document {
                id: format!("{}_{}", category.id_prefix(), entry.key()),
                title: entry.name().to_string(),
                source: category.source_tag().to_string(),
                category: category.index_tag().to_string(),
                content: entry.render(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn one_document_per_entry_with_unique_ids() {
        let kb = KnowledgeBase::builtin().unwrap();
        let docs = documents(&kb);
        assert_eq!(docs.len(), kb.entry_count());
        let ids: HashSet<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), docs.len());
    }

    #[test]
    fn tags_follow_category() {
        let kb = KnowledgeBase::builtin().unwrap();
        let docs = documents(&kb);
        let find = |id: &str| docs.iter().find(|d| d.id == id).unwrap();

        let coding = find("coding_axial_coding");
        assert_eq!(coding.source, "coding");
        assert_eq!(coding.category, "method");

        let rejection = find("rejection_so_what");
        assert_eq!(rejection.source, "rejection_patterns");
        assert_eq!(rejection.category, "rejection");

        let quality = find("quality_tracy");
        assert_eq!(quality.title, "Tracy (2010) 8가지 기준");
        assert!(quality.content.contains("### 공명 (Resonance)"));
    }
}
