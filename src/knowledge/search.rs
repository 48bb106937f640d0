//! Free-text search over the knowledge tables.
//!
//! Matching is plain case-folded substring containment against an entry's
//! key, display name and rendered text. Results keep table order; there is no
//! ranking. Semantic hits, when available, are appended as a separate section.

use std::fmt::Write;

use super::types::EntryRef;
use super::{Category, KnowledgeBase};
use crate::semantic::SearchHit;

const EXCERPT_CHARS: usize = 200;

/// Parse the optional `category` filter. An unknown name yields the message
/// to return to the caller.
pub fn parse_filter(raw: Option<&str>) -> Result<Option<Category>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(name) => name.parse::<Category>().map(Some).map_err(|_| {
            format!(
                "알 수 없는 카테고리: {name}\n사용 가능: {}",
                Category::filter_names()
            )
        }),
    }
}

/// Entries matching `query`, in category then table order.
pub fn exact_matches<'a>(
    kb: &'a KnowledgeBase,
    query: &str,
    filter: Option<Category>,
) -> Vec<EntryRef<'a>> {
    let needle = query.to_lowercase();
    let categories: Vec<Category> = match filter {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };
    categories
        .into_iter()
        .flat_map(|category| kb.entries(category))
        .filter(|entry| entry_matches(entry, &needle))
        .collect()
}

fn entry_matches(entry: &EntryRef<'_>, needle: &str) -> bool {
    entry.key().contains(needle)
        || entry.name().to_lowercase().contains(needle)
        || entry.render().to_lowercase().contains(needle)
}

/// Format the exact section followed by the supplementary semantic section.
pub fn format_results(query: &str, exact: &[EntryRef<'_>], semantic: &[SearchHit]) -> String {
    if exact.is_empty() && semantic.is_empty() {
        return format!(
            "'{query}'에 대한 결과를 찾을 수 없습니다.\n\n사용 가능한 카테고리: {}",
            Category::filter_names()
        );
    }

    let mut out = format!("## '{query}' 검색 결과\n\n");
    if exact.is_empty() {
        out.push_str("일치하는 항목이 없습니다.");
    } else {
        let blocks: Vec<String> = exact.iter().map(|e| e.summary()).collect();
        out.push_str(&blocks.join("\n\n---\n\n"));
    }

    if !semantic.is_empty() {
        out.push_str("\n\n### 관련 자료 (의미 기반 검색)\n");
        for hit in semantic {
            let _ = write!(
                out,
                "\n**{}. {}** ({})\n{}\n",
                hit.rank,
                hit.title,
                hit.category,
                excerpt(&hit.content)
            );
        }
    }
    out
}

fn excerpt(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > EXCERPT_CHARS {
        let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
