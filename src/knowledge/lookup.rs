//! Exact-key lookups backing the `get_*` and `diagnose_rejection` tools.

use super::{Category, KnowledgeBase};

/// Render the entry for `key`, or a message listing the valid keys.
///
/// Unknown keys are not an error: the caller gets text it can show as-is.
pub fn lookup(kb: &KnowledgeBase, category: Category, key: &str) -> String {
    match kb.find(category, key) {
        Some(entry) => entry.render(),
        None => unknown_key(kb, category, key),
    }
}

pub fn unknown_key(kb: &KnowledgeBase, category: Category, key: &str) -> String {
    format!(
        "알 수 없는 {}: {}\n사용 가능: {}",
        category.label(),
        key,
        kb.keys(category).join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_key_renders_entry() {
        let kb = KnowledgeBase::builtin().unwrap();
        let text = lookup(&kb, Category::RejectionPattern, "logic_gap");
        assert!(text.starts_with("## 논리적 비약 문제"));
        assert!(text.contains("### 해결 전략"));
    }

    #[test]
    fn unknown_key_lists_every_valid_key() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert_eq!(
            lookup(&kb, Category::Paradigm, "marxism"),
            "알 수 없는 패러다임: marxism\n사용 가능: positivism, postpositivism, critical_theory, constructivism"
        );
        assert_eq!(
            lookup(&kb, Category::Journal, "nature"),
            "알 수 없는 저널: nature\n사용 가능: amr, asq"
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(lookup(&kb, Category::Tradition, "Narrative").starts_with("알 수 없는 전통"));
    }
}
