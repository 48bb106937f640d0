//! The qualitative-research knowledge base.
//!
//! Tables are loaded once at startup from `data/knowledge.toml` (compiled in)
//! or from a configured override file, validated, and then shared read-only.
//! Lookups, free-text search and the semantic-index corpus all read from the
//! same [`KnowledgeBase`].

pub mod corpus;
pub mod lookup;
pub mod methodology;
pub mod render;
pub mod search;
pub mod types;
pub mod writing;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use methodology::MethodologyGuide;
use types::{
    CodingMethod, EntryRef, Journal, Keyed, Paradigm, QualityFramework, RejectionPattern,
    Tradition,
};
use writing::WritingGuide;

const BUILTIN_KNOWLEDGE: &str = include_str!("../../data/knowledge.toml");

/// Failure to load or validate a knowledge or rubric resource.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0} table is empty")]
    EmptyTable(String),
    #[error("duplicate key in {table}: {key}")]
    DuplicateKey { table: String, key: String },
    #[error("{context} references unknown tradition: {key}")]
    UnknownTradition { context: String, key: String },
    #[error("invalid rubric: {0}")]
    InvalidRubric(String),
}

/// The six knowledge categories. Fixed per entry at definition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Paradigm,
    Tradition,
    CodingMethod,
    QualityCriterion,
    Journal,
    RejectionPattern,
}

impl Category {
    /// Table order; search results follow it.
    pub const ALL: [Category; 6] = [
        Self::Paradigm,
        Self::Tradition,
        Self::CodingMethod,
        Self::QualityCriterion,
        Self::Journal,
        Self::RejectionPattern,
    ];

    /// Name accepted by the `category` filter of `search_knowledge`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paradigm => "paradigms",
            Self::Tradition => "traditions",
            Self::CodingMethod => "coding",
            Self::QualityCriterion => "quality",
            Self::Journal => "journals",
            Self::RejectionPattern => "rejection",
        }
    }

    /// Category tag stored with each document in the vector index.
    pub fn index_tag(&self) -> &'static str {
        match self {
            Self::Paradigm => "paradigm",
            Self::Tradition => "tradition",
            Self::CodingMethod => "method",
            Self::QualityCriterion => "quality",
            Self::Journal => "journal",
            Self::RejectionPattern => "rejection",
        }
    }

    /// Source tag stored with each document in the vector index.
    pub fn source_tag(&self) -> &'static str {
        match self {
            Self::Paradigm => "paradigms",
            Self::Tradition => "traditions",
            Self::CodingMethod => "coding",
            Self::QualityCriterion => "quality",
            Self::Journal => "journals",
            Self::RejectionPattern => "rejection_patterns",
        }
    }

    /// Prefix of corpus document ids (`paradigm_positivism`, ...).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Paradigm => "paradigm",
            Self::Tradition => "tradition",
            Self::CodingMethod => "coding",
            Self::QualityCriterion => "quality",
            Self::Journal => "journal",
            Self::RejectionPattern => "rejection",
        }
    }

    /// Human-facing label used in "unknown key" messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paradigm => "패러다임",
            Self::Tradition => "전통",
            Self::CodingMethod => "코딩 유형",
            Self::QualityCriterion => "품질 기준",
            Self::Journal => "저널",
            Self::RejectionPattern => "리젝션 유형",
        }
    }

    /// Comma-separated list of every search filter name.
    pub fn filter_names() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// All knowledge tables plus the methodology rules and writing templates.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBase {
    pub version: String,
    pub paradigms: Vec<Paradigm>,
    pub traditions: Vec<Tradition>,
    pub coding_methods: Vec<CodingMethod>,
    pub quality_frameworks: Vec<QualityFramework>,
    pub journals: Vec<Journal>,
    pub rejection_patterns: Vec<RejectionPattern>,
    pub methodology: MethodologyGuide,
    pub writing: WritingGuide,
}

impl KnowledgeBase {
    /// The knowledge base compiled into the binary.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_toml_str(BUILTIN_KNOWLEDGE)
    }

    /// Load from `path` when given, otherwise the built-in tables.
    pub fn load(path: Option<&Path>) -> Result<Self, KnowledgeError> {
        match path {
            Some(path) => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
                let kb = Self::from_toml_str(&contents)?;
                tracing::info!(path = %path.display(), version = %kb.version, "knowledge base loaded");
                Ok(kb)
            }
            None => {
                let kb = Self::builtin()?;
                tracing::info!(version = %kb.version, "built-in knowledge base loaded");
                Ok(kb)
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, KnowledgeError> {
        let kb: Self = toml::from_str(contents)?;
        kb.validate()?;
        Ok(kb)
    }

    fn validate(&self) -> Result<(), KnowledgeError> {
        check_table("paradigms", &self.paradigms)?;
        check_table("traditions", &self.traditions)?;
        check_table("coding_methods", &self.coding_methods)?;
        check_table("quality_frameworks", &self.quality_frameworks)?;
        check_table("journals", &self.journals)?;
        check_table("rejection_patterns", &self.rejection_patterns)?;

        for framework in &self.quality_frameworks {
            let mut seen = HashSet::new();
            for criterion in &framework.criteria {
                if !seen.insert(criterion.key.as_str()) {
                    return Err(KnowledgeError::DuplicateKey {
                        table: format!("quality_frameworks.{}", framework.key),
                        key: criterion.key.clone(),
                    });
                }
            }
        }

        for tradition in self.methodology.referenced_traditions() {
            if self.tradition(&tradition.key).is_none() {
                return Err(KnowledgeError::UnknownTradition {
                    context: tradition.context,
                    key: tradition.key,
                });
            }
        }

        Ok(())
    }

    /// Entries of one category, in table order.
    pub fn entries(&self, category: Category) -> Vec<EntryRef<'_>> {
        match category {
            Category::Paradigm => self.paradigms.iter().map(EntryRef::Paradigm).collect(),
            Category::Tradition => self.traditions.iter().map(EntryRef::Tradition).collect(),
            Category::CodingMethod => self
                .coding_methods
                .iter()
                .map(EntryRef::CodingMethod)
                .collect(),
            Category::QualityCriterion => self
                .quality_frameworks
                .iter()
                .map(EntryRef::QualityFramework)
                .collect(),
            Category::Journal => self.journals.iter().map(EntryRef::Journal).collect(),
            Category::RejectionPattern => self
                .rejection_patterns
                .iter()
                .map(EntryRef::RejectionPattern)
                .collect(),
        }
    }

    /// Every entry across all categories, in category then table order.
    pub fn all_entries(&self) -> Vec<EntryRef<'_>> {
        Category::ALL
            .into_iter()
            .flat_map(|c| self.entries(c))
            .collect()
    }

    /// Valid keys of one category, in table order.
    pub fn keys(&self, category: Category) -> Vec<&str> {
        self.entries(category).iter().map(|e| e.key()).collect()
    }

    /// Exact-key lookup within one category.
    pub fn find(&self, category: Category, key: &str) -> Option<EntryRef<'_>> {
        self.entries(category).into_iter().find(|e| e.key() == key)
    }

    pub fn tradition(&self, key: &str) -> Option<&Tradition> {
        find_by_key(&self.traditions, key)
    }

    /// Total number of entries (the size of the indexing corpus).
    pub fn entry_count(&self) -> usize {
        Category::ALL.iter().map(|c| self.entries(*c).len()).sum()
    }
}

fn find_by_key<'a, T: Keyed>(table: &'a [T], key: &str) -> Option<&'a T> {
    table.iter().find(|item| item.key() == key)
}

fn check_table<T: Keyed>(name: &str, table: &[T]) -> Result<(), KnowledgeError> {
    if table.is_empty() {
        return Err(KnowledgeError::EmptyTable(name.to_string()));
    }
    let mut seen = HashSet::new();
    for item in table {
        if !seen.insert(item.key()) {
            return Err(KnowledgeError::DuplicateKey {
                table: name.to_string(),
                key: item.key().to_string(),
            });
        }
    }
    Ok(())
}
