//! Typed knowledge-table records.
//!
//! One struct per [`Category`](super::Category), deserialized from the
//! array-of-tables layout of `data/knowledge.toml`. [`EntryRef`] is a borrowed
//! view that gives every record the same key / name / category surface.

use serde::{Deserialize, Serialize};

use super::render;
use super::Category;

/// A nested `key → description` pair (tradition variants, axial-coding model).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedItem {
    pub key: String,
    pub description: String,
}

/// A research paradigm: ontological and epistemological stance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paradigm {
    pub key: String,
    pub name: String,
    pub ontology: String,
    pub epistemology: String,
    pub methodology: String,
    pub quality_criteria: Vec<String>,
    pub key_scholars: Vec<String>,
    pub limitations: String,
}

/// A qualitative research tradition (phenomenology, grounded theory, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tradition {
    pub key: String,
    pub name: String,
    pub focus: String,
    pub data_collection: String,
    pub analysis: String,
    pub sample_size: String,
    pub key_scholars: Vec<String>,
    #[serde(default)]
    pub variants: Vec<NamedItem>,
}

/// A coding / analysis technique. Most sections are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodingMethod {
    pub key: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub process: Vec<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub paradigm_model: Vec<NamedItem>,
    pub purpose: Option<String>,
    pub example: Option<String>,
    #[serde(default)]
    pub key_scholars: Vec<String>,
}

/// One criterion inside a quality framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCriterion {
    pub key: String,
    pub name: String,
    /// Quantitative-research counterpart, where the framework defines one.
    pub equivalent: Option<String>,
    pub strategies: Vec<String>,
}

/// A set of quality criteria (Lincoln & Guba, Tracy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityFramework {
    pub key: String,
    pub name: String,
    pub criteria: Vec<QualityCriterion>,
}

/// Journal submission guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub key: String,
    pub name: String,
    pub focus: String,
    pub style: String,
    #[serde(default)]
    pub key_sections: Vec<String>,
    #[serde(default)]
    pub common_rejections: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// A recurring reviewer rejection pattern with its remedies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionPattern {
    pub key: String,
    pub name: String,
    pub symptoms: Vec<String>,
    pub solutions: Vec<String>,
}

/// Borrowed view over any knowledge record.
#[derive(Debug, Clone, Copy)]
pub enum EntryRef<'a> {
    Paradigm(&'a Paradigm),
    Tradition(&'a Tradition),
    CodingMethod(&'a CodingMethod),
    QualityFramework(&'a QualityFramework),
    Journal(&'a Journal),
    RejectionPattern(&'a RejectionPattern),
}

impl<'a> EntryRef<'a> {
    pub fn key(&self) -> &'a str {
        match self {
            Self::Paradigm(p) => &p.key,
            Self::Tradition(t) => &t.key,
            Self::CodingMethod(c) => &c.key,
            Self::QualityFramework(q) => &q.key,
            Self::Journal(j) => &j.key,
            Self::RejectionPattern(r) => &r.key,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::Paradigm(p) => &p.name,
            Self::Tradition(t) => &t.name,
            Self::CodingMethod(c) => &c.name,
            Self::QualityFramework(q) => &q.name,
            Self::Journal(j) => &j.name,
            Self::RejectionPattern(r) => &r.name,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Paradigm(_) => Category::Paradigm,
            Self::Tradition(_) => Category::Tradition,
            Self::CodingMethod(_) => Category::CodingMethod,
            Self::QualityFramework(_) => Category::QualityCriterion,
            Self::Journal(_) => Category::Journal,
            Self::RejectionPattern(_) => Category::RejectionPattern,
        }
    }

    /// Full Markdown rendering, as returned by the lookup tools.
    pub fn render(&self) -> String {
        match self {
            Self::Paradigm(p) => render::paradigm(p),
            Self::Tradition(t) => render::tradition(t),
            Self::CodingMethod(c) => render::coding_method(c),
            Self::QualityFramework(q) => render::quality_framework(q),
            Self::Journal(j) => render::journal(j),
            Self::RejectionPattern(r) => render::rejection_pattern(r),
        }
    }

    /// Short block used in free-text search results.
    pub fn summary(&self) -> String {
        match self {
            Self::Paradigm(p) => render::paradigm_summary(p),
            Self::Tradition(t) => render::tradition_summary(t),
            Self::CodingMethod(c) => render::coding_method_summary(c),
            Self::QualityFramework(q) => render::quality_framework_summary(q),
            Self::Journal(j) => render::journal_summary(j),
            Self::RejectionPattern(r) => render::rejection_pattern_summary(r),
        }
    }
}

/// Records that can be looked up by key within their own table.
pub trait Keyed {
    fn key(&self) -> &str;
}

macro_rules! impl_keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            fn key(&self) -> &str {
                &self.key
            }
        })*
    };
}

impl_keyed!(
    Paradigm,
    Tradition,
    CodingMethod,
    QualityFramework,
    Journal,
    RejectionPattern,
);
