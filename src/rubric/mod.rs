//! Keyword rubric for qualitative-research quality assessment.
//!
//! The rubric is data (`data/rubric.toml`): Lincoln & Guba criteria carry
//! named strategies with keyword sets, Tracy criteria carry a flat indicator
//! list. [`assess`] evaluates a description against it.

pub mod assess;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::knowledge::KnowledgeError;

pub use assess::{assess, grade_for, AssessmentResult, CriteriaSelector};

const BUILTIN_RUBRIC: &str = include_str!("../../data/rubric.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Synonym {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Normalization {
    #[serde(default)]
    pub synonyms: Vec<Synonym>,
}

/// A named strategy and the keywords that evidence it.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyIndicator {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LincolnGubaCriterion {
    pub key: String,
    pub name: String,
    pub max_score: u32,
    pub strategies: Vec<StrategyIndicator>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracyCriterion {
    pub key: String,
    pub name: String,
    pub max_score: u32,
    pub indicators: Vec<String>,
    pub recommendation: String,
}

/// Static checklist returned with every assessment.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Guidance {
    pub planning: Vec<String>,
    pub data_collection: Vec<String>,
    pub analysis: Vec<String>,
    pub writing: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rubric {
    pub version: String,
    #[serde(default)]
    pub normalization: Normalization,
    pub lincoln_guba: Vec<LincolnGubaCriterion>,
    pub tracy: Vec<TracyCriterion>,
    pub guidance: Guidance,
}

impl Rubric {
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_toml_str(BUILTIN_RUBRIC)
    }

    /// Load from `path` when given, otherwise the built-in rubric.
    pub fn load(path: Option<&Path>) -> Result<Self, KnowledgeError> {
        let rubric = match path {
            Some(path) => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::builtin()?,
        };
        tracing::info!(
            version = %rubric.version,
            lincoln_guba = rubric.lincoln_guba.len(),
            tracy = rubric.tracy.len(),
            "rubric loaded"
        );
        Ok(rubric)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, KnowledgeError> {
        let rubric: Self = toml::from_str(contents)?;
        rubric.validate()?;
        Ok(rubric)
    }

    fn validate(&self) -> Result<(), KnowledgeError> {
        if self.lincoln_guba.is_empty() {
            return Err(KnowledgeError::EmptyTable("lincoln_guba".into()));
        }
        if self.tracy.is_empty() {
            return Err(KnowledgeError::EmptyTable("tracy".into()));
        }
        unique_keys("lincoln_guba", self.lincoln_guba.iter().map(|c| c.key.as_str()))?;
        unique_keys("tracy", self.tracy.iter().map(|c| c.key.as_str()))?;

        for c in &self.lincoln_guba {
            if c.max_score == 0 || c.strategies.is_empty() {
                return Err(KnowledgeError::InvalidRubric(format!(
                    "lincoln_guba.{} needs a positive max_score and at least one strategy",
                    c.key
                )));
            }
        }
        for c in &self.tracy {
            if c.max_score == 0 || c.indicators.is_empty() {
                return Err(KnowledgeError::InvalidRubric(format!(
                    "tracy.{} needs a positive max_score and at least one indicator",
                    c.key
                )));
            }
        }
        Ok(())
    }

    /// Matching form of `text`: case-folded, whitespace / `_` / `-` removed,
    /// synonyms applied. Never used for display.
    pub fn normalize(&self, text: &str) -> String {
        let mut out: String = text
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();
        for synonym in &self.normalization.synonyms {
            let from = strip(&synonym.from.to_lowercase());
            if from.is_empty() {
                continue;
            }
            out = out.replace(&from, &strip(&synonym.to.to_lowercase()));
        }
        out
    }

    pub fn lincoln_guba_max(&self) -> u32 {
        self.lincoln_guba.iter().map(|c| c.max_score).sum()
    }

    pub fn tracy_max(&self) -> u32 {
        self.tracy.iter().map(|c| c.max_score).sum()
    }
}

fn strip(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect()
}

fn unique_keys<'a>(table: &str, keys: impl Iterator<Item = &'a str>) -> Result<(), KnowledgeError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(KnowledgeError::DuplicateKey {
                table: table.to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}
