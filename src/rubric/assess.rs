use serde::Serialize;

use super::{Guidance, Rubric};

const MAX_TRACY_MISSING: usize = 3;
const TRACY_RECOMMEND_BELOW: u32 = 10;
const TRACY_RECOMMEND_MATCHED_BELOW: usize = 3;
const MAX_PRIORITY_ACTIONS: usize = 3;
const STRENGTH_RATIO: f64 = 0.7;
const WEAKNESS_RATIO: f64 = 0.5;

/// Which criteria sets to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CriteriaSelector {
    LincolnGuba,
    Tracy,
    #[default]
    All,
}

impl CriteriaSelector {
    pub const NAMES: &'static str = "lincoln_guba, tracy, all";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LincolnGuba => "lincoln_guba",
            Self::Tracy => "tracy",
            Self::All => "all",
        }
    }

    fn includes_lincoln_guba(&self) -> bool {
        matches!(self, Self::LincolnGuba | Self::All)
    }

    fn includes_tracy(&self) -> bool {
        matches!(self, Self::Tracy | Self::All)
    }
}

impl std::str::FromStr for CriteriaSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lincoln_guba" => Ok(Self::LincolnGuba),
            "tracy" => Ok(Self::Tracy),
            "all" => Ok(Self::All),
            other => Err(format!(
                "알 수 없는 평가 기준: {other}\n사용 가능: {}",
                Self::NAMES
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CriterionResult {
    pub framework: &'static str,
    pub key: String,
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub recommendations: Vec<String>,
}

impl CriterionResult {
    fn ratio(&self) -> f64 {
        f64::from(self.score) / f64::from(self.max_score)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Overall {
    pub score: u32,
    pub max_score: u32,
    /// Rounded to one decimal place.
    pub percentage: f64,
    pub grade: &'static str,
    pub grade_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityAction {
    pub criterion: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResult {
    pub criteria_set: &'static str,
    pub criteria: Vec<CriterionResult>,
    pub overall: Overall,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub priority_actions: Vec<PriorityAction>,
    pub guidance: Guidance,
}

/// Letter grade and label for a percentage.
pub fn grade_for(percentage: f64) -> (&'static str, &'static str) {
    if percentage >= 90.0 {
        ("A", "탁월")
    } else if percentage >= 80.0 {
        ("B", "우수")
    } else if percentage >= 70.0 {
        ("C", "양호")
    } else if percentage >= 60.0 {
        ("D", "보완 필요")
    } else {
        ("F", "미흡")
    }
}

/// `matched / total * max`, rounded half to even.
fn scaled_score(matched: usize, total: usize, max: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let raw = matched as f64 / total as f64 * f64::from(max);
    (raw.round_ties_even() as u32).min(max)
}

/// Normalized inputs shared by every indicator check.
struct Evidence<'a> {
    rubric: &'a Rubric,
    raw_lower: String,
    description: String,
    strategies: Vec<String>,
}

impl<'a> Evidence<'a> {
    fn new(rubric: &'a Rubric, description: &str, strategies: &[String]) -> Self {
        Self {
            rubric,
            raw_lower: description.to_lowercase(),
            description: rubric.normalize(description),
            strategies: strategies.iter().map(|s| rubric.normalize(s)).collect(),
        }
    }

    fn mentions(&self, keyword: &str) -> bool {
        let normalized = self.rubric.normalize(keyword);
        if normalized.is_empty() {
            return false;
        }
        if self.description.contains(&normalized)
            || self.strategies.iter().any(|s| s.contains(&normalized))
        {
            return true;
        }
        self.raw_lower.contains(&keyword.to_lowercase())
    }

    fn mentions_any(&self, keywords: &[String]) -> bool {
        keywords.iter().any(|kw| self.mentions(kw))
    }
}

/// Score `description` (and any declared strategies) against the rubric.
///
/// An empty description is the only error; everything else produces a result.
pub fn assess(
    rubric: &Rubric,
    description: &str,
    strategies: &[String],
    selector: CriteriaSelector,
) -> Result<AssessmentResult, String> {
    if description.trim().is_empty() {
        return Err("research_description은 비어 있을 수 없습니다".to_string());
    }

    let evidence = Evidence::new(rubric, description, strategies);
    let mut criteria = Vec::new();

    if selector.includes_lincoln_guba() {
        for criterion in &rubric.lincoln_guba {
            let (matched, missing): (Vec<_>, Vec<_>) = criterion
                .strategies
                .iter()
                .partition(|s| evidence.mentions_any(&s.keywords));
            let recommendations = missing
                .iter()
                .map(|s| format!("'{}' 전략을 적용하세요", s.name))
                .collect();
            criteria.push(CriterionResult {
                framework: "lincoln_guba",
                key: criterion.key.clone(),
                name: criterion.name.clone(),
                score: scaled_score(matched.len(), criterion.strategies.len(), criterion.max_score),
                max_score: criterion.max_score,
                matched: matched.iter().map(|s| s.name.clone()).collect(),
                missing: missing.iter().map(|s| s.name.clone()).collect(),
                recommendations,
            });
        }
    }

    if selector.includes_tracy() {
        for criterion in &rubric.tracy {
            let (matched, missing): (Vec<&String>, Vec<&String>) = criterion
                .indicators
                .iter()
                .partition(|indicator| evidence.mentions(indicator));
            let score = scaled_score(matched.len(), criterion.indicators.len(), criterion.max_score);
            let recommendations =
                if score < TRACY_RECOMMEND_BELOW && matched.len() < TRACY_RECOMMEND_MATCHED_BELOW {
                    vec![criterion.recommendation.clone()]
                } else {
                    Vec::new()
                };
            criteria.push(CriterionResult {
                framework: "tracy",
                key: criterion.key.clone(),
                name: criterion.name.clone(),
                score,
                max_score: criterion.max_score,
                matched: matched.into_iter().cloned().collect(),
                missing: missing.into_iter().take(MAX_TRACY_MISSING).cloned().collect(),
                recommendations,
            });
        }
    }

    let score: u32 = criteria.iter().map(|c| c.score).sum();
    let max_score: u32 = criteria.iter().map(|c| c.max_score).sum();
    let percentage = if max_score == 0 {
        0.0
    } else {
        f64::from(score) / f64::from(max_score) * 100.0
    };
    let (grade, grade_label) = grade_for(percentage);

    let strengths = criteria
        .iter()
        .filter(|c| c.ratio() >= STRENGTH_RATIO)
        .map(|c| c.name.clone())
        .collect();
    let weaknesses = criteria
        .iter()
        .filter(|c| c.ratio() < WEAKNESS_RATIO)
        .map(|c| c.name.clone())
        .collect();
    let priority_actions = criteria
        .iter()
        .filter(|c| c.ratio() < WEAKNESS_RATIO)
        .take(MAX_PRIORITY_ACTIONS)
        .map(|c| PriorityAction {
            criterion: c.name.clone(),
            action: c
                .recommendations
                .first()
                .cloned()
                .unwrap_or_else(|| format!("{} 기준을 보완하세요", c.name)),
        })
        .collect();

    Ok(AssessmentResult {
        criteria_set: selector.as_str(),
        criteria,
        overall: Overall {
            score,
            max_score,
            percentage: (percentage * 10.0).round() / 10.0,
            grade,
            grade_label,
        },
        strengths,
        weaknesses,
        priority_actions,
        guidance: rubric.guidance.clone(),
    })
}
