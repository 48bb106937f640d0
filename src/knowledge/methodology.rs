//! Keyword-rule methodology suggestions for a research question.

use serde::Deserialize;
use std::fmt::Write;

use super::KnowledgeBase;

/// A suggested tradition with the reason shown to the user.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub tradition: String,
    pub label: String,
    pub reason: String,
}

/// A keyword rule: any keyword present in the question suggests the tradition.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub tradition: String,
    pub label: String,
    pub reason: String,
    pub keywords: Vec<String>,
}

impl Rule {
    /// ASCII keywords match the lower-cased question, others the raw text.
    fn matches(&self, raw: &str, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| {
            if kw.is_ascii() {
                lowered.contains(kw.to_lowercase().as_str())
            } else {
                raw.contains(kw.as_str())
            }
        })
    }

    fn suggestion(&self) -> Suggestion {
        Suggestion {
            tradition: self.tradition.clone(),
            label: self.label.clone(),
            reason: self.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FocusMapping {
    pub key: String,
    pub tradition: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodologyGuide {
    pub defaults: Vec<Suggestion>,
    pub focus: Vec<FocusMapping>,
    pub rules: Vec<Rule>,
}

/// A tradition key referenced from the methodology tables.
pub struct TraditionRef {
    pub context: String,
    pub key: String,
}

impl MethodologyGuide {
    pub(crate) fn referenced_traditions(&self) -> Vec<TraditionRef> {
        let defaults = self.defaults.iter().map(|d| TraditionRef {
            context: "methodology.defaults".into(),
            key: d.tradition.clone(),
        });
        let focus = self.focus.iter().map(|f| TraditionRef {
            context: format!("methodology.focus.{}", f.key),
            key: f.tradition.clone(),
        });
        let rules = self.rules.iter().map(|r| TraditionRef {
            context: "methodology.rules".into(),
            key: r.tradition.clone(),
        });
        defaults.chain(focus).chain(rules).collect()
    }

    pub fn focus_keys(&self) -> Vec<&str> {
        self.focus.iter().map(|f| f.key.as_str()).collect()
    }

    /// Suggestions in rule order, falling back to the defaults. A focus moves
    /// its tradition to the front.
    pub fn suggestions(&self, question: &str, focus: Option<&str>) -> Result<Vec<Suggestion>, String> {
        let lowered = question.to_lowercase();
        let mut suggestions: Vec<Suggestion> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(question, &lowered))
            .map(Rule::suggestion)
            .collect();
        if suggestions.is_empty() {
            suggestions = self.defaults.clone();
        }

        if let Some(focus) = focus {
            let mapping = self
                .focus
                .iter()
                .find(|f| f.key == focus)
                .ok_or_else(|| {
                    format!(
                        "알 수 없는 연구 초점: {focus}\n사용 가능: {}",
                        self.focus_keys().join(", ")
                    )
                })?;
            let focused = match suggestions.iter().position(|s| s.tradition == mapping.tradition) {
                Some(idx) => Some(suggestions.remove(idx)),
                None => self
                    .rules
                    .iter()
                    .find(|r| r.tradition == mapping.tradition)
                    .map(Rule::suggestion),
            };
            if let Some(focused) = focused {
                suggestions.insert(0, focused);
            }
        }

        Ok(suggestions)
    }
}

/// The `suggest_methodology` response text.
pub fn suggest(kb: &KnowledgeBase, question: &str, focus: Option<&str>) -> String {
    let focus = focus.map(str::trim).filter(|f| !f.is_empty());
    let suggestions = match kb.methodology.suggestions(question, focus) {
        Ok(suggestions) => suggestions,
        Err(message) => return message,
    };

    let mut out = format!("## 연구질문 분석\n\n**질문**: {question}\n\n");
    if let Some(focus) = focus {
        let _ = write!(out, "**연구 초점**: {focus}\n\n");
    }
    out.push_str("### 추천 방법론\n\n");
    for suggestion in &suggestions {
        let Some(tradition) = kb.tradition(&suggestion.tradition) else {
            continue;
        };
        let _ = write!(
            out,
            "#### {}\n- **적합 이유**: {}\n- **표본 크기**: {}\n- **분석 방법**: {}\n\n",
            suggestion.label, suggestion.reason, tradition.sample_size, tradition.analysis
        );
    }
    out
}
