//! Conceptual-paper writing support: idea framing, propositions, section
//! review checklists and revise-and-resubmit guidance.

use serde::Deserialize;
use std::fmt::Write;

#[derive(Debug, Clone, Deserialize)]
pub struct PropositionTemplate {
    pub relationship: String,
    pub template: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSection {
    pub section: String,
    pub title: String,
    pub checklist: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevisionTips {
    pub comment_type: String,
    pub tips: Vec<String>,
}

/// Writing templates from the `[writing]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct WritingGuide {
    pub default_field: String,
    pub excerpt_limit: usize,
    pub conceptualization: String,
    pub proposition_guide: String,
    pub review_framework: String,
    pub revision_strategy: String,
    pub response_template: String,
    pub fallback_proposition: String,
    pub propositions: Vec<PropositionTemplate>,
    pub review_sections: Vec<ReviewSection>,
    pub revision_tips: Vec<RevisionTips>,
}

const DEFAULT_RELATIONSHIP: &str = "positive";
const DEFAULT_COMMENT_TYPE: &str = "major";
const FALLBACK_COMMENT_TYPE: &str = "clarification";

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl WritingGuide {
    pub fn conceptualize(&self, idea: &str, field: Option<&str>) -> String {
        let field = non_empty(field).unwrap_or(&self.default_field);
        format!(
            "## 연구 아이디어 개념화\n\n### 입력 아이디어\n{idea}\n\n### 분야\n{field}\n\n{}",
            self.conceptualization
        )
    }

    /// Fill the template for `relationship`, or the generic one if unknown.
    pub fn proposition(&self, concept_a: &str, concept_b: &str, relationship: &str) -> String {
        let template = self
            .propositions
            .iter()
            .find(|p| p.relationship == relationship)
            .map(|p| p.template.as_str())
            .unwrap_or(&self.fallback_proposition);
        template.replace("{a}", concept_a).replace("{b}", concept_b)
    }

    pub fn develop_proposition(
        &self,
        concept_a: &str,
        concept_b: &str,
        relationship: Option<&str>,
    ) -> String {
        let relationship = non_empty(relationship).unwrap_or(DEFAULT_RELATIONSHIP);
        format!(
            "## 이론적 명제 개발\n\n### 개념\n- **개념 A**: {concept_a}\n- **개념 B**: {concept_b}\n- **관계 유형**: {relationship}\n\n### 명제 초안\n**Proposition**: {}\n\n{}",
            self.proposition(concept_a, concept_b, relationship),
            self.proposition_guide
        )
    }

    fn section_guide(&self, section: &str) -> String {
        match self.review_sections.iter().find(|s| s.section == section) {
            Some(guide) => {
                let mut out = format!("### {} 검토 기준\n\n", guide.title);
                for (idx, item) in guide.checklist.iter().enumerate() {
                    let _ = writeln!(out, "{}. {item}", idx + 1);
                }
                out
            }
            None => "선택한 섹션에 대한 가이드가 없습니다.\n".to_string(),
        }
    }

    pub fn review(&self, section: &str, content: &str) -> String {
        format!(
            "## {} 섹션 리뷰\n\n### 검토 대상 내용\n```\n{}\n```\n\n{}\n{}",
            section.to_uppercase(),
            truncate(content, self.excerpt_limit),
            self.section_guide(section),
            self.review_framework
        )
    }

    pub fn guide_revision(&self, comment: &str, comment_type: Option<&str>) -> String {
        let comment_type = comment_type.unwrap_or(DEFAULT_COMMENT_TYPE);
        // Only an absent type means major; anything unrecognised is a clarification.
        let tips = self
            .revision_tips
            .iter()
            .find(|t| t.comment_type == comment_type)
            .or_else(|| {
                self.revision_tips
                    .iter()
                    .find(|t| t.comment_type == FALLBACK_COMMENT_TYPE)
            })
            .map(|t| {
                t.tips
                    .iter()
                    .map(|tip| format!("- {tip}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        format!(
            "## R&R 수정 가이드\n\n### 리뷰어 코멘트\n```\n{comment}\n```\n\n### 코멘트 유형\n**{}**\n\n{}\n#### 4. 수정 팁 ({comment_type})\n{tips}\n\n### 응답 템플릿\n```\n{}```\n",
            comment_type.to_uppercase(),
            self.revision_strategy,
            self.response_template
        )
    }
}

/// First `limit` characters, with `...` appended when anything was cut.
pub fn truncate(content: &str, limit: usize) -> String {
    if content.chars().count() > limit {
        let cut: String = content.chars().take(limit).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}
