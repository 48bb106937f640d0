//! Markdown rendering of knowledge entries.
//!
//! The full renderings are returned by the lookup tools and are also the
//! document text of the semantic-index corpus. Summaries are the short blocks
//! listed by free-text search.

use std::fmt::Write;

use super::types::{
    CodingMethod, Journal, NamedItem, Paradigm, QualityFramework, RejectionPattern, Tradition,
};

/// Accumulates `### heading` sections under a `## title`.
struct Doc {
    out: String,
}

impl Doc {
    fn new(title: &str) -> Self {
        Self {
            out: format!("## {title}\n"),
        }
    }

    fn para(mut self, text: &str) -> Self {
        let _ = write!(self.out, "\n{text}\n");
        self
    }

    fn section(mut self, heading: &str, body: &str) -> Self {
        let _ = write!(self.out, "\n### {heading}\n{body}\n");
        self
    }

    fn section_opt(self, heading: &str, body: Option<&str>) -> Self {
        match body {
            Some(body) if !body.is_empty() => self.section(heading, body),
            _ => self,
        }
    }

    fn list(self, heading: &str, items: &[String]) -> Self {
        if items.is_empty() {
            return self;
        }
        self.section(heading, &bullets(items))
    }

    fn finish(self) -> String {
        self.out
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn named_bullets(items: &[NamedItem]) -> String {
    items
        .iter()
        .map(|item| format!("- **{}**: {}", item.key, item.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn paradigm(p: &Paradigm) -> String {
    Doc::new(&p.name)
        .section("존재론 (Ontology)", &p.ontology)
        .section("인식론 (Epistemology)", &p.epistemology)
        .section("방법론 (Methodology)", &p.methodology)
        .section("품질 기준", &p.quality_criteria.join(", "))
        .section("주요 학자", &p.key_scholars.join(", "))
        .section("한계", &p.limitations)
        .finish()
}

pub fn tradition(t: &Tradition) -> String {
    let doc = Doc::new(&t.name)
        .section("연구 초점", &t.focus)
        .section("데이터 수집", &t.data_collection)
        .section("분석 방법", &t.analysis)
        .section("표본 크기", &t.sample_size)
        .section("주요 학자", &t.key_scholars.join(", "));
    if t.variants.is_empty() {
        doc.finish()
    } else {
        doc.section("변형 (Variants)", &named_bullets(&t.variants))
            .finish()
    }
}

pub fn coding_method(c: &CodingMethod) -> String {
    let mut doc = Doc::new(&c.name)
        .para(&c.description)
        .list("절차", &c.process)
        .section_opt("결과물", c.output.as_deref());
    if !c.paradigm_model.is_empty() {
        doc = doc.section("패러다임 모형", &named_bullets(&c.paradigm_model));
    }
    let doc = doc
        .section_opt("목적", c.purpose.as_deref())
        .section_opt("예시", c.example.as_deref());
    if c.key_scholars.is_empty() {
        doc.finish()
    } else {
        doc.section("주요 학자", &c.key_scholars.join(", ")).finish()
    }
}

pub fn quality_framework(q: &QualityFramework) -> String {
    let mut out = format!("## {}\n", q.name);
    for criterion in &q.criteria {
        let _ = write!(out, "\n### {}\n", criterion.name);
        if let Some(equivalent) = &criterion.equivalent {
            let _ = writeln!(out, "- **양적 동등개념**: {equivalent}");
        }
        let _ = writeln!(out, "- **전략**:");
        for strategy in &criterion.strategies {
            let _ = writeln!(out, "  - {strategy}");
        }
    }
    out
}

pub fn journal(j: &Journal) -> String {
    let mut doc = Doc::new(&j.name)
        .para(&format!("**초점**: {}", j.focus))
        .para(&format!("**스타일**: {}", j.style));
    if !j.key_sections.is_empty() {
        doc = doc.section("주요 섹션", &j.key_sections.join(", "));
    }
    doc.list("흔한 리젝션 사유", &j.common_rejections)
        .list("투고 팁", &j.tips)
        .list("요구 사항", &j.requirements)
        .finish()
}

pub fn rejection_pattern(r: &RejectionPattern) -> String {
    Doc::new(&r.name)
        .list("증상", &r.symptoms)
        .list("해결 전략", &r.solutions)
        .finish()
}

pub fn paradigm_summary(p: &Paradigm) -> String {
    format!(
        "**{}**\n- 존재론: {}\n- 인식론: {}",
        p.name, p.ontology, p.epistemology
    )
}

pub fn tradition_summary(t: &Tradition) -> String {
    format!("**{}**\n- 초점: {}\n- 분석: {}", t.name, t.focus, t.analysis)
}

pub fn coding_method_summary(c: &CodingMethod) -> String {
    format!("**{}**\n- {}", c.name, c.description)
}

pub fn quality_framework_summary(q: &QualityFramework) -> String {
    let names: Vec<&str> = q.criteria.iter().map(|c| c.name.as_str()).collect();
    format!("**{}**\n- 기준: {}", q.name, names.join(", "))
}

pub fn journal_summary(j: &Journal) -> String {
    format!("**{}**\n- 초점: {}", j.name, j.focus)
}

pub fn rejection_pattern_summary(r: &RejectionPattern) -> String {
    format!("**{}**\n- 증상: {}", r.name, r.symptoms.join(", "))
}

#[cfg(test)]
mod tests {
    use crate::knowledge::{Category, KnowledgeBase};

    #[test]
    fn paradigm_sections_in_order() {
        let kb = KnowledgeBase::builtin().unwrap();
        let text = kb.find(Category::Paradigm, "positivism").unwrap().render();
        assert!(text.starts_with("## 실증주의 (Positivism)\n"));
        let headings = [
            "### 존재론 (Ontology)",
            "### 인식론 (Epistemology)",
            "### 방법론 (Methodology)",
            "### 품질 기준",
            "### 주요 학자",
            "### 한계",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| text.find(h).unwrap_or_else(|| panic!("missing {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("내적타당도, 외적타당도, 신뢰도, 객관성"));
    }

    #[test]
    fn tradition_lists_variants() {
        let kb = KnowledgeBase::builtin().unwrap();
        let text = kb.find(Category::Tradition, "grounded_theory").unwrap().render();
        assert!(text.contains("### 변형 (Variants)"));
        assert!(text.contains("- **charmaz**: 구성주의 GT"));
        assert!(text.contains("20-30명"));
    }

    #[test]
    fn coding_method_omits_absent_sections() {
        let kb = KnowledgeBase::builtin().unwrap();
        let invivo = kb.find(Category::CodingMethod, "invivo_coding").unwrap().render();
        assert!(!invivo.contains("### 절차"));
        assert!(!invivo.contains("### 패러다임 모형"));
        assert!(invivo.contains("### 목적\n참여자 관점 보존"));
        assert!(invivo.contains("### 예시"));

        let axial = kb.find(Category::CodingMethod, "axial_coding").unwrap().render();
        assert!(axial.contains("### 패러다임 모형"));
        assert!(axial.contains("- **causal_conditions**: 인과적 조건"));
    }

    #[test]
    fn quality_framework_shows_equivalents_only_when_defined() {
        let kb = KnowledgeBase::builtin().unwrap();
        let lg = kb.find(Category::QualityCriterion, "lincoln_guba").unwrap().render();
        assert!(lg.contains("- **양적 동등개념**: 내적 타당도"));
        let tracy = kb.find(Category::QualityCriterion, "tracy").unwrap().render();
        assert!(!tracy.contains("양적 동등개념"));
        assert!(tracy.contains("### 윤리성 (Ethics)"));
    }

    #[test]
    fn journal_renders_optional_lists() {
        let kb = KnowledgeBase::builtin().unwrap();
        let amr = kb.find(Category::Journal, "amr").unwrap().render();
        assert!(amr.contains("**스타일**: 가설 없음, 명제 중심"));
        assert!(amr.contains("### 투고 팁"));
        assert!(!amr.contains("### 요구 사항"));
        let asq = kb.find(Category::Journal, "asq").unwrap().render();
        assert!(asq.contains("### 요구 사항\n- 새로운 이론적 통찰"));
        assert!(!asq.contains("### 주요 섹션"));
    }

    #[test]
    fn summaries_are_short() {
        let kb = KnowledgeBase::builtin().unwrap();
        let summary = kb.find(Category::RejectionPattern, "so_what").unwrap().summary();
        assert_eq!(
            summary,
            "**So What? 문제**\n- 증상: 기여 불명확, 실무적 함의 부족, 이론적 중요성 설명 부족"
        );
    }
}
