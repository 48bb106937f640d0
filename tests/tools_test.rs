mod helpers;

use serde_json::{json, Value};

async fn assess(args: Value) -> Value {
    let text = helpers::tools_without_index()
        .call_by_name("assess_quality", args)
        .await
        .unwrap();
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn declared_strategies_count_as_evidence() {
    let without = assess(json!({
        "research_description": "반구조화 면담을 실시했다",
        "criteria": "lincoln_guba"
    }))
    .await;
    let with = assess(json!({
        "research_description": "반구조화 면담을 실시했다",
        "strategies_used": ["교차검증", "member checking"],
        "criteria": "lincoln_guba"
    }))
    .await;

    let score = |v: &Value| v["overall"]["score"].as_u64().unwrap();
    assert!(score(&with) > score(&without));

    let credibility = with["criteria"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["key"] == "credibility")
        .unwrap();
    let matched: Vec<&str> = credibility["matched"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m.as_str().unwrap())
        .collect();
    assert!(matched.contains(&"삼각검증 (Triangulation)"));
    assert!(matched.contains(&"참여자 확인 (Member checking)"));
}

#[tokio::test]
async fn all_criteria_combine_both_frameworks() {
    let result = assess(json!({"research_description": "참여관찰과 심층면담"})).await;
    assert_eq!(result["criteria_set"], "all");
    assert_eq!(result["overall"]["max_score"], 204);
    assert_eq!(result["criteria"].as_array().unwrap().len(), 12);
    assert!(result["guidance"].is_object());
}

#[tokio::test]
async fn tracy_only_has_eight_criteria() {
    let result = assess(json!({
        "research_description": "연구윤리 심의를 받았다",
        "criteria": "tracy"
    }))
    .await;
    assert_eq!(result["overall"]["max_score"], 104);
    assert_eq!(result["criteria"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn empty_description_is_error() {
    let err = helpers::tools_without_index()
        .call_by_name("assess_quality", json!({"research_description": ""}))
        .await
        .unwrap_err();
    assert!(err.contains("research_description"));
}

#[tokio::test]
async fn focus_puts_mapped_tradition_first() {
    let text = helpers::tools_without_index()
        .call_by_name(
            "suggest_methodology",
            json!({"research_question": "조직 문화는 어떻게 형성되는가?", "focus": "case"}),
        )
        .await
        .unwrap();
    let case = text.find("#### 사례연구").unwrap();
    let culture = text.find("#### 문화기술지").unwrap();
    assert!(case < culture);
    assert!(text.contains("**연구 초점**: case"));
}

#[tokio::test]
async fn unknown_focus_lists_valid_values() {
    let text = helpers::tools_without_index()
        .call_by_name(
            "suggest_methodology",
            json!({"research_question": "무엇이 변했는가", "focus": "history"}),
        )
        .await
        .unwrap();
    assert!(text.starts_with("알 수 없는 연구 초점: history"));
    assert!(text.contains("experience, theory_building, culture, story, case"));
}

#[tokio::test]
async fn writing_tools_fill_templates() {
    let tools = helpers::tools_without_index();

    let idea = tools
        .call_by_name("conceptualize_idea", json!({"idea": "원격근무와 소속감"}))
        .await
        .unwrap();
    assert!(idea.contains("### 분야\n경영학"));

    let proposition = tools
        .call_by_name(
            "develop_proposition",
            json!({"concept_a": "심리적 안전감", "concept_b": "혁신 행동", "relationship": "synergy"}),
        )
        .await
        .unwrap();
    assert!(proposition.contains("- **관계 유형**: synergy"));
    assert!(proposition.contains("심리적 안전감"));

    let review = tools
        .call_by_name(
            "review_paper",
            json!({"paper_section": "method", "content": "가".repeat(600)}),
        )
        .await
        .unwrap();
    assert!(review.starts_with("## METHOD 섹션 리뷰"));
    assert!(review.contains(&format!("{}...", "가".repeat(500))));
    assert!(!review.contains(&"가".repeat(501)));

    let revision = tools
        .call_by_name("guide_revision", json!({"reviewer_comment": "표본이 작다"}))
        .await
        .unwrap();
    assert!(revision.contains("**MAJOR**"));
}
