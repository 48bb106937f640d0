//! Parameters for the writing-support tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConceptualizeIdeaParams {
    #[schemars(description = "The research idea to conceptualize")]
    pub idea: String,

    #[schemars(description = "Academic field. Defaults to 경영학.")]
    pub field: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DevelopPropositionParams {
    #[schemars(description = "First concept")]
    pub concept_a: String,

    #[schemars(description = "Second concept")]
    pub concept_b: String,

    #[schemars(
        description = "Relationship type: 'positive', 'negative', 'moderation', 'mediation'. Defaults to 'positive'.",
        extend("enum" = ["positive", "negative", "moderation", "mediation"])
    )]
    pub relationship: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReviewPaperParams {
    #[schemars(
        description = "Paper section: 'introduction', 'literature', 'method', 'findings', 'discussion'",
        extend("enum" = ["introduction", "literature", "method", "findings", "discussion"])
    )]
    pub paper_section: String,

    #[schemars(description = "Section text to review; only the first 500 characters are echoed")]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GuideRevisionParams {
    #[schemars(description = "The reviewer comment to respond to")]
    pub reviewer_comment: String,

    #[schemars(
        description = "Comment type: 'major', 'minor', 'clarification'. Defaults to 'major'.",
        extend("enum" = ["major", "minor", "clarification"])
    )]
    pub comment_type: Option<String>,
}
