//! Parameters for the knowledge lookup and search tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `search_knowledge` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchKnowledgeParams {
    #[schemars(description = "Search text, matched case-insensitively against every entry")]
    pub query: String,

    #[schemars(
        description = "Optional category filter: 'paradigms', 'traditions', 'coding', 'quality', 'journals', 'rejection'",
        extend("enum" = ["paradigms", "traditions", "coding", "quality", "journals", "rejection"])
    )]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetParadigmParams {
    #[schemars(
        description = "Paradigm key: 'positivism', 'postpositivism', 'critical_theory', 'constructivism'",
        extend("enum" = ["positivism", "postpositivism", "critical_theory", "constructivism"])
    )]
    pub paradigm: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetTraditionParams {
    #[schemars(
        description = "Tradition key: 'phenomenology', 'grounded_theory', 'ethnography', 'narrative', 'case_study'",
        extend("enum" = ["phenomenology", "grounded_theory", "ethnography", "narrative", "case_study"])
    )]
    pub tradition: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetCodingGuideParams {
    #[schemars(
        description = "Coding method: 'open_coding', 'axial_coding', 'selective_coding', 'invivo_coding', 'thematic_analysis'",
        extend("enum" = ["open_coding", "axial_coding", "selective_coding", "invivo_coding", "thematic_analysis"])
    )]
    pub coding_type: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetJournalGuideParams {
    #[schemars(
        description = "Journal key: 'amr' (Academy of Management Review), 'asq' (Administrative Science Quarterly)",
        extend("enum" = ["amr", "asq"])
    )]
    pub journal: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DiagnoseRejectionParams {
    #[schemars(
        description = "Rejection pattern: 'so_what', 'old_wine', 'logic_gap'",
        extend("enum" = ["so_what", "old_wine", "logic_gap"])
    )]
    pub rejection_type: String,
}
