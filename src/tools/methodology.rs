//! Parameters for the methodology and quality tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `suggest_methodology` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SuggestMethodologyParams {
    #[schemars(description = "The research question to analyse")]
    pub research_question: String,

    #[schemars(
        description = "Optional research focus: 'experience', 'theory_building', 'culture', 'story', 'case'",
        extend("enum" = ["experience", "theory_building", "culture", "story", "case"])
    )]
    pub focus: Option<String>,
}

/// Parameters for the `assess_quality` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AssessQualityParams {
    #[schemars(description = "Description of the study's design, data collection and analysis")]
    pub research_description: String,

    /// Strategies the author declares, checked alongside the description.
    #[schemars(description = "Optional list of rigor strategies already applied")]
    pub strategies_used: Option<Vec<String>>,

    #[schemars(
        description = "Criteria set: 'lincoln_guba', 'tracy' or 'all'. Defaults to 'all'.",
        extend("enum" = ["lincoln_guba", "tracy", "all"])
    )]
    pub criteria: Option<String>,
}
