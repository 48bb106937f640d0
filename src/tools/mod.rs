pub mod knowledge;
pub mod methodology;
pub mod writing;

use knowledge::{
    DiagnoseRejectionParams, GetCodingGuideParams, GetJournalGuideParams, GetParadigmParams,
    GetTraditionParams, SearchKnowledgeParams,
};
use methodology::{AssessQualityParams, SuggestMethodologyParams};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::Tool;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use writing::{
    ConceptualizeIdeaParams, DevelopPropositionParams, GuideRevisionParams, ReviewPaperParams,
};

use crate::config::QualMasterConfig;
use crate::knowledge::{lookup, methodology as suggest, search, Category, KnowledgeBase};
use crate::rubric::{self, CriteriaSelector, Rubric};
use crate::semantic::SemanticSearch;

/// Catalog order, as listed by the compat `/rpc` endpoint.
pub const TOOL_NAMES: [&str; 12] = [
    "search_knowledge",
    "get_paradigm",
    "get_tradition",
    "suggest_methodology",
    "get_coding_guide",
    "assess_quality",
    "get_journal_guide",
    "diagnose_rejection",
    "conceptualize_idea",
    "develop_proposition",
    "review_paper",
    "guide_revision",
];

/// Immutable state shared by every session.
#[derive(Clone)]
pub struct SharedState {
    pub knowledge: Arc<KnowledgeBase>,
    pub rubric: Arc<Rubric>,
    pub semantic: Arc<SemanticSearch>,
    pub config: Arc<QualMasterConfig>,
}

/// The QualMaster MCP tool handler.
#[derive(Clone)]
pub struct QualMasterTools {
    tool_router: ToolRouter<Self>,
    state: SharedState,
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be empty"))
    } else {
        Ok(())
    }
}

#[tool_router]
impl QualMasterTools {
    pub fn new(state: SharedState) -> Self {
        Self {
            tool_router: Self::tool_router(),
            state,
        }
    }

    #[tool(description = "Search the qualitative research knowledge base (paradigms, traditions, coding methods, quality criteria, journals, rejection patterns). Exact matches come first; related passages from the semantic index follow when available.")]
    async fn search_knowledge(
        &self,
        Parameters(params): Parameters<SearchKnowledgeParams>,
    ) -> Result<String, String> {
        tracing::info!(query = %params.query, category = ?params.category, "search_knowledge called");

        let filter = match search::parse_filter(params.category.as_deref()) {
            Ok(filter) => filter,
            Err(message) => return Ok(message),
        };

        let semantic = Arc::clone(&self.state.semantic);
        let top_k = self.state.config.retrieval.semantic_top_k;
        let query = params.query.clone();
        let supplementary =
            match tokio::task::spawn_blocking(move || semantic.search(&query, top_k, filter)).await
            {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!(error = %e, "semantic search task failed");
                    Vec::new()
                }
            };

        let exact = search::exact_matches(&self.state.knowledge, &params.query, filter);
        tracing::debug!(exact = exact.len(), semantic = supplementary.len(), "search_knowledge results");
        Ok(search::format_results(&params.query, &exact, &supplementary))
    }

    #[tool(description = "Explain a research paradigm: ontology, epistemology, methodology, quality criteria, key scholars and limitations.")]
    async fn get_paradigm(
        &self,
        Parameters(params): Parameters<GetParadigmParams>,
    ) -> Result<String, String> {
        tracing::info!(paradigm = %params.paradigm, "get_paradigm called");
        Ok(lookup::lookup(&self.state.knowledge, Category::Paradigm, &params.paradigm))
    }

    #[tool(description = "Explain a qualitative research tradition: focus, data collection, analysis, sample size, scholars and variants.")]
    async fn get_tradition(
        &self,
        Parameters(params): Parameters<GetTraditionParams>,
    ) -> Result<String, String> {
        tracing::info!(tradition = %params.tradition, "get_tradition called");
        Ok(lookup::lookup(&self.state.knowledge, Category::Tradition, &params.tradition))
    }

    #[tool(description = "Suggest qualitative research traditions suited to a research question.")]
    async fn suggest_methodology(
        &self,
        Parameters(params): Parameters<SuggestMethodologyParams>,
    ) -> Result<String, String> {
        require("research_question", &params.research_question)?;
        tracing::info!(focus = ?params.focus, "suggest_methodology called");
        Ok(suggest::suggest(
            &self.state.knowledge,
            &params.research_question,
            params.focus.as_deref(),
        ))
    }

    #[tool(description = "Guide to a coding method: description, procedure, outputs and the axial-coding paradigm model.")]
    async fn get_coding_guide(
        &self,
        Parameters(params): Parameters<GetCodingGuideParams>,
    ) -> Result<String, String> {
        tracing::info!(coding_type = %params.coding_type, "get_coding_guide called");
        Ok(lookup::lookup(&self.state.knowledge, Category::CodingMethod, &params.coding_type))
    }

    #[tool(description = "Score a study description against Lincoln & Guba and/or Tracy quality criteria. Returns per-criterion scores, an overall grade, strengths, weaknesses and priority actions as JSON.")]
    async fn assess_quality(
        &self,
        Parameters(params): Parameters<AssessQualityParams>,
    ) -> Result<String, String> {
        let selector = match params.criteria.as_deref().map(str::trim) {
            None | Some("") => CriteriaSelector::default(),
            Some(raw) => raw.parse::<CriteriaSelector>()?,
        };
        let strategies = params.strategies_used.unwrap_or_default();
        tracing::info!(
            description_len = params.research_description.len(),
            strategies = strategies.len(),
            criteria = selector.as_str(),
            "assess_quality called"
        );

        let result = rubric::assess(
            &self.state.rubric,
            &params.research_description,
            &strategies,
            selector,
        )?;
        tracing::info!(
            score = result.overall.score,
            max = result.overall.max_score,
            grade = result.overall.grade,
            "quality assessed"
        );
        serde_json::to_string_pretty(&result).map_err(|e| format!("serialization failed: {e}"))
    }

    #[tool(description = "Submission guide for a target journal: focus, style, key sections, common rejection reasons and tips.")]
    async fn get_journal_guide(
        &self,
        Parameters(params): Parameters<GetJournalGuideParams>,
    ) -> Result<String, String> {
        tracing::info!(journal = %params.journal, "get_journal_guide called");
        Ok(lookup::lookup(&self.state.knowledge, Category::Journal, &params.journal))
    }

    #[tool(description = "Diagnose a common reviewer rejection pattern and list remedies.")]
    async fn diagnose_rejection(
        &self,
        Parameters(params): Parameters<DiagnoseRejectionParams>,
    ) -> Result<String, String> {
        tracing::info!(rejection_type = %params.rejection_type, "diagnose_rejection called");
        Ok(lookup::lookup(
            &self.state.knowledge,
            Category::RejectionPattern,
            &params.rejection_type,
        ))
    }

    #[tool(description = "Turn a research idea into a conceptualization framework: key concepts, theoretical lens, research questions and expected contribution.")]
    async fn conceptualize_idea(
        &self,
        Parameters(params): Parameters<ConceptualizeIdeaParams>,
    ) -> Result<String, String> {
        tracing::info!(field = ?params.field, "conceptualize_idea called");
        Ok(self
            .state
            .knowledge
            .writing
            .conceptualize(&params.idea, params.field.as_deref()))
    }

    #[tool(description = "Draft a theoretical proposition linking two concepts, with a guide for elaborating mechanism and boundary conditions.")]
    async fn develop_proposition(
        &self,
        Parameters(params): Parameters<DevelopPropositionParams>,
    ) -> Result<String, String> {
        tracing::info!(relationship = ?params.relationship, "develop_proposition called");
        Ok(self.state.knowledge.writing.develop_proposition(
            &params.concept_a,
            &params.concept_b,
            params.relationship.as_deref(),
        ))
    }

    #[tool(description = "Review checklist for a paper section (introduction, literature, method, findings, discussion).")]
    async fn review_paper(
        &self,
        Parameters(params): Parameters<ReviewPaperParams>,
    ) -> Result<String, String> {
        tracing::info!(
            section = %params.paper_section,
            content_len = params.content.len(),
            "review_paper called"
        );
        Ok(self
            .state
            .knowledge
            .writing
            .review(&params.paper_section, &params.content))
    }

    #[tool(description = "Revise-and-resubmit guidance for responding to a reviewer comment.")]
    async fn guide_revision(
        &self,
        Parameters(params): Parameters<GuideRevisionParams>,
    ) -> Result<String, String> {
        tracing::info!(comment_type = ?params.comment_type, "guide_revision called");
        Ok(self
            .state
            .knowledge
            .writing
            .guide_revision(&params.reviewer_comment, params.comment_type.as_deref()))
    }
}

fn parse_args<T: DeserializeOwned>(
    name: &str,
    args: serde_json::Value,
) -> Result<Parameters<T>, String> {
    let args = if args.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map(Parameters)
        .map_err(|e| format!("invalid arguments for {name}: {e}"))
}

impl QualMasterTools {
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Tool definitions in catalog order.
    pub fn catalog(&self) -> Vec<Tool> {
        let mut tools = self.tool_router.list_all();
        tools.sort_by_key(|tool| {
            TOOL_NAMES
                .iter()
                .position(|name| tool.name == *name)
                .unwrap_or(TOOL_NAMES.len())
        });
        tools
    }

    /// Dispatch a tool by name with raw JSON arguments. Used by the compat
    /// JSON-RPC endpoint; `Err` text is reported with `isError`.
    pub async fn call_by_name(&self, name: &str, args: serde_json::Value) -> Result<String, String> {
        match name {
            "search_knowledge" => self.search_knowledge(parse_args(name, args)?).await,
            "get_paradigm" => self.get_paradigm(parse_args(name, args)?).await,
            "get_tradition" => self.get_tradition(parse_args(name, args)?).await,
            "suggest_methodology" => self.suggest_methodology(parse_args(name, args)?).await,
            "get_coding_guide" => self.get_coding_guide(parse_args(name, args)?).await,
            "assess_quality" => self.assess_quality(parse_args(name, args)?).await,
            "get_journal_guide" => self.get_journal_guide(parse_args(name, args)?).await,
            "diagnose_rejection" => self.diagnose_rejection(parse_args(name, args)?).await,
            "conceptualize_idea" => self.conceptualize_idea(parse_args(name, args)?).await,
            "develop_proposition" => self.develop_proposition(parse_args(name, args)?).await,
            "review_paper" => self.review_paper(parse_args(name, args)?).await,
            "guide_revision" => self.guide_revision(parse_args(name, args)?).await,
            other => {
                tracing::warn!(tool = other, "unknown tool requested");
                Err(format!("알 수 없는 도구: {other}"))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for QualMasterTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "QualMaster supports qualitative research and conceptual paper writing. \
                 Use search_knowledge or the get_* tools for methodology knowledge, \
                 assess_quality to score a study against Lincoln & Guba and Tracy criteria, \
                 and the writing tools for propositions, section reviews and R&R responses."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
