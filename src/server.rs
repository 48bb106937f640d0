//! MCP server startup for the stdio and HTTP transports.

use crate::config::QualMasterConfig;
use crate::knowledge::KnowledgeBase;
use crate::rpc;
use crate::rubric::Rubric;
use crate::semantic::SemanticSearch;
use crate::tools::{QualMasterTools, SharedState};
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Load the knowledge base and rubric, then pick the semantic search mode.
/// A broken knowledge or rubric file is fatal; a missing index is not.
pub fn setup_shared_state(config: QualMasterConfig) -> Result<SharedState> {
    let knowledge = KnowledgeBase::load(config.knowledge_path().as_deref())
        .context("failed to load knowledge base")?;
    let rubric =
        Rubric::load(config.rubric_path().as_deref()).context("failed to load rubric")?;
    let semantic = SemanticSearch::initialize(&config, &knowledge.version);

    Ok(SharedState {
        knowledge: Arc::new(knowledge),
        rubric: Arc::new(rubric),
        semantic: Arc::new(semantic),
        config: Arc::new(config),
    })
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: QualMasterConfig) -> Result<()> {
    tracing::info!("starting QualMaster MCP server on stdio");

    let state = setup_shared_state(config)?;
    let tools = QualMasterTools::new(state);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// The full HTTP surface: streamable MCP at `/mcp`, compat JSON-RPC at
/// `/rpc`, status at `/` and `/health`. Plain-JSON clients that used to post
/// to `/mcp` are served at `/rpc`.
pub fn http_router(state: SharedState) -> axum::Router {
    let session_state = state.clone();
    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(QualMasterTools::new(session_state.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    rpc::router(QualMasterTools::new(state))
        .nest_service("/mcp", service)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Start the MCP server over HTTP.
pub async fn serve_http(config: QualMasterConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %bind_addr, "starting QualMaster MCP server on HTTP");

    let state = setup_shared_state(config)?;
    let router = http_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(
        addr = %bind_addr,
        "listening: MCP at http://{bind_addr}/mcp, JSON-RPC at http://{bind_addr}/rpc"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
