//! Qualitative research methodology assistant served over MCP.
//!
//! QualMaster answers questions about qualitative research paradigms,
//! traditions, coding methods, quality criteria and journal expectations,
//! scores a study description against Lincoln & Guba and Tracy rubrics, and
//! supports conceptual paper writing (propositions, section reviews, R&R
//! responses).
//!
//! # Architecture
//!
//! - **Knowledge**: TOML tables compiled into the binary, overridable from disk
//! - **Scoring**: deterministic keyword rubric with synonym normalization
//! - **Semantic search**: optional [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   index over the rendered corpus, embedded locally with all-MiniLM-L6-v2
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP, plus a plain
//!   JSON-RPC endpoint in HTTP mode
//!
//! # Modules
//!
//! - [`config`]: configuration from `~/.qualmaster/config.toml` and environment
//! - [`knowledge`]: knowledge tables, lookups, exact search, writing templates
//! - [`rubric`]: quality rubric and the assessment scorer
//! - [`semantic`]: vector index build and query, with a fail-soft fallback
//! - [`tools`]: the MCP tool catalog

pub mod config;
pub mod db;
pub mod embedding;
pub mod knowledge;
pub mod rpc;
pub mod rubric;
pub mod semantic;
pub mod server;
pub mod tools;
