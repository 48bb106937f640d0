use qualmaster::config::QualMasterConfig;
use qualmaster::server::setup_shared_state;
use tempfile::TempDir;

const KNOWLEDGE: &str = include_str!("../data/knowledge.toml");

fn offline_config(tmp: &TempDir) -> QualMasterConfig {
    let mut config = QualMasterConfig::default();
    config.index.db_path = tmp.path().join("index.db").to_string_lossy().into_owned();
    config
}

#[test]
fn knowledge_override_replaces_builtin_tables() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("knowledge.toml");
    std::fs::write(&path, KNOWLEDGE.replacen("version = \"1.0.0\"", "version = \"2.0.0-local\"", 1))
        .unwrap();

    let mut config = offline_config(&tmp);
    config.knowledge.path = path.to_string_lossy().into_owned();

    let state = setup_shared_state(config).unwrap();
    assert_eq!(state.knowledge.version, "2.0.0-local");
    assert!(!state.semantic.is_ready());
}

#[test]
fn broken_knowledge_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("knowledge.toml");
    std::fs::write(&path, "version = \"1.0.0\"\n[[paradigms]]\nkey = ").unwrap();

    let mut config = offline_config(&tmp);
    config.knowledge.path = path.to_string_lossy().into_owned();

    let err = setup_shared_state(config).err().unwrap();
    assert!(format!("{err:#}").contains("failed to load knowledge base"));
}

#[test]
fn missing_rubric_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let mut config = offline_config(&tmp);
    config.knowledge.rubric_path = tmp.path().join("nope.toml").to_string_lossy().into_owned();

    let err = setup_shared_state(config).err().unwrap();
    assert!(format!("{err:#}").contains("failed to load rubric"));
}

#[test]
fn config_file_sections_are_optional() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[retrieval]\nsemantic_top_k = 5\n").unwrap();

    let config = QualMasterConfig::load_from(&path).unwrap();
    assert_eq!(config.retrieval.semantic_top_k, 5);
    assert_eq!(config.embedding.model, "all-MiniLM-L6-v2");
    assert_eq!(config.server.port, 8770);
}
