//! Integration tests for layered configuration loading

use blogsmith::config::{ConfigLoader, DEFAULT_BASE_URL, DEFAULT_TEXT_MODEL};
use blogsmith::types::Tone;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

// Environment variables are process-wide; serialize every test that touches them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const TOUCHED_VARS: [&str; 6] = [
    "BLOGSMITH_ENV",
    "BLOGSMITH_TEXT_API_KEY",
    "BLOGSMITH_IMAGE_API_KEY",
    "BLOGSMITH__PROVIDERS__TEXT__MODEL",
    "BLOGSMITH__GENERATION__LANGUAGE",
    "XDG_CONFIG_HOME",
];

/// Clears the touched variables and points the global config at an empty directory.
struct EnvGuard {
    _lock: std::sync::MutexGuard<'static, ()>,
    _config_home: TempDir,
}

impl EnvGuard {
    fn new() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for var in TOUCHED_VARS {
            std::env::remove_var(var);
        }
        let config_home = TempDir::new().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", config_home.path());
        Self {
            _lock: lock,
            _config_home: config_home,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in TOUCHED_VARS {
            std::env::remove_var(var);
        }
    }
}

fn write_workspace_file(root: &Path, name: &str, contents: &str) {
    let dir = root.join("config");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_defaults_without_any_files() {
    let _env = EnvGuard::new();
    let workspace = TempDir::new().unwrap();

    let config = ConfigLoader::load(workspace.path()).unwrap();
    assert_eq!(config.providers.text.model, DEFAULT_TEXT_MODEL);
    assert_eq!(config.providers.text.base_url, DEFAULT_BASE_URL);
    assert!(!config.providers.text.has_api_key());
    assert_eq!(config.generation.tone().unwrap(), Tone::Expert);
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_file_and_env_specific_file() {
    let _env = EnvGuard::new();
    let workspace = TempDir::new().unwrap();
    write_workspace_file(
        workspace.path(),
        "config.toml",
        r#"
[providers.text]
model = "gemini-base"
api_key = "file-key"

[generation]
language = "Portuguese"
default_tone = "casual"
"#,
    );
    write_workspace_file(
        workspace.path(),
        "staging.toml",
        r#"
[providers.text]
model = "gemini-staging"
"#,
    );

    let config = ConfigLoader::load(workspace.path()).unwrap();
    assert_eq!(config.providers.text.model, "gemini-base");
    assert_eq!(config.providers.text.api_key, "file-key");
    assert_eq!(config.generation.language, "Portuguese");
    assert_eq!(config.generation.tone().unwrap(), Tone::Casual);

    std::env::set_var("BLOGSMITH_ENV", "staging");
    let config = ConfigLoader::load(workspace.path()).unwrap();
    assert_eq!(config.providers.text.model, "gemini-staging");
    assert_eq!(config.providers.text.api_key, "file-key");
}

#[test]
fn test_environment_overrides_files() {
    let _env = EnvGuard::new();
    let workspace = TempDir::new().unwrap();
    write_workspace_file(
        workspace.path(),
        "config.toml",
        r#"
[providers.text]
model = "gemini-file"
api_key = "file-key"
"#,
    );

    std::env::set_var("BLOGSMITH__PROVIDERS__TEXT__MODEL", "gemini-env");
    std::env::set_var("BLOGSMITH__GENERATION__LANGUAGE", "Spanish");
    std::env::set_var("BLOGSMITH_TEXT_API_KEY", "env-text-key");
    std::env::set_var("BLOGSMITH_IMAGE_API_KEY", "env-image-key");

    let config = ConfigLoader::load(workspace.path()).unwrap();
    assert_eq!(config.providers.text.model, "gemini-env");
    assert_eq!(config.generation.language, "Spanish");
    assert_eq!(config.providers.text.api_key, "env-text-key");
    assert_eq!(config.providers.image.api_key, "env-image-key");
}

#[test]
fn test_global_file_is_below_workspace_file() {
    let _env = EnvGuard::new();
    let global_home = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", global_home.path());
    let global_dir = global_home.path().join("blogsmith");
    std::fs::create_dir_all(&global_dir).unwrap();
    std::fs::write(
        global_dir.join("config.toml"),
        r#"
[providers.image]
api_key = "global-image-key"

[providers.text]
model = "gemini-global"
"#,
    )
    .unwrap();

    let workspace = TempDir::new().unwrap();
    write_workspace_file(
        workspace.path(),
        "config.toml",
        r#"
[providers.text]
model = "gemini-workspace"
"#,
    );

    assert_eq!(
        ConfigLoader::global_config_path().unwrap(),
        global_dir.join("config.toml")
    );
    let config = ConfigLoader::load(workspace.path()).unwrap();
    assert_eq!(config.providers.text.model, "gemini-workspace");
    assert_eq!(config.providers.image.api_key, "global-image-key");
}

#[test]
fn test_load_from_explicit_file() {
    let _env = EnvGuard::new();
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("blogsmith.toml");
    std::fs::write(
        &config_file,
        r#"
[providers.text]
base_url = "http://localhost:8080/v1beta"
timeout_secs = 30

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.providers.text.base_url, "http://localhost:8080/v1beta");
    assert_eq!(config.providers.text.timeout_secs, Some(30));
    assert_eq!(config.providers.text.model, DEFAULT_TEXT_MODEL);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let _env = EnvGuard::new();
    let temp_dir = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&temp_dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_invalid_values_surface_in_validation() {
    let _env = EnvGuard::new();
    let workspace = TempDir::new().unwrap();
    write_workspace_file(
        workspace.path(),
        "config.toml",
        r#"
[providers.image]
base_url = "ftp://example.test"

[generation]
default_tone = "shouty"
"#,
    );

    let config = ConfigLoader::load(workspace.path()).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(rendered.iter().any(|e| e.starts_with("Provider 'image'")));
    assert!(rendered.iter().any(|e| e.starts_with("Generation")));
}

#[test]
fn test_debug_output_never_shows_credentials() {
    let _env = EnvGuard::new();
    std::env::set_var("BLOGSMITH_TEXT_API_KEY", "super-secret-value");
    let workspace = TempDir::new().unwrap();

    let config = ConfigLoader::load(workspace.path()).unwrap();
    let debug = format!("{:?}", config);
    assert!(!debug.contains("super-secret-value"));
    assert!(debug.contains("<redacted>"));
}
