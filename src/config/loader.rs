//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_ENDPOINT: &str = "SEARCH_ENDPOINT";
pub const ENV_SERVICE_NAME: &str = "SEARCH_SERVICE_NAME";
pub const ENV_INDEX_NAME: &str = "SEARCH_INDEX_NAME";
pub const ENV_API_VERSION: &str = "SEARCH_API_VERSION";
pub const ENV_QUERY_KEY: &str = "SEARCH_QUERY_KEY";
pub const ENV_SEMANTIC_CONFIGURATION: &str = "SEMANTIC_CONFIGURATION";
pub const ENV_STORAGE_ACCOUNT_URL: &str = "STORAGE_ACCOUNT_URL";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ASSET_ROOT: &str = "ASSET_ROOT";
pub const ENV_INDEX_FILE: &str = "INDEX_FILE";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts `std::env::var` so tests never touch the real
/// process environment. Empty values are treated as unset.
pub fn apply_env<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

    if let Some(endpoint) = get(ENV_ENDPOINT) {
        config.upstream.endpoint = Some(endpoint);
    }
    if let Some(service) = get(ENV_SERVICE_NAME) {
        config.upstream.service_name = Some(service);
    }
    if let Some(index) = get(ENV_INDEX_NAME) {
        config.upstream.index_name = Some(index);
    }
    if let Some(version) = get(ENV_API_VERSION) {
        config.upstream.api_version = version;
    }
    if let Some(key) = get(ENV_QUERY_KEY) {
        config.upstream.query_key = key;
    }
    if let Some(semantic) = get(ENV_SEMANTIC_CONFIGURATION) {
        config.client.semantic_configuration = semantic;
    }
    if let Some(storage) = get(ENV_STORAGE_ACCOUNT_URL) {
        config.client.storage_account_url = storage;
    }
    if let Some(root) = get(ENV_ASSET_ROOT) {
        config.assets.root = root;
    }
    if let Some(index_file) = get(ENV_INDEX_FILE) {
        config.assets.index_file = index_file;
    }
    if let Some(port) = get(ENV_PORT) {
        config.listener.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env {
                var: ENV_PORT,
                reason: e.to_string(),
            }
        })?;
    }

    Ok(())
}

/// Load a `.env` file into the process environment.
///
/// Variables that are already set win over the file. Without an explicit
/// path, `.env` is searched from the working directory upwards and its
/// absence is not an error. Returns the file that was loaded.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>, dotenvy::Error> {
    match path {
        Some(path) => dotenvy::from_path(path).map(|()| Some(path.to_path_buf())),
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e),
        },
    }
}

/// Load configuration: defaults, then the optional file, then the environment.
///
/// The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => RelayConfig::default(),
    };

    apply_env(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            endpoint = "https://file.example.test/search"
            query_key = "from-file"

            [client]
            semantic_configuration = "file-semantic"
            "#,
        )
        .unwrap();

        apply_env(
            &mut config,
            env(&[
                (ENV_QUERY_KEY, "from-env"),
                (ENV_STORAGE_ACCOUNT_URL, "https://storage.example.test"),
                (ENV_PORT, "8088"),
            ]),
        )
        .unwrap();

        assert_eq!(config.upstream.query_key, "from-env");
        assert_eq!(config.upstream.endpoint.as_deref(), Some("https://file.example.test/search"));
        assert_eq!(config.client.semantic_configuration, "file-semantic");
        assert_eq!(config.client.storage_account_url, "https://storage.example.test");
        assert_eq!(config.listener.port, 8088);
    }

    #[test]
    fn empty_variables_are_ignored() {
        let mut config = RelayConfig::default();
        apply_env(&mut config, env(&[(ENV_PORT, ""), (ENV_QUERY_KEY, "")])).unwrap();

        assert_eq!(config.listener.port, 3001);
        assert!(config.upstream.query_key.is_empty());
    }

    #[test]
    fn invalid_port_names_the_variable() {
        let mut config = RelayConfig::default();
        let err = apply_env(&mut config, env(&[(ENV_PORT, "eighty")])).unwrap_err();

        assert!(matches!(err, ConfigError::Env { var: ENV_PORT, .. }));
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn reads_config_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            host = "127.0.0.1"
            port = 9000

            [assets]
            root = "site"
            "#
        )
        .unwrap();

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.listener.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.assets.root, "site");
        assert_eq!(config.assets.index_file, "index.html");
    }

    #[test]
    fn dotenv_file_feeds_environment_overlay() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "# deployment settings\nSEARCH_ENDPOINT=https://dotenv.example.test/docs/search\nSEARCH_QUERY_KEY=\"dotenv key\"\nPORT=4010"
        )
        .unwrap();

        let vars: HashMap<String, String> = dotenvy::from_path_iter(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let mut config = RelayConfig::default();
        apply_env(&mut config, |var| vars.get(var).cloned()).unwrap();

        assert_eq!(
            config.upstream.endpoint.as_deref(),
            Some("https://dotenv.example.test/docs/search")
        );
        assert_eq!(config.upstream.query_key, "dotenv key");
        assert_eq!(config.listener.port, 4010);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn explicit_missing_dotenv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dotenv(Some(&dir.path().join(".env"))).unwrap_err();

        assert!(err.not_found());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nport = ").unwrap();

        assert!(matches!(read_config_file(file.path()), Err(ConfigError::Parse(_))));
    }
}
