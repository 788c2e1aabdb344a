//! Configuration models for topic-updater.
//!
//! All I^R (resolvable ignorance) is parameterized here.
//! The user resolves these unknowns once at startup: CLI flags win over the
//! config file, which wins over the environment (`.env` included).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for topic-updater.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Supabase connection settings
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// CSV layout
    #[serde(default)]
    pub input: InputConfig,
}

/// Supabase REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL (e.g. "https://xyz.supabase.co"); `${VAR}` is expanded
    #[serde(default)]
    pub url: Option<String>,

    /// API key; `${VAR}` is expanded
    #[serde(default)]
    pub key: Option<String>,

    /// Environment variable consulted when `url` is not set
    #[serde(default = "default_url_env")]
    pub url_env: String,

    /// Environment variable consulted when `key` is not set
    #[serde(default = "default_key_env")]
    pub key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_url_env() -> String {
    "SUPABASE_URL".to_string()
}

fn default_key_env() -> String {
    "SUPABASE_KEY".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            url_env: default_url_env(),
            key_env: default_key_env(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Column names of the input CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Header of the primary key column
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Header of the column holding the list literal
    #[serde(default = "default_list_column")]
    pub list_column: String,
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_list_column() -> String {
    "topics_list".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            list_column: default_list_column(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// B_i(file exists) → Result
    /// B_i(file is valid TOML) → Result
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Apply explicit command-line values on top of the loaded configuration.
    pub fn apply_overrides(&mut self, url: Option<String>, key: Option<String>) {
        if url.is_some() {
            self.supabase.url = url;
        }
        if key.is_some() {
            self.supabase.key = key;
        }
    }
}

impl SupabaseConfig {
    /// Resolve the project URL from config or environment.
    ///
    /// B_i(url available) → Result
    pub fn resolve_url(&self) -> Result<String, ConfigError> {
        resolve_value(self.url.as_deref(), "supabase_url", &self.url_env)
    }

    /// Resolve the API key from config or environment.
    ///
    /// B_i(api key available) → Result
    pub fn resolve_key(&self) -> Result<String, ConfigError> {
        resolve_value(self.key.as_deref(), "supabase_key", &self.key_env)
    }
}

fn resolve_value(explicit: Option<&str>, name: &str, env_var: &str) -> Result<String, ConfigError> {
    let value = match explicit {
        Some(v) => expand_env_vars(v),
        None => std::env::var(env_var).unwrap_or_default(),
    };

    let value = value.trim();
    // An unexpanded placeholder means the variable was never set
    if value.is_empty() || value.starts_with("${") {
        return Err(ConfigError::MissingCredential {
            name: name.to_string(),
            env_var: env_var.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Expand environment variables in a string.
///
/// Supports ${VAR_NAME} syntax.
/// If the variable is not set, the placeholder is left unchanged.
pub fn expand_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let Ok(re) = regex::Regex::new(r"\$\{([^}]+)\}") else {
        return result;
    };

    for cap in re.captures_iter(s) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

/// Configuration errors.
///
/// Epistemic origin:
/// - B_i falsified: File not found, parse error
/// - I^B materialized: Missing required values
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Missing {name}: pass --{name}, set it in the config file, or set {env_var}")]
    MissingCredential { name: String, env_var: String },

    #[error("Invalid {name}: {reason}")]
    InvalidCredential { name: String, reason: String },

    #[error("Invalid Supabase URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.input.id_column, "id");
        assert_eq!(config.input.list_column, "topics_list");
        assert_eq!(config.supabase.url_env, "SUPABASE_URL");
        assert_eq!(config.supabase.key_env, "SUPABASE_KEY");
        assert_eq!(config.supabase.timeout_secs, 30);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[supabase]
url = "https://example.supabase.co"
timeout_secs = 5

[input]
list_column = "ai_topics_list"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config.supabase.url.as_deref(),
            Some("https://example.supabase.co")
        );
        assert_eq!(config.supabase.timeout_secs, 5);
        assert_eq!(config.input.id_column, "id");
        assert_eq!(config.input.list_column, "ai_topics_list");
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[supabase\nurl = ").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = Config::default();
        config.supabase.url = Some("https://from-file.supabase.co".to_string());
        config.supabase.key = Some("file-key".to_string());

        config.apply_overrides(Some("https://from-cli.supabase.co".to_string()), None);

        assert_eq!(
            config.supabase.resolve_url().unwrap(),
            "https://from-cli.supabase.co"
        );
        assert_eq!(config.supabase.resolve_key().unwrap(), "file-key");
    }

    #[test]
    fn test_resolve_falls_back_to_env_var() {
        let supabase = SupabaseConfig {
            url_env: "TOPIC_UPDATER_TEST_URL_FALLBACK".to_string(),
            ..Default::default()
        };
        // SAFETY: the variable name is unique to this test
        unsafe { std::env::set_var("TOPIC_UPDATER_TEST_URL_FALLBACK", "https://env.supabase.co") };
        assert_eq!(supabase.resolve_url().unwrap(), "https://env.supabase.co");
    }

    #[test]
    fn test_missing_credential() {
        let supabase = SupabaseConfig {
            key_env: "TOPIC_UPDATER_TEST_KEY_UNSET".to_string(),
            ..Default::default()
        };
        let err = supabase.resolve_key().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential { ref env_var, .. }
                if env_var == "TOPIC_UPDATER_TEST_KEY_UNSET"
        ));
    }

    #[test]
    fn test_unexpanded_placeholder_is_missing() {
        let supabase = SupabaseConfig {
            key: Some("${TOPIC_UPDATER_TEST_PLACEHOLDER_UNSET}".to_string()),
            ..Default::default()
        };
        assert!(supabase.resolve_key().is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: the variable name is unique to this test
        unsafe { std::env::set_var("TOPIC_UPDATER_TEST_EXPAND", "abc") };
        assert_eq!(
            expand_env_vars("key-${TOPIC_UPDATER_TEST_EXPAND}-${TOPIC_UPDATER_TEST_NOPE}"),
            "key-abc-${TOPIC_UPDATER_TEST_NOPE}"
        );
    }
}
