use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub catalog: CatalogConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub scoring: ScoringMode,
    pub score_threshold: u8,
    pub max_candidates: usize,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Path to the JSON catalog file. When unset, the built-in demo
    /// catalog is used.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub exit_keywords: Vec<String>,
    pub history_limit: usize,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Deterministic substring search only.
    Off,
    /// Per-candidate relevance scoring through the hosted model.
    Model,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub llm_model: Option<String>,
    pub llm_api_key: Option<String>,
    pub catalog_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                api_key: None,
                base_url: "https://api.siliconflow.cn/v1".to_string(),
                model: "deepseek-ai/DeepSeek-V2.5".to_string(),
                timeout_secs: 60,
                scoring: ScoringMode::Off,
                score_threshold: 1,
                max_candidates: 25,
            },
            catalog: CatalogConfig { path: None },
            chat: ChatConfig {
                exit_keywords: vec!["exit".to_string(), "quit".to_string()],
                history_limit: 20,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for ScoringMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "model" => Ok(Self::Model),
            other => Err(ConfigError::Validation(format!(
                "unsupported scoring mode `{other}` (expected off|model)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("clerk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(llm) = patch.llm {
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
            if let Some(scoring) = llm.scoring {
                self.llm.scoring = scoring;
            }
            if let Some(score_threshold) = llm.score_threshold {
                self.llm.score_threshold = score_threshold;
            }
            if let Some(max_candidates) = llm.max_candidates {
                self.llm.max_candidates = max_candidates;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(PathBuf::from(path));
            }
        }

        if let Some(chat) = patch.chat {
            if let Some(exit_keywords) = chat.exit_keywords {
                self.chat.exit_keywords = exit_keywords;
            }
            if let Some(history_limit) = chat.history_limit {
                self.chat.history_limit = history_limit;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        // DEEPSEEK_API_KEY is the historical name; the prefixed form wins.
        let api_key = read_env("CLERK_LLM_API_KEY").or_else(|| read_env("DEEPSEEK_API_KEY"));
        if let Some(value) = api_key {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("CLERK_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("CLERK_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("CLERK_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("CLERK_LLM_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("CLERK_LLM_SCORING") {
            self.llm.scoring = value.parse()?;
        }
        if let Some(value) = read_env("CLERK_LLM_SCORE_THRESHOLD") {
            self.llm.score_threshold = parse_u8("CLERK_LLM_SCORE_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("CLERK_LLM_MAX_CANDIDATES") {
            self.llm.max_candidates = parse_usize("CLERK_LLM_MAX_CANDIDATES", &value)?;
        }

        if let Some(value) = read_env("CLERK_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("CLERK_CHAT_EXIT_KEYWORDS") {
            let keywords = value
                .split(',')
                .map(|keyword| keyword.trim().to_string())
                .filter(|keyword| !keyword.is_empty())
                .collect::<Vec<_>>();
            if !keywords.is_empty() {
                self.chat.exit_keywords = keywords;
            }
        }
        if let Some(value) = read_env("CLERK_CHAT_HISTORY_LIMIT") {
            self.chat.history_limit = parse_usize("CLERK_CHAT_HISTORY_LIMIT", &value)?;
        }

        let log_level = read_env("CLERK_LOGGING_LEVEL").or_else(|| read_env("CLERK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("CLERK_LOGGING_FORMAT").or_else(|| read_env("CLERK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_llm(&self.llm)?;
        validate_chat(&self.chat)?;
        validate_logging(&self.logging)?;
        Ok(())
    }

    /// The API key is deliberately not part of `validate`: offline commands
    /// (catalog search, config inspection) work without one. Callers that
    /// talk to the model check it here at the point of use.
    pub fn require_api_key(&self) -> Result<&SecretString, ConfigError> {
        match &self.llm.api_key {
            Some(key) if !key.expose_secret().trim().is_empty() => Ok(key),
            _ => Err(ConfigError::Validation(
                "llm.api_key is required to talk to the model. Set CLERK_LLM_API_KEY (or DEEPSEEK_API_KEY)."
                    .to_string(),
            )),
        }
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("clerk.toml"), PathBuf::from("config/clerk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.base_url.trim().is_empty() {
        return Err(ConfigError::Validation("llm.base_url must not be empty".to_string()));
    }
    if !llm.base_url.starts_with("http://") && !llm.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "llm.base_url must start with http:// or https://".to_string(),
        ));
    }

    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }

    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if llm.score_threshold > 10 {
        return Err(ConfigError::Validation(
            "llm.score_threshold must be in range 0..=10".to_string(),
        ));
    }

    if llm.max_candidates == 0 || llm.max_candidates > 100 {
        return Err(ConfigError::Validation(
            "llm.max_candidates must be in range 1..=100".to_string(),
        ));
    }

    Ok(())
}

fn validate_chat(chat: &ChatConfig) -> Result<(), ConfigError> {
    if chat.exit_keywords.is_empty() {
        return Err(ConfigError::Validation(
            "chat.exit_keywords must contain at least one keyword".to_string(),
        ));
    }

    if chat.history_limit == 0 || chat.history_limit > 200 {
        return Err(ConfigError::Validation(
            "chat.history_limit must be in range 1..=200".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value.parse::<u8>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    llm: Option<LlmPatch>,
    catalog: Option<CatalogPatch>,
    chat: Option<ChatPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    scoring: Option<ScoringMode>,
    score_threshold: Option<u8>,
    max_candidates: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatPatch {
    exit_keywords: Option<Vec<String>>,
    history_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, ScoringMode};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_without_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["CLERK_LLM_API_KEY", "DEEPSEEK_API_KEY"]);

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.llm.api_key.is_none(), "api key should default to unset")?;
        ensure(
            matches!(config.llm.scoring, ScoringMode::Off),
            "scoring should default to off",
        )?;
        ensure(config.catalog.path.is_none(), "catalog path should default to builtin")?;
        ensure(
            config.chat.exit_keywords == vec!["exit".to_string(), "quit".to_string()],
            "default exit keywords should be exit/quit",
        )?;
        ensure(config.require_api_key().is_err(), "missing api key should fail at point of use")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_CLERK_API_KEY", "sk-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("clerk.toml");
            fs::write(
                &path,
                r#"
[llm]
api_key = "${TEST_CLERK_API_KEY}"
model = "deepseek-chat"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            let key = config
                .require_api_key()
                .map_err(|err| format!("api key should be present: {err}"))?;
            ensure(key.expose_secret() == "sk-from-env", "api key should come from environment")?;
            ensure(config.llm.model == "deepseek-chat", "model should come from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_CLERK_API_KEY"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CLERK_LLM_MODEL", "model-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("clerk.toml");
            fs::write(
                &path,
                r#"
[llm]
model = "model-from-file"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.llm.model == "model-from-env", "env model should win over file")?;
            ensure(config.logging.level == "debug", "override log level should win over file")?;
            Ok(())
        })();

        clear_vars(&["CLERK_LLM_MODEL"]);
        result
    }

    #[test]
    fn legacy_api_key_variable_is_honored() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("DEEPSEEK_API_KEY", "sk-legacy");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let key = config
                .require_api_key()
                .map_err(|err| format!("api key should be present: {err}"))?;
            ensure(key.expose_secret() == "sk-legacy", "legacy variable should be read")
        })();

        clear_vars(&["DEEPSEEK_API_KEY"]);
        result
    }

    #[test]
    fn validation_rejects_bad_scoring_threshold() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CLERK_LLM_SCORE_THRESHOLD", "11");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("score_threshold")
            );
            ensure(has_message, "validation failure should mention score_threshold")
        })();

        clear_vars(&["CLERK_LLM_SCORE_THRESHOLD"]);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CLERK_LLM_API_KEY", "sk-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("sk-secret-value"), "debug output should not contain api key")?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })();

        clear_vars(&["CLERK_LLM_API_KEY"]);
        result
    }

    #[test]
    fn exit_keywords_env_override_is_split_on_commas() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CLERK_CHAT_EXIT_KEYWORDS", "bye, farewell ,");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            ensure(
                config.chat.exit_keywords == vec!["bye".to_string(), "farewell".to_string()],
                "exit keywords should be split and trimmed",
            )
        })();

        clear_vars(&["CLERK_CHAT_EXIT_KEYWORDS"]);
        result
    }

    #[test]
    fn required_file_missing_is_an_error() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            require_file: true,
            ..LoadOptions::default()
        });
        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }
}
