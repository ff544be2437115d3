use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub slack: SlackConfig,
    pub llm: LlmConfig,
    pub assistant: AssistantConfig,
    pub crm: CrmConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SlackConfig {
    pub app_token: SecretString,
    pub bot_token: SecretString,
    /// User-scoped token for profile status updates; optional, approvals
    /// skip the status update when absent.
    pub user_token: Option<SecretString>,
    /// Channel that receives timesheet/leave approval cards.
    pub approvals_channel: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub default_backend: Backend,
    /// Sampling temperature sent with each completion; `None` leaves the
    /// provider default in place.
    pub temperature: Option<f32>,
    pub openai: BackendConfig,
    pub deepseek: BackendConfig,
}

impl LlmConfig {
    pub fn endpoint(&self, backend: Backend) -> &BackendConfig {
        match backend {
            Backend::OpenAi => &self.openai,
            Backend::DeepSeek => &self.deepseek,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct AssistantConfig {
    /// Most recent thread entries kept as model context; `0` keeps the full
    /// thread.
    pub history_window: usize,
    pub documents_enabled: bool,
}

#[derive(Clone, Debug)]
pub struct CrmConfig {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub health_check_port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// A configured language-model completion backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "deepseek")]
    DeepSeek,
}

impl Backend {
    pub const SUPPORTED: &'static [Backend] = &[Backend::OpenAi, Backend::DeepSeek];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
        }
    }

    /// Comma-joined names of the supported set, for user-facing messages.
    pub fn valid_set() -> String {
        Self::SUPPORTED.iter().map(Backend::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Backend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "deepseek" => Ok(Self::DeepSeek),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm backend `{other}` (expected openai|deepseek)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
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

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub default_backend: Option<Backend>,
    pub slack_app_token: Option<String>,
    pub slack_bot_token: Option<String>,
    pub slack_user_token: Option<String>,
    pub approvals_channel: Option<String>,
    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub history_window: Option<usize>,
    pub crm_enabled: Option<bool>,
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
            slack: SlackConfig {
                app_token: String::new().into(),
                bot_token: String::new().into(),
                user_token: None,
                approvals_channel: None,
            },
            llm: LlmConfig {
                default_backend: Backend::OpenAi,
                temperature: Some(0.7),
                openai: BackendConfig {
                    api_key: None,
                    base_url: "https://api.openai.com/v1".to_string(),
                    model: "gpt-4o-mini".to_string(),
                    timeout_secs: 60,
                },
                deepseek: BackendConfig {
                    api_key: None,
                    base_url: "https://api.deepseek.com/v1".to_string(),
                    model: "deepseek-chat".to_string(),
                    timeout_secs: 60,
                },
            },
            assistant: AssistantConfig { history_window: 10, documents_enabled: true },
            crm: CrmConfig {
                enabled: false,
                base_url: None,
                client_id: None,
                client_secret: None,
                username: None,
                password: None,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                health_check_port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("suplo.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(slack) = patch.slack {
            if let Some(app_token_value) = slack.app_token {
                self.slack.app_token = secret_value(app_token_value);
            }
            if let Some(bot_token_value) = slack.bot_token {
                self.slack.bot_token = secret_value(bot_token_value);
            }
            if let Some(user_token_value) = slack.user_token {
                self.slack.user_token = Some(secret_value(user_token_value));
            }
            if let Some(approvals_channel) = slack.approvals_channel {
                self.slack.approvals_channel = Some(approvals_channel);
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(default_backend) = llm.default_backend {
                self.llm.default_backend = default_backend;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = Some(temperature);
            }
            if let Some(openai) = llm.openai {
                apply_backend_patch(&mut self.llm.openai, openai);
            }
            if let Some(deepseek) = llm.deepseek {
                apply_backend_patch(&mut self.llm.deepseek, deepseek);
            }
        }

        if let Some(assistant) = patch.assistant {
            if let Some(history_window) = assistant.history_window {
                self.assistant.history_window = history_window;
            }
            if let Some(documents_enabled) = assistant.documents_enabled {
                self.assistant.documents_enabled = documents_enabled;
            }
        }

        if let Some(crm) = patch.crm {
            if let Some(enabled) = crm.enabled {
                self.crm.enabled = enabled;
            }
            if let Some(base_url) = crm.base_url {
                self.crm.base_url = Some(base_url);
            }
            if let Some(client_id) = crm.client_id {
                self.crm.client_id = Some(client_id);
            }
            if let Some(client_secret_value) = crm.client_secret {
                self.crm.client_secret = Some(secret_value(client_secret_value));
            }
            if let Some(username) = crm.username {
                self.crm.username = Some(username);
            }
            if let Some(password_value) = crm.password {
                self.crm.password = Some(secret_value(password_value));
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(health_check_port) = server.health_check_port {
                self.server.health_check_port = health_check_port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
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
        if let Some(value) = read_env("SUPLO_SLACK_APP_TOKEN") {
            self.slack.app_token = secret_value(value);
        }
        if let Some(value) = read_env("SUPLO_SLACK_BOT_TOKEN") {
            self.slack.bot_token = secret_value(value);
        }
        if let Some(value) = read_env("SUPLO_SLACK_USER_TOKEN") {
            self.slack.user_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("SUPLO_SLACK_APPROVALS_CHANNEL") {
            self.slack.approvals_channel = Some(value);
        }

        if let Some(value) = read_env("SUPLO_LLM_DEFAULT_BACKEND") {
            self.llm.default_backend = value.parse()?;
        }
        if let Some(value) = read_env("SUPLO_LLM_TEMPERATURE") {
            self.llm.temperature = Some(parse_f32("SUPLO_LLM_TEMPERATURE", &value)?);
        }
        if let Some(value) = read_env("SUPLO_OPENAI_API_KEY") {
            self.llm.openai.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("SUPLO_OPENAI_BASE_URL") {
            self.llm.openai.base_url = value;
        }
        if let Some(value) = read_env("SUPLO_OPENAI_MODEL") {
            self.llm.openai.model = value;
        }
        if let Some(value) = read_env("SUPLO_DEEPSEEK_API_KEY") {
            self.llm.deepseek.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("SUPLO_DEEPSEEK_BASE_URL") {
            self.llm.deepseek.base_url = value;
        }
        if let Some(value) = read_env("SUPLO_DEEPSEEK_MODEL") {
            self.llm.deepseek.model = value;
        }

        if let Some(value) = read_env("SUPLO_ASSISTANT_HISTORY_WINDOW") {
            self.assistant.history_window =
                parse_usize("SUPLO_ASSISTANT_HISTORY_WINDOW", &value)?;
        }
        if let Some(value) = read_env("SUPLO_ASSISTANT_DOCUMENTS_ENABLED") {
            self.assistant.documents_enabled =
                parse_bool("SUPLO_ASSISTANT_DOCUMENTS_ENABLED", &value)?;
        }

        if let Some(value) = read_env("SUPLO_CRM_ENABLED") {
            self.crm.enabled = parse_bool("SUPLO_CRM_ENABLED", &value)?;
        }
        if let Some(value) = read_env("SUPLO_CRM_BASE_URL") {
            self.crm.base_url = Some(value);
        }
        if let Some(value) = read_env("SUPLO_CRM_CLIENT_ID") {
            self.crm.client_id = Some(value);
        }
        if let Some(value) = read_env("SUPLO_CRM_CLIENT_SECRET") {
            self.crm.client_secret = Some(secret_value(value));
        }
        if let Some(value) = read_env("SUPLO_CRM_USERNAME") {
            self.crm.username = Some(value);
        }
        if let Some(value) = read_env("SUPLO_CRM_PASSWORD") {
            self.crm.password = Some(secret_value(value));
        }

        if let Some(value) = read_env("SUPLO_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SUPLO_SERVER_HEALTH_CHECK_PORT") {
            self.server.health_check_port = parse_u16("SUPLO_SERVER_HEALTH_CHECK_PORT", &value)?;
        }
        if let Some(value) = read_env("SUPLO_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SUPLO_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level = read_env("SUPLO_LOGGING_LEVEL").or_else(|| read_env("SUPLO_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("SUPLO_LOGGING_FORMAT").or_else(|| read_env("SUPLO_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(default_backend) = overrides.default_backend {
            self.llm.default_backend = default_backend;
        }
        if let Some(slack_app_token) = overrides.slack_app_token {
            self.slack.app_token = secret_value(slack_app_token);
        }
        if let Some(slack_bot_token) = overrides.slack_bot_token {
            self.slack.bot_token = secret_value(slack_bot_token);
        }
        if let Some(slack_user_token) = overrides.slack_user_token {
            self.slack.user_token = Some(secret_value(slack_user_token));
        }
        if let Some(approvals_channel) = overrides.approvals_channel {
            self.slack.approvals_channel = Some(approvals_channel);
        }
        if let Some(openai_api_key) = overrides.openai_api_key {
            self.llm.openai.api_key = Some(secret_value(openai_api_key));
        }
        if let Some(deepseek_api_key) = overrides.deepseek_api_key {
            self.llm.deepseek.api_key = Some(secret_value(deepseek_api_key));
        }
        if let Some(history_window) = overrides.history_window {
            self.assistant.history_window = history_window;
        }
        if let Some(crm_enabled) = overrides.crm_enabled {
            self.crm.enabled = crm_enabled;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_slack(&self.slack)?;
        validate_llm(&self.llm)?;
        validate_crm(&self.crm)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn apply_backend_patch(config: &mut BackendConfig, patch: BackendPatch) {
    if let Some(api_key_value) = patch.api_key {
        config.api_key = Some(secret_value(api_key_value));
    }
    if let Some(base_url) = patch.base_url {
        config.base_url = base_url;
    }
    if let Some(model) = patch.model {
        config.model = model;
    }
    if let Some(timeout_secs) = patch.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("suplo.toml"), PathBuf::from("config/suplo.toml")]
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

fn validate_slack(slack: &SlackConfig) -> Result<(), ConfigError> {
    let app_token = slack.app_token.expose_secret();
    if app_token.is_empty() {
        return Err(ConfigError::Validation(
            "slack.app_token is required. Get it from https://api.slack.com/apps > Your App > Basic Information > App-Level Tokens".to_string()
        ));
    }
    if !app_token.starts_with("xapp-") {
        let hint = if app_token.starts_with("xoxb-") {
            " (hint: you may have used the bot token instead of the app token)"
        } else {
            ""
        };
        return Err(ConfigError::Validation(format!(
            "slack.app_token must start with `xapp-`{hint}. Get it from https://api.slack.com/apps"
        )));
    }

    let bot_token = slack.bot_token.expose_secret();
    if bot_token.is_empty() {
        return Err(ConfigError::Validation(
            "slack.bot_token is required. Get it from https://api.slack.com/apps > Your App > OAuth & Permissions > Bot User OAuth Token".to_string()
        ));
    }
    if !bot_token.starts_with("xoxb-") {
        let hint = if bot_token.starts_with("xapp-") {
            " (hint: you may have used the app token instead of the bot token)"
        } else {
            ""
        };
        return Err(ConfigError::Validation(format!(
            "slack.bot_token must start with `xoxb-`{hint}. Get it from https://api.slack.com/apps"
        )));
    }

    if let Some(user_token) = &slack.user_token {
        if !user_token.expose_secret().starts_with("xoxp-") {
            return Err(ConfigError::Validation(
                "slack.user_token must start with `xoxp-` (user OAuth token)".to_string(),
            ));
        }
    }

    if let Some(approvals_channel) = &slack.approvals_channel {
        if approvals_channel.trim().is_empty() {
            return Err(ConfigError::Validation(
                "slack.approvals_channel must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if let Some(temperature) = llm.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Validation(
                "llm.temperature must be in range 0.0..=2.0".to_string(),
            ));
        }
    }

    for backend in Backend::SUPPORTED {
        let endpoint = llm.endpoint(*backend);
        if endpoint.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "llm.{backend}.base_url must not be empty"
            )));
        }
        if endpoint.model.trim().is_empty() {
            return Err(ConfigError::Validation(format!("llm.{backend}.model must not be empty")));
        }
        if endpoint.timeout_secs == 0 || endpoint.timeout_secs > 300 {
            return Err(ConfigError::Validation(format!(
                "llm.{backend}.timeout_secs must be in range 1..=300"
            )));
        }
    }

    let default_endpoint = llm.endpoint(llm.default_backend);
    let missing_key = default_endpoint
        .api_key
        .as_ref()
        .map(|value| value.expose_secret().trim().is_empty())
        .unwrap_or(true);
    if missing_key {
        return Err(ConfigError::Validation(format!(
            "llm.{}.api_key is required for the default backend",
            llm.default_backend
        )));
    }

    Ok(())
}

fn validate_crm(crm: &CrmConfig) -> Result<(), ConfigError> {
    if !crm.enabled {
        return Ok(());
    }

    let base_url_ok = crm
        .base_url
        .as_deref()
        .map(|url| url.starts_with("http://") || url.starts_with("https://"))
        .unwrap_or(false);
    if !base_url_ok {
        return Err(ConfigError::Validation(
            "crm.base_url must start with http:// or https:// when crm.enabled is true"
                .to_string(),
        ));
    }

    let complete = crm.client_id.is_some()
        && crm.client_secret.is_some()
        && crm.username.is_some()
        && crm.password.is_some();
    if !complete {
        return Err(ConfigError::Validation(
            "crm.enabled is true but client_id/client_secret/username/password are incomplete"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.health_check_port == 0 {
        return Err(ConfigError::Validation(
            "server.health_check_port must be greater than zero".to_string(),
        ));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
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

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
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

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.parse::<f32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    slack: Option<SlackPatch>,
    llm: Option<LlmPatch>,
    assistant: Option<AssistantPatch>,
    crm: Option<CrmPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SlackPatch {
    app_token: Option<String>,
    bot_token: Option<String>,
    user_token: Option<String>,
    approvals_channel: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    default_backend: Option<Backend>,
    temperature: Option<f32>,
    openai: Option<BackendPatch>,
    deepseek: Option<BackendPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AssistantPatch {
    history_window: Option<usize>,
    documents_enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct CrmPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    health_check_port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
