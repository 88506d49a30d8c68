use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::services::llm::LLMProviderKind;
use crate::utils::StringExt;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub cors: CorsConfig,
    /// Raise the log filter to `debug` (legacy `DEBUG=true`)
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Model provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LLMProviderKind,
    pub api_key: Option<String>,
    /// Model name, empty selects the provider default
    pub model: String,
    /// API base URL, empty selects the provider default
    pub api_base: String,
    /// Request timeout in seconds (accepts "30s", "2m")
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl LlmConfig {
    pub fn effective_model(&self) -> String {
        if self.model.trim().is_empty() {
            self.provider.default_model().to_string()
        } else {
            self.model.trim().to_string()
        }
    }

    pub fn effective_api_base(&self) -> String {
        if self.api_base.trim().is_empty() {
            self.provider.default_api_base().to_string()
        } else {
            self.api_base.trim().to_string()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; a single "*" allows any origin
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_permissive(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }

    fn add_origin(&mut self, origin: &str) {
        let origin = origin.trim().trim_end_matches('/');
        if !origin.is_empty() && !self.allowed_origins.iter().any(|o| o == origin) {
            self.allowed_origins.push(origin.to_string());
        }
    }
}

/// Command line arguments for configuration overrides
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sqlgen")]
#[command(version, about = "sqlgen - natural language to SQL service")]
pub struct CommandLineArgs {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Server host (overrides config file)
    #[arg(long, value_name = "HOST")]
    pub server_host: Option<String>,

    /// Server port (overrides config file)
    #[arg(long, value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Logging level (overrides config file, e.g., "info,sqlgen=debug")
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Model provider: gemini or openai (overrides config file)
    #[arg(long, value_name = "PROVIDER")]
    pub llm_provider: Option<String>,

    /// Model name (overrides config file)
    #[arg(long, value_name = "MODEL")]
    pub llm_model: Option<String>,

    /// Model request timeout (overrides config file, e.g., "30s", "2m")
    #[arg(long, value_name = "DURATION")]
    pub llm_timeout: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Config {
    /// Load configuration with command line, environment variable, and file support
    ///
    /// Loading order (priority from highest to lowest):
    /// 1. Command line arguments
    /// 2. Environment variables (prefixed with APP_, plus legacy names)
    /// 3. Configuration file (config.toml)
    /// 4. Default values
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::load_with_args(&CommandLineArgs::parse())
    }

    pub fn load_with_args(cli_args: &CommandLineArgs) -> Result<Self, anyhow::Error> {
        // 1. Load from config file (use CLI --config if provided, otherwise find default)
        let config_path = cli_args.config.clone().or_else(Self::find_config_file);
        let mut config = if let Some(config_path) = config_path {
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        // 2. Override with environment variables
        config.apply_env_overrides();

        // 3. Override with command line arguments (highest priority)
        config.apply_cli_overrides(cli_args);

        // 4. Fall back to the final provider's conventional key variable
        config.resolve_api_key_from(|key| std::env::var(key).ok());

        // 5. Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Effective tracing filter, honouring the debug flag
    pub fn log_filter(&self) -> String {
        if self.debug && !self.logging.level.contains("debug") {
            format!("{},sqlgen=debug", self.logging.level)
        } else {
            self.logging.level.clone()
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST / HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT / PORT: Server port (default: 8000)
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,sqlgen=debug")
    /// - APP_DEBUG / DEBUG: Debug logging (true/false)
    /// - APP_LLM_PROVIDER: Model provider (gemini, openai)
    /// - APP_LLM_API_KEY: Model API key
    /// - APP_LLM_MODEL: Model name
    /// - APP_LLM_API_BASE: API base URL
    /// - APP_LLM_TIMEOUT_SECS: Request timeout (accepts "30s", "2m")
    /// - APP_CORS_ORIGINS: Comma separated allowed origins
    /// - FRONTEND_URL: Extra allowed origin
    pub fn apply_env_overrides_from<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| env(k));

        if let Some(host) = first(&["APP_SERVER_HOST", "HOST"]) {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Some(port) = first(&["APP_SERVER_PORT", "PORT"])
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Some(level) = env("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Some(debug) = first(&["APP_DEBUG", "DEBUG"]) {
            self.debug = debug.trim().eq_ignore_ascii_case("true");
            tracing::info!("Override debug from env: {}", self.debug);
        }

        if let Some(provider) = env("APP_LLM_PROVIDER") {
            match LLMProviderKind::parse_kind(&provider) {
                Some(kind) => {
                    self.llm.provider = kind;
                    tracing::info!("Override llm.provider from env: {}", kind.as_str());
                },
                None => tracing::warn!(
                    "Invalid APP_LLM_PROVIDER '{}' (keep {})",
                    provider,
                    self.llm.provider.as_str()
                ),
            }
        }

        if let Some(key) = env("APP_LLM_API_KEY") {
            self.llm.api_key = Some(key);
            tracing::info!("Override llm.api_key from env");
        }

        if let Some(model) = env("APP_LLM_MODEL") {
            self.llm.model = model;
            tracing::info!("Override llm.model from env: {}", self.llm.model);
        }

        if let Some(api_base) = env("APP_LLM_API_BASE") {
            self.llm.api_base = api_base;
            tracing::info!("Override llm.api_base from env: {}", self.llm.api_base);
        }

        if let Some(timeout) = env("APP_LLM_TIMEOUT_SECS") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.llm.timeout_secs = val;
                    tracing::info!("Override llm.timeout_secs from env: {}", val);
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_LLM_TIMEOUT_SECS '{}': {} (keep {})",
                    timeout,
                    e,
                    self.llm.timeout_secs
                ),
            }
        }

        if let Some(origins) = env("APP_CORS_ORIGINS") {
            self.cors.allowed_origins.clear();
            for origin in origins.split(',') {
                self.cors.add_origin(origin);
            }
            tracing::info!("Override cors.allowed_origins from env: {:?}", self.cors.allowed_origins);
        }

        if let Some(frontend_url) = env("FRONTEND_URL") {
            self.cors.add_origin(&frontend_url);
        }
    }

    /// Use `GEMINI_API_KEY` / `OPENAI_API_KEY` when no explicit key is set.
    ///
    /// Runs after the CLI layer so the variable matches the provider that is
    /// actually selected.
    pub fn resolve_api_key_from<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.llm.api_key.clean().is_some() {
            return;
        }

        let key_var = match self.llm.provider {
            LLMProviderKind::Gemini => "GEMINI_API_KEY",
            LLMProviderKind::OpenAI => "OPENAI_API_KEY",
        };
        if let Some(key) = env(key_var) {
            self.llm.api_key = Some(key);
            tracing::info!("Using llm.api_key from env ({})", key_var);
        }
    }

    /// Apply command line argument overrides (highest priority)
    pub fn apply_cli_overrides(&mut self, args: &CommandLineArgs) {
        if let Some(host) = &args.server_host {
            self.server.host = host.clone();
            tracing::info!("Override server.host from CLI: {}", self.server.host);
        }

        if let Some(port) = args.server_port {
            self.server.port = port;
            tracing::info!("Override server.port from CLI: {}", self.server.port);
        }

        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
            tracing::info!("Override logging.level from CLI: {}", self.logging.level);
        }

        if let Some(provider) = &args.llm_provider {
            match LLMProviderKind::parse_kind(provider) {
                Some(kind) => {
                    self.llm.provider = kind;
                    tracing::info!("Override llm.provider from CLI: {}", kind.as_str());
                },
                None => tracing::warn!(
                    "Invalid --llm-provider '{}' (keep {})",
                    provider,
                    self.llm.provider.as_str()
                ),
            }
        }

        if let Some(model) = &args.llm_model {
            self.llm.model = model.clone();
            tracing::info!("Override llm.model from CLI: {}", self.llm.model);
        }

        if let Some(timeout) = &args.llm_timeout {
            match parse_duration_to_secs(timeout) {
                Ok(val) => {
                    self.llm.timeout_secs = val;
                    tracing::info!("Override llm.timeout_secs from CLI: {}", val);
                },
                Err(e) => tracing::warn!(
                    "Invalid --llm-timeout '{}': {} (keep {})",
                    timeout,
                    e,
                    self.llm.timeout_secs
                ),
            }
        }

        if args.debug {
            self.debug = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be > 0");
        }

        if self.llm.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            tracing::warn!(
                "No {} API key configured, SQL generation will use the heuristic engine only",
                self.llm.provider.as_str()
            );
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, anyhow::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,sqlgen=debug".to_string(), file: None }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LLMProviderKind::Gemini,
            api_key: None,
            model: String::new(),
            api_base: String::new(),
            timeout_secs: 60,
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

// =========================
// Helpers for parsing values
// =========================

pub(crate) fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.trim().parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    let multiplier: u64 = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hour" | "hours" => 60 * 60,
        _ => return Err(format!("unsupported unit: {}", unit)),
    };
    n.checked_mul(multiplier).ok_or_else(|| "duration too large".to_string())
}

// Custom serde deserializer to support numeric or human-friendly string values
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '2m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
