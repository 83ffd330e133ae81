use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::errors::{HokoError, Result};

/// 默认配置文件名
pub const DEFAULT_CONFIG_PATH: &str = "hoko.toml";

/// 环境变量前缀，分隔符为 `__`
pub const ENV_PREFIX: &str = "HOKO";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid log format: '{}'. Valid: text, json", s)),
        }
    }
}

/// SDK 配置（从 TOML 加载）
///
/// 包含：
/// - logging: 日志级别、格式、输出文件、verbose 开关
/// - network: 后端地址、超时、事件刷新策略
/// - deeplinking: URL scheme 与预先映射的路由
/// - debug: 调试模式与图标上传
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HokoConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub deeplinking: DeeplinkingConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl HokoConfig {
    /// 从 TOML 文件和环境变量加载配置，失败时回退到默认值
    ///
    /// 优先级：ENV > hoko.toml > 默认值
    /// ENV 前缀：HOKO，分隔符：__
    /// 示例：HOKO__NETWORK__ENDPOINT=https://api.hoko.io
    pub fn load(path: Option<&str>) -> Self {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        match Self::load_from(path, None) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    /// 加载配置并返回错误
    ///
    /// `env` 为 `None` 时读取进程环境变量，否则只使用给定的变量表。
    pub fn load_from(path: &str, env: Option<config::Map<String, String>>) -> Result<Self> {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            );

        let settings = builder.build()?;
        let config: HokoConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<()> {
        if self.deeplinking.url_scheme.trim().is_empty() {
            return Err(HokoError::config("deeplinking.url_scheme cannot be empty"));
        }
        if self.network.max_events_before_flush == 0 {
            return Err(HokoError::config(
                "network.max_events_before_flush must be greater than 0",
            ));
        }
        if self.network.max_pending_events < self.network.max_events_before_flush {
            return Err(HokoError::config(
                "network.max_pending_events must be >= network.max_events_before_flush",
            ));
        }
        if let Some(ref endpoint) = self.network.endpoint {
            url::Url::parse(endpoint)?;
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.network.endpoint = Some("https://api.hoko.io/v1".to_string());
        sample_config.deeplinking.routes = vec![
            "product/:product_id".to_string(),
            "user/:user_id/profile".to_string(),
        ];
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    /// 启动时的 verbose 状态，运行时可通过 `Hoko::set_verbose` 切换
    #[serde(default)]
    pub verbose: bool,
}

/// 网络与事件上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// 后端地址，未配置时使用 NullTransport
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    #[serde(default = "default_max_events_before_flush")]
    pub max_events_before_flush: usize,
    #[serde(default = "default_max_pending_events")]
    pub max_pending_events: usize,
}

/// Deeplinking 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeeplinkingConfig {
    #[serde(default = "default_url_scheme")]
    pub url_scheme: String,
    /// 预先映射的路由（CLI 使用）
    #[serde(default)]
    pub routes: Vec<String>,
}

/// 调试模式配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DebugConfig {
    /// None 表示自动推断
    #[serde(default)]
    pub enabled: Option<bool>,
    /// 调试模式下上传的应用图标
    #[serde(default)]
    pub icon_path: Option<String>,
}

// ============================================================
// 默认值函数
// ============================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_flush_interval_secs() -> u64 {
    30
}

fn default_max_events_before_flush() -> usize {
    50
}

fn default_max_pending_events() -> usize {
    1000
}

fn default_url_scheme() -> String {
    "hoko".to_string()
}

// ============================================================
// Default 实现
// ============================================================

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
            verbose: false,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            flush_interval_secs: default_flush_interval_secs(),
            max_events_before_flush: default_max_events_before_flush(),
            max_pending_events: default_max_pending_events(),
        }
    }
}

impl Default for DeeplinkingConfig {
    fn default() -> Self {
        Self {
            url_scheme: default_url_scheme(),
            routes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = HokoConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(!config.logging.verbose);
        assert_eq!(config.network.endpoint, None);
        assert_eq!(config.network.max_events_before_flush, 50);
        assert_eq!(config.deeplinking.url_scheme, "hoko");
        assert_eq!(config.debug.enabled, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut env = HashMap::new();
        env.insert(
            "HOKO__NETWORK__ENDPOINT".to_string(),
            "https://api.example.com".to_string(),
        );
        env.insert("HOKO__DEBUG__ENABLED".to_string(), "true".to_string());
        env.insert("HOKO__DEEPLINKING__URL_SCHEME".to_string(), "shop".to_string());

        let config = HokoConfig::load_from("does-not-exist.toml", Some(env)).unwrap();
        assert_eq!(
            config.network.endpoint.as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(config.debug.enabled, Some(true));
        assert_eq!(config.deeplinking.url_scheme, "shop");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = HokoConfig::default();
        config.network.max_events_before_flush = 0;
        assert!(matches!(config.validate(), Err(HokoError::Config(_))));

        let mut config = HokoConfig::default();
        config.network.endpoint = Some("not a url".to_string());
        assert!(matches!(config.validate(), Err(HokoError::InvalidUrl(_))));

        let mut config = HokoConfig::default();
        config.deeplinking.url_scheme = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_config_parses() {
        let sample = HokoConfig::generate_sample_config();
        let parsed: HokoConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.deeplinking.routes.len(), 2);
        assert!(parsed.network.endpoint.is_some());
    }
}
