use std::fmt;

#[derive(Debug, Clone)]
pub enum HokoError {
    Validation(String),
    NotFound(String),
    InvalidRoute(String),
    InvalidUrl(String),
    Payload(String),
    Network(String),
    Serialization(String),
    FileOperation(String),
    Config(String),
}

impl HokoError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            HokoError::Validation(_) => "E001",
            HokoError::NotFound(_) => "E002",
            HokoError::InvalidRoute(_) => "E003",
            HokoError::InvalidUrl(_) => "E004",
            HokoError::Payload(_) => "E005",
            HokoError::Network(_) => "E006",
            HokoError::Serialization(_) => "E007",
            HokoError::FileOperation(_) => "E008",
            HokoError::Config(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            HokoError::Validation(_) => "Validation Error",
            HokoError::NotFound(_) => "Resource Not Found",
            HokoError::InvalidRoute(_) => "Invalid Route",
            HokoError::InvalidUrl(_) => "Invalid URL",
            HokoError::Payload(_) => "Invalid Notification Payload",
            HokoError::Network(_) => "Network Error",
            HokoError::Serialization(_) => "Serialization Error",
            HokoError::FileOperation(_) => "File Operation Error",
            HokoError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            HokoError::Validation(msg) => msg,
            HokoError::NotFound(msg) => msg,
            HokoError::InvalidRoute(msg) => msg,
            HokoError::InvalidUrl(msg) => msg,
            HokoError::Payload(msg) => msg,
            HokoError::Network(msg) => msg,
            HokoError::Serialization(msg) => msg,
            HokoError::FileOperation(msg) => msg,
            HokoError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for HokoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HokoError {}

// 便捷的构造函数
impl HokoError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        HokoError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        HokoError::NotFound(msg.into())
    }

    pub fn invalid_route<T: Into<String>>(msg: T) -> Self {
        HokoError::InvalidRoute(msg.into())
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        HokoError::InvalidUrl(msg.into())
    }

    pub fn payload<T: Into<String>>(msg: T) -> Self {
        HokoError::Payload(msg.into())
    }

    pub fn network<T: Into<String>>(msg: T) -> Self {
        HokoError::Network(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        HokoError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        HokoError::FileOperation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        HokoError::Config(msg.into())
    }
}

impl From<std::io::Error> for HokoError {
    fn from(err: std::io::Error) -> Self {
        HokoError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for HokoError {
    fn from(err: serde_json::Error) -> Self {
        HokoError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for HokoError {
    fn from(err: url::ParseError) -> Self {
        HokoError::InvalidUrl(err.to_string())
    }
}

impl From<config::ConfigError> for HokoError {
    fn from(err: config::ConfigError) -> Self {
        HokoError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HokoError {
    fn from(err: toml::ser::Error) -> Self {
        HokoError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HokoError>;
