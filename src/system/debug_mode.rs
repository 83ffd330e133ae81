//! 调试模式推断
//!
//! 调试模式下 SDK 会把路由表和应用图标上传到后端。
//! 推断顺序：`HOKO_DEBUG` 环境变量 > 配置文件 > 编译模式（debug 构建视为开发环境）

use tracing::{debug, warn};

/// 调试模式环境变量
pub const DEBUG_ENV_VAR: &str = "HOKO_DEBUG";

/// 解析布尔风格的环境变量值
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 根据环境变量值、配置值和编译模式推断调试模式
pub fn resolve(env_value: Option<&str>, configured: Option<bool>, debug_build: bool) -> bool {
    if let Some(raw) = env_value {
        match parse_flag(raw) {
            Some(flag) => {
                debug!("Debug mode {} from {}", flag, DEBUG_ENV_VAR);
                return flag;
            }
            None => warn!("Ignoring invalid {} value: {:?}", DEBUG_ENV_VAR, raw),
        }
    }

    if let Some(flag) = configured {
        debug!("Debug mode {} from configuration", flag);
        return flag;
    }

    debug!("Debug mode {} inferred from build profile", debug_build);
    debug_build
}

/// 从当前进程环境推断调试模式
pub fn infer(configured: Option<bool>) -> bool {
    let env_value = std::env::var(DEBUG_ENV_VAR).ok();
    resolve(env_value.as_deref(), configured, cfg!(debug_assertions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_env_wins_over_config() {
        assert!(resolve(Some("yes"), Some(false), false));
        assert!(!resolve(Some("0"), Some(true), true));
    }

    #[test]
    fn test_invalid_env_falls_through() {
        assert!(resolve(Some("maybe"), Some(true), false));
        assert!(!resolve(Some("maybe"), None, false));
    }

    #[test]
    fn test_build_profile_fallback() {
        assert!(resolve(None, None, true));
        assert!(!resolve(None, None, false));
    }
}
