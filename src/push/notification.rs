//! 推送通知载荷解析
//!
//! 载荷格式（APNs 风格）：
//! ```json
//! {
//!   "aps": {"alert": "Sale!", "badge": 1, "sound": "default", "content-available": 1},
//!   "hoko": {"id": "n-123", "deeplink": "shop://product/42"}
//! }
//! ```
//! `alert` 也可以是 `{"title": .., "body": ..}` 对象；
//! 没有 `hoko.deeplink` 时兼容顶层的 `deeplink` 字段。

use serde::Serialize;
use serde_json::Value;

use crate::errors::{HokoError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Hoko 通知 ID
    pub id: Option<String>,
    pub alert: Option<String>,
    pub badge: Option<u32>,
    pub sound: Option<String>,
    pub content_available: bool,
    pub deeplink: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl Notification {
    /// 静默推送：只有 content-available 而没有可见内容
    pub fn is_silent(&self) -> bool {
        self.content_available && self.alert.is_none() && self.sound.is_none() && self.badge.is_none()
    }

    /// 是否来自 Hoko 服务（带 ID 或 deeplink）
    pub fn is_hoko(&self) -> bool {
        self.id.is_some() || self.deeplink.is_some()
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn parse_alert(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => non_empty_str(value),
        Value::Object(map) => map
            .get("body")
            .and_then(non_empty_str)
            .or_else(|| map.get("title").and_then(non_empty_str)),
        _ => None,
    }
}

/// 解析推送载荷
pub fn parse_notification(payload: &Value) -> Result<Notification> {
    let Some(root) = payload.as_object() else {
        return Err(HokoError::payload("Notification payload must be a JSON object"));
    };

    let aps = match root.get("aps") {
        None | Some(Value::Null) => None,
        Some(Value::Object(aps)) => Some(aps),
        Some(_) => return Err(HokoError::payload("'aps' must be a JSON object")),
    };

    let hoko = match root.get("hoko") {
        None | Some(Value::Null) => None,
        Some(Value::Object(hoko)) => Some(hoko),
        Some(_) => return Err(HokoError::payload("'hoko' must be a JSON object")),
    };

    let alert = aps.and_then(|a| a.get("alert")).and_then(parse_alert);
    let badge = match aps.and_then(|a| a.get("badge")) {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| HokoError::payload(format!("Invalid badge value: {}", v)))?,
        ),
    };
    let sound = aps.and_then(|a| a.get("sound")).and_then(non_empty_str);
    let content_available = aps
        .and_then(|a| a.get("content-available"))
        .is_some_and(|v| v.as_u64() == Some(1) || v.as_bool() == Some(true));

    let id = hoko.and_then(|h| h.get("id")).and_then(|v| match v {
        Value::Number(n) => Some(n.to_string()),
        other => non_empty_str(other),
    });
    let deeplink = hoko
        .and_then(|h| h.get("deeplink"))
        .and_then(non_empty_str)
        .or_else(|| root.get("deeplink").and_then(non_empty_str));

    Ok(Notification {
        id,
        alert,
        badge,
        sound,
        content_available,
        deeplink,
        raw: payload.clone(),
    })
}
