pub mod manager;
pub mod sink;
pub mod tracker;
pub mod user;

pub use manager::EventQueue;
pub use sink::{EventSink, TransportSink};
pub use tracker::Analytics;
pub use user::{AccountType, Gender, User};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use uuid::Uuid;

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    /// 业务关键事件（销售、推荐等）
    KeyEvent,
    /// 用户被识别
    UserIdentified,
    /// 通过 deeplink 打开应用
    DeeplinkOpened,
    /// 通过推送通知打开应用
    PushOpened,
}

/// 分析事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub kind: EventKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_identifier: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Event {
    /// 创建新事件
    pub fn new(kind: EventKind, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            amount: None,
            user_identifier: None,
            timestamp: Utc::now(),
            properties: serde_json::Map::new(),
        }
    }

    pub fn with_amount(mut self, amount: Option<f64>) -> Self {
        self.amount = amount;
        self
    }

    /// 添加一个属性
    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_skips_empty_fields() {
        let event = Event::new(EventKind::KeyEvent, "purchase");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["kind"], "key_event");
        assert_eq!(json["name"], "purchase");
        assert!(json.get("amount").is_none());
        assert!(json.get("user_identifier").is_none());
        assert!(json.get("properties").is_none());
    }

    #[test]
    fn test_event_builders() {
        let event = Event::new(EventKind::DeeplinkOpened, "product/:id")
            .with_amount(Some(2.5))
            .with_property("url", "hoko://product/1");

        assert_eq!(event.amount, Some(2.5));
        assert_eq!(event.properties["url"], "hoko://product/1");
        assert_eq!(EventKind::PushOpened.as_ref(), "push_opened");
    }
}
