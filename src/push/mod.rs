//! PushNotifications 模块
//!
//! 解析推送载荷，把其中的 deeplink 交给 Deeplinking 处理，并管理设备 token。

pub mod notification;

pub use notification::{Notification, parse_notification};

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use crate::analytics::{Analytics, Event, EventKind};
use crate::deeplinking::{DeeplinkSource, Deeplinking};
use crate::errors::{HokoError, Result};
use crate::network::{Transport, paths};

pub struct PushNotifications {
    deeplinking: Arc<Deeplinking>,
    analytics: Arc<Analytics>,
    transport: Arc<dyn Transport>,
    device_token: RwLock<Option<String>>,
}

impl PushNotifications {
    pub fn new(
        deeplinking: Arc<Deeplinking>,
        analytics: Arc<Analytics>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            deeplinking,
            analytics,
            transport,
            device_token: RwLock::new(None),
        }
    }

    /// 处理收到的推送
    ///
    /// 返回载荷中的 deeplink 是否被处理；不含 deeplink 的推送返回 `Ok(false)`。
    pub fn handle_remote_notification(&self, payload: &Value) -> Result<bool> {
        let notification = parse_notification(payload)?;

        if notification.is_hoko() {
            // 没有通知 ID 时以 deeplink 命名
            let name = notification
                .id
                .clone()
                .or_else(|| notification.deeplink.clone())
                .unwrap_or_else(|| "push".to_string());
            let mut event = Event::new(EventKind::PushOpened, name);
            if let Some(ref deeplink) = notification.deeplink {
                event = event.with_property("deeplink", deeplink.clone());
            }
            self.analytics.record(event);
        }

        let Some(ref deeplink) = notification.deeplink else {
            debug!("PushNotifications: notification carries no deeplink");
            return Ok(false);
        };

        let handled = self
            .deeplinking
            .handle_open_url_from(deeplink, DeeplinkSource::PushNotification);
        debug!(
            "PushNotifications: deeplink {} handled: {}",
            deeplink, handled
        );
        Ok(handled)
    }

    /// 注册设备 token（原始字节），返回小写十六进制字符串
    pub fn register_device_token(&self, token: &[u8]) -> String {
        let hex: String = token.iter().map(|b| format!("{:02x}", b)).collect();
        info!("PushNotifications: registered device token ({} bytes)", token.len());
        *self.device_token.write() = Some(hex.clone());
        hex
    }

    /// 已注册的设备 token
    pub fn device_token(&self) -> Option<String> {
        self.device_token.read().clone()
    }

    /// 上传设备 token 到后端
    pub async fn upload_device_token(&self) -> Result<()> {
        let token = self
            .device_token()
            .ok_or_else(|| HokoError::not_found("No device token registered"))?;

        let body = serde_json::json!({
            "token": token,
            "platform": std::env::consts::OS,
        });
        self.transport
            .post(paths::DEVICES, body)
            .await
            .map_err(|e| HokoError::network(e.to_string()))
    }
}
