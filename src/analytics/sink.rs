use std::sync::Arc;

use super::Event;
use crate::network::{Transport, paths};

/// 事件上传 Sink
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    /// 批量上传事件，失败时由调用方恢复到缓冲区
    async fn send_events(&self, events: Vec<Event>) -> anyhow::Result<()>;
}

/// 通过 Transport 上传到后端 `/analytics/events`
pub struct TransportSink {
    transport: Arc<dyn Transport>,
}

impl TransportSink {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait::async_trait]
impl EventSink for TransportSink {
    async fn send_events(&self, events: Vec<Event>) -> anyhow::Result<()> {
        let body = serde_json::json!({ "events": events });
        self.transport.post(paths::EVENTS, body).await
    }
}
