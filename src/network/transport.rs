use async_trait::async_trait;
use tracing::trace;

/// 后端传输层
///
/// 所有上传（事件、路由表、图标、设备 token）都经过这里，
/// 便于替换为测试实现或自定义网络栈。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 向 `path`（以 `/` 开头，相对于后端地址）POST 一个 JSON 请求体
    async fn post(&self, path: &str, body: serde_json::Value) -> anyhow::Result<()>;

    /// 获取 transport 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 未配置后端时使用：只记录日志，总是成功
pub struct NullTransport;

#[async_trait]
impl Transport for NullTransport {
    async fn post(&self, path: &str, body: serde_json::Value) -> anyhow::Result<()> {
        trace!("NullTransport: dropping POST {} ({} bytes)", path, body.to_string().len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_transport_accepts_everything() {
        let transport = NullTransport;
        assert!(
            transport
                .post("/analytics/events", serde_json::json!({"events": []}))
                .await
                .is_ok()
        );
        assert_eq!(transport.name(), "Null");
    }
}
