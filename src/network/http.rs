//! HTTP transport
//!
//! 基于 ureq 的同步客户端，在 spawn_blocking 中执行，
//! 所有请求携带 `Authorization: Token <api token>`。

use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use tracing::{debug, warn};
use ureq::Agent;

use super::Transport;

pub struct HttpTransport {
    base_url: String,
    token: String,
    agent: Agent,
}

impl HttpTransport {
    /// 创建 HTTP transport
    ///
    /// `base_url` 末尾的 `/` 会被去掉，请求地址为 `base_url + path`
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            agent,
        }
    }

    /// 拼接完整请求地址
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn post_sync(
        agent: Agent,
        url: String,
        token: String,
        body: serde_json::Value,
    ) -> anyhow::Result<()> {
        let resp = agent
            .post(&url)
            .header("Authorization", format!("Token {}", token))
            .send_json(&body)
            .with_context(|| format!("POST {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("POST {} returned status {}", url, status));
        }

        debug!("HttpTransport: POST {} -> {}", url, status);
        Ok(())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: serde_json::Value) -> anyhow::Result<()> {
        let url = self.url_for(path);
        let agent = self.agent.clone();
        let token = self.token.clone();

        tokio::task::spawn_blocking(move || Self::post_sync(agent, url, token, body))
            .await
            .map_err(|e| {
                warn!("HttpTransport spawn_blocking failed: {}", e);
                anyhow!("upload task failed: {}", e)
            })?
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}
