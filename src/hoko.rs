//! Hoko 门面
//!
//! 一次 setup 调用构建 Deeplinking、PushNotifications 和 Analytics 三个模块，
//! 启动事件上传队列并确定调试模式。门面由应用显式创建并传递，
//! 不依赖全局单例；唯一的进程级状态是日志 verbose 开关。
//!
//! ```no_run
//! use hoko::Hoko;
//!
//! # async fn run() -> hoko::errors::Result<()> {
//! let hoko = Hoko::setup_with_token("YOUR-API-TOKEN")?;
//! hoko.deeplinking().map_route("product/:product_id", |deeplink| {
//!     println!("open product {}", deeplink.route_parameters["product_id"]);
//! })?;
//! hoko.deeplinking().handle_open_url("hoko://product/42");
//! hoko.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::analytics::{Analytics, EventQueue, TransportSink};
use crate::config::HokoConfig;
use crate::deeplinking::Deeplinking;
use crate::errors::{HokoError, Result};
use crate::network::{self, Transport, paths};
use crate::push::PushNotifications;
use crate::system::{debug_mode, logging};

pub struct Hoko {
    token: String,
    debug_mode: bool,
    config: Arc<HokoConfig>,
    transport: Arc<dyn Transport>,
    deeplinking: Arc<Deeplinking>,
    push_notifications: Arc<PushNotifications>,
    analytics: Arc<Analytics>,
    flush_task: Mutex<Option<JoinHandle<()>>>,
}

impl Hoko {
    /// 使用 API token 初始化所有模块，调试模式自动推断
    pub fn setup_with_token(token: &str) -> Result<Self> {
        Self::builder(token).build()
    }

    /// 使用 API token 初始化所有模块，并显式指定调试模式
    pub fn setup_with_debug_mode(token: &str, debug_mode: bool) -> Result<Self> {
        Self::builder(token).debug_mode(debug_mode).build()
    }

    pub fn builder(token: &str) -> HokoBuilder {
        HokoBuilder::new(token)
    }

    /// 映射、处理和生成 deeplink
    pub fn deeplinking(&self) -> &Arc<Deeplinking> {
        &self.deeplinking
    }

    /// 处理 Hoko 推送通知
    pub fn push_notifications(&self) -> &Arc<PushNotifications> {
        &self.push_notifications
    }

    /// 用户识别与事件追踪
    pub fn analytics(&self) -> &Arc<Analytics> {
        &self.analytics
    }

    /// 开启或关闭 SDK 日志（进程级）
    pub fn set_verbose(verbose: bool) {
        logging::set_verbose(verbose);
    }

    pub fn is_verbose() -> bool {
        logging::is_verbose()
    }

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn config(&self) -> &HokoConfig {
        &self.config
    }

    /// 调试模式下上传路由表和应用图标
    ///
    /// 非调试模式直接返回 `Ok(false)`，不产生网络请求。
    pub async fn sync_debug_metadata(&self) -> Result<bool> {
        if !self.debug_mode {
            debug!("Debug mode disabled, skipping metadata upload");
            return Ok(false);
        }

        let routes = self.deeplinking.routes();
        info!("Uploading {} mapped routes", routes.len());
        self.transport
            .post(
                paths::ROUTES,
                serde_json::json!({
                    "url_scheme": self.deeplinking.url_scheme(),
                    "routes": routes,
                }),
            )
            .await
            .map_err(|e| HokoError::network(e.to_string()))?;

        if let Some(ref icon_path) = self.config.debug.icon_path {
            let bytes = tokio::fs::read(icon_path)
                .await
                .map_err(|e| HokoError::file_operation(format!("{}: {}", icon_path, e)))?;
            let icon = base64::engine::general_purpose::STANDARD.encode(&bytes);
            info!("Uploading app icon ({} bytes)", bytes.len());
            self.transport
                .post(paths::ICONS, serde_json::json!({ "icon": icon }))
                .await
                .map_err(|e| HokoError::network(e.to_string()))?;
        }

        Ok(true)
    }

    /// 停止后台上传任务并上传剩余事件
    pub async fn shutdown(&self) {
        if let Some(task) = self.flush_task.lock().take() {
            task.abort();
        }
        let flushed = self.analytics.flush().await;
        info!("Hoko shut down, {} pending events uploaded", flushed);
    }
}

impl Drop for Hoko {
    fn drop(&mut self) {
        if let Some(task) = self.flush_task.get_mut().take() {
            task.abort();
        }
    }
}

/// Hoko 构建器
pub struct HokoBuilder {
    token: String,
    config: Option<HokoConfig>,
    transport: Option<Arc<dyn Transport>>,
    debug_mode: Option<bool>,
}

impl HokoBuilder {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            config: None,
            transport: None,
            debug_mode: None,
        }
    }

    pub fn config(mut self, config: HokoConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 使用自定义 transport（默认根据 network.endpoint 选择）
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// 显式指定调试模式，覆盖自动推断
    pub fn debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = Some(debug_mode);
        self
    }

    pub fn build(self) -> Result<Hoko> {
        let token = self.token.trim().to_string();
        if token.is_empty() {
            return Err(HokoError::validation("API token cannot be empty"));
        }

        let config = self.config.unwrap_or_default();
        config.validate()?;

        let debug_mode = match self.debug_mode {
            Some(flag) => flag,
            None => debug_mode::infer(config.debug.enabled),
        };

        let transport = self
            .transport
            .unwrap_or_else(|| network::transport_from_config(&config.network, &token));

        let queue = EventQueue::new(
            Arc::new(TransportSink::new(Arc::clone(&transport))),
            Duration::from_secs(config.network.flush_interval_secs.max(1)),
            config.network.max_events_before_flush,
            config.network.max_pending_events,
        );
        let analytics = Arc::new(Analytics::new(queue));
        let deeplinking = Arc::new(Deeplinking::new(
            &config.deeplinking.url_scheme,
            Some(Arc::clone(&analytics)),
        ));
        let push_notifications = Arc::new(PushNotifications::new(
            Arc::clone(&deeplinking),
            Arc::clone(&analytics),
            Arc::clone(&transport),
        ));

        let flush_task = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let queue = analytics.queue().clone();
                Some(runtime.spawn(async move { queue.start_background_task().await }))
            }
            Err(_) => {
                warn!("No tokio runtime available, analytics events upload only on manual flush");
                None
            }
        };

        info!(
            "Hoko setup complete (debug mode: {}, transport: {})",
            debug_mode,
            transport.name()
        );

        Ok(Hoko {
            token,
            debug_mode,
            config: Arc::new(config),
            transport,
            deeplinking,
            push_notifications,
            analytics,
            flush_task: Mutex::new(flush_task),
        })
    }
}
