pub mod http;
pub mod transport;

pub use http::HttpTransport;
pub use transport::{NullTransport, Transport};

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::NetworkConfig;

/// 后端接口路径
pub mod paths {
    pub const EVENTS: &str = "/analytics/events";
    pub const ROUTES: &str = "/routes";
    pub const ICONS: &str = "/icons";
    pub const DEVICES: &str = "/push/devices";
}

/// 根据配置选择 transport：配置了 endpoint 用 HTTP，否则用 Null
pub fn transport_from_config(config: &NetworkConfig, token: &str) -> Arc<dyn Transport> {
    let transport: Arc<dyn Transport> = match config.endpoint.as_deref() {
        Some(endpoint) if !endpoint.trim().is_empty() => Arc::new(HttpTransport::new(
            endpoint,
            token,
            Duration::from_secs(config.timeout_secs),
        )),
        _ => Arc::new(NullTransport),
    };
    info!("Network: using {} transport", transport.name());
    transport
}
