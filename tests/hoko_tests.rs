//! Hoko 入口测试
//!
//! 验证 setup、各模块访问器、verbose 开关与调试元数据上传。

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hoko::config::HokoConfig;
use hoko::errors::HokoError;
use hoko::network::Transport;
use hoko::Hoko;

#[derive(Default)]
struct RecordingTransport {
    posts: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingTransport {
    fn paths(&self) -> Vec<String> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post(&self, path: &str, body: serde_json::Value) -> anyhow::Result<()> {
        self.posts.lock().unwrap().push((path.to_string(), body));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Recording"
    }
}

#[cfg(test)]
mod setup_tests {
    use super::*;

    #[tokio::test]
    async fn test_accessors_are_stable() {
        let hoko = Hoko::setup_with_token("test-token").unwrap();

        assert!(Arc::ptr_eq(hoko.deeplinking(), hoko.deeplinking()));
        assert!(Arc::ptr_eq(hoko.analytics(), hoko.analytics()));
        assert!(Arc::ptr_eq(
            hoko.push_notifications(),
            hoko.push_notifications()
        ));
        assert_eq!(hoko.token(), "test-token");
        assert_eq!(hoko.deeplinking().url_scheme(), "hoko");
    }

    #[tokio::test]
    async fn test_explicit_debug_mode() {
        let debug = Hoko::setup_with_debug_mode("test-token", true).unwrap();
        assert!(debug.is_debug_mode());

        let release = Hoko::setup_with_debug_mode("test-token", false).unwrap();
        assert!(!release.is_debug_mode());
    }

    #[test]
    fn test_empty_token_is_rejected() {
        assert!(matches!(
            Hoko::setup_with_token(""),
            Err(HokoError::Validation(_))
        ));
        assert!(matches!(
            Hoko::setup_with_debug_mode("   ", true),
            Err(HokoError::Validation(_))
        ));
    }

    #[test]
    fn test_setup_without_runtime() {
        // 没有 tokio 运行时也可以完成 setup
        let hoko = Hoko::setup_with_token("test-token").unwrap();
        assert_eq!(hoko.analytics().pending_events(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = HokoConfig::default();
        config.deeplinking.url_scheme = String::new();
        assert!(matches!(
            Hoko::builder("test-token").config(config).build(),
            Err(HokoError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_verbose_toggle_keeps_modules() {
        let hoko = Hoko::setup_with_token("test-token").unwrap();
        let deeplinking = Arc::clone(hoko.deeplinking());
        let analytics = Arc::clone(hoko.analytics());

        Hoko::set_verbose(true);
        assert!(Hoko::is_verbose());
        Hoko::set_verbose(false);
        assert!(!Hoko::is_verbose());

        assert!(Arc::ptr_eq(&deeplinking, hoko.deeplinking()));
        assert!(Arc::ptr_eq(&analytics, hoko.analytics()));
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_opened_deeplink_is_tracked() {
        let transport = Arc::new(RecordingTransport::default());
        let hoko = Hoko::builder("test-token")
            .transport(transport.clone() as Arc<dyn Transport>)
            .debug_mode(false)
            .build()
            .unwrap();

        hoko.deeplinking()
            .map_route("product/:id", |_| {})
            .unwrap();
        assert!(hoko.deeplinking().handle_open_url("hoko://product/1"));
        assert_eq!(hoko.analytics().pending_events(), 1);

        hoko.shutdown().await;
        assert_eq!(hoko.analytics().pending_events(), 0);
        assert_eq!(transport.paths(), vec!["/analytics/events"]);
    }

    #[tokio::test]
    async fn test_metadata_skipped_outside_debug_mode() {
        let transport = Arc::new(RecordingTransport::default());
        let hoko = Hoko::builder("test-token")
            .transport(transport.clone() as Arc<dyn Transport>)
            .debug_mode(false)
            .build()
            .unwrap();

        assert!(!hoko.sync_debug_metadata().await.unwrap());
        assert!(transport.paths().is_empty());
    }

    #[tokio::test]
    async fn test_metadata_uploaded_in_debug_mode() {
        let mut icon = tempfile::NamedTempFile::new().unwrap();
        icon.write_all(b"icon-bytes").unwrap();

        let mut config = HokoConfig::default();
        config.deeplinking.url_scheme = "shop".to_string();
        config.debug.icon_path = Some(icon.path().to_string_lossy().to_string());

        let transport = Arc::new(RecordingTransport::default());
        let hoko = Hoko::builder("test-token")
            .config(config)
            .transport(transport.clone() as Arc<dyn Transport>)
            .debug_mode(true)
            .build()
            .unwrap();
        hoko.deeplinking()
            .map_route("product/:id", |_| {})
            .unwrap();

        assert!(hoko.sync_debug_metadata().await.unwrap());
        assert_eq!(transport.paths(), vec!["/routes", "/icons"]);

        let posts = transport.posts.lock().unwrap();
        assert_eq!(posts[0].1["url_scheme"], "shop");
        assert_eq!(posts[0].1["routes"][0], "product/:id");
        // "icon-bytes" 的 base64
        assert_eq!(posts[1].1["icon"], "aWNvbi1ieXRlcw==");
    }

    #[tokio::test]
    async fn test_missing_icon_is_file_error() {
        let mut config = HokoConfig::default();
        config.debug.icon_path = Some("/nonexistent/hoko-icon.png".to_string());

        let hoko = Hoko::builder("test-token")
            .config(config)
            .transport(Arc::new(RecordingTransport::default()))
            .debug_mode(true)
            .build()
            .unwrap();

        assert!(matches!(
            hoko.sync_debug_metadata().await,
            Err(HokoError::FileOperation(_))
        ));
    }
}
