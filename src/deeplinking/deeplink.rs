use std::collections::BTreeMap;

use serde::Serialize;
use strum::AsRefStr;
use url::Url;

use crate::errors::{HokoError, Result};

/// Deeplink 来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeeplinkSource {
    /// 系统直接打开的 URL
    Url,
    /// 推送通知中携带的 deeplink
    PushNotification,
    /// 由 SDK 生成
    Generated,
}

/// 已解析（或生成）的 deeplink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deeplink {
    pub url_scheme: String,
    /// 匹配到的路由，默认路由处理时为 None
    pub route: Option<String>,
    pub route_parameters: BTreeMap<String, String>,
    pub query_parameters: BTreeMap<String, String>,
    pub source: DeeplinkSource,
    pub url: String,
}

/// 从 URL 中拆出的路由路径与查询参数
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUrl {
    pub scheme: String,
    /// 已解码的路径段
    pub segments: Vec<String>,
    pub query: BTreeMap<String, String>,
}

/// 解析 deeplink URL
///
/// - 自定义 scheme（`app://product/42`）：路由路径为 host + path
/// - http/https 通用链接：路由路径只取 path
pub fn parse_url(raw: &str) -> Result<ParsedUrl> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(HokoError::invalid_url("URL cannot be empty"));
    }

    let url = Url::parse(raw)?;
    let scheme = url.scheme().to_string();
    let is_web = scheme == "http" || scheme == "https";

    let mut segments = Vec::new();
    if !is_web
        && let Some(host) = url.host_str()
        && !host.is_empty()
    {
        segments.push(decode_segment(host)?);
    }
    for segment in url.path().split('/').filter(|s| !s.is_empty()) {
        segments.push(decode_segment(segment)?);
    }

    let query = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Ok(ParsedUrl {
        scheme,
        segments,
        query,
    })
}

fn decode_segment(segment: &str) -> Result<String> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| HokoError::invalid_url(format!("Invalid percent-encoding in '{}': {}", segment, e)))
}

/// 拼接 deeplink URL：`<scheme>://<path>?<query>`，查询参数按 key 排序并编码
pub fn build_url(scheme: &str, path: &str, query: &BTreeMap<String, String>) -> String {
    let mut url = format!("{}://{}", scheme, path);
    if !query.is_empty() {
        let encoded: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        url.push('?');
        url.push_str(&encoded.join("&"));
    }
    url
}
