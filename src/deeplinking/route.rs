//! 路由模式
//!
//! 路由由 `/` 分隔的段组成，`:name` 表示参数段，例如 `product/:product_id/reviews`。
//! 首尾的 `/` 会被忽略。

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::errors::{HokoError, Result};

/// 路由段
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Parameter(String),
}

/// 已校验的路由模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pattern: String,
    segments: Vec<Segment>,
}

fn is_valid_parameter_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl Route {
    /// 解析并校验路由模式
    pub fn parse(pattern: &str) -> Result<Self> {
        let normalized = pattern.trim().trim_matches('/');
        if normalized.is_empty() {
            return Err(HokoError::invalid_route("Route cannot be empty"));
        }

        let mut seen = HashSet::new();
        let mut segments = Vec::new();
        for raw in normalized.split('/') {
            if raw.is_empty() {
                return Err(HokoError::invalid_route(format!(
                    "Route '{}' contains an empty segment",
                    pattern
                )));
            }

            if let Some(name) = raw.strip_prefix(':') {
                if !is_valid_parameter_name(name) {
                    return Err(HokoError::invalid_route(format!(
                        "Route '{}' has an invalid parameter name '{}'",
                        pattern, raw
                    )));
                }
                if !seen.insert(name.to_string()) {
                    return Err(HokoError::invalid_route(format!(
                        "Route '{}' repeats parameter '{}'",
                        pattern, name
                    )));
                }
                segments.push(Segment::Parameter(name.to_string()));
            } else {
                if raw.contains(['?', '#', ':']) || is_dot_segment(raw) {
                    return Err(HokoError::invalid_route(format!(
                        "Route '{}' has an invalid segment '{}'",
                        pattern, raw
                    )));
                }
                segments.push(Segment::Literal(raw.to_string()));
            }
        }

        Ok(Self {
            pattern: normalized.to_string(),
            segments,
        })
    }

    /// 规范化后的路由字符串
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// 参数名（按出现顺序）
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Parameter(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// 是否与另一个路由形状相同（参数名不同也视为同一路由）
    pub fn same_shape(&self, other: &Route) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Parameter(_), Segment::Parameter(_)) => true,
                    _ => false,
                })
    }

    /// 匹配已解码的路径段，成功时返回参数表
    pub fn matches(&self, path: &[String]) -> Option<BTreeMap<String, String>> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != value {
                        return None;
                    }
                }
                Segment::Parameter(name) => {
                    params.insert(name.clone(), value.clone());
                }
            }
        }
        Some(params)
    }

    /// 匹配优先级：第一个不同位置上，字面量段优先于参数段
    pub fn cmp_priority(&self, other: &Route) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match (a, b) {
                (Segment::Literal(_), Segment::Parameter(_)) => return Ordering::Less,
                (Segment::Parameter(_), Segment::Literal(_)) => return Ordering::Greater,
                _ => {}
            }
        }
        self.segments
            .len()
            .cmp(&other.segments.len())
            .then_with(|| self.pattern.cmp(&other.pattern))
    }

    /// 用参数填充路由，参数值会被百分号编码
    ///
    /// 缺少参数或多出未知参数都会返回 Validation 错误。
    pub fn build_path(&self, params: &BTreeMap<String, String>) -> Result<String> {
        let unknown: Vec<&str> = params
            .keys()
            .map(String::as_str)
            .filter(|k| !self.parameters().any(|p| p == *k))
            .collect();
        if !unknown.is_empty() {
            return Err(HokoError::validation(format!(
                "Route '{}' has no parameters named {:?}",
                self.pattern, unknown
            )));
        }

        let mut parts = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => parts.push(urlencoding::encode(literal).into_owned()),
                Segment::Parameter(name) => {
                    let value = params.get(name).filter(|v| !v.is_empty()).ok_or_else(|| {
                        HokoError::validation(format!(
                            "Missing value for route parameter '{}' in '{}'",
                            name, self.pattern
                        ))
                    })?;
                    // URL 解析会折叠 `.`/`..`（包括 `%2E` 形式），无法还原
                    if is_dot_segment(value) {
                        return Err(HokoError::validation(format!(
                            "Route parameter '{}' cannot be '{}'",
                            name, value
                        )));
                    }
                    parts.push(urlencoding::encode(value).into_owned());
                }
            }
        }
        Ok(parts.join("/"))
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

impl std::str::FromStr for Route {
    type Err = HokoError;
    fn from_str(s: &str) -> Result<Self> {
        Route::parse(s)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> Vec<String> {
        p.split('/').map(String::from).collect()
    }

    #[test]
    fn test_parse_normalizes_slashes() {
        let route = Route::parse("/product/:id/").unwrap();
        assert_eq!(route.pattern(), "product/:id");
        assert_eq!(route.parameters().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_parse_rejects_invalid_routes() {
        assert!(Route::parse("").is_err());
        assert!(Route::parse("///").is_err());
        assert!(Route::parse("product//:id").is_err());
        assert!(Route::parse("product/:").is_err());
        assert!(Route::parse("product/:id/:id").is_err());
        assert!(Route::parse("product/:i d").is_err());
        assert!(Route::parse("product?x=1").is_err());
    }

    #[test]
    fn test_matches_extracts_parameters() {
        let route = Route::parse("user/:user_id/order/:order_id").unwrap();
        let params = route.matches(&path("user/7/order/abc")).unwrap();
        assert_eq!(params["user_id"], "7");
        assert_eq!(params["order_id"], "abc");

        assert!(route.matches(&path("user/7/order")).is_none());
        assert!(route.matches(&path("user/7/orders/abc")).is_none());
    }

    #[test]
    fn test_priority_prefers_literals() {
        let literal = Route::parse("product/new").unwrap();
        let param = Route::parse("product/:id").unwrap();
        assert_eq!(literal.cmp_priority(&param), Ordering::Less);
        assert_eq!(param.cmp_priority(&literal), Ordering::Greater);

        let early_literal = Route::parse("product/featured/:x").unwrap();
        let late_literal = Route::parse("product/:id/reviews").unwrap();
        assert_eq!(early_literal.cmp_priority(&late_literal), Ordering::Less);
    }

    #[test]
    fn test_same_shape_ignores_parameter_names() {
        let a = Route::parse("product/:id").unwrap();
        let b = Route::parse("product/:product_id").unwrap();
        let c = Route::parse("product/new").unwrap();
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }

    #[test]
    fn test_build_path() {
        let route = Route::parse("search/:term").unwrap();
        let mut params = BTreeMap::new();
        params.insert("term".to_string(), "red shoes".to_string());
        assert_eq!(route.build_path(&params).unwrap(), "search/red%20shoes");

        params.insert("extra".to_string(), "1".to_string());
        assert!(matches!(
            route.build_path(&params),
            Err(HokoError::Validation(_))
        ));

        assert!(matches!(
            route.build_path(&BTreeMap::new()),
            Err(HokoError::Validation(_))
        ));
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let route = Route::parse("search/:term").unwrap();
        for value in [".", ".."] {
            let params = BTreeMap::from([("term".to_string(), value.to_string())]);
            assert!(matches!(
                route.build_path(&params),
                Err(HokoError::Validation(_))
            ));
        }

        let params = BTreeMap::from([("term".to_string(), "...".to_string())]);
        assert_eq!(route.build_path(&params).unwrap(), "search/...");

        assert!(matches!(
            Route::parse("docs/../admin"),
            Err(HokoError::InvalidRoute(_))
        ));
    }
}
