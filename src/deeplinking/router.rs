//! Deeplinking 模块
//!
//! 维护路由表并分发传入的 deeplink：
//! - 路由表使用 ArcSwap，读路径无锁
//! - 写入（map_route）串行化后整体替换
//! - 处理器在锁外调用，处理器内部可以继续映射路由

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::deeplink::{Deeplink, DeeplinkSource, build_url, parse_url};
use super::route::Route;
use crate::analytics::{Analytics, Event, EventKind};
use crate::errors::{HokoError, Result};

/// deeplink 处理器
pub type DeeplinkHandler = Arc<dyn Fn(&Deeplink) + Send + Sync>;

struct RouteEntry {
    route: Route,
    handler: DeeplinkHandler,
}

pub struct Deeplinking {
    url_scheme: String,
    /// 按匹配优先级排序
    routes: ArcSwap<Vec<Arc<RouteEntry>>>,
    write_lock: Mutex<()>,
    default_handler: RwLock<Option<DeeplinkHandler>>,
    handlers: RwLock<Vec<DeeplinkHandler>>,
    analytics: Option<Arc<Analytics>>,
}

impl Deeplinking {
    /// 创建 Deeplinking 模块，`url_scheme` 用于生成 deeplink
    pub fn new(url_scheme: &str, analytics: Option<Arc<Analytics>>) -> Self {
        Self {
            url_scheme: url_scheme.to_string(),
            routes: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
            default_handler: RwLock::new(None),
            handlers: RwLock::new(Vec::new()),
            analytics,
        }
    }

    pub fn url_scheme(&self) -> &str {
        &self.url_scheme
    }

    /// 映射路由到处理器
    ///
    /// 形状相同的路由（仅参数名不同）会替换之前的映射。
    pub fn map_route<F>(&self, route: &str, handler: F) -> Result<()>
    where
        F: Fn(&Deeplink) + Send + Sync + 'static,
    {
        let route = Route::parse(route)?;
        let entry = Arc::new(RouteEntry {
            route,
            handler: Arc::new(handler),
        });

        let _guard = self.write_lock.lock();
        let mut next: Vec<Arc<RouteEntry>> = self.routes.load().iter().cloned().collect();
        if let Some(pos) = next.iter().position(|e| e.route.same_shape(&entry.route)) {
            warn!(
                "Deeplinking: route '{}' replaces previously mapped '{}'",
                entry.route,
                next[pos].route
            );
            next.remove(pos);
        } else {
            info!("Deeplinking: mapped route '{}'", entry.route);
        }
        next.push(entry);
        next.sort_by(|a, b| a.route.cmp_priority(&b.route));
        self.routes.store(Arc::new(next));
        Ok(())
    }

    /// 设置默认处理器（没有路由匹配时调用）
    pub fn map_default_route<F>(&self, handler: F)
    where
        F: Fn(&Deeplink) + Send + Sync + 'static,
    {
        *self.default_handler.write() = Some(Arc::new(handler));
        debug!("Deeplinking: default route handler set");
    }

    /// 添加全局处理器，每个被处理的 deeplink 都会在路由处理器之后触发
    pub fn add_handler<F>(&self, handler: F)
    where
        F: Fn(&Deeplink) + Send + Sync + 'static,
    {
        self.handlers.write().push(Arc::new(handler));
    }

    /// 已映射的路由（按匹配优先级排序）
    pub fn routes(&self) -> Vec<String> {
        self.routes
            .load()
            .iter()
            .map(|e| e.route.pattern().to_string())
            .collect()
    }

    /// 解析 URL 并匹配路由，不调用任何处理器
    pub fn resolve(&self, url: &str) -> Option<Deeplink> {
        self.resolve_entry(url, DeeplinkSource::Url)
            .map(|(deeplink, _)| deeplink)
    }

    /// 是否有已映射的路由可以处理该 URL（不含默认路由）
    pub fn can_open_url(&self, url: &str) -> bool {
        self.resolve(url).is_some()
    }

    /// 处理系统打开的 URL
    pub fn handle_open_url(&self, url: &str) -> bool {
        self.handle_open_url_from(url, DeeplinkSource::Url)
    }

    /// 处理 URL，返回是否被路由或默认路由处理
    pub fn handle_open_url_from(&self, url: &str, source: DeeplinkSource) -> bool {
        let (deeplink, handler) = match self.resolve_entry(url, source) {
            Some((deeplink, entry)) => (deeplink, entry.handler.clone()),
            None => {
                let Some(default) = self.default_handler.read().clone() else {
                    debug!("Deeplinking: no route for {}", url);
                    return false;
                };
                let Ok(parsed) = parse_url(url) else {
                    warn!("Deeplinking: cannot parse URL {}", url);
                    return false;
                };
                let deeplink = Deeplink {
                    url_scheme: parsed.scheme,
                    route: None,
                    route_parameters: BTreeMap::new(),
                    query_parameters: parsed.query,
                    source,
                    url: url.trim().to_string(),
                };
                (deeplink, default)
            }
        };

        debug!(
            "Deeplinking: handling {} with route {:?}",
            deeplink.url, deeplink.route
        );
        handler(&deeplink);

        let handlers: Vec<DeeplinkHandler> = self.handlers.read().clone();
        for global in handlers {
            global(&deeplink);
        }

        self.track_open(&deeplink);
        true
    }

    /// 生成 deeplink
    ///
    /// 路由必须已映射，所有路由参数必须提供。
    pub fn generate_deeplink(
        &self,
        route: &str,
        route_parameters: BTreeMap<String, String>,
        query_parameters: BTreeMap<String, String>,
    ) -> Result<Deeplink> {
        let wanted = Route::parse(route)?;
        let routes = self.routes.load();
        let entry = routes
            .iter()
            .find(|e| e.route == wanted)
            .ok_or_else(|| HokoError::not_found(format!("Route '{}' is not mapped", wanted)))?;

        let path = entry.route.build_path(&route_parameters)?;
        let url = build_url(&self.url_scheme, &path, &query_parameters);

        Ok(Deeplink {
            url_scheme: self.url_scheme.clone(),
            route: Some(entry.route.pattern().to_string()),
            route_parameters,
            query_parameters,
            source: DeeplinkSource::Generated,
            url,
        })
    }

    fn resolve_entry(
        &self,
        url: &str,
        source: DeeplinkSource,
    ) -> Option<(Deeplink, Arc<RouteEntry>)> {
        let parsed = match parse_url(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Deeplinking: {}", e);
                return None;
            }
        };

        let routes = self.routes.load();
        routes.iter().find_map(|entry| {
            entry.route.matches(&parsed.segments).map(|params| {
                let deeplink = Deeplink {
                    url_scheme: parsed.scheme.clone(),
                    route: Some(entry.route.pattern().to_string()),
                    route_parameters: params,
                    query_parameters: parsed.query.clone(),
                    source,
                    url: url.trim().to_string(),
                };
                (deeplink, Arc::clone(entry))
            })
        })
    }

    fn track_open(&self, deeplink: &Deeplink) {
        let Some(ref analytics) = self.analytics else {
            return;
        };
        let name = deeplink.route.as_deref().unwrap_or("default");
        analytics.record(
            Event::new(EventKind::DeeplinkOpened, name)
                .with_property("url", deeplink.url.clone())
                .with_property("source", deeplink.source.as_ref()),
        );
    }
}
