//! Analytics 模块
//!
//! 用户识别与关键事件追踪。所有事件进入 [`EventQueue`]，由队列异步上传。

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::{Event, EventKind, EventQueue, User};
use crate::errors::{HokoError, Result};

pub struct Analytics {
    queue: EventQueue,
    current_user: RwLock<Option<User>>,
}

impl Analytics {
    pub fn new(queue: EventQueue) -> Self {
        Self {
            queue,
            current_user: RwLock::new(None),
        }
    }

    /// 识别用户，后续事件都会带上该用户标识
    pub fn identify_user(&self, user: User) -> Result<()> {
        if user.identifier.trim().is_empty() {
            return Err(HokoError::validation("User identifier cannot be empty"));
        }
        self.enqueue_identified(user);
        Ok(())
    }

    /// 以匿名用户身份识别，返回生成的用户
    pub fn identify_anonymous(&self) -> User {
        let user = User::anonymous();
        self.enqueue_identified(user.clone());
        user
    }

    fn enqueue_identified(&self, user: User) {
        info!(
            "Analytics: identified user {} ({})",
            user.identifier,
            user.account_type.as_ref()
        );

        let mut event = Event::new(EventKind::UserIdentified, user.identifier.clone());
        match serde_json::to_value(&user) {
            Ok(user_json) => event = event.with_property("user", user_json),
            Err(e) => warn!("Analytics: failed to serialize user {}: {}", user.identifier, e),
        }
        event.user_identifier = Some(user.identifier.clone());

        *self.current_user.write() = Some(user);
        self.queue.push(event);
    }

    /// 当前识别的用户
    pub fn current_user(&self) -> Option<User> {
        self.current_user.read().clone()
    }

    /// 追踪关键事件（如销售、推荐），`amount` 为可选的价值
    pub fn track_key_event(&self, name: &str, amount: Option<f64>) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HokoError::validation("Event name cannot be empty"));
        }
        if let Some(value) = amount
            && (!value.is_finite() || value < 0.0)
        {
            return Err(HokoError::validation(format!(
                "Event amount must be a non-negative number, got {}",
                value
            )));
        }

        self.record(Event::new(EventKind::KeyEvent, name).with_amount(amount));
        Ok(())
    }

    /// 记录事件，缺少用户标识时补上当前用户
    pub fn record(&self, mut event: Event) {
        if event.user_identifier.is_none() {
            event.user_identifier = self
                .current_user
                .read()
                .as_ref()
                .map(|u| u.identifier.clone());
        }
        debug!("Analytics: recording {} event {}", event.kind.as_ref(), event.name);
        self.queue.push(event);
    }

    /// 立即上传缓冲区中的事件，返回上传数量
    pub async fn flush(&self) -> usize {
        self.queue.flush().await
    }

    /// 待上传事件数
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn queue(&self) -> &EventQueue {
        &self.queue
    }
}
