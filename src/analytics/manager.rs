//! 事件上传队列
//!
//! 负责缓冲分析事件并异步上传，支持：
//! - 高并发写入（使用 DashMap）
//! - 定时刷新到后端
//! - 阈值触发刷新
//! - 上传失败时恢复到缓冲区，并暂停阈值刷新直到下一次定时或手动刷新
//! - 缓冲区上限（超出时丢弃最旧事件）

use dashmap::DashMap;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};
use tracing::{debug, trace, warn};

use super::{Event, EventSink};

/// 事件缓冲区，封装所有可变状态
struct EventBuffer {
    /// 序号 → 事件，序号保证上传顺序
    data: DashMap<u64, Event>,
    next_id: AtomicU64,
    /// 刷新锁，防止并发上传
    flush_lock: Mutex<()>,
    /// 是否有 flush 任务待处理（防止重复 spawn）
    flush_pending: AtomicBool,
    /// 上次上传失败，阈值刷新暂停
    threshold_suppressed: AtomicBool,
    /// 缓冲区上限
    max_pending: usize,
}

impl EventBuffer {
    fn new(max_pending: usize) -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicU64::new(0),
            flush_lock: Mutex::new(()),
            flush_pending: AtomicBool::new(false),
            threshold_suppressed: AtomicBool::new(false),
            max_pending,
        }
    }

    /// 添加事件，返回当前缓冲区大小
    fn push(&self, event: Event) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.data.insert(id, event);
        self.data.len()
    }

    /// 丢弃最旧的事件直到缓冲区不超过 `max`，返回丢弃数量
    fn truncate_oldest(&self, max: usize) -> usize {
        let mut dropped = 0;
        while self.data.len() > max {
            let Some(oldest) = self.data.iter().map(|r| *r.key()).min() else {
                break;
            };
            if self.data.remove(&oldest).is_some() {
                dropped += 1;
            }
        }
        dropped
    }

    /// 按序号顺序取出所有事件（只删除 snapshot 中的 key，不影响窗口期新增）
    fn drain(&self) -> Vec<(u64, Event)> {
        let mut keys: Vec<u64> = self.data.iter().map(|r| *r.key()).collect();
        keys.sort_unstable();

        let mut events = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(entry) = self.data.remove(&key) {
                events.push(entry);
            }
        }
        events
    }

    /// 上传失败时恢复，沿用原序号以保持顺序
    ///
    /// 恢复期间可能有新事件写入，恢复后重新应用缓冲区上限。
    fn restore(&self, events: Vec<(u64, Event)>) {
        for (id, event) in events {
            self.data.insert(id, event);
        }
        let dropped = self.truncate_oldest(self.max_pending);
        if dropped > 0 {
            warn!(
                "EventQueue: buffer full after restore, dropped {} oldest events (limit {})",
                dropped, self.max_pending
            );
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

/// 事件队列
///
/// 状态完全封装在结构体内部，每个 SDK 实例持有自己的队列。
#[derive(Clone)]
pub struct EventQueue {
    buffer: Arc<EventBuffer>,
    sink: Arc<dyn EventSink>,
    flush_interval: Duration,
    /// 触发刷新的事件数
    max_events_before_flush: usize,
}

impl EventQueue {
    pub fn new(
        sink: Arc<dyn EventSink>,
        flush_interval: Duration,
        max_events_before_flush: usize,
        max_pending_events: usize,
    ) -> Self {
        let max_events_before_flush = max_events_before_flush.max(1);
        Self {
            buffer: Arc::new(EventBuffer::new(
                max_pending_events.max(max_events_before_flush),
            )),
            sink,
            flush_interval,
            max_events_before_flush,
        }
    }

    /// 添加事件（线程安全）
    ///
    /// 达到阈值时在当前 tokio runtime 上 spawn 一次刷新；
    /// 没有 runtime 时事件留在缓冲区，等待手动 flush。
    /// 上次上传失败后不再触发阈值刷新，事件留给下一次定时或手动刷新。
    pub fn push(&self, event: Event) {
        let mut current_size = self.buffer.push(event);
        trace!("EventQueue: Current buffer size: {}", current_size);

        if current_size > self.buffer.max_pending {
            let dropped = self.buffer.truncate_oldest(self.buffer.max_pending);
            current_size = self.buffer.len();
            warn!(
                "EventQueue: buffer full, dropped {} oldest events (limit {})",
                dropped, self.buffer.max_pending
            );
        }

        if current_size < self.max_events_before_flush {
            return;
        }

        if self.buffer.threshold_suppressed.load(Ordering::Acquire) {
            trace!("EventQueue: last upload failed, waiting for next scheduled flush");
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            trace!("EventQueue: no tokio runtime, threshold flush deferred");
            return;
        };

        // 只有成功将 flush_pending 从 false 设为 true 的调用方才 spawn
        if self
            .buffer
            .flush_pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok()
        {
            let buffer = Arc::clone(&self.buffer);
            let sink = Arc::clone(&self.sink);
            runtime.spawn(async move {
                if let Ok(_guard) = buffer.flush_lock.try_lock() {
                    Self::flush_buffer(&buffer, &sink).await;
                } else {
                    trace!("EventQueue: flush already in progress, skipping");
                }
                buffer.flush_pending.store(false, Ordering::Release);
            });
        }
    }

    /// 后台定时刷新任务（作为异步方法运行，永不返回）
    pub async fn start_background_task(&self) {
        loop {
            sleep(self.flush_interval).await;

            debug!("EventQueue: Triggering scheduled flush");
            if let Ok(_guard) = self.buffer.flush_lock.try_lock() {
                Self::flush_buffer(&self.buffer, &self.sink).await;
            } else {
                trace!("EventQueue: flush already in progress, skipping scheduled flush");
            }
        }
    }

    /// 手动刷新（等待进行中的刷新完成），返回成功上传的事件数
    pub async fn flush(&self) -> usize {
        debug!("EventQueue: Manual flush triggered");
        let _guard = self.buffer.flush_lock.lock().await;
        Self::flush_buffer(&self.buffer, &self.sink).await
    }

    async fn flush_buffer(buffer: &EventBuffer, sink: &Arc<dyn EventSink>) -> usize {
        let drained = buffer.drain();

        if drained.is_empty() {
            trace!("EventQueue: No events to flush");
            return 0;
        }

        let count = drained.len();
        let events: Vec<Event> = drained.iter().map(|(_, e)| e.clone()).collect();
        match sink.send_events(events).await {
            Ok(_) => {
                buffer.threshold_suppressed.store(false, Ordering::Release);
                debug!("EventQueue: Successfully uploaded {} events", count);
                count
            }
            Err(e) => {
                buffer.threshold_suppressed.store(true, Ordering::Release);
                buffer.restore(drained);
                warn!(
                    "EventQueue: send_events failed: {}, {} events restored to buffer",
                    e, count
                );
                0
            }
        }
    }

    /// 当前缓冲区中的事件数
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
