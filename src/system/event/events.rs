use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{error, trace};

use crate::errors::Result;

/// 事件类型枚举
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 宿主保存了内容（文章/页面）
    ContentSaved,
    /// 某内容的 UTM 链接集合已重新生成
    LinksGenerated,
    /// 某内容的 UTM 链接被删除
    LinksDeleted,
    /// 批量任务完成
    BulkCompleted,
}

/// 事件数据结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// 事件唯一标识符
    pub id: String,
    pub event_type: EventType,
    pub timestamp: SystemTime,
    pub payload: EventPayload,
    /// 事件来源（rest / cli / generator ...）
    pub source: String,
}

/// 事件负载数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// 内容保存通知
    Content {
        item_id: i64,
        content_type: String,
        is_autosave: bool,
        is_revision: bool,
    },
    /// 链接变更
    Links { item_id: i64, preset_ids: Vec<String> },
    /// 批量任务结果
    Bulk {
        action: String,
        processed: usize,
        total: usize,
    },
}

/// 事件处理器特征
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &Event) -> Result<()>;

    /// 获取处理器名称
    fn name(&self) -> &str;

    /// 获取感兴趣的事件类型
    fn interested_events(&self) -> Vec<EventType>;
}

/// 事件总线，负责管理事件的发布和订阅
pub struct EventBus {
    handlers: RwLock<HashMap<EventType, Vec<Arc<dyn EventHandler>>>>,
    sender: broadcast::Sender<Event>,
    history: Mutex<VecDeque<Event>>,
    max_history: usize,
}

impl EventBus {
    pub fn new(max_history: usize) -> Self {
        let (sender, _) = broadcast::channel(256);

        Self {
            handlers: RwLock::new(HashMap::new()),
            sender,
            history: Mutex::new(VecDeque::with_capacity(max_history)),
            max_history,
        }
    }

    /// 注册事件处理器
    pub fn register_handler(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write();

        for event_type in handler.interested_events() {
            handlers
                .entry(event_type)
                .or_default()
                .push(handler.clone());
        }
    }

    /// 发布事件
    ///
    /// 处理器按注册顺序依次执行，单个处理器失败只记录日志，不影响其他处理器。
    pub async fn publish(&self, event: Event) {
        {
            let mut history = self.history.lock();
            history.push_back(event.clone());
            while history.len() > self.max_history {
                history.pop_front();
            }
        }

        // 没有订阅者时 send 返回 Err，属于正常情况
        if self.sender.send(event.clone()).is_err() {
            trace!("No broadcast subscribers for {:?}", event.event_type);
        }

        // 先复制处理器列表，避免跨 await 持有锁
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .handlers
            .read()
            .get(&event.event_type)
            .cloned()
            .unwrap_or_default();

        for handler in handlers {
            if let Err(e) = handler.handle(&event).await {
                error!("Event handler '{}' failed: {}", handler.name(), e);
            }
        }
    }

    /// 订阅事件流
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// 获取事件历史
    pub fn get_history(&self) -> Vec<Event> {
        self.history.lock().iter().cloned().collect()
    }

    /// 获取指定类型的事件历史
    pub fn get_history_by_type(&self, event_type: &EventType) -> Vec<Event> {
        self.history
            .lock()
            .iter()
            .filter(|event| &event.event_type == event_type)
            .cloned()
            .collect()
    }
}

/// 事件构建器
pub struct EventBuilder {
    event_type: EventType,
    source: String,
    payload: EventPayload,
}

impl EventBuilder {
    pub fn new(event_type: EventType, source: &str, payload: EventPayload) -> Self {
        Self {
            event_type,
            source: source.to_string(),
            payload,
        }
    }

    pub fn build(self) -> Event {
        Event {
            id: uuid::Uuid::new_v4().to_string(),
            event_type: self.event_type,
            timestamp: SystemTime::now(),
            payload: self.payload,
            source: self.source,
        }
    }
}

/// 便捷的事件创建函数
impl Event {
    /// 内容保存事件
    pub fn content_saved(
        item_id: i64,
        content_type: &str,
        is_autosave: bool,
        is_revision: bool,
        source: &str,
    ) -> Self {
        EventBuilder::new(
            EventType::ContentSaved,
            source,
            EventPayload::Content {
                item_id,
                content_type: content_type.to_string(),
                is_autosave,
                is_revision,
            },
        )
        .build()
    }

    /// 链接生成事件
    pub fn links_generated(item_id: i64, preset_ids: Vec<String>, source: &str) -> Self {
        EventBuilder::new(
            EventType::LinksGenerated,
            source,
            EventPayload::Links {
                item_id,
                preset_ids,
            },
        )
        .build()
    }

    /// 链接删除事件
    pub fn links_deleted(item_id: i64, preset_ids: Vec<String>, source: &str) -> Self {
        EventBuilder::new(
            EventType::LinksDeleted,
            source,
            EventPayload::Links {
                item_id,
                preset_ids,
            },
        )
        .build()
    }

    /// 批量任务完成事件
    pub fn bulk_completed(action: &str, processed: usize, total: usize, source: &str) -> Self {
        EventBuilder::new(
            EventType::BulkCompleted,
            source,
            EventPayload::Bulk {
                action: action.to_string(),
                processed,
                total,
            },
        )
        .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        hits: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: &Event) -> Result<()> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn interested_events(&self) -> Vec<EventType> {
            vec![EventType::ContentSaved]
        }
    }

    #[tokio::test]
    async fn test_publish_dispatches_to_interested_handlers() {
        let bus = EventBus::new(10);
        let handler = Arc::new(CountingHandler {
            hits: AtomicUsize::new(0),
        });
        bus.register_handler(handler.clone());

        bus.publish(Event::content_saved(1, "post", false, false, "test"))
            .await;
        bus.publish(Event::links_deleted(1, vec![], "test")).await;

        assert_eq!(handler.hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.get_history().len(), 2);
        assert_eq!(bus.get_history_by_type(&EventType::LinksDeleted).len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let bus = EventBus::new(3);
        for id in 0..5 {
            bus.publish(Event::links_generated(id, vec![], "test")).await;
        }

        let history = bus.get_history();
        assert_eq!(history.len(), 3);
        assert!(matches!(
            history[0].payload,
            EventPayload::Links { item_id: 2, .. }
        ));
    }
}
