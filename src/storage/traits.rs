//! 宿主存储抽象
//!
//! 对应内容管理平台提供的三类存储：站点选项、内容条目 meta、内容查询。

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;
use crate::storage::models::{ContentItem, ContentQuery};

/// 站点级 key-value 选项
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn get_option(&self, key: &str) -> Result<Option<Value>>;

    async fn set_option(&self, key: &str, value: &Value) -> Result<()>;

    /// 返回是否实际删除了记录
    async fn delete_option(&self, key: &str) -> Result<bool>;
}

/// 挂在内容条目上的 meta
#[async_trait]
pub trait MetaStore: Send + Sync {
    async fn get_meta(&self, item_id: i64, key: &str) -> Result<Option<Value>>;

    async fn set_meta(&self, item_id: i64, key: &str, value: &Value) -> Result<()>;

    async fn delete_meta(&self, item_id: i64, key: &str) -> Result<bool>;
}

/// 内容条目查询
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn get_item(&self, id: i64) -> Result<Option<ContentItem>>;

    /// 指定类型下所有已发布条目的 ID（升序）
    async fn published_ids(&self, content_types: &[String]) -> Result<Vec<i64>>;

    /// 带有指定 meta 的条目分页，返回 (当前页, 总数)
    async fn items_with_meta(
        &self,
        meta_key: &str,
        query: &ContentQuery,
    ) -> Result<(Vec<ContentItem>, u64)>;

    /// 写入宿主推送的内容快照
    async fn save_item(&self, item: &ContentItem) -> Result<()>;
}
