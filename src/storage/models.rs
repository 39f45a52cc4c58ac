use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 已发布状态
pub const STATUS_PUBLISH: &str = "publish";

/// 内置内容类型
pub const TYPE_POST: &str = "post";
pub const TYPE_PAGE: &str = "page";

/// 宿主内容快照
///
/// 由宿主通过保存通知推送，本服务只读不改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub permalink: Option<String>,
    /// 作者 nicename
    #[serde(default)]
    pub author: String,
    /// 分类 slug，第一个为主分类
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn is_published(&self) -> bool {
        self.status == STATUS_PUBLISH
    }
}

fn default_content_type() -> String {
    TYPE_POST.to_string()
}

fn default_status() -> String {
    STATUS_PUBLISH.to_string()
}

/// 带 meta 的内容分页查询条件
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    pub content_types: Vec<String>,
    pub status: Option<String>,
    /// 模糊匹配标题或 slug
    pub search: Option<String>,
    /// 从 1 开始
    pub page: u64,
    pub per_page: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
