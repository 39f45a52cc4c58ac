//! Admin API 类型定义

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::services::LinkRow;
use crate::storage::ContentItem;

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../admin-ui/src/services/types.generated.ts";

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct GetLinksQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LinksResponse {
    pub links: Vec<LinkRow>,
    /// 内容条数（不是链接行数）
    pub total: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct GenerateLinksRequest {
    pub post_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct UpdateLinkRequest {
    pub utm_url: Option<String>,
}

/// POST /presets 请求体，preset 保持原始 JSON 以便判空
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreatePresetRequest {
    pub id: Option<String>,
    pub preset: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct BulkRequest {
    pub action: Option<String>,
}

/// 宿主保存通知：内容快照加保存类型标记
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ContentSavedRequest {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(default)]
    pub is_autosave: bool,
    #[serde(default)]
    pub is_revision: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct ShortenUrlRequest {
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct ShortenUrlResponse {
    pub short_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct QrRequest {
    pub url: String,
    pub post_id: Option<i64>,
    pub preset_id: Option<String>,
    /// 为 true 时下载并保存到本地
    #[serde(default)]
    pub save: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct QrResponse {
    pub qr_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct AnalyticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct NonceResponse {
    pub user: String,
    pub role: String,
    pub rest: String,
    pub bulk: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct TemplatePreviewResponse {
    pub post_id: i64,
    pub url: String,
}

/// 旧版 action 接口的表单
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LegacyActionForm {
    pub action: String,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub nonce: String,
}

/// 旧版 action 接口的响应 `{success, data}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LegacyResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LegacyMessage {
    pub message: String,
}
