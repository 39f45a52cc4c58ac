//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use super::types::TS_EXPORT_PATH;
use crate::errors::UtmError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接错误
/// - 4000-4099: 预设与模板错误
/// - 5000-5099: 批量处理错误
/// - 6000-6099: 外部集成错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    SettingsInvalid = 1020,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    NonceInvalid = 2003,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkInvalidUrl = 3001,
    ItemNotFound = 3002,
    InvalidParameters = 3003,

    // 预设与模板错误 4000-4099
    PresetNotFound = 4000,
    PresetInvalidId = 4001,
    TemplateInvalid = 4002,
    PreviewUnavailable = 4003,

    // 批量处理错误 5000-5099
    BulkAborted = 5000,
    BulkInvalidAction = 5001,

    // 外部集成错误 6000-6099
    ExternalServiceFailed = 6000,
    ShortenFailed = 6001,
    QrFailed = 6002,
    AnalyticsNotConfigured = 6003,
}

impl From<&UtmError> for ErrorCode {
    fn from(err: &UtmError) -> Self {
        match err {
            UtmError::Validation(_) => ErrorCode::BadRequest,
            UtmError::NotFound(_) => ErrorCode::NotFound,
            UtmError::PresetNotFound(_) => ErrorCode::PresetNotFound,
            UtmError::LinkNotFound(_) => ErrorCode::LinkNotFound,
            UtmError::PermissionDenied(_) => ErrorCode::Forbidden,
            UtmError::Auth(_) => ErrorCode::Unauthorized,
            UtmError::BulkAborted(_) => ErrorCode::BulkAborted,
            UtmError::ExternalService(_) => ErrorCode::ExternalServiceFailed,
            UtmError::DatabaseConfig(_)
            | UtmError::DatabaseConnection(_)
            | UtmError::DatabaseOperation(_)
            | UtmError::FileOperation(_)
            | UtmError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::PresetNotFound).unwrap(),
            "4000"
        );
    }

    #[test]
    fn test_from_utm_error() {
        assert_eq!(
            ErrorCode::from(&UtmError::link_not_found("Link not found.")),
            ErrorCode::LinkNotFound
        );
        assert_eq!(
            ErrorCode::from(&UtmError::bulk_aborted("No posts found.")),
            ErrorCode::BulkAborted
        );
        assert_eq!(
            ErrorCode::from(&UtmError::database_operation("boom")),
            ErrorCode::InternalServerError
        );
    }
}
