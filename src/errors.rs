use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum UtmError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    PresetNotFound(String),
    LinkNotFound(String),
    PermissionDenied(String),
    Serialization(String),
    BulkAborted(String),
    ExternalService(String),
    Auth(String),
}

impl UtmError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            UtmError::DatabaseConfig(_) => "E001",
            UtmError::DatabaseConnection(_) => "E002",
            UtmError::DatabaseOperation(_) => "E003",
            UtmError::FileOperation(_) => "E004",
            UtmError::Validation(_) => "E005",
            UtmError::NotFound(_) => "E006",
            UtmError::PresetNotFound(_) => "E007",
            UtmError::LinkNotFound(_) => "E008",
            UtmError::PermissionDenied(_) => "E009",
            UtmError::Serialization(_) => "E010",
            UtmError::BulkAborted(_) => "E011",
            UtmError::ExternalService(_) => "E012",
            UtmError::Auth(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            UtmError::DatabaseConfig(_) => "Database Configuration Error",
            UtmError::DatabaseConnection(_) => "Database Connection Error",
            UtmError::DatabaseOperation(_) => "Database Operation Error",
            UtmError::FileOperation(_) => "File Operation Error",
            UtmError::Validation(_) => "Validation Error",
            UtmError::NotFound(_) => "Resource Not Found",
            UtmError::PresetNotFound(_) => "Preset Not Found",
            UtmError::LinkNotFound(_) => "Link Not Found",
            UtmError::PermissionDenied(_) => "Permission Denied",
            UtmError::Serialization(_) => "Serialization Error",
            UtmError::BulkAborted(_) => "Bulk Operation Aborted",
            UtmError::ExternalService(_) => "External Service Error",
            UtmError::Auth(_) => "Authentication Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            UtmError::DatabaseConfig(msg)
            | UtmError::DatabaseConnection(msg)
            | UtmError::DatabaseOperation(msg)
            | UtmError::FileOperation(msg)
            | UtmError::Validation(msg)
            | UtmError::NotFound(msg)
            | UtmError::PresetNotFound(msg)
            | UtmError::LinkNotFound(msg)
            | UtmError::PermissionDenied(msg)
            | UtmError::Serialization(msg)
            | UtmError::BulkAborted(msg)
            | UtmError::ExternalService(msg)
            | UtmError::Auth(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            UtmError::Validation(_) | UtmError::BulkAborted(_) => StatusCode::BAD_REQUEST,
            UtmError::NotFound(_) | UtmError::PresetNotFound(_) | UtmError::LinkNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            UtmError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            UtmError::Auth(_) => StatusCode::UNAUTHORIZED,
            UtmError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            UtmError::DatabaseConfig(_)
            | UtmError::DatabaseConnection(_)
            | UtmError::DatabaseOperation(_)
            | UtmError::FileOperation(_)
            | UtmError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for UtmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for UtmError {}

// 便捷的构造函数
impl UtmError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        UtmError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        UtmError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        UtmError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        UtmError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        UtmError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        UtmError::NotFound(msg.into())
    }

    pub fn preset_not_found<T: Into<String>>(msg: T) -> Self {
        UtmError::PresetNotFound(msg.into())
    }

    pub fn link_not_found<T: Into<String>>(msg: T) -> Self {
        UtmError::LinkNotFound(msg.into())
    }

    pub fn permission_denied<T: Into<String>>(msg: T) -> Self {
        UtmError::PermissionDenied(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        UtmError::Serialization(msg.into())
    }

    pub fn bulk_aborted<T: Into<String>>(msg: T) -> Self {
        UtmError::BulkAborted(msg.into())
    }

    pub fn external_service<T: Into<String>>(msg: T) -> Self {
        UtmError::ExternalService(msg.into())
    }

    pub fn auth<T: Into<String>>(msg: T) -> Self {
        UtmError::Auth(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for UtmError {
    fn from(err: sea_orm::DbErr) -> Self {
        UtmError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for UtmError {
    fn from(err: std::io::Error) -> Self {
        UtmError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for UtmError {
    fn from(err: serde_json::Error) -> Self {
        UtmError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for UtmError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        UtmError::Auth(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UtmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            UtmError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UtmError::preset_not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            UtmError::link_not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            UtmError::permission_denied("x").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            UtmError::bulk_aborted("No posts found.").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UtmError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = UtmError::preset_not_found("Preset not found.");
        assert_eq!(err.format_simple(), "Preset Not Found: Preset not found.");
        assert_eq!(err.to_string(), err.format_simple());
    }
}
