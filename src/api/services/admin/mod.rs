//! Admin API 服务模块
//!
//! 该模块包含 REST 接口的所有端点，包括：
//! - 链接浏览、生成、编辑、删除
//! - 预设与模板管理
//! - 批量处理与旧版 action 接口
//! - 设置管理
//! - 短链、二维码、活动统计

mod auth;
mod bulk;
mod content;
pub mod error_code;
mod helpers;
mod legacy;
mod links;
mod presets;
pub mod routes;
mod settings;
mod templates;
mod tools;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{api_result, error_from_utm, error_response, success_response};

// 重新导出错误码
pub use error_code::ErrorCode;
