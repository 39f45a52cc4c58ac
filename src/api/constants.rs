//! API 模块常量定义
//!
//! 包含认证、nonce 等相关的硬编码常量。

/// 携带 nonce 的请求头
pub const NONCE_HEADER: &str = "X-UTM-Nonce";

/// REST 调用使用的 nonce action
pub const NONCE_ACTION_REST: &str = "rest";

/// 批量处理（旧版 action 接口）使用的 nonce action
pub const NONCE_ACTION_BULK: &str = "bulk";

/// 旧版 action 接口唯一接受的 action 名
pub const LEGACY_BULK_ACTION: &str = "smart_utm_bulk_process";

/// Access token 类型标记
pub const TOKEN_TYPE_ACCESS: &str = "access";

/// Nonce token 类型标记
pub const TOKEN_TYPE_NONCE: &str = "nonce";
