//! UTM 链接构建核心
//!
//! 纯函数部分：参数定义、占位符替换、文本清洗、URL 拼接。

pub mod builder;
pub mod params;
pub mod placeholder;
pub mod sanitize;

pub use builder::{build_for_item, build_utm_url};
pub use params::{UtmFields, UtmParam};
pub use placeholder::{ContentSnapshot, DEFAULT_CATEGORY, Placeholder, replace_placeholders};
pub use sanitize::{sanitize_key, sanitize_text_field, sanitize_title};
