//! 插件运行时设置
//!
//! 每个设置项是一个独立的站点选项，缺失时使用默认值。

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, EnumIter, EnumString};
use tracing::{debug, info};

use crate::errors::{Result, UtmError};
use crate::storage::{OptionStore, TYPE_PAGE, TYPE_POST};
use crate::utils::clean_optional_url;
use crate::utm::sanitize_text_field;

/// 设置项对应的站点选项 key
pub mod keys {
    pub const ENABLE_AUTO_GENERATE: &str = "smart_utm_enable_auto_generate";
    pub const INCLUDE_PAGES: &str = "smart_utm_include_pages";
    pub const INCLUDE_POSTS: &str = "smart_utm_include_posts";
    pub const GENERATE_ON_PUBLISH: &str = "smart_utm_generate_on_publish";
    pub const SHORTENER_SERVICE: &str = "smart_utm_shortener_service";
    pub const BITLY_API_KEY: &str = "smart_utm_bitly_api_key";
    pub const REBRANDLY_API_KEY: &str = "smart_utm_rebrandly_api_key";
    pub const CUSTOM_SHORTENER_ENDPOINT: &str = "smart_utm_custom_shortener_endpoint";
    pub const CUSTOM_SHORTENER_API_KEY: &str = "smart_utm_custom_shortener_api_key";
    pub const GA4_PROPERTY_ID: &str = "smart_utm_ga4_property_id";
    pub const GA4_CREDENTIALS: &str = "smart_utm_ga4_credentials";
}

/// GET 响应中敏感字段的占位值；更新时遇到该值表示保持不变
pub const SECRET_MASK: &str = "********";

/// 短链服务商
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShortenerProvider {
    Bitly,
    Rebrandly,
    Custom,
}

/// 完整设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmSettings {
    pub enable_auto_generate: bool,
    pub include_pages: bool,
    pub include_posts: bool,
    pub generate_on_publish: bool,
    pub shortener_service: Option<ShortenerProvider>,
    pub bitly_api_key: String,
    pub rebrandly_api_key: String,
    pub custom_shortener_endpoint: String,
    pub custom_shortener_api_key: String,
    pub ga4_property_id: String,
    pub ga4_credentials: String,
}

impl Default for UtmSettings {
    fn default() -> Self {
        Self {
            enable_auto_generate: true,
            include_pages: true,
            include_posts: true,
            generate_on_publish: true,
            shortener_service: None,
            bitly_api_key: String::new(),
            rebrandly_api_key: String::new(),
            custom_shortener_endpoint: String::new(),
            custom_shortener_api_key: String::new(),
            ga4_property_id: String::new(),
            ga4_credentials: String::new(),
        }
    }
}

impl UtmSettings {
    /// 参与批量处理和链接列表的内容类型
    pub fn enabled_content_types(&self) -> Vec<String> {
        let mut types = Vec::new();
        if self.include_posts {
            types.push(TYPE_POST.to_string());
        }
        if self.include_pages {
            types.push(TYPE_PAGE.to_string());
        }
        types
    }

    /// 对外展示时隐藏凭据
    pub fn masked(&self) -> Self {
        fn mask(s: &str) -> String {
            if s.is_empty() {
                String::new()
            } else {
                SECRET_MASK.to_string()
            }
        }

        Self {
            bitly_api_key: mask(&self.bitly_api_key),
            rebrandly_api_key: mask(&self.rebrandly_api_key),
            custom_shortener_api_key: mask(&self.custom_shortener_api_key),
            ga4_credentials: mask(&self.ga4_credentials),
            ..self.clone()
        }
    }
}

/// 部分更新，未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub enable_auto_generate: Option<bool>,
    pub include_pages: Option<bool>,
    pub include_posts: Option<bool>,
    pub generate_on_publish: Option<bool>,
    /// 空串表示关闭短链
    pub shortener_service: Option<String>,
    pub bitly_api_key: Option<String>,
    pub rebrandly_api_key: Option<String>,
    pub custom_shortener_endpoint: Option<String>,
    pub custom_shortener_api_key: Option<String>,
    pub ga4_property_id: Option<String>,
    pub ga4_credentials: Option<String>,
}

/// 宿主可能把布尔值存成 1/0 或 "yes"/"no"
fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_provider(raw: &str) -> Result<Option<ShortenerProvider>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    ShortenerProvider::from_str(&raw.to_lowercase())
        .map(Some)
        .map_err(|_| UtmError::validation(format!("Invalid shortener service: {}", raw)))
}

pub struct SettingsService {
    options: Arc<dyn OptionStore>,
}

impl SettingsService {
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self { options }
    }

    async fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self
            .options
            .get_option(key)
            .await?
            .as_ref()
            .and_then(value_as_bool)
            .unwrap_or(default))
    }

    async fn get_string(&self, key: &str) -> Result<String> {
        Ok(self
            .options
            .get_option(key)
            .await?
            .as_ref()
            .map(value_as_string)
            .unwrap_or_default())
    }

    /// 读取当前设置
    pub async fn load(&self) -> Result<UtmSettings> {
        let defaults = UtmSettings::default();
        let provider = self.get_string(keys::SHORTENER_SERVICE).await?;

        Ok(UtmSettings {
            enable_auto_generate: self
                .get_bool(keys::ENABLE_AUTO_GENERATE, defaults.enable_auto_generate)
                .await?,
            include_pages: self
                .get_bool(keys::INCLUDE_PAGES, defaults.include_pages)
                .await?,
            include_posts: self
                .get_bool(keys::INCLUDE_POSTS, defaults.include_posts)
                .await?,
            generate_on_publish: self
                .get_bool(keys::GENERATE_ON_PUBLISH, defaults.generate_on_publish)
                .await?,
            // 存储了未知服务商时视为未启用
            shortener_service: parse_provider(&provider).unwrap_or(None),
            bitly_api_key: self.get_string(keys::BITLY_API_KEY).await?,
            rebrandly_api_key: self.get_string(keys::REBRANDLY_API_KEY).await?,
            custom_shortener_endpoint: self.get_string(keys::CUSTOM_SHORTENER_ENDPOINT).await?,
            custom_shortener_api_key: self.get_string(keys::CUSTOM_SHORTENER_API_KEY).await?,
            ga4_property_id: self.get_string(keys::GA4_PROPERTY_ID).await?,
            ga4_credentials: self.get_string(keys::GA4_CREDENTIALS).await?,
        })
    }

    /// 首次启动时写入缺失的开关默认值，已有值不覆盖
    pub async fn ensure_defaults(&self) -> Result<()> {
        let defaults = [
            keys::ENABLE_AUTO_GENERATE,
            keys::INCLUDE_PAGES,
            keys::INCLUDE_POSTS,
            keys::GENERATE_ON_PUBLISH,
        ];

        for key in defaults {
            if self.options.get_option(key).await?.is_none() {
                self.options.set_option(key, &Value::Bool(true)).await?;
                debug!("Default setting written: {}", key);
            }
        }
        Ok(())
    }

    /// 应用部分更新并返回最新设置
    pub async fn update(&self, patch: &SettingsUpdate) -> Result<UtmSettings> {
        // 先完成全部校验，避免写入一半
        let provider = match patch.shortener_service.as_deref() {
            Some(raw) => Some(parse_provider(raw)?),
            None => None,
        };
        let endpoint = match patch.custom_shortener_endpoint.as_deref() {
            Some(raw) => Some(clean_optional_url(raw).map_err(|e| {
                UtmError::validation(format!("Invalid custom shortener endpoint: {}", e))
            })?),
            None => None,
        };

        let flags = [
            (keys::ENABLE_AUTO_GENERATE, patch.enable_auto_generate),
            (keys::INCLUDE_PAGES, patch.include_pages),
            (keys::INCLUDE_POSTS, patch.include_posts),
            (keys::GENERATE_ON_PUBLISH, patch.generate_on_publish),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                self.options.set_option(key, &Value::Bool(value)).await?;
            }
        }

        if let Some(provider) = provider {
            let stored = provider.map(|p| p.as_ref().to_string()).unwrap_or_default();
            self.options
                .set_option(keys::SHORTENER_SERVICE, &Value::String(stored))
                .await?;
        }

        if let Some(endpoint) = endpoint {
            self.options
                .set_option(keys::CUSTOM_SHORTENER_ENDPOINT, &Value::String(endpoint))
                .await?;
        }

        let texts = [
            (keys::BITLY_API_KEY, &patch.bitly_api_key),
            (keys::REBRANDLY_API_KEY, &patch.rebrandly_api_key),
            (keys::CUSTOM_SHORTENER_API_KEY, &patch.custom_shortener_api_key),
            (keys::GA4_PROPERTY_ID, &patch.ga4_property_id),
        ];
        for (key, value) in texts {
            if let Some(value) = value.as_deref().filter(|v| *v != SECRET_MASK) {
                self.options
                    .set_option(key, &Value::String(sanitize_text_field(value)))
                    .await?;
            }
        }

        // 凭据是多行 JSON，只去首尾空白
        if let Some(credentials) = patch
            .ga4_credentials
            .as_deref()
            .filter(|v| *v != SECRET_MASK)
        {
            self.options
                .set_option(
                    keys::GA4_CREDENTIALS,
                    &Value::String(credentials.trim().to_string()),
                )
                .await?;
        }

        info!("Settings updated");
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_as_bool() {
        assert_eq!(value_as_bool(&json!(true)), Some(true));
        assert_eq!(value_as_bool(&json!(0)), Some(false));
        assert_eq!(value_as_bool(&json!("1")), Some(true));
        assert_eq!(value_as_bool(&json!("no")), Some(false));
        assert_eq!(value_as_bool(&json!("maybe")), None);
        assert_eq!(value_as_bool(&json!([])), None);
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("").unwrap(), None);
        assert_eq!(
            parse_provider("Bitly").unwrap(),
            Some(ShortenerProvider::Bitly)
        );
        assert_eq!(
            parse_provider("custom").unwrap(),
            Some(ShortenerProvider::Custom)
        );
        assert!(parse_provider("tinyurl").is_err());
    }

    #[test]
    fn test_enabled_content_types() {
        let mut settings = UtmSettings::default();
        assert_eq!(settings.enabled_content_types(), vec!["post", "page"]);

        settings.include_posts = false;
        assert_eq!(settings.enabled_content_types(), vec!["page"]);

        settings.include_pages = false;
        assert!(settings.enabled_content_types().is_empty());
    }

    #[test]
    fn test_masked_hides_only_present_secrets() {
        let settings = UtmSettings {
            bitly_api_key: "secret".into(),
            ga4_property_id: "12345".into(),
            ..Default::default()
        };
        let masked = settings.masked();
        assert_eq!(masked.bitly_api_key, SECRET_MASK);
        assert_eq!(masked.rebrandly_api_key, "");
        assert_eq!(masked.ga4_property_id, "12345");
    }
}
