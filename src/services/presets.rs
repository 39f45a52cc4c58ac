//! 预设存储
//!
//! 预设 = 一个渠道的 UTM 配置，整体作为 JSON 对象存放在单个站点选项中。

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{Result, UtmError};
use crate::storage::OptionStore;
use crate::utm::params::lenient_text;
use crate::utm::{UtmFields, sanitize_key, sanitize_text_field};

/// 站点选项 key
pub const PRESETS_OPTION: &str = "smart_utm_presets";

/// 单个渠道预设
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: UtmFields,
}

impl Preset {
    fn sanitized(&self) -> Self {
        Self {
            name: self.name.as_deref().map(sanitize_text_field),
            fields: self.fields.sanitized(),
        }
    }
}

/// 以 ID 为 key，按字母序
pub type PresetMap = BTreeMap<String, Preset>;

fn preset(name: &str, source: &str, medium: &str, campaign: &str, content: &str) -> Preset {
    Preset {
        name: Some(name.to_string()),
        fields: UtmFields {
            utm_source: Some(source.to_string()),
            utm_medium: Some(medium.to_string()),
            utm_campaign: Some(campaign.to_string()),
            utm_content: Some(content.to_string()),
            utm_term: None,
        },
    }
}

/// 内置预设
pub fn default_presets() -> PresetMap {
    BTreeMap::from([
        (
            "facebook".to_string(),
            preset("Facebook", "facebook", "social", "{post_slug}", "{author}"),
        ),
        (
            "instagram".to_string(),
            preset("Instagram", "instagram", "social", "{category}", "{post_title}"),
        ),
        (
            "email".to_string(),
            preset("Email", "newsletter", "email", "weekly_update", "{post_id}"),
        ),
        (
            "telegram".to_string(),
            preset("Telegram", "telegram", "social", "{category}", "{post_title}"),
        ),
    ])
}

/// 预设 ID 统一按 key 规则规范化，读写删使用同一个 key
fn normalize_id(id: &str) -> Result<String> {
    let key = sanitize_key(id);
    if key.is_empty() {
        return Err(UtmError::validation("Invalid preset ID."));
    }
    Ok(key)
}

pub struct PresetStore {
    options: Arc<dyn OptionStore>,
}

impl PresetStore {
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self { options }
    }

    /// 获取全部预设；首次访问且未存储时写入内置预设
    pub async fn list(&self) -> Result<PresetMap> {
        match self.options.get_option(PRESETS_OPTION).await? {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                warn!("Stored presets are malformed: {}", e);
                UtmError::serialization(format!("Stored presets are malformed: {}", e))
            }),
            None => {
                let defaults = default_presets();
                self.save(&defaults).await?;
                info!("Seeded {} default presets", defaults.len());
                Ok(defaults)
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Preset>> {
        let key = normalize_id(id)?;
        Ok(self.list().await?.remove(&key))
    }

    /// 新增或覆盖预设，返回规范化后的 ID 与保存的内容
    pub async fn upsert(&self, id: &str, data: &Preset) -> Result<(String, Preset)> {
        let key = normalize_id(id)?;

        let clean = data.sanitized();
        let mut presets = self.list().await?;
        presets.insert(key.clone(), clean.clone());
        self.save(&presets).await?;

        info!("Preset saved: {}", key);
        Ok((key, clean))
    }

    /// 删除预设；已生成的链接不受影响
    pub async fn delete(&self, id: &str) -> Result<()> {
        let key = normalize_id(id)?;
        let mut presets = self.list().await?;
        if presets.remove(&key).is_none() {
            return Err(UtmError::preset_not_found("Preset not found."));
        }

        self.save(&presets).await?;
        info!("Preset deleted: {}", key);
        Ok(())
    }

    async fn save(&self, presets: &PresetMap) -> Result<()> {
        let value = serde_json::to_value(presets)?;
        self.options.set_option(PRESETS_OPTION, &value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets() {
        let presets = default_presets();
        let ids: Vec<&str> = presets.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["email", "facebook", "instagram", "telegram"]);

        let email = &presets["email"];
        assert_eq!(email.name.as_deref(), Some("Email"));
        assert_eq!(email.fields.utm_source.as_deref(), Some("newsletter"));
        assert_eq!(email.fields.utm_campaign.as_deref(), Some("weekly_update"));
        assert_eq!(email.fields.utm_term, None);
    }

    #[test]
    fn test_preset_json_shape_is_flat() {
        let value = serde_json::to_value(&default_presets()["facebook"]).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Facebook",
                "utm_source": "facebook",
                "utm_medium": "social",
                "utm_campaign": "{post_slug}",
                "utm_content": "{author}"
            })
        );
    }

    #[test]
    fn test_preset_sanitized_keeps_placeholders() {
        let raw: Preset = serde_json::from_value(serde_json::json!({
            "name": " <i>Linked</i>In ",
            "utm_source": "linkedin",
            "utm_campaign": "{category}_{year}",
            "color": "blue"
        }))
        .unwrap();

        let clean = raw.sanitized();
        assert_eq!(clean.name.as_deref(), Some("LinkedIn"));
        assert_eq!(clean.fields.utm_campaign.as_deref(), Some("{category}_{year}"));
    }
}
