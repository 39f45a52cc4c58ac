//! 全局 UTM 模板

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, UtmError};
use crate::storage::{ContentItem, OptionStore};
use crate::utm::{UtmFields, UtmParam, build_for_item};

/// 站点选项 key
pub const TEMPLATES_OPTION: &str = "smart_utm_templates";

/// 内置模板
pub fn default_template() -> UtmFields {
    UtmFields {
        utm_source: Some("{source}".to_string()),
        utm_medium: Some("{medium}".to_string()),
        utm_campaign: Some("{category}_{year}".to_string()),
        utm_content: Some("{post_slug}".to_string()),
        utm_term: None,
    }
}

/// 模板必须包含 source、medium、campaign 且去空白后非空
pub fn validate_template(fields: &UtmFields) -> bool {
    [UtmParam::Source, UtmParam::Medium, UtmParam::Campaign]
        .into_iter()
        .all(|param| fields.has_value(param))
}

pub struct TemplateStore {
    options: Arc<dyn OptionStore>,
}

impl TemplateStore {
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self { options }
    }

    /// 读取模板；首次访问且未存储时写入内置模板
    pub async fn get(&self) -> Result<UtmFields> {
        match self.options.get_option(TEMPLATES_OPTION).await? {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                UtmError::serialization(format!("Stored template is malformed: {}", e))
            }),
            None => {
                let template = default_template();
                self.options
                    .set_option(TEMPLATES_OPTION, &serde_json::to_value(&template)?)
                    .await?;
                info!("Seeded default UTM template");
                Ok(template)
            }
        }
    }

    /// 整体替换模板（调用方负责先校验）
    pub async fn set(&self, fields: &UtmFields) -> Result<UtmFields> {
        let clean = fields.sanitized();
        self.options
            .set_option(TEMPLATES_OPTION, &serde_json::to_value(&clean)?)
            .await?;
        info!("UTM template updated");
        Ok(clean)
    }

    /// 用当前模板为某条内容构建预览 URL
    pub async fn preview(&self, item: &ContentItem) -> Result<Option<String>> {
        let template = self.get().await?;
        Ok(build_for_item(item, &template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_three_fields() {
        assert!(validate_template(&default_template()));

        let only_source = UtmFields {
            utm_source: Some("x".into()),
            ..Default::default()
        };
        assert!(!validate_template(&only_source));

        let blank_campaign = UtmFields {
            utm_campaign: Some("   ".into()),
            ..default_template()
        };
        assert!(!validate_template(&blank_campaign));
    }
}
