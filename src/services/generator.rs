//! 保存通知触发的自动生成

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::links::LinkStore;
use super::settings::{SettingsService, UtmSettings};
use crate::errors::Result;
use crate::storage::{TYPE_PAGE, TYPE_POST};
use crate::system::event::{Event, EventHandler, EventPayload, EventType};

/// 判断一次保存是否需要生成链接
pub fn should_generate(
    settings: &UtmSettings,
    content_type: &str,
    is_autosave: bool,
    is_revision: bool,
) -> bool {
    if is_autosave || is_revision {
        return false;
    }
    if !settings.enable_auto_generate || !settings.generate_on_publish {
        return false;
    }
    match content_type {
        TYPE_POST => settings.include_posts,
        TYPE_PAGE => settings.include_pages,
        // 其他内容类型不受开关限制
        _ => true,
    }
}

pub struct UtmGenerator {
    settings: Arc<SettingsService>,
    links: Arc<LinkStore>,
}

impl UtmGenerator {
    pub fn new(settings: Arc<SettingsService>, links: Arc<LinkStore>) -> Self {
        Self { settings, links }
    }
}

#[async_trait]
impl EventHandler for UtmGenerator {
    async fn handle(&self, event: &Event) -> Result<()> {
        let EventPayload::Content {
            item_id,
            content_type,
            is_autosave,
            is_revision,
        } = &event.payload
        else {
            return Ok(());
        };

        let settings = self.settings.load().await?;
        if !should_generate(&settings, content_type, *is_autosave, *is_revision) {
            debug!("Skip generation for item {} ({})", item_id, content_type);
            return Ok(());
        }

        let links = self.links.generate_all(*item_id).await?;
        info!(
            "Auto-generated {} links for item {} (source: {})",
            links.len(),
            item_id,
            event.source
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "utm_generator"
    }

    fn interested_events(&self) -> Vec<EventType> {
        vec![EventType::ContentSaved]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_autosave_and_revision() {
        let settings = UtmSettings::default();
        assert!(should_generate(&settings, "post", false, false));
        assert!(!should_generate(&settings, "post", true, false));
        assert!(!should_generate(&settings, "post", false, true));
    }

    #[test]
    fn test_global_switches() {
        let settings = UtmSettings {
            enable_auto_generate: false,
            ..Default::default()
        };
        assert!(!should_generate(&settings, "post", false, false));

        let settings = UtmSettings {
            generate_on_publish: false,
            ..Default::default()
        };
        assert!(!should_generate(&settings, "page", false, false));
    }

    #[test]
    fn test_content_type_switches() {
        let settings = UtmSettings {
            include_posts: false,
            ..Default::default()
        };
        assert!(!should_generate(&settings, "post", false, false));
        assert!(should_generate(&settings, "page", false, false));

        let settings = UtmSettings {
            include_pages: false,
            include_posts: false,
            ..Default::default()
        };
        assert!(should_generate(&settings, "product", false, false));
    }
}
