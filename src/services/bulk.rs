//! 批量处理
//!
//! 按 50 条一组顺序处理所有已发布内容，没有锁也没有回滚。

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};
use tracing::{info, warn};

use super::links::LinkStore;
use super::settings::SettingsService;
use crate::errors::{Result, UtmError};
use crate::storage::ContentSource;
use crate::system::event::{Event, EventBus};

pub const BATCH_SIZE: usize = 50;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BulkAction {
    GenerateAll,
    /// 与 generate_all 行为一致
    RefreshAll,
    DeleteAll,
}

impl BulkAction {
    pub fn parse(raw: &str) -> Result<Self> {
        Self::from_str(raw.trim()).map_err(|_| UtmError::validation("Invalid action."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub success: bool,
    pub message: String,
    pub processed: usize,
    pub total: usize,
}

pub struct BulkProcessor {
    settings: Arc<SettingsService>,
    content: Arc<dyn ContentSource>,
    links: Arc<LinkStore>,
    events: Arc<EventBus>,
}

impl BulkProcessor {
    pub fn new(
        settings: Arc<SettingsService>,
        content: Arc<dyn ContentSource>,
        links: Arc<LinkStore>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            settings,
            content,
            links,
            events,
        }
    }

    pub async fn run(&self, action: BulkAction, source: &str) -> Result<BulkResult> {
        let content_types = self.settings.load().await?.enabled_content_types();
        if content_types.is_empty() {
            return Err(UtmError::bulk_aborted("No post types enabled."));
        }

        let ids = self.content.published_ids(&content_types).await?;
        if ids.is_empty() {
            return Err(UtmError::bulk_aborted("No posts found."));
        }

        let total = ids.len();
        let mut processed = 0usize;

        for chunk in ids.chunks(BATCH_SIZE) {
            for &id in chunk {
                let outcome = match action {
                    BulkAction::GenerateAll | BulkAction::RefreshAll => {
                        self.links.generate_all(id).await.map(|_| ())
                    }
                    BulkAction::DeleteAll => self.links.delete_all(id).await.map(|_| ()),
                };

                match outcome {
                    Ok(()) => processed += 1,
                    Err(e) => warn!("Bulk {} skipped item {}: {}", action.as_ref(), id, e),
                }
            }
        }

        info!(
            "Bulk {} finished: {}/{} items",
            action.as_ref(),
            processed,
            total
        );
        self.events
            .publish(Event::bulk_completed(action.as_ref(), processed, total, source))
            .await;

        Ok(BulkResult {
            success: true,
            message: format!("Processed {} of {} posts.", processed, total),
            processed,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!(
            BulkAction::parse("generate_all").unwrap(),
            BulkAction::GenerateAll
        );
        assert_eq!(
            BulkAction::parse(" refresh_all ").unwrap(),
            BulkAction::RefreshAll
        );
        assert_eq!(BulkAction::parse("delete_all").unwrap(), BulkAction::DeleteAll);
        assert!(BulkAction::parse("purge").is_err());
        assert_eq!(BulkAction::DeleteAll.as_ref(), "delete_all");
    }
}
