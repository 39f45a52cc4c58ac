//! 每条内容的 UTM 链接集合
//!
//! 集合以预设 ID 为 key，整体作为一条 item meta 存储。

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::presets::PresetStore;
use crate::errors::{Result, UtmError};
use crate::storage::{ContentQuery, ContentSource, MetaStore};
use crate::utils::clean_url;
use crate::utm::build_for_item;

/// item meta key
pub const LINK_META_KEY: &str = "_utm_link";

/// 单条生成的链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedLink {
    pub url: String,
    pub preset: String,
    pub created: DateTime<Utc>,
    pub post_id: i64,
}

pub type LinkSet = BTreeMap<String, GeneratedLink>;

/// 链接列表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRow {
    pub post_id: i64,
    pub post_title: String,
    pub original_url: String,
    pub utm_url: String,
    pub preset: String,
    pub created: DateTime<Utc>,
}

pub struct LinkStore {
    meta: Arc<dyn MetaStore>,
    content: Arc<dyn ContentSource>,
    presets: Arc<PresetStore>,
}

impl LinkStore {
    pub fn new(
        meta: Arc<dyn MetaStore>,
        content: Arc<dyn ContentSource>,
        presets: Arc<PresetStore>,
    ) -> Self {
        Self {
            meta,
            content,
            presets,
        }
    }

    /// 读取某内容的全部链接
    pub async fn list_for(&self, item_id: i64) -> Result<LinkSet> {
        match self.meta.get_meta(item_id, LINK_META_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(LinkSet::new()),
        }
    }

    /// 覆盖单条链接，URL 必须是 http(s)
    pub async fn upsert(&self, item_id: i64, preset_id: &str, url: &str) -> Result<GeneratedLink> {
        let url = clean_url(url).map_err(|e| UtmError::validation(format!("Invalid URL: {}", e)))?;

        let link = GeneratedLink {
            url,
            preset: preset_id.to_string(),
            created: Utc::now(),
            post_id: item_id,
        };

        let mut links = self.list_for(item_id).await?;
        links.insert(preset_id.to_string(), link.clone());
        self.save(item_id, &links).await?;

        info!("Link updated: item={} preset={}", item_id, preset_id);
        Ok(link)
    }

    /// 删除单条链接；集合为空时整条 meta 一并删除
    pub async fn delete(&self, item_id: i64, preset_id: &str) -> Result<()> {
        let mut links = self.list_for(item_id).await?;
        if links.remove(preset_id).is_none() {
            return Err(UtmError::link_not_found("Link not found."));
        }

        if links.is_empty() {
            self.meta.delete_meta(item_id, LINK_META_KEY).await?;
        } else {
            self.save(item_id, &links).await?;
        }

        info!("Link deleted: item={} preset={}", item_id, preset_id);
        Ok(())
    }

    /// 删除某内容的全部链接，返回是否存在过
    pub async fn delete_all(&self, item_id: i64) -> Result<bool> {
        let removed = self.meta.delete_meta(item_id, LINK_META_KEY).await?;
        if removed {
            debug!("All links removed for item {}", item_id);
        }
        Ok(removed)
    }

    /// 按全部预设重新生成链接
    ///
    /// 没有任何结果时保留原有链接；内容不存在时返回空集合。
    pub async fn generate_all(&self, item_id: i64) -> Result<LinkSet> {
        let Some(item) = self.content.get_item(item_id).await? else {
            trace!("Item {} not found, nothing to generate", item_id);
            return Ok(LinkSet::new());
        };

        let now = Utc::now();
        let links: LinkSet = self
            .presets
            .list()
            .await?
            .into_iter()
            .filter_map(|(preset_id, preset)| {
                let url = build_for_item(&item, &preset.fields)?;
                Some((
                    preset_id.clone(),
                    GeneratedLink {
                        url,
                        preset: preset_id,
                        created: now,
                        post_id: item_id,
                    },
                ))
            })
            .collect();

        if !links.is_empty() {
            self.save(item_id, &links).await?;
            info!("Generated {} links for item {}", links.len(), item_id);
        }
        Ok(links)
    }

    /// 分页浏览带链接的内容，展开为行；总数按内容计
    pub async fn browse(&self, query: &ContentQuery) -> Result<(Vec<LinkRow>, u64)> {
        let (items, total) = self.content.items_with_meta(LINK_META_KEY, query).await?;

        let mut rows = Vec::new();
        for item in items {
            let links = self.list_for(item.id).await?;
            let original_url = item.permalink.clone().unwrap_or_default();
            rows.extend(links.into_values().map(|link| LinkRow {
                post_id: item.id,
                post_title: item.title.clone(),
                original_url: original_url.clone(),
                utm_url: link.url,
                preset: link.preset,
                created: link.created,
            }));
        }

        Ok((rows, total))
    }

    async fn save(&self, item_id: i64, links: &LinkSet) -> Result<()> {
        let value = serde_json::to_value(links)?;
        self.meta.set_meta(item_id, LINK_META_KEY, &value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_set_json_is_keyed_by_preset() {
        let created = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut links = LinkSet::new();
        links.insert(
            "email".to_string(),
            GeneratedLink {
                url: "https://site.example/a/?utm_source=newsletter".to_string(),
                preset: "email".to_string(),
                created,
                post_id: 3,
            },
        );

        let value = serde_json::to_value(&links).unwrap();
        assert_eq!(value["email"]["post_id"], 3);
        assert_eq!(value["email"]["preset"], "email");

        let back: LinkSet = serde_json::from_value(value).unwrap();
        assert_eq!(back, links);
    }
}
