//! 内容条目查询与写入

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, sea_query::{OnConflict, Query},
};
use tracing::{debug, warn};

use super::SeaOrmStorage;
use crate::errors::{Result, UtmError};
use crate::storage::models::{ContentItem, ContentQuery};
use crate::storage::traits::ContentSource;
use migration::entities::{content_item, item_meta};

fn model_to_item(model: content_item::Model) -> ContentItem {
    let categories = serde_json::from_str::<Vec<String>>(&model.categories).unwrap_or_else(|e| {
        warn!("Item {} has malformed categories JSON: {}", model.id, e);
        Vec::new()
    });

    ContentItem {
        id: model.id,
        content_type: model.content_type,
        status: model.status,
        title: model.title,
        slug: model.slug,
        permalink: model.permalink,
        author: model.author,
        categories,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl ContentSource for SeaOrmStorage {
    async fn get_item(&self, id: i64) -> Result<Option<ContentItem>> {
        let model = content_item::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!("Failed to query item {}: {}", id, e))
            })?;

        Ok(model.map(model_to_item))
    }

    async fn published_ids(&self, content_types: &[String]) -> Result<Vec<i64>> {
        if content_types.is_empty() {
            return Ok(Vec::new());
        }

        let ids = content_item::Entity::find()
            .select_only()
            .column(content_item::Column::Id)
            .filter(content_item::Column::ContentType.is_in(content_types.iter().cloned()))
            .filter(content_item::Column::Status.eq(crate::storage::STATUS_PUBLISH))
            .order_by_asc(content_item::Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!("Failed to list published items: {}", e))
            })?;

        debug!("Found {} published items of {:?}", ids.len(), content_types);
        Ok(ids)
    }

    async fn items_with_meta(
        &self,
        meta_key: &str,
        query: &ContentQuery,
    ) -> Result<(Vec<ContentItem>, u64)> {
        if query.content_types.is_empty() {
            return Ok((Vec::new(), 0));
        }

        let with_meta = Query::select()
            .column(item_meta::Column::ItemId)
            .from(item_meta::Entity)
            .and_where(item_meta::Column::MetaKey.eq(meta_key))
            .to_owned();

        let mut condition = Condition::all()
            .add(content_item::Column::Id.in_subquery(with_meta))
            .add(content_item::Column::ContentType.is_in(query.content_types.iter().cloned()));

        if let Some(ref status) = query.status {
            condition = condition.add(content_item::Column::Status.eq(status.as_str()));
        }

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(content_item::Column::Title.contains(search))
                    .add(content_item::Column::Slug.contains(search)),
            );
        }

        let per_page = query.per_page.max(1);
        let paginator = content_item::Entity::find()
            .filter(condition)
            .order_by_desc(content_item::Column::UpdatedAt)
            .order_by_desc(content_item::Column::Id)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            UtmError::database_operation(format!("Failed to count items with links: {}", e))
        })?;

        let models = paginator
            .fetch_page(query.page.max(1) - 1)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!("Failed to page items with links: {}", e))
            })?;

        Ok((models.into_iter().map(model_to_item).collect(), total))
    }

    async fn save_item(&self, item: &ContentItem) -> Result<()> {
        let model = content_item::ActiveModel {
            id: Set(item.id),
            content_type: Set(item.content_type.clone()),
            status: Set(item.status.clone()),
            title: Set(item.title.clone()),
            slug: Set(item.slug.clone()),
            permalink: Set(item.permalink.clone()),
            author: Set(item.author.clone()),
            categories: Set(serde_json::to_string(&item.categories)?),
            updated_at: Set(item.updated_at),
        };

        content_item::Entity::insert(model)
            .on_conflict(
                OnConflict::column(content_item::Column::Id)
                    .update_columns([
                        content_item::Column::ContentType,
                        content_item::Column::Status,
                        content_item::Column::Title,
                        content_item::Column::Slug,
                        content_item::Column::Permalink,
                        content_item::Column::Author,
                        content_item::Column::Categories,
                        content_item::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!("Failed to save item {}: {}", item.id, e))
            })?;

        Ok(())
    }
}
