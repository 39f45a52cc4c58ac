use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{EntityTrait, Set, sea_query::OnConflict};
use serde_json::Value;
use tracing::trace;

use super::SeaOrmStorage;
use crate::errors::{Result, UtmError};
use crate::storage::traits::MetaStore;
use migration::entities::item_meta;

#[async_trait]
impl MetaStore for SeaOrmStorage {
    async fn get_meta(&self, item_id: i64, key: &str) -> Result<Option<Value>> {
        let row = item_meta::Entity::find_by_id((item_id, key.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!(
                    "Failed to query meta '{}' of item {}: {}",
                    key, item_id, e
                ))
            })?;

        match row {
            Some(model) => Ok(Some(serde_json::from_str(&model.meta_value)?)),
            None => Ok(None),
        }
    }

    async fn set_meta(&self, item_id: i64, key: &str, value: &Value) -> Result<()> {
        let model = item_meta::ActiveModel {
            item_id: Set(item_id),
            meta_key: Set(key.to_string()),
            meta_value: Set(serde_json::to_string(value)?),
            updated_at: Set(Utc::now()),
        };

        item_meta::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([item_meta::Column::ItemId, item_meta::Column::MetaKey])
                    .update_columns([item_meta::Column::MetaValue, item_meta::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!(
                    "Failed to save meta '{}' of item {}: {}",
                    key, item_id, e
                ))
            })?;

        trace!("Meta saved: item={} key={}", item_id, key);
        Ok(())
    }

    async fn delete_meta(&self, item_id: i64, key: &str) -> Result<bool> {
        let result = item_meta::Entity::delete_by_id((item_id, key.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!(
                    "Failed to delete meta '{}' of item {}: {}",
                    key, item_id, e
                ))
            })?;

        Ok(result.rows_affected > 0)
    }
}
