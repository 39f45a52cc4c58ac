use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{EntityTrait, Set, sea_query::OnConflict};
use serde_json::Value;
use tracing::trace;

use super::SeaOrmStorage;
use crate::errors::{Result, UtmError};
use crate::storage::traits::OptionStore;
use migration::entities::site_option;

#[async_trait]
impl OptionStore for SeaOrmStorage {
    async fn get_option(&self, key: &str) -> Result<Option<Value>> {
        let row = site_option::Entity::find_by_id(key)
            .one(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!("Failed to query option '{}': {}", key, e))
            })?;

        match row {
            Some(model) => {
                let value = serde_json::from_str(&model.option_value).map_err(|e| {
                    UtmError::serialization(format!("Option '{}' is not valid JSON: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set_option(&self, key: &str, value: &Value) -> Result<()> {
        let model = site_option::ActiveModel {
            option_key: Set(key.to_string()),
            option_value: Set(serde_json::to_string(value)?),
            updated_at: Set(Utc::now()),
        };

        site_option::Entity::insert(model)
            .on_conflict(
                OnConflict::column(site_option::Column::OptionKey)
                    .update_columns([
                        site_option::Column::OptionValue,
                        site_option::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!("Failed to save option '{}': {}", key, e))
            })?;

        trace!("Option saved: {}", key);
        Ok(())
    }

    async fn delete_option(&self, key: &str) -> Result<bool> {
        let result = site_option::Entity::delete_by_id(key)
            .exec(&self.db)
            .await
            .map_err(|e| {
                UtmError::database_operation(format!("Failed to delete option '{}': {}", key, e))
            })?;

        Ok(result.rows_affected > 0)
    }
}
