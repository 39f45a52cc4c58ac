use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "content_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub content_type: String,
    pub status: String,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub permalink: Option<String>,
    pub author: String,
    /// 分类 slug 列表（JSON 数组，按主分类优先排序）
    #[sea_orm(column_type = "Text")]
    pub categories: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
