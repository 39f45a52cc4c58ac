use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "site_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub option_key: String,
    /// JSON 编码的值
    #[sea_orm(column_type = "Text")]
    pub option_value: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
