use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 站点级 key-value 选项表（预设、模板、插件设置）
        manager
            .create_table(
                Table::create()
                    .table(SiteOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteOptions::OptionKey)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SiteOptions::OptionValue).text().not_null())
                    .col(
                        ColumnDef::new(SiteOptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SiteOptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SiteOptions {
    #[sea_orm(iden = "site_options")]
    Table,
    OptionKey,
    OptionValue,
    UpdatedAt,
}
