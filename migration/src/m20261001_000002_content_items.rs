use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 content_items 表（宿主推送的内容快照）
        manager
            .create_table(
                Table::create()
                    .table(ContentItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentItems::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContentItems::ContentType)
                            .string()
                            .not_null()
                            .default("post"),
                    )
                    .col(
                        ColumnDef::new(ContentItems::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(ContentItems::Title).text().not_null())
                    .col(ColumnDef::new(ContentItems::Slug).string().not_null())
                    .col(ColumnDef::new(ContentItems::Permalink).text().null())
                    .col(ColumnDef::new(ContentItems::Author).string().not_null())
                    .col(
                        ColumnDef::new(ContentItems::Categories)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ContentItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 批量处理按 (类型, 状态) 取 ID
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_content_type_status")
                    .table(ContentItems::Table)
                    .col(ContentItems::ContentType)
                    .col(ContentItems::Status)
                    .to_owned(),
            )
            .await?;

        // 创建 item_meta 表
        manager
            .create_table(
                Table::create()
                    .table(ItemMeta::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ItemMeta::ItemId).big_integer().not_null())
                    .col(ColumnDef::new(ItemMeta::MetaKey).string().not_null())
                    .col(ColumnDef::new(ItemMeta::MetaValue).text().not_null())
                    .col(
                        ColumnDef::new(ItemMeta::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ItemMeta::ItemId)
                            .col(ItemMeta::MetaKey),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_item_meta_key")
                    .table(ItemMeta::Table)
                    .col(ItemMeta::MetaKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_item_meta_key").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ItemMeta::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_content_type_status").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ContentItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContentItems {
    #[sea_orm(iden = "content_items")]
    Table,
    Id,
    ContentType,
    Status,
    Title,
    Slug,
    Permalink,
    Author,
    Categories,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ItemMeta {
    #[sea_orm(iden = "item_meta")]
    Table,
    ItemId,
    MetaKey,
    MetaValue,
    UpdatedAt,
}
