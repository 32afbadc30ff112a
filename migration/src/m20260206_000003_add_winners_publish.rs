use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

/// Winners (rank 1..N 为正取, 之后为备选)
#[derive(DeriveIden)]
enum Winners {
    Table,
    Id,
    DrawId,
    EntryId,
    Rank,
    WinnerType,
    CreatedAt,
}

/// Publish Assets (每个抽奖一行, 发布产物)
#[derive(DeriveIden)]
enum PublishAssets {
    Table,
    Id,
    DrawId,
    VideoUrl,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("winner_type"))
                    .values(vec![Alias::new("primary"), Alias::new("alternate")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Winners::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Winners::DrawId).big_integer().not_null())
                    .col(ColumnDef::new(Winners::EntryId).big_integer().not_null())
                    .col(ColumnDef::new(Winners::Rank).integer().not_null())
                    .col(
                        ColumnDef::new(Winners::WinnerType)
                            .custom(Alias::new("winner_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Winners::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_winners_draw_rank")
                    .table(Winners::Table)
                    .col(Winners::DrawId)
                    .col(Winners::Rank)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PublishAssets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PublishAssets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PublishAssets::DrawId).big_integer().not_null())
                    .col(ColumnDef::new(PublishAssets::VideoUrl).string_len(1024).null())
                    .col(
                        ColumnDef::new(PublishAssets::PublishedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublishAssets::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PublishAssets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_publish_assets_draw")
                    .table(PublishAssets::Table)
                    .col(PublishAssets::DrawId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PublishAssets::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Winners::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("winner_type")).to_owned())
            .await?;
        Ok(())
    }
}
