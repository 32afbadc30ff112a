use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

/// Entries (每条原始评论一行, 按 draw_id + comment_id 幂等 upsert)
#[derive(DeriveIden)]
enum Entries {
    Table,
    Id,
    DrawId,
    CommentId,
    AuthorId,
    AuthorDisplayName,
    CommentText,
    CommentUrl,
    CommentedAt,
    EntryStatus,
    ExclusionReason,
    IsCorrect,
    CreatedAt,
    UpdatedAt,
}

/// Eligibility Snapshots (每次对账运行追加一行的审计聚合)
#[derive(DeriveIden)]
enum EligibilitySnapshots {
    Table,
    Id,
    DrawId,
    TotalCommentsInWindow,
    UniqueUsersCount,
    EligibleCount,
    ExcludedCount,
    ExclusionBreakdown,
    LatestCommentAtInWindow,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("entry_status"))
                    .values(vec![Alias::new("eligible"), Alias::new("excluded")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entries::DrawId).big_integer().not_null())
                    .col(ColumnDef::new(Entries::CommentId).string_len(255).not_null())
                    .col(ColumnDef::new(Entries::AuthorId).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Entries::AuthorDisplayName)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Entries::CommentText).text().not_null().default(""))
                    .col(ColumnDef::new(Entries::CommentUrl).string_len(1024).null())
                    .col(
                        ColumnDef::new(Entries::CommentedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Entries::EntryStatus)
                            .custom(Alias::new("entry_status"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Entries::ExclusionReason).string_len(64).null())
                    .col(ColumnDef::new(Entries::IsCorrect).boolean().null())
                    .col(
                        ColumnDef::new(Entries::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Entries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // upsert 的冲突目标
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_entries_draw_comment")
                    .table(Entries::Table)
                    .col(Entries::DrawId)
                    .col(Entries::CommentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_entries_draw_status")
                    .table(Entries::Table)
                    .col(Entries::DrawId)
                    .col(Entries::EntryStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EligibilitySnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EligibilitySnapshots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EligibilitySnapshots::DrawId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EligibilitySnapshots::TotalCommentsInWindow)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EligibilitySnapshots::UniqueUsersCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EligibilitySnapshots::EligibleCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EligibilitySnapshots::ExcludedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EligibilitySnapshots::ExclusionBreakdown)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(EligibilitySnapshots::LatestCommentAtInWindow)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EligibilitySnapshots::CreatedAt)
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
                    .name("idx_eligibility_snapshots_draw")
                    .table(EligibilitySnapshots::Table)
                    .col(EligibilitySnapshots::DrawId)
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
                    .table(EligibilitySnapshots::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Entries::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("entry_status")).to_owned())
            .await?;
        Ok(())
    }
}
