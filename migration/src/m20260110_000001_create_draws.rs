use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

/// Draws (抽奖活动主表)
#[derive(DeriveIden)]
enum Draws {
    Table,
    Id,
    OrganizerId,
    Title,
    Platform,
    DrawMode,
    CorrectAnswer,
    AnswerMatch,
    WinnersCount,
    AlternatesCount,
    LockedAt,
    Status,
    LogoUrl,
    CoverUrl,
    VideoFormat,
    Animation,
    PublicViewSlug,
    CreatedAt,
    UpdatedAt,
}

/// Rule Sets (每个抽奖一行的资格规则)
#[derive(DeriveIden)]
enum RuleSets {
    Table,
    Id,
    DrawId,
    DedupOneEntryPerUser,
    ExcludePageAdmins,
    IncludeReplies,
    RequiredKeyword,
    BannedKeyword,
    RequireLike,
    LikeCheckAvailable,
    MinMentions,
    RequiredHashtag,
    RequiredMention,
    BlockList,
    CreatedAt,
    UpdatedAt,
}

/// Sources (被监控的帖子指针)
#[derive(DeriveIden)]
enum Sources {
    Table,
    Id,
    DrawId,
    PostUrl,
    PostExternalId,
    PageTokenRef,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // enums
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("draw_platform"))
                    .values(vec![Alias::new("facebook"), Alias::new("instagram")])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("draw_mode"))
                    .values(vec![Alias::new("random_all"), Alias::new("random_correct")])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("answer_match"))
                    .values(vec![
                        Alias::new("exact"),
                        Alias::new("contains"),
                        Alias::new("normalized_exact"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("draw_status"))
                    .values(vec![
                        Alias::new("draft"),
                        Alias::new("ready"),
                        Alias::new("frozen"),
                        Alias::new("drawn"),
                        Alias::new("published"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Draws::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Draws::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Draws::OrganizerId).big_integer().not_null())
                    .col(ColumnDef::new(Draws::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Draws::Platform)
                            .custom(Alias::new("draw_platform"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Draws::DrawMode)
                            .custom(Alias::new("draw_mode"))
                            .not_null()
                            .default(Expr::cust("'random_all'::draw_mode")),
                    )
                    .col(ColumnDef::new(Draws::CorrectAnswer).string_len(500).null())
                    .col(
                        ColumnDef::new(Draws::AnswerMatch)
                            .custom(Alias::new("answer_match"))
                            .not_null()
                            .default(Expr::cust("'exact'::answer_match")),
                    )
                    .col(
                        ColumnDef::new(Draws::WinnersCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Draws::AlternatesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Draws::LockedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Draws::Status)
                            .custom(Alias::new("draw_status"))
                            .not_null()
                            .default(Expr::cust("'draft'::draw_status")),
                    )
                    .col(ColumnDef::new(Draws::LogoUrl).string_len(1024).null())
                    .col(ColumnDef::new(Draws::CoverUrl).string_len(1024).null())
                    .col(ColumnDef::new(Draws::VideoFormat).string_len(32).null())
                    .col(ColumnDef::new(Draws::Animation).string_len(64).null())
                    .col(ColumnDef::new(Draws::PublicViewSlug).string_len(64).null())
                    .col(
                        ColumnDef::new(Draws::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Draws::UpdatedAt)
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
                    .name("idx_draws_public_view_slug")
                    .table(Draws::Table)
                    .col(Draws::PublicViewSlug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RuleSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RuleSets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RuleSets::DrawId).big_integer().not_null())
                    .col(
                        ColumnDef::new(RuleSets::DedupOneEntryPerUser)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RuleSets::ExcludePageAdmins)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RuleSets::IncludeReplies)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RuleSets::RequiredKeyword)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(RuleSets::BannedKeyword).string_len(255).null())
                    .col(
                        ColumnDef::new(RuleSets::RequireLike)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RuleSets::LikeCheckAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RuleSets::MinMentions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RuleSets::RequiredHashtag)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RuleSets::RequiredMention)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(RuleSets::BlockList).json_binary().null())
                    .col(
                        ColumnDef::new(RuleSets::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RuleSets::UpdatedAt)
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
                    .name("idx_rule_sets_draw")
                    .table(RuleSets::Table)
                    .col(RuleSets::DrawId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sources::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sources::DrawId).big_integer().not_null())
                    .col(ColumnDef::new(Sources::PostUrl).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(Sources::PostExternalId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sources::PageTokenRef).string_len(255).null())
                    .col(
                        ColumnDef::new(Sources::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Sources::UpdatedAt)
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
                    .name("idx_sources_draw")
                    .table(Sources::Table)
                    .col(Sources::DrawId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Sources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(RuleSets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Draws::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("draw_status")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("answer_match")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("draw_mode")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("draw_platform")).to_owned())
            .await?;
        Ok(())
    }
}
