use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 资格快照实体 (append-only 审计记录, 每次对账运行一行)
/// exclusion_breakdown 为 原因码 -> 数量 的 JSON 映射
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "eligibility_snapshots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub draw_id: i64,
    pub total_comments_in_window: i64,
    pub unique_users_count: i64,
    pub eligible_count: i64,
    pub excluded_count: i64,
    pub exclusion_breakdown: Json,
    pub latest_comment_at_in_window: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
