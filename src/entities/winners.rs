use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "winner_type")]
#[serde(rename_all = "snake_case")]
pub enum WinnerType {
    #[sea_orm(string_value = "primary")]
    Primary,
    #[sea_orm(string_value = "alternate")]
    Alternate,
}

impl std::fmt::Display for WinnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinnerType::Primary => write!(f, "primary"),
            WinnerType::Alternate => write!(f, "alternate"),
        }
    }
}

/// 中奖记录实体
/// rank 1..winners_count 为正取, 其后为备选; (draw_id, rank) 唯一
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "winners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub draw_id: i64,
    /// 指向中奖的参与条目 (entries.id)
    pub entry_id: i64,
    pub rank: i32,
    pub winner_type: WinnerType,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
