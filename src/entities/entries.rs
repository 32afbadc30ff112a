use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    #[sea_orm(string_value = "eligible")]
    Eligible,
    #[sea_orm(string_value = "excluded")]
    Excluded,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Eligible => write!(f, "eligible"),
            EntryStatus::Excluded => write!(f, "excluded"),
        }
    }
}

/// 参与条目实体
/// 说明:
/// - (draw_id, comment_id) 唯一, 重新同步时 upsert 覆盖可变字段, 永不产生重复
/// - excluded 时 exclusion_reason 恰好一个原因码 (首个未通过的规则)
/// - is_correct 仅在 random_correct 模式下有意义
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub draw_id: i64,
    /// 平台侧评论ID
    pub comment_id: String,
    pub author_id: String,
    pub author_display_name: String,
    pub comment_text: String,
    pub comment_url: Option<String>,
    pub commented_at: DateTime<Utc>,
    pub entry_status: EntryStatus,
    pub exclusion_reason: Option<String>,
    pub is_correct: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
