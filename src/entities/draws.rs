use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "draw_platform")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[sea_orm(string_value = "facebook")]
    Facebook,
    #[sea_orm(string_value = "instagram")]
    Instagram,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Facebook => write!(f, "facebook"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}

#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "draw_mode")]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// 全部合格评论中随机
    #[sea_orm(string_value = "random_all")]
    RandomAll,
    /// 仅在答对指定答案的合格评论中随机
    #[sea_orm(string_value = "random_correct")]
    RandomCorrect,
}

impl std::fmt::Display for DrawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawMode::RandomAll => write!(f, "random_all"),
            DrawMode::RandomCorrect => write!(f, "random_correct"),
        }
    }
}

#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "answer_match")]
#[serde(rename_all = "snake_case")]
pub enum AnswerMatch {
    #[sea_orm(string_value = "exact")]
    Exact,
    #[sea_orm(string_value = "contains")]
    Contains,
    #[sea_orm(string_value = "normalized_exact")]
    NormalizedExact,
}

impl std::fmt::Display for AnswerMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerMatch::Exact => write!(f, "exact"),
            AnswerMatch::Contains => write!(f, "contains"),
            AnswerMatch::NormalizedExact => write!(f, "normalized_exact"),
        }
    }
}

/// 生命周期: draft -> ready -> frozen -> drawn -> published (线性, 不可回退)
#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "draw_status")]
#[serde(rename_all = "snake_case")]
pub enum DrawStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "ready")]
    Ready,
    #[sea_orm(string_value = "frozen")]
    Frozen,
    #[sea_orm(string_value = "drawn")]
    Drawn,
    #[sea_orm(string_value = "published")]
    Published,
}

impl DrawStatus {
    /// frozen 之后规则与抽奖元数据全部只读
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            DrawStatus::Frozen | DrawStatus::Drawn | DrawStatus::Published
        )
    }
}

impl std::fmt::Display for DrawStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawStatus::Draft => write!(f, "draft"),
            DrawStatus::Ready => write!(f, "ready"),
            DrawStatus::Frozen => write!(f, "frozen"),
            DrawStatus::Drawn => write!(f, "drawn"),
            DrawStatus::Published => write!(f, "published"),
        }
    }
}

/// 抽奖活动实体
/// 说明:
/// - draft/ready 阶段可编辑, frozen 起全部只读
/// - locked_at 为报名窗口截止时间, 晚于它的评论不参与资格统计
/// - public_view_slug 发布时生成, 对外公开页使用
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "draws")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 主办方用户ID
    pub organizer_id: i64,
    pub title: String,
    pub platform: Platform,
    pub draw_mode: DrawMode,
    /// random_correct 模式的正确答案
    pub correct_answer: Option<String>,
    pub answer_match: AnswerMatch,
    pub winners_count: i32,
    pub alternates_count: i32,
    /// 报名窗口截止时间
    pub locked_at: Option<DateTime<Utc>>,
    pub status: DrawStatus,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub video_format: Option<String>,
    pub animation: Option<String>,
    pub public_view_slug: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
