use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{
    AnswerMatch, DrawMode, DrawStatus, EntryStatus, Platform, WinnerType,
    draw_entity as draws, entry_entity as entries, rule_set_entity as rule_sets,
    snapshot_entity as snapshots, source_entity as sources, winner_entity as winners,
};

use super::PaginatedResponse;

/// 创建抽奖请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDrawRequest {
    pub organizer_id: i64,
    pub title: String,
    pub platform: Platform,
    pub draw_mode: Option<DrawMode>,
    pub correct_answer: Option<String>,
    pub answer_match: Option<AnswerMatch>,
    pub winners_count: Option<i32>,
    pub alternates_count: Option<i32>,
    /// 报名窗口截止时间
    pub locked_at: Option<DateTime<Utc>>,
}

/// 区分 "字段缺省" 与 "显式 null": 字段只要出现就包一层 Some
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// 抽奖元数据修改请求 (仅 draft/ready 可用)。
/// correct_answer / locked_at 为双层 Option: 缺省保持原值, 显式 null 清空。
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDrawRequest {
    pub title: Option<String>,
    pub draw_mode: Option<DrawMode>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub correct_answer: Option<Option<String>>,
    pub answer_match: Option<AnswerMatch>,
    pub winners_count: Option<i32>,
    pub alternates_count: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub locked_at: Option<Option<DateTime<Utc>>>,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub video_format: Option<String>,
    pub animation: Option<String>,
}

/// 规则修改请求 (每个抽奖一行, upsert; like_check_available 为派生字段不可直接设置)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRulesRequest {
    pub dedup_one_entry_per_user: Option<bool>,
    pub exclude_page_admins: Option<bool>,
    pub include_replies: Option<bool>,
    pub required_keyword: Option<String>,
    pub banned_keyword: Option<String>,
    pub require_like: Option<bool>,
    pub min_mentions: Option<i32>,
    pub required_hashtag: Option<String>,
    pub required_mention: Option<String>,
    pub block_list: Option<Vec<String>>,
}

/// 评论来源配置请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSourceRequest {
    pub post_url: String,
    pub post_external_id: String,
    pub page_token_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResponse {
    pub id: i64,
    pub organizer_id: i64,
    pub title: String,
    pub platform: Platform,
    pub draw_mode: DrawMode,
    pub correct_answer: Option<String>,
    pub answer_match: AnswerMatch,
    pub winners_count: i32,
    pub alternates_count: i32,
    pub locked_at: Option<DateTime<Utc>>,
    pub status: DrawStatus,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub video_format: Option<String>,
    pub animation: Option<String>,
    pub public_view_slug: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<draws::Model> for DrawResponse {
    fn from(m: draws::Model) -> Self {
        DrawResponse {
            id: m.id,
            organizer_id: m.organizer_id,
            title: m.title,
            platform: m.platform,
            draw_mode: m.draw_mode,
            correct_answer: m.correct_answer,
            answer_match: m.answer_match,
            winners_count: m.winners_count,
            alternates_count: m.alternates_count,
            locked_at: m.locked_at,
            status: m.status,
            logo_url: m.logo_url,
            cover_url: m.cover_url,
            video_format: m.video_format,
            animation: m.animation,
            public_view_slug: m.public_view_slug,
            created_at: m.created_at,
        }
    }
}

/// 抽奖详情 (元数据 + 最近一次对账快照)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawDetailResponse {
    pub draw: DrawResponse,
    pub latest_snapshot: Option<SnapshotResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RuleSetResponse {
    pub draw_id: i64,
    pub dedup_one_entry_per_user: bool,
    pub exclude_page_admins: bool,
    pub include_replies: bool,
    pub required_keyword: Option<String>,
    pub banned_keyword: Option<String>,
    pub require_like: bool,
    /// 派生: 设置了点赞要求时为 false
    pub like_check_available: bool,
    pub min_mentions: i32,
    pub required_hashtag: Option<String>,
    pub required_mention: Option<String>,
    pub block_list: Vec<String>,
}

impl From<rule_sets::Model> for RuleSetResponse {
    fn from(m: rule_sets::Model) -> Self {
        let block_list = m
            .block_list
            .as_ref()
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();
        RuleSetResponse {
            draw_id: m.draw_id,
            dedup_one_entry_per_user: m.dedup_one_entry_per_user,
            exclude_page_admins: m.exclude_page_admins,
            include_replies: m.include_replies,
            required_keyword: m.required_keyword,
            banned_keyword: m.banned_keyword,
            require_like: m.require_like,
            like_check_available: m.like_check_available,
            min_mentions: m.min_mentions,
            required_hashtag: m.required_hashtag,
            required_mention: m.required_mention,
            block_list,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SourceResponse {
    pub draw_id: i64,
    pub post_url: String,
    pub post_external_id: String,
    /// 仅返回引用名, 不回显令牌
    pub page_token_ref: Option<String>,
}

impl From<sources::Model> for SourceResponse {
    fn from(m: sources::Model) -> Self {
        SourceResponse {
            draw_id: m.draw_id,
            post_url: m.post_url,
            post_external_id: m.post_external_id,
            page_token_ref: m.page_token_ref,
        }
    }
}

/// 资格快照响应 (一次对账运行的聚合)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SnapshotResponse {
    pub draw_id: i64,
    pub total_comments_in_window: i64,
    pub unique_users_count: i64,
    pub eligible_count: i64,
    pub excluded_count: i64,
    /// 原因码 -> 数量
    #[schema(value_type = Object)]
    pub exclusion_breakdown: serde_json::Value,
    pub latest_comment_at_in_window: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<snapshots::Model> for SnapshotResponse {
    fn from(m: snapshots::Model) -> Self {
        SnapshotResponse {
            draw_id: m.draw_id,
            total_comments_in_window: m.total_comments_in_window,
            unique_users_count: m.unique_users_count,
            eligible_count: m.eligible_count,
            excluded_count: m.excluded_count,
            exclusion_breakdown: m.exclusion_breakdown,
            latest_comment_at_in_window: m.latest_comment_at_in_window,
            created_at: m.created_at,
        }
    }
}

/// 参与条目查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct EntryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// 按状态过滤 (eligible / excluded)
    pub status: Option<EntryStatus>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntryResponse {
    pub id: i64,
    pub comment_id: String,
    pub author_id: String,
    pub author_display_name: String,
    pub comment_text: String,
    pub comment_url: Option<String>,
    pub commented_at: DateTime<Utc>,
    pub entry_status: EntryStatus,
    pub exclusion_reason: Option<String>,
    pub is_correct: Option<bool>,
}

impl From<entries::Model> for EntryResponse {
    fn from(m: entries::Model) -> Self {
        EntryResponse {
            id: m.id,
            comment_id: m.comment_id,
            author_id: m.author_id,
            author_display_name: m.author_display_name,
            comment_text: m.comment_text,
            comment_url: m.comment_url,
            commented_at: m.commented_at,
            entry_status: m.entry_status,
            exclusion_reason: m.exclusion_reason,
            is_correct: m.is_correct,
        }
    }
}

pub type EntryPageResponse = PaginatedResponse<EntryResponse>;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WinnerResponse {
    pub rank: i32,
    pub winner_type: WinnerType,
    pub entry_id: i64,
    pub author_display_name: String,
    pub comment_id: String,
    pub comment_url: Option<String>,
}

impl WinnerResponse {
    pub fn from_parts(winner: &winners::Model, entry: &entries::Model) -> Self {
        WinnerResponse {
            rank: winner.rank,
            winner_type: winner.winner_type,
            entry_id: winner.entry_id,
            author_display_name: entry.author_display_name.clone(),
            comment_id: entry.comment_id.clone(),
            comment_url: entry.comment_url.clone(),
        }
    }
}

/// 发布响应 (manifest 即交给渲染协作方的内容)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublishResponse {
    pub draw_id: i64,
    pub public_view_slug: String,
    pub published_at: DateTime<Utc>,
    pub video_url: Option<String>,
    #[schema(value_type = Object)]
    pub manifest: serde_json::Value,
}
