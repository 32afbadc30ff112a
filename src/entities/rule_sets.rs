use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 资格规则实体 (每个抽奖一行, upsert)
/// 说明:
/// - like_check_available 是派生字段: 只要设置了点赞要求就为 false
///   (平台 API 无法核实点赞, 入口处统一排除)
/// - min_mentions / required_hashtag / required_mention / block_list 仅 Instagram 生效
/// - block_list 为 JSON 数组, 元素为用户名 (带不带 @ 均可)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rule_sets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub draw_id: i64,
    pub dedup_one_entry_per_user: bool,
    pub exclude_page_admins: bool,
    pub include_replies: bool,
    pub required_keyword: Option<String>,
    pub banned_keyword: Option<String>,
    pub require_like: bool,
    pub like_check_available: bool,
    pub min_mentions: i32,
    pub required_hashtag: Option<String>,
    pub required_mention: Option<String>,
    pub block_list: Option<Json>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
