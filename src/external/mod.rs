pub mod facebook;
pub mod instagram;
pub mod renderer;

pub use facebook::FacebookApi;
pub use instagram::InstagramApi;
pub use renderer::{RenderStatus, RendererClient};

use chrono::{DateTime, Utc};

use crate::entities::{Platform, source_entity as sources};
use crate::error::AppResult;

/// 各平台客户端拉回的统一原始评论。
/// 字段缺失降级为空串/None, 不让单条畸形评论打断整批。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawComment {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub author_display_name: String,
    pub created_at: Option<DateTime<Utc>>,
    /// 评论固定链接 (平台提供时)
    pub url: Option<String>,
    /// 回复指向的父评论 (仅 Facebook)
    pub parent_id: Option<String>,
    /// 页面管理员标记 (仅页面令牌拉取的 Facebook 评论携带)
    pub is_page_admin: bool,
}

/// 按平台分发的评论源适配器集合; 求值与对账侧不感知平台差异
#[derive(Clone)]
pub struct CommentSources {
    pub facebook: FacebookApi,
    pub instagram: InstagramApi,
}

impl CommentSources {
    pub async fn fetch_comments(
        &self,
        platform: Platform,
        source: &sources::Model,
        include_replies: bool,
    ) -> AppResult<Vec<RawComment>> {
        match platform {
            Platform::Facebook => self.facebook.fetch_comments(source, include_replies).await,
            Platform::Instagram => self.instagram.fetch_comments(source).await,
        }
    }
}
