use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::FacebookConfig;
use crate::entities::source_entity as sources;
use crate::error::{AppError, AppResult};
use crate::external::RawComment;

/// Graph API /comments 返回的单条评论 (字段宽容解析)
#[derive(Debug, Deserialize)]
pub struct FacebookComment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub from: Option<FacebookAuthor>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub parent: Option<FacebookParent>,
    #[serde(default)]
    pub permalink_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FacebookAuthor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 仅页面令牌拉取时出现
    #[serde(default, rename = "isPageAdmin")]
    pub is_page_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct FacebookParent {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct CommentsPage {
    #[serde(default)]
    data: Vec<FacebookComment>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default)]
    cursors: Option<Cursors>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Cursors {
    #[serde(default)]
    after: Option<String>,
}

#[derive(Clone)]
pub struct FacebookApi {
    client: Client,
    config: FacebookConfig,
}

impl FacebookApi {
    pub fn new(config: FacebookConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// 拉取帖子的全部评论 (游标翻页直到末页)。
    /// include_replies 时使用 filter=stream 拿全部层级, 否则仅顶层评论。
    /// 任何一页失败都让整次拉取失败, 对账侧据此放弃本次运行。
    pub async fn fetch_comments(
        &self,
        source: &sources::Model,
        include_replies: bool,
    ) -> AppResult<Vec<RawComment>> {
        let token = resolve_page_token(source)?;
        let url = format!("{}/{}/comments", self.config.base_url, source.post_external_id);
        let filter = if include_replies { "stream" } else { "toplevel" };

        let mut all = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![
                (
                    "fields",
                    "id,message,created_time,from,parent{id},permalink_url".to_string(),
                ),
                ("filter", filter.to_string()),
                ("order", "chronological".to_string()),
                ("limit", self.config.page_size.to_string()),
                ("access_token", token.clone()),
            ];
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            let response = self
                .client
                .get(&url)
                .query(&query)
                .send()
                .await
                .map_err(|e| AppError::SourceFetch(format!("Facebook comments request: {e}")))?;

            if !response.status().is_success() {
                return Err(AppError::SourceFetch(format!(
                    "Facebook comments request failed with status {}",
                    response.status()
                )));
            }

            let page: CommentsPage = response
                .json()
                .await
                .map_err(|e| AppError::SourceFetch(format!("Facebook comments decode: {e}")))?;

            all.extend(page.data.into_iter().map(into_raw_comment));

            let next_cursor = page
                .paging
                .as_ref()
                .filter(|p| p.next.is_some())
                .and_then(|p| p.cursors.as_ref())
                .and_then(|c| c.after.clone());
            match next_cursor {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        log::info!(
            "Fetched {} Facebook comments for post {}",
            all.len(),
            source.post_external_id
        );
        Ok(all)
    }
}

fn into_raw_comment(c: FacebookComment) -> RawComment {
    let (author_id, author_name, is_page_admin) = match c.from {
        Some(a) => (a.id, a.name, a.is_page_admin),
        None => (String::new(), String::new(), false),
    };
    RawComment {
        id: c.id,
        text: c.message,
        author_id,
        author_display_name: author_name,
        created_at: parse_graph_time(c.created_time.as_deref()),
        url: c.permalink_url.filter(|u| !u.is_empty()),
        parent_id: c.parent.map(|p| p.id).filter(|id| !id.is_empty()),
        is_page_admin,
    }
}

/// Graph API 时间格式: ISO8601, 时区形如 +0000
pub(crate) fn parse_graph_time(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 页面令牌以引用存储 (密钥由部署侧注入环境), 不落库明文
fn resolve_page_token(source: &sources::Model) -> AppResult<String> {
    let token_ref = source
        .page_token_ref
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::ValidationError("Source has no page token reference".to_string())
        })?;
    std::env::var(token_ref).map_err(|_| {
        AppError::SourceFetch(format!("Page token reference {token_ref} cannot be resolved"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graph_time() {
        let t = parse_graph_time(Some("2026-03-01T12:30:00+0000")).unwrap();
        assert_eq!(t.to_rfc3339(), "2026-03-01T12:30:00+00:00");
        assert!(parse_graph_time(Some("2026-03-01T12:30:00Z")).is_some());
        assert!(parse_graph_time(Some("not a date")).is_none());
        assert!(parse_graph_time(None).is_none());
    }

    #[test]
    fn test_malformed_comment_degrades_to_defaults() {
        let c: FacebookComment = serde_json::from_str("{}").unwrap();
        let raw = into_raw_comment(c);
        assert_eq!(raw.id, "");
        assert_eq!(raw.text, "");
        assert!(raw.created_at.is_none());
        assert!(raw.parent_id.is_none());
    }

    #[test]
    fn test_reply_carries_parent_id() {
        let c: FacebookComment = serde_json::from_value(serde_json::json!({
            "id": "c2",
            "message": "a reply",
            "from": {"id": "u1", "name": "User"},
            "parent": {"id": "c1"}
        }))
        .unwrap();
        let raw = into_raw_comment(c);
        assert_eq!(raw.parent_id.as_deref(), Some("c1"));
    }
}
