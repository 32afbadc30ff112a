use reqwest::Client;
use serde::Deserialize;

use crate::config::InstagramConfig;
use crate::entities::source_entity as sources;
use crate::error::{AppError, AppResult};
use crate::external::RawComment;
use crate::external::facebook::parse_graph_time;

/// Instagram Graph API /comments 单条评论
#[derive(Debug, Deserialize)]
pub struct InstagramComment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub from: Option<InstagramAuthor>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InstagramAuthor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
struct CommentsPage {
    #[serde(default)]
    data: Vec<InstagramComment>,
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
pub struct InstagramApi {
    client: Client,
    config: InstagramConfig,
}

impl InstagramApi {
    pub fn new(config: InstagramConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// 拉取媒体的全部评论 (游标翻页直到末页)。
    /// Instagram 评论天然平铺, 回复过滤在规范化阶段不适用于本平台。
    pub async fn fetch_comments(&self, source: &sources::Model) -> AppResult<Vec<RawComment>> {
        if self.config.access_token.is_empty() {
            return Err(AppError::SourceFetch(
                "Instagram access token is not configured".to_string(),
            ));
        }

        let url = format!("{}/{}/comments", self.config.base_url, source.post_external_id);
        let mut all = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![
                ("fields", "id,text,username,from,timestamp".to_string()),
                ("limit", self.config.page_size.to_string()),
                ("access_token", self.config.access_token.clone()),
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
                .map_err(|e| AppError::SourceFetch(format!("Instagram comments request: {e}")))?;

            if !response.status().is_success() {
                return Err(AppError::SourceFetch(format!(
                    "Instagram comments request failed with status {}",
                    response.status()
                )));
            }

            let page: CommentsPage = response
                .json()
                .await
                .map_err(|e| AppError::SourceFetch(format!("Instagram comments decode: {e}")))?;

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
            "Fetched {} Instagram comments for media {}",
            all.len(),
            source.post_external_id
        );
        Ok(all)
    }
}

fn into_raw_comment(c: InstagramComment) -> RawComment {
    // 旧版响应只有顶层 username, 新版在 from 里; 两者都兼容
    let (author_id, username) = match c.from {
        Some(a) => {
            let name = if a.username.is_empty() { c.username } else { a.username };
            (a.id, name)
        }
        None => (String::new(), c.username),
    };
    RawComment {
        id: c.id,
        text: c.text,
        author_id,
        author_display_name: username,
        created_at: parse_graph_time(c.timestamp.as_deref()),
        url: None,
        parent_id: None,
        is_page_admin: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_fallback() {
        let c: InstagramComment = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "text": "hello @brand",
            "username": "legacy_name",
            "timestamp": "2026-02-01T10:00:00+0000"
        }))
        .unwrap();
        let raw = into_raw_comment(c);
        assert_eq!(raw.author_display_name, "legacy_name");
        assert_eq!(raw.author_id, "");
        assert!(raw.created_at.is_some());
    }

    #[test]
    fn test_from_username_preferred() {
        let c: InstagramComment = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "text": "hi",
            "username": "legacy_name",
            "from": {"id": "123", "username": "real_name"}
        }))
        .unwrap();
        let raw = into_raw_comment(c);
        assert_eq!(raw.author_display_name, "real_name");
        assert_eq!(raw.author_id, "123");
    }
}
