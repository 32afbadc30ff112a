use std::collections::HashSet;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::entities::Platform;
use crate::external::RawComment;

/// 规范化后的评论 (各平台统一形状, 求值器只认它)
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalComment {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub author_display_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub is_page_admin: bool,
}

impl CanonicalComment {
    /// 去重/统计用的作者键; author_id 缺失时退化为小写展示名
    pub fn author_key(&self) -> String {
        if self.author_id.is_empty() {
            self.author_display_name.to_lowercase()
        } else {
            self.author_id.clone()
        }
    }
}

/// 把平台原始评论映射为规范形状。
/// 纯函数; 字段缺失一律降级为空串/None, 单条畸形评论不会中断整批。
/// Facebook 的回复 (带 parent) 在 include_replies 为 false 时直接丢弃, 返回 None。
pub fn normalize_comment(
    platform: Platform,
    raw: &RawComment,
    include_replies: bool,
) -> Option<CanonicalComment> {
    if platform == Platform::Facebook && raw.parent_id.is_some() && !include_replies {
        return None;
    }

    Some(CanonicalComment {
        id: raw.id.clone(),
        text: raw.text.clone(),
        author_id: raw.author_id.clone(),
        author_display_name: raw.author_display_name.clone(),
        created_at: raw.created_at,
        url: raw.url.clone(),
        is_page_admin: raw.is_page_admin,
    })
}

/// 从自由文本提取 @mention 集合 (小写、去 @、去重)
pub fn extract_mentions(text: &str) -> HashSet<String> {
    let re = Regex::new(r"@([A-Za-z0-9_.]+)").unwrap();
    re.captures_iter(text)
        .map(|c| c[1].to_lowercase())
        .collect()
}

/// 大小写不敏感的 #tag 包含检查; tag 入参不带 #
pub fn has_hashtag(text: &str, tag: &str) -> bool {
    if tag.is_empty() {
        return true;
    }
    let needle = format!("#{}", tag.to_lowercase());
    text.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, text: &str, parent: Option<&str>) -> RawComment {
        RawComment {
            id: id.to_string(),
            text: text.to_string(),
            author_id: "u1".to_string(),
            author_display_name: "User One".to_string(),
            created_at: None,
            url: None,
            parent_id: parent.map(|s| s.to_string()),
            is_page_admin: false,
        }
    }

    #[test]
    fn test_facebook_reply_dropped_unless_included() {
        let reply = raw("c2", "reply", Some("c1"));
        assert!(normalize_comment(Platform::Facebook, &reply, false).is_none());
        assert!(normalize_comment(Platform::Facebook, &reply, true).is_some());
        // Instagram 评论没有父引用语义, 不受该开关影响
        assert!(normalize_comment(Platform::Instagram, &reply, false).is_some());
    }

    #[test]
    fn test_malformed_comment_degrades() {
        let empty = RawComment::default();
        let c = normalize_comment(Platform::Instagram, &empty, false).unwrap();
        assert_eq!(c.text, "");
        assert_eq!(c.author_id, "");
        assert!(c.created_at.is_none());
    }

    #[test]
    fn test_author_key_falls_back_to_display_name() {
        let mut c = normalize_comment(Platform::Instagram, &raw("c1", "hi", None), false).unwrap();
        assert_eq!(c.author_key(), "u1");
        c.author_id.clear();
        assert_eq!(c.author_key(), "user one");
    }

    #[test]
    fn test_extract_mentions_dedups_case_insensitive() {
        let mentions = extract_mentions("hey @Alice and @BOB, also @alice again @bob.smith");
        assert_eq!(mentions.len(), 3);
        assert!(mentions.contains("alice"));
        assert!(mentions.contains("bob"));
        assert!(mentions.contains("bob.smith"));
    }

    #[test]
    fn test_has_hashtag() {
        assert!(has_hashtag("I love this #GiveAway!", "giveaway"));
        assert!(!has_hashtag("no tags here", "giveaway"));
        assert!(!has_hashtag("giveaway without hash", "giveaway"));
    }
}
