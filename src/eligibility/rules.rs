use crate::entities::rule_set_entity as rule_sets;

/// 求值阶段使用的有效规则 (已做默认值填充与派生字段计算的纯结构)
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveRules {
    pub dedup_one_entry_per_user: bool,
    pub exclude_page_admins: bool,
    pub include_replies: bool,
    /// 小写化后的必含关键词
    pub required_keyword: Option<String>,
    /// 小写化后的禁用关键词
    pub banned_keyword: Option<String>,
    pub require_like: bool,
    /// 派生: 设置了点赞要求时恒为 false (平台无法核实点赞)
    pub like_check_available: bool,
    pub min_mentions: i32,
    /// 不带 # 前缀、小写
    pub required_hashtag: Option<String>,
    /// 不带 @ 前缀、小写
    pub required_mention: Option<String>,
    /// 不带 @ 前缀、小写
    pub block_list: Vec<String>,
}

/// 规则默认值的唯一出处; 抽奖尚未配置规则行时回退到这里
pub fn default_rules() -> EffectiveRules {
    EffectiveRules {
        dedup_one_entry_per_user: true,
        exclude_page_admins: false,
        include_replies: false,
        required_keyword: None,
        banned_keyword: None,
        require_like: false,
        like_check_available: true,
        min_mentions: 0,
        required_hashtag: None,
        required_mention: None,
        block_list: Vec::new(),
    }
}

fn clean_keyword(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

fn clean_tag(value: &Option<String>, prefix: char) -> Option<String> {
    value
        .as_deref()
        .map(|s| s.trim().trim_start_matches(prefix).to_lowercase())
        .filter(|s| !s.is_empty())
}

impl EffectiveRules {
    /// 从规则行构建有效规则; 行不存在时使用 default_rules()
    pub fn from_model(model: Option<&rule_sets::Model>) -> Self {
        let Some(m) = model else {
            return default_rules();
        };

        let block_list = m
            .block_list
            .as_ref()
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().trim_start_matches('@').to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        EffectiveRules {
            dedup_one_entry_per_user: m.dedup_one_entry_per_user,
            exclude_page_admins: m.exclude_page_admins,
            include_replies: m.include_replies,
            required_keyword: clean_keyword(&m.required_keyword),
            banned_keyword: clean_keyword(&m.banned_keyword),
            require_like: m.require_like,
            like_check_available: !m.require_like && m.like_check_available,
            min_mentions: m.min_mentions,
            required_hashtag: clean_tag(&m.required_hashtag, '#'),
            required_mention: clean_tag(&m.required_mention, '@'),
            block_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule_row() -> rule_sets::Model {
        rule_sets::Model {
            id: 1,
            draw_id: 1,
            dedup_one_entry_per_user: false,
            exclude_page_admins: true,
            include_replies: true,
            required_keyword: Some("  ENTER ".to_string()),
            banned_keyword: Some("".to_string()),
            require_like: true,
            like_check_available: true,
            min_mentions: 2,
            required_hashtag: Some("#Giveaway".to_string()),
            required_mention: Some("@Friend".to_string()),
            block_list: Some(json!(["@Spammer", "bot_account", " "])),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_default_rules() {
        let rules = default_rules();
        assert!(rules.dedup_one_entry_per_user);
        assert!(!rules.include_replies);
        assert!(rules.like_check_available);
        assert!(rules.required_keyword.is_none());
        assert!(rules.block_list.is_empty());
    }

    #[test]
    fn test_missing_row_falls_back_to_defaults() {
        assert_eq!(EffectiveRules::from_model(None), default_rules());
    }

    #[test]
    fn test_from_model_normalizes_fields() {
        let rules = EffectiveRules::from_model(Some(&rule_row()));
        assert_eq!(rules.required_keyword.as_deref(), Some("enter"));
        // 空白字符串视为未设置
        assert!(rules.banned_keyword.is_none());
        assert_eq!(rules.required_hashtag.as_deref(), Some("giveaway"));
        assert_eq!(rules.required_mention.as_deref(), Some("friend"));
        assert_eq!(rules.block_list, vec!["spammer", "bot_account"]);
    }

    #[test]
    fn test_like_requirement_disables_like_check() {
        let rules = EffectiveRules::from_model(Some(&rule_row()));
        assert!(rules.require_like);
        assert!(!rules.like_check_available);
    }
}
