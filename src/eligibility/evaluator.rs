use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::eligibility::answer::evaluate_correctness;
use crate::eligibility::normalize::{CanonicalComment, extract_mentions, has_hashtag};
use crate::eligibility::rules::EffectiveRules;
use crate::entities::{AnswerMatch, DrawMode, Platform};

/// 排除原因码 (稳定, 原样进入快照的 breakdown 与条目的 exclusion_reason)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    MissingRequiredKeyword,
    ContainsBannedKeyword,
    DuplicateUser,
    PageAdmin,
    MentionsBelowMin,
    MissingRequiredHashtag,
    MissingRequiredMention,
    BlockedUser,
    LikeCheckUnavailable,
    WrongAnswer,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::MissingRequiredKeyword => "missing_required_keyword",
            ExclusionReason::ContainsBannedKeyword => "contains_banned_keyword",
            ExclusionReason::DuplicateUser => "duplicate_user",
            ExclusionReason::PageAdmin => "page_admin",
            ExclusionReason::MentionsBelowMin => "mentions_below_min",
            ExclusionReason::MissingRequiredHashtag => "missing_required_hashtag",
            ExclusionReason::MissingRequiredMention => "missing_required_mention",
            ExclusionReason::BlockedUser => "blocked_user",
            ExclusionReason::LikeCheckUnavailable => "like_check_unavailable",
            ExclusionReason::WrongAnswer => "wrong_answer",
        }
    }
}

/// 求值所需的抽奖侧参数 (从 draws 行裁剪出的纯结构)
#[derive(Debug, Clone)]
pub struct DrawSpec {
    pub platform: Platform,
    pub draw_mode: DrawMode,
    pub answer_match: AnswerMatch,
    pub correct_answer: Option<String>,
    /// 报名窗口截止; None 表示窗口不设上限
    pub locked_at: Option<DateTime<Utc>>,
}

/// 单条评论的判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// 晚于窗口截止: 不计数、不排除, 整条跳过
    OutsideWindow,
    Eligible { is_correct: Option<bool> },
    Excluded {
        reason: ExclusionReason,
        is_correct: Option<bool>,
    },
}

/// 一次对账运行的累加器。
/// 显式按运行传入 (而非服务级状态), 并行对不同抽奖求值互不影响。
#[derive(Debug, Default)]
pub struct EvaluationRun {
    seen_authors: HashSet<String>,
    authors_in_window: HashSet<String>,
    pub total_in_window: i64,
    pub eligible_count: i64,
    pub excluded_count: i64,
    pub breakdown: BTreeMap<String, i64>,
    pub latest_comment_at: Option<DateTime<Utc>>,
}

impl EvaluationRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique_users_count(&self) -> i64 {
        self.authors_in_window.len() as i64
    }

    fn exclude(&mut self, reason: ExclusionReason, is_correct: Option<bool>) -> Verdict {
        self.excluded_count += 1;
        *self.breakdown.entry(reason.as_str().to_string()).or_insert(0) += 1;
        Verdict::Excluded { reason, is_correct }
    }
}

/// 按固定顺序对一条规范化评论求值, 首个未通过的规则即为排除原因。
/// 文本检查一律在小写化文本上进行。
pub fn evaluate_comment(
    run: &mut EvaluationRun,
    rules: &EffectiveRules,
    spec: &DrawSpec,
    comment: &CanonicalComment,
) -> Verdict {
    // 1. 窗口检查: 晚于截止的评论完全跳过, 不进入任何计数
    if let Some(cutoff) = spec.locked_at
        && let Some(created_at) = comment.created_at
        && created_at > cutoff
    {
        return Verdict::OutsideWindow;
    }

    run.total_in_window += 1;
    run.authors_in_window.insert(comment.author_key());
    if let Some(created_at) = comment.created_at
        && run.latest_comment_at.is_none_or(|latest| created_at > latest)
    {
        run.latest_comment_at = Some(created_at);
    }

    let text = comment.text.to_lowercase();
    // random_correct 模式下所有窗口内评论都记录对错, 便于审计
    let is_correct = match spec.draw_mode {
        DrawMode::RandomCorrect => Some(evaluate_correctness(
            &comment.text,
            spec.correct_answer.as_deref().unwrap_or(""),
            spec.answer_match,
        )),
        DrawMode::RandomAll => None,
    };

    // 2. 必含关键词
    if let Some(keyword) = &rules.required_keyword
        && !text.contains(keyword)
    {
        return run.exclude(ExclusionReason::MissingRequiredKeyword, is_correct);
    }

    // 3. 禁用关键词
    if let Some(keyword) = &rules.banned_keyword
        && text.contains(keyword)
    {
        return run.exclude(ExclusionReason::ContainsBannedKeyword, is_correct);
    }

    // 4. 每人一条: 首条通过前两步的评论占位
    if rules.dedup_one_entry_per_user {
        let key = comment.author_key();
        if run.seen_authors.contains(&key) {
            return run.exclude(ExclusionReason::DuplicateUser, is_correct);
        }
        run.seen_authors.insert(key);
    }

    // 5. 平台特定规则
    match spec.platform {
        Platform::Facebook => {
            if rules.exclude_page_admins && comment.is_page_admin {
                return run.exclude(ExclusionReason::PageAdmin, is_correct);
            }
        }
        Platform::Instagram => {
            let mentions = extract_mentions(&comment.text);
            if rules.min_mentions > 0 && (mentions.len() as i32) < rules.min_mentions {
                return run.exclude(ExclusionReason::MentionsBelowMin, is_correct);
            }
            if let Some(tag) = &rules.required_hashtag
                && !has_hashtag(&comment.text, tag)
            {
                return run.exclude(ExclusionReason::MissingRequiredHashtag, is_correct);
            }
            if let Some(mention) = &rules.required_mention
                && !mentions.contains(mention)
            {
                return run.exclude(ExclusionReason::MissingRequiredMention, is_correct);
            }
            let handle = comment.author_display_name.trim_start_matches('@').to_lowercase();
            if !handle.is_empty() && rules.block_list.iter().any(|b| *b == handle) {
                return run.exclude(ExclusionReason::BlockedUser, is_correct);
            }
        }
    }

    // 6. 点赞要求但平台无法核实
    if rules.require_like && !rules.like_check_available {
        return run.exclude(ExclusionReason::LikeCheckUnavailable, is_correct);
    }

    // 7. 答案检查
    if spec.draw_mode == DrawMode::RandomCorrect && is_correct == Some(false) {
        return run.exclude(ExclusionReason::WrongAnswer, is_correct);
    }

    // 8. 合格
    run.eligible_count += 1;
    Verdict::Eligible { is_correct }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::rules::default_rules;
    use chrono::TimeZone;

    fn spec(platform: Platform) -> DrawSpec {
        DrawSpec {
            platform,
            draw_mode: DrawMode::RandomAll,
            answer_match: AnswerMatch::Exact,
            correct_answer: None,
            locked_at: None,
        }
    }

    fn comment(id: &str, author: &str, text: &str, ts: i64) -> CanonicalComment {
        CanonicalComment {
            id: id.to_string(),
            text: text.to_string(),
            author_id: author.to_string(),
            author_display_name: format!("{author}_name"),
            created_at: Some(Utc.timestamp_opt(ts, 0).unwrap()),
            url: None,
            is_page_admin: false,
        }
    }

    #[test]
    fn test_comment_after_cutoff_is_skipped_not_excluded() {
        let mut run = EvaluationRun::new();
        let mut s = spec(Platform::Facebook);
        s.locked_at = Some(Utc.timestamp_opt(100, 0).unwrap());

        let verdict = evaluate_comment(&mut run, &default_rules(), &s, &comment("c1", "u1", "hi", 200));
        assert_eq!(verdict, Verdict::OutsideWindow);
        assert_eq!(run.total_in_window, 0);
        assert_eq!(run.eligible_count, 0);
        assert_eq!(run.excluded_count, 0);
    }

    #[test]
    fn test_required_keyword_first_match_wins() {
        let mut run = EvaluationRun::new();
        let mut rules = default_rules();
        rules.required_keyword = Some("enter".to_string());
        rules.banned_keyword = Some("spam".to_string());
        let s = spec(Platform::Facebook);

        // 同时缺关键词又含禁词: 只记首个未通过的规则
        let verdict = evaluate_comment(&mut run, &rules, &s, &comment("c1", "u1", "pure spam", 1));
        assert!(matches!(
            verdict,
            Verdict::Excluded { reason: ExclusionReason::MissingRequiredKeyword, .. }
        ));
        assert_eq!(run.breakdown.get("missing_required_keyword"), Some(&1));
        assert_eq!(run.breakdown.get("contains_banned_keyword"), None);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let mut run = EvaluationRun::new();
        let mut rules = default_rules();
        rules.required_keyword = Some("enter".to_string());
        let s = spec(Platform::Facebook);

        let verdict = evaluate_comment(&mut run, &rules, &s, &comment("c1", "u1", "I ENTER!", 1));
        assert!(matches!(verdict, Verdict::Eligible { .. }));
    }

    #[test]
    fn test_dedup_first_comment_wins() {
        let mut run = EvaluationRun::new();
        let rules = default_rules();
        let s = spec(Platform::Facebook);

        let first = evaluate_comment(&mut run, &rules, &s, &comment("c1", "u1", "one", 1));
        let second = evaluate_comment(&mut run, &rules, &s, &comment("c2", "u1", "two", 2));
        assert!(matches!(first, Verdict::Eligible { .. }));
        assert!(matches!(
            second,
            Verdict::Excluded { reason: ExclusionReason::DuplicateUser, .. }
        ));
        assert_eq!(run.eligible_count, 1);
        assert_eq!(run.excluded_count, 1);
    }

    #[test]
    fn test_instagram_rules_in_order() {
        let mut rules = default_rules();
        rules.min_mentions = 1;
        rules.required_hashtag = Some("giveaway".to_string());
        rules.required_mention = Some("brand".to_string());
        rules.block_list = vec!["badguy".to_string()];
        let s = spec(Platform::Instagram);

        let mut run = EvaluationRun::new();
        let v = evaluate_comment(&mut run, &rules, &s, &comment("c1", "u1", "no mentions", 1));
        assert!(matches!(
            v,
            Verdict::Excluded { reason: ExclusionReason::MentionsBelowMin, .. }
        ));

        let v = evaluate_comment(&mut run, &rules, &s, &comment("c2", "u2", "@someone hi", 2));
        assert!(matches!(
            v,
            Verdict::Excluded { reason: ExclusionReason::MissingRequiredHashtag, .. }
        ));

        let v = evaluate_comment(&mut run, &rules, &s, &comment("c3", "u3", "@someone #Giveaway", 3));
        assert!(matches!(
            v,
            Verdict::Excluded { reason: ExclusionReason::MissingRequiredMention, .. }
        ));

        let v = evaluate_comment(&mut run, &rules, &s, &comment("c4", "u4", "@Brand #Giveaway", 4));
        assert!(matches!(v, Verdict::Eligible { .. }));

        let mut blocked = comment("c5", "u5", "@Brand #Giveaway", 5);
        blocked.author_display_name = "@BadGuy".to_string();
        let v = evaluate_comment(&mut run, &rules, &s, &blocked);
        assert!(matches!(
            v,
            Verdict::Excluded { reason: ExclusionReason::BlockedUser, .. }
        ));
    }

    #[test]
    fn test_page_admin_excluded_on_facebook() {
        let mut rules = default_rules();
        rules.exclude_page_admins = true;
        let s = spec(Platform::Facebook);

        let mut run = EvaluationRun::new();
        let mut admin = comment("c1", "page", "hello", 1);
        admin.is_page_admin = true;
        let v = evaluate_comment(&mut run, &rules, &s, &admin);
        assert!(matches!(
            v,
            Verdict::Excluded { reason: ExclusionReason::PageAdmin, .. }
        ));
    }

    #[test]
    fn test_like_requirement_excludes_when_unverifiable() {
        let mut rules = default_rules();
        rules.require_like = true;
        rules.like_check_available = false;
        let s = spec(Platform::Facebook);

        let mut run = EvaluationRun::new();
        let v = evaluate_comment(&mut run, &rules, &s, &comment("c1", "u1", "hi", 1));
        assert!(matches!(
            v,
            Verdict::Excluded { reason: ExclusionReason::LikeCheckUnavailable, .. }
        ));
    }

    #[test]
    fn test_wrong_answer_excluded_in_random_correct_mode() {
        let rules = default_rules();
        let s = DrawSpec {
            platform: Platform::Facebook,
            draw_mode: DrawMode::RandomCorrect,
            answer_match: AnswerMatch::Contains,
            correct_answer: Some("cafe".to_string()),
            locked_at: None,
        };

        let mut run = EvaluationRun::new();
        let v = evaluate_comment(&mut run, &rules, &s, &comment("c1", "u1", "I choose cafe", 1));
        assert_eq!(v, Verdict::Eligible { is_correct: Some(true) });

        let v = evaluate_comment(&mut run, &rules, &s, &comment("c2", "u2", "I choose tea", 2));
        assert_eq!(
            v,
            Verdict::Excluded {
                reason: ExclusionReason::WrongAnswer,
                is_correct: Some(false)
            }
        );
    }

    #[test]
    fn test_excluded_comment_still_records_correctness() {
        let mut rules = default_rules();
        rules.required_keyword = Some("enter".to_string());
        let s = DrawSpec {
            platform: Platform::Facebook,
            draw_mode: DrawMode::RandomCorrect,
            answer_match: AnswerMatch::Exact,
            correct_answer: Some("cafe".to_string()),
            locked_at: None,
        };

        let mut run = EvaluationRun::new();
        let v = evaluate_comment(&mut run, &rules, &s, &comment("c1", "u1", "cafe", 1));
        assert_eq!(
            v,
            Verdict::Excluded {
                reason: ExclusionReason::MissingRequiredKeyword,
                is_correct: Some(true)
            }
        );
    }

    /// 端到端场景: 关键词 + 每人一条 + 窗口截止
    #[test]
    fn test_reconciliation_scenario() {
        let mut rules = default_rules();
        rules.required_keyword = Some("enter".to_string());
        let mut s = spec(Platform::Facebook);
        let cutoff = Utc.timestamp_opt(1000, 0).unwrap();
        s.locked_at = Some(cutoff);

        let comments = vec![
            comment("c1", "u1", "I ENTER!", 100),
            comment("c2", "u1", "ENTER again", 200),
            comment("c3", "u2", "no keyword", 300),
            comment("c4", "u3", "ENTER", 2000),
        ];

        let mut run = EvaluationRun::new();
        let verdicts: Vec<Verdict> = comments
            .iter()
            .map(|c| evaluate_comment(&mut run, &rules, &s, c))
            .collect();

        assert!(matches!(verdicts[0], Verdict::Eligible { .. }));
        assert!(matches!(
            verdicts[1],
            Verdict::Excluded { reason: ExclusionReason::DuplicateUser, .. }
        ));
        assert!(matches!(
            verdicts[2],
            Verdict::Excluded { reason: ExclusionReason::MissingRequiredKeyword, .. }
        ));
        assert_eq!(verdicts[3], Verdict::OutsideWindow);

        assert_eq!(run.total_in_window, 3);
        assert_eq!(run.unique_users_count(), 2);
        assert_eq!(run.eligible_count, 1);
        assert_eq!(run.excluded_count, 2);
        assert_eq!(run.breakdown.get("duplicate_user"), Some(&1));
        assert_eq!(run.breakdown.get("missing_required_keyword"), Some(&1));
        assert_eq!(
            run.latest_comment_at,
            Some(Utc.timestamp_opt(300, 0).unwrap())
        );
    }

    /// 幂等性: 同一批评论在两次全新运行中得到相同的判定序列与聚合
    #[test]
    fn test_two_runs_on_same_input_are_identical() {
        let mut rules = default_rules();
        rules.required_keyword = Some("enter".to_string());
        let s = spec(Platform::Facebook);
        let comments = vec![
            comment("c1", "u1", "enter one", 1),
            comment("c2", "u2", "nothing", 2),
            comment("c3", "u1", "enter two", 3),
        ];

        let run_once = || {
            let mut run = EvaluationRun::new();
            let verdicts: Vec<Verdict> = comments
                .iter()
                .map(|c| evaluate_comment(&mut run, &rules, &s, c))
                .collect();
            (verdicts, run.eligible_count, run.excluded_count, run.breakdown)
        };

        assert_eq!(run_once(), run_once());
    }
}
