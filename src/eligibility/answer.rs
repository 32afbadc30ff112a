use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::entities::AnswerMatch;

/// 答案归一化: NFD 分解去掉变音符号, 小写, 再剔除所有非字母数字字符
pub fn normalize_answer(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// 按指定模式判断评论是否答对。
/// 空答案视为恒真 (random_correct 抽奖由生命周期校验阻止空答案落到这里)。
pub fn evaluate_correctness(comment_text: &str, correct_answer: &str, mode: AnswerMatch) -> bool {
    let answer = correct_answer.trim();
    if answer.is_empty() {
        return true;
    }

    match mode {
        AnswerMatch::Exact => comment_text.trim().to_lowercase() == answer.to_lowercase(),
        AnswerMatch::Contains => comment_text.to_lowercase().contains(&answer.to_lowercase()),
        AnswerMatch::NormalizedExact => normalize_answer(comment_text) == normalize_answer(answer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_answer_strips_diacritics_and_punctuation() {
        assert_eq!(normalize_answer("Café!"), "cafe");
        assert_eq!(normalize_answer("  Crème brûlée  "), "cremebrulee");
        assert_eq!(normalize_answer("ABC-123"), "abc123");
    }

    #[test]
    fn test_exact_is_trimmed_case_insensitive() {
        assert!(evaluate_correctness("  CAFE ", "cafe", AnswerMatch::Exact));
        assert!(!evaluate_correctness("cafe!", "cafe", AnswerMatch::Exact));
    }

    #[test]
    fn test_contains() {
        assert!(evaluate_correctness("I choose cafe", "cafe", AnswerMatch::Contains));
        assert!(!evaluate_correctness("I choose tea", "cafe", AnswerMatch::Contains));
    }

    #[test]
    fn test_normalized_exact() {
        assert!(evaluate_correctness("Café", "cafe", AnswerMatch::NormalizedExact));
        assert!(evaluate_correctness("c a f e!", "CAFE", AnswerMatch::NormalizedExact));
        assert!(!evaluate_correctness("cafes", "cafe", AnswerMatch::NormalizedExact));
    }

    #[test]
    fn test_empty_answer_is_vacuously_correct() {
        assert!(evaluate_correctness("anything", "  ", AnswerMatch::Exact));
        assert!(evaluate_correctness("anything", "", AnswerMatch::Contains));
    }
}
