pub mod answer;
pub mod evaluator;
pub mod normalize;
pub mod rules;

pub use answer::{evaluate_correctness, normalize_answer};
pub use evaluator::{DrawSpec, EvaluationRun, ExclusionReason, Verdict, evaluate_comment};
pub use normalize::{CanonicalComment, extract_mentions, has_hashtag, normalize_comment};
pub use rules::{EffectiveRules, default_rules};
