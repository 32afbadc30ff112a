use rand::Rng;
use rand::rngs::OsRng;

/// 无放回等概率抽样 (部分 Fisher-Yates)。
/// 每一步在剩余元素上取密码学安全的均匀随机下标并移除,
/// 任一剩余元素在每一步被选中的概率相同; 返回顺序即抽取顺序。
/// count 超过池大小时抽完为止。
pub fn sample_without_replacement<T>(pool: &mut Vec<T>, count: usize) -> Vec<T> {
    let take = count.min(pool.len());
    let mut picked = Vec::with_capacity(take);
    for _ in 0..take {
        let idx = OsRng.gen_range(0..pool.len());
        picked.push(pool.swap_remove(idx));
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_draws_exactly_k_distinct_elements() {
        let mut pool: Vec<i32> = (0..50).collect();
        let picked = sample_without_replacement(&mut pool, 7);
        assert_eq!(picked.len(), 7);
        assert_eq!(pool.len(), 43);

        let unique: HashSet<i32> = picked.iter().copied().collect();
        assert_eq!(unique.len(), 7);
        for v in &picked {
            assert!((0..50).contains(v));
            assert!(!pool.contains(v));
        }
    }

    #[test]
    fn test_short_pool_returns_all() {
        let mut pool = vec![1, 2, 3];
        let picked = sample_without_replacement(&mut pool, 10);
        assert_eq!(picked.len(), 3);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_empty_pool() {
        let mut pool: Vec<i32> = Vec::new();
        assert!(sample_without_replacement(&mut pool, 5).is_empty());
    }
}
