use uuid::Uuid;

/// 生成公开结果页 slug (一经分配不再变化)
pub fn generate_public_slug() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_shape() {
        let slug = generate_public_slug();
        assert_eq!(slug.len(), 12);
        assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_slugs_are_unique() {
        assert_ne!(generate_public_slug(), generate_public_slug());
    }
}
