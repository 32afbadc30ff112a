pub mod sampling;
pub mod slug;

pub use sampling::sample_without_replacement;
pub use slug::generate_public_slug;
