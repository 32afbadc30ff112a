pub mod draws;
pub mod eligibility_snapshots;
pub mod entries;
pub mod publish_assets;
pub mod rule_sets;
pub mod sources;
pub mod winners;

pub use draws as draw_entity;
pub use eligibility_snapshots as snapshot_entity;
pub use entries as entry_entity;
pub use publish_assets as publish_asset_entity;
pub use rule_sets as rule_set_entity;
pub use sources as source_entity;
pub use winners as winner_entity;

pub use draws::{AnswerMatch, DrawMode, DrawStatus, Platform};
pub use entries::EntryStatus;
pub use winners::WinnerType;
