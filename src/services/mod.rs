pub mod draw_service;
pub mod publish_service;
pub mod sync_service;
pub mod winner_service;

pub use draw_service::*;
pub use publish_service::*;
pub use sync_service::*;
pub use winner_service::*;
