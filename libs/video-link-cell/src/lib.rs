pub mod models;
pub mod services;

pub use models::*;
pub use services::link::{generate_room, VideoLinkService};
