pub mod link;

pub use link::{generate_room, VideoLinkService};
