//! Media resolution for media-bearing events

pub mod prefetch;
pub mod resolver;

pub use prefetch::{MediaPrefetch, Resolved};
pub use resolver::{asset_path, MediaResolver};
