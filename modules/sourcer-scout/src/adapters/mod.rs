//! Platform adapters over the Apify actors. One module per platform; the
//! orchestrator only ever sees the `PlatformAdapter` trait.

mod instagram;
mod tiktok;

pub use instagram::InstagramAdapter;
pub use tiktok::TikTokAdapter;
