use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Instagram actor types ---

/// Input for the Instagram hashtag scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramHashtagInput {
    pub hashtags: Vec<String>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// A post item from the Instagram hashtag scraper dataset. Only the owner
/// is of interest at discovery time; everything else is refetched per profile.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramHashtagPost {
    #[serde(rename = "ownerUsername")]
    pub owner_username: Option<String>,
}

/// Input for the Instagram profile scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramProfileInput {
    pub usernames: Vec<String>,
}

/// A profile record from the Instagram profile scraper dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramProfile {
    #[serde(rename = "profilePicUrl")]
    pub profile_pic_url: Option<String>,
    #[serde(rename = "postsCount")]
    pub posts_count: Option<i64>,
    #[serde(rename = "followersCount")]
    pub followers_count: Option<i64>,
    pub biography: Option<String>,
}

/// Input for the Instagram post scraper actor (per-user recent posts).
#[derive(Debug, Clone, Serialize)]
pub struct InstagramPostsInput {
    pub username: Vec<String>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// A single Instagram post from the post scraper dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramPost {
    #[serde(rename = "takenAtTimestamp")]
    pub taken_at_timestamp: Option<i64>,
    #[serde(rename = "likesCount")]
    pub likes_count: Option<i64>,
    #[serde(rename = "commentsCount")]
    pub comments_count: Option<i64>,
}

// --- TikTok actor types ---

/// Input for the TikTok hashtag scraper actor. Media downloads are always
/// disabled; this pipeline only reads metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TikTokHashtagInput {
    pub hashtags: Vec<String>,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
    #[serde(rename = "shouldDownloadVideos")]
    pub should_download_videos: bool,
    #[serde(rename = "shouldDownloadCovers")]
    pub should_download_covers: bool,
    #[serde(rename = "shouldDownloadSubtitles")]
    pub should_download_subtitles: bool,
    #[serde(rename = "shouldDownloadSlideshowImages")]
    pub should_download_slideshow_images: bool,
}

impl TikTokHashtagInput {
    pub fn new(hashtag: &str, results_per_page: u32) -> Self {
        Self {
            hashtags: vec![hashtag.to_string()],
            results_per_page,
            should_download_videos: false,
            should_download_covers: false,
            should_download_subtitles: false,
            should_download_slideshow_images: false,
        }
    }
}

/// Input for the TikTok profile scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct TikTokProfileInput {
    pub profiles: Vec<String>,
    #[serde(rename = "profileScrapeSections")]
    pub profile_scrape_sections: Vec<String>,
    #[serde(rename = "profileSorting")]
    pub profile_sorting: String,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
    #[serde(rename = "excludePinnedPosts")]
    pub exclude_pinned_posts: bool,
    #[serde(rename = "shouldDownloadVideos")]
    pub should_download_videos: bool,
    #[serde(rename = "shouldDownloadCovers")]
    pub should_download_covers: bool,
    #[serde(rename = "shouldDownloadSubtitles")]
    pub should_download_subtitles: bool,
    #[serde(rename = "shouldDownloadSlideshowImages")]
    pub should_download_slideshow_images: bool,
    #[serde(rename = "shouldDownloadAvatars")]
    pub should_download_avatars: bool,
}

impl TikTokProfileInput {
    pub fn new(username: &str) -> Self {
        Self {
            profiles: vec![username.to_string()],
            profile_scrape_sections: vec!["videos".to_string()],
            profile_sorting: "latest".to_string(),
            results_per_page: 100,
            exclude_pinned_posts: false,
            should_download_videos: false,
            should_download_covers: false,
            should_download_subtitles: false,
            should_download_slideshow_images: false,
            should_download_avatars: false,
        }
    }
}

/// A TikTok post from the hashtag scraper dataset. Carries full engagement
/// metadata, so TikTok discovery doubles as the activity fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokPost {
    #[serde(rename = "authorMeta")]
    pub author_meta: Option<TikTokAuthor>,
    #[serde(rename = "createTime")]
    pub create_time: Option<i64>,
    #[serde(rename = "diggCount")]
    pub digg_count: Option<i64>,
    #[serde(rename = "commentCount")]
    pub comment_count: Option<i64>,
}

/// Author metadata nested in TikTok dataset items.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokAuthor {
    #[serde(rename = "nickName")]
    pub nick_name: Option<String>,
    pub avatar: Option<String>,
    pub video: Option<i64>,
    pub fans: Option<i64>,
    pub signature: Option<String>,
}

/// An item from the TikTok profile scraper dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokProfileItem {
    #[serde(rename = "authorMeta")]
    pub author_meta: Option<TikTokAuthor>,
}

// --- API plumbing ---

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}
