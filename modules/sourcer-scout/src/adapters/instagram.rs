use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use apify_client::ApifyClient;
use sourcer_common::{Identity, Platform, PostStats, ProfileSnapshot};

use crate::traits::{Discovery, PlatformAdapter};

/// Instagram adapter. The hashtag actor returns bare post owners, so
/// discovery leaves the side-channel empty and recent activity costs a
/// second actor run per account.
pub struct InstagramAdapter {
    client: ApifyClient,
}

impl InstagramAdapter {
    pub fn new(apify_token: &str) -> Self {
        Self {
            client: ApifyClient::new(apify_token.to_string()),
        }
    }
}

#[async_trait]
impl PlatformAdapter for InstagramAdapter {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn discover(&self, hashtags: &[String], limit: u32) -> Result<Discovery> {
        let mut discovery = Discovery::default();
        for hashtag in hashtags {
            match self.client.instagram_hashtag_posts(hashtag, limit).await {
                Ok(posts) => {
                    for post in posts {
                        if let Some(username) = post.owner_username {
                            discovery.usernames.insert(username);
                        }
                    }
                }
                Err(e) => {
                    warn!(hashtag, error = %e, "Instagram hashtag scrape failed, skipping");
                }
            }
        }
        info!(
            count = discovery.usernames.len(),
            "Instagram discovery complete"
        );
        Ok(discovery)
    }

    async fn fetch_profile(&self, username: &str) -> Result<Option<ProfileSnapshot>> {
        let items = self.client.instagram_profile(username).await?;
        let Some(profile) = items.into_iter().next() else {
            info!(username, "Instagram returned no profile data");
            return Ok(None);
        };

        Ok(Some(ProfileSnapshot {
            identity: Identity::new(Platform::Instagram, username),
            profile_pic_url: profile.profile_pic_url.unwrap_or_default(),
            posts_count: profile.posts_count.unwrap_or(0),
            followers_count: profile.followers_count.unwrap_or(0),
            biography: profile.biography.unwrap_or_default(),
        }))
    }

    async fn fetch_recent_activity(&self, username: &str, limit: u32) -> Result<Vec<PostStats>> {
        let posts = self.client.instagram_user_posts(username, limit).await?;
        let mut stats: Vec<PostStats> = posts
            .into_iter()
            .map(|p| PostStats {
                taken_at: p.taken_at_timestamp.unwrap_or(0),
                likes: p.likes_count.unwrap_or(0),
                comments: p.comments_count.unwrap_or(0),
            })
            .collect();
        stats.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        Ok(stats)
    }
}
