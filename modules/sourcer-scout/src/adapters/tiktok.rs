use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use apify_client::ApifyClient;
use sourcer_common::{Identity, Platform, PostStats, ProfileSnapshot};

use crate::traits::{Discovery, PlatformAdapter};

/// TikTok adapter. The hashtag actor returns full post items, so discovery
/// populates the side-channel and no separate activity fetch is needed.
pub struct TikTokAdapter {
    client: ApifyClient,
}

impl TikTokAdapter {
    pub fn new(apify_token: &str) -> Self {
        Self {
            client: ApifyClient::new(apify_token.to_string()),
        }
    }
}

#[async_trait]
impl PlatformAdapter for TikTokAdapter {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn discover(&self, hashtags: &[String], limit: u32) -> Result<Discovery> {
        let mut discovery = Discovery::default();
        for hashtag in hashtags {
            match self.client.tiktok_hashtag_posts(hashtag, limit).await {
                Ok(posts) => {
                    for post in posts {
                        let Some(username) = post
                            .author_meta
                            .as_ref()
                            .and_then(|meta| meta.nick_name.clone())
                        else {
                            continue;
                        };
                        discovery.usernames.insert(username.clone());
                        discovery
                            .posts_by_user
                            .entry(username)
                            .or_default()
                            .push(PostStats {
                                taken_at: post.create_time.unwrap_or(0),
                                likes: post.digg_count.unwrap_or(0),
                                comments: post.comment_count.unwrap_or(0),
                            });
                    }
                }
                Err(e) => {
                    warn!(hashtag, error = %e, "TikTok hashtag scrape failed, skipping");
                }
            }
        }
        info!(count = discovery.usernames.len(), "TikTok discovery complete");
        Ok(discovery)
    }

    async fn fetch_profile(&self, username: &str) -> Result<Option<ProfileSnapshot>> {
        let items = self.client.tiktok_profile(username).await?;
        let Some(author) = items.into_iter().next().and_then(|item| item.author_meta) else {
            info!(username, "TikTok returned no profile data");
            return Ok(None);
        };

        Ok(Some(ProfileSnapshot {
            identity: Identity::new(
                Platform::TikTok,
                author.nick_name.unwrap_or_else(|| username.to_string()),
            ),
            profile_pic_url: author.avatar.unwrap_or_default(),
            posts_count: author.video.unwrap_or(0),
            followers_count: author.fans.unwrap_or(0),
            biography: author.signature.unwrap_or_default(),
        }))
    }

    async fn fetch_recent_activity(&self, username: &str, _limit: u32) -> Result<Vec<PostStats>> {
        // TikTok activity rides the discovery side-channel; an account that
        // was discovered always has at least one post there. No posts means
        // zero medians and a rejection downstream.
        debug!(username, "No side-channel posts for TikTok account");
        Ok(Vec::new())
    }
}
