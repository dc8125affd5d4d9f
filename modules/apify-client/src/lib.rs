pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{
    InstagramHashtagInput, InstagramHashtagPost, InstagramPost, InstagramPostsInput,
    InstagramProfile, InstagramProfileInput, RunData, TikTokAuthor, TikTokHashtagInput,
    TikTokPost, TikTokProfileInput, TikTokProfileItem,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for the Instagram hashtag scraper.
const INSTAGRAM_HASHTAG_SCRAPER: &str = "reGe1ST3OBgYZSsZJ";

/// Actor ID for the Instagram profile scraper.
const INSTAGRAM_PROFILE_SCRAPER: &str = "dSCLg0C3YEZ83HzYX";

/// Actor ID for the Instagram post scraper.
const INSTAGRAM_POST_SCRAPER: &str = "nH2AHrwxeTRJoN5hX";

/// Actor ID for the TikTok hashtag scraper.
const TIKTOK_HASHTAG_SCRAPER: &str = "f1ZeP0K58iwlqG2pY";

/// Actor ID for the TikTok profile scraper.
const TIKTOK_PROFILE_SCRAPER: &str = "0FXVyOXXEmdGcV88a";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Start an actor run. Returns immediately with run metadata.
    async fn start_run<I: Serialize>(&self, actor_id: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", BASE_URL, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", BASE_URL, run_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ApifyError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let api_resp: ApiResponse<RunData> = resp.json().await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", BASE_URL, dataset_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Run an actor end-to-end: start, poll to completion, fetch dataset items.
    async fn run_and_collect<I, T>(&self, actor_id: &str, input: &I) -> Result<Vec<T>>
    where
        I: Serialize,
        T: DeserializeOwned,
    {
        let run = self.start_run(actor_id, input).await?;
        tracing::info!(run_id = %run.id, actor_id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        self.get_dataset_items(&completed.default_dataset_id).await
    }

    /// Scrape posts under one Instagram hashtag.
    pub async fn instagram_hashtag_posts(
        &self,
        hashtag: &str,
        limit: u32,
    ) -> Result<Vec<InstagramHashtagPost>> {
        tracing::info!(hashtag, limit, "Starting Instagram hashtag scrape");
        let input = InstagramHashtagInput {
            hashtags: vec![hashtag.to_string()],
            results_limit: limit,
        };
        let posts = self
            .run_and_collect(INSTAGRAM_HASHTAG_SCRAPER, &input)
            .await?;
        tracing::info!(hashtag, count = posts.len(), "Fetched Instagram hashtag posts");
        Ok(posts)
    }

    /// Scrape one Instagram profile. The dataset holds at most one record;
    /// an empty dataset means the account is unknown upstream.
    pub async fn instagram_profile(&self, username: &str) -> Result<Vec<InstagramProfile>> {
        tracing::info!(username, "Starting Instagram profile scrape");
        let input = InstagramProfileInput {
            usernames: vec![username.to_string()],
        };
        self.run_and_collect(INSTAGRAM_PROFILE_SCRAPER, &input).await
    }

    /// Scrape recent posts for one Instagram account.
    pub async fn instagram_user_posts(
        &self,
        username: &str,
        limit: u32,
    ) -> Result<Vec<InstagramPost>> {
        tracing::info!(username, limit, "Starting Instagram post scrape");
        let input = InstagramPostsInput {
            username: vec![username.to_string()],
            results_limit: limit,
        };
        let posts = self.run_and_collect(INSTAGRAM_POST_SCRAPER, &input).await?;
        tracing::info!(username, count = posts.len(), "Fetched Instagram posts");
        Ok(posts)
    }

    /// Scrape posts under one TikTok hashtag. Items carry full author and
    /// engagement metadata.
    pub async fn tiktok_hashtag_posts(
        &self,
        hashtag: &str,
        results_per_page: u32,
    ) -> Result<Vec<TikTokPost>> {
        tracing::info!(hashtag, results_per_page, "Starting TikTok hashtag scrape");
        let input = TikTokHashtagInput::new(hashtag, results_per_page);
        let posts = self.run_and_collect(TIKTOK_HASHTAG_SCRAPER, &input).await?;
        tracing::info!(hashtag, count = posts.len(), "Fetched TikTok hashtag posts");
        Ok(posts)
    }

    /// Scrape one TikTok profile.
    pub async fn tiktok_profile(&self, username: &str) -> Result<Vec<TikTokProfileItem>> {
        tracing::info!(username, "Starting TikTok profile scrape");
        let input = TikTokProfileInput::new(username);
        self.run_and_collect(TIKTOK_PROFILE_SCRAPER, &input).await
    }
}
