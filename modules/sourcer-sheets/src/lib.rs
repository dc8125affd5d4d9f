//! Google Sheets store client.
//!
//! Two fixed worksheets: "Main" holds one append-only row per qualifying
//! account, "Hashtags" holds one audit row per pipeline invocation. The
//! client never updates or deletes; reads are limited to the Main username
//! column, which backs the dedup check.
//!
//! Auth is a ready OAuth bearer token — credential minting and worksheet
//! provisioning belong to the operator, not this crate.

pub mod error;

pub use error::{Result, SheetsError};

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::OnceCell;

use sourcer_common::{AuditRecord, QualifyingRecord};

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const MAIN_WORKSHEET: &str = "Main";
const HASHTAG_WORKSHEET: &str = "Hashtags";

/// Username column of the Main worksheet, skipping the header row.
const USERNAME_RANGE: &str = "Main!B2:B";

/// `values.get` response body.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

pub struct SheetStore {
    client: reqwest::Client,
    token: String,
    spreadsheet_id: String,
    /// Username column, fetched lazily once per store instance (one run).
    known_usernames: OnceCell<HashSet<String>>,
}

impl SheetStore {
    /// Open the store and verify the spreadsheet is reachable. Any failure
    /// here aborts the run before scraping starts.
    pub async fn open(token: &str, spreadsheet_id: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        let store = Self {
            client,
            token: token.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            known_usernames: OnceCell::new(),
        };

        let url = format!(
            "{}/{}?fields=spreadsheetId",
            BASE_URL, store.spreadsheet_id
        );
        let resp = store
            .client
            .get(&url)
            .bearer_auth(&store.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(spreadsheet_id = %store.spreadsheet_id, "Opened spreadsheet");
        Ok(store)
    }

    /// Append one row to a worksheet via `values:append`.
    async fn append_row(&self, worksheet: &str, row: Vec<String>) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}!A1:append?valueInputOption=RAW",
            BASE_URL, self.spreadsheet_id, worksheet
        );
        let body = serde_json::json!({ "values": [row] });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Append a qualifying account to the Main worksheet.
    pub async fn append_qualifying(&self, record: &QualifyingRecord) -> Result<()> {
        self.append_row(MAIN_WORKSHEET, qualifying_row(record)).await?;
        tracing::info!(
            username = %record.snapshot.identity.username,
            platform = %record.snapshot.identity.platform,
            "Stored qualifying account"
        );
        Ok(())
    }

    /// Append one invocation's hashtag audit row to the Hashtags worksheet.
    pub async fn append_audit(&self, record: &AuditRecord) -> Result<()> {
        self.append_row(HASHTAG_WORKSHEET, audit_row(record)).await?;
        tracing::info!(
            hashtags = record.normalized_hashtags.len(),
            "Stored hashtag audit row"
        );
        Ok(())
    }

    /// Whether a username already has a Main row. The column is fetched on
    /// first call and cached for the lifetime of this store instance.
    pub async fn is_known_username(&self, username: &str) -> Result<bool> {
        let known = self
            .known_usernames
            .get_or_try_init(|| self.fetch_username_column())
            .await?;
        Ok(known.contains(username))
    }

    async fn fetch_username_column(&self) -> Result<HashSet<String>> {
        let url = format!(
            "{}/{}/values/{}",
            BASE_URL, self.spreadsheet_id, USERNAME_RANGE
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let range: ValueRange = resp.json().await?;
        let usernames: HashSet<String> = range
            .values
            .into_iter()
            .filter_map(|mut row| if row.is_empty() { None } else { Some(row.remove(0)) })
            .collect();

        tracing::info!(count = usernames.len(), "Fetched known usernames");
        Ok(usernames)
    }
}

/// Main worksheet schema:
/// `[profile_pic_url, username, posts_count, followers_count, biography,
/// profile_link, median_comments, median_likes, engagement_rate]`.
/// Engagement rate is rendered to two decimals here and nowhere else.
fn qualifying_row(record: &QualifyingRecord) -> Vec<String> {
    let snap = &record.snapshot;
    vec![
        snap.profile_pic_url.clone(),
        snap.identity.username.clone(),
        snap.posts_count.to_string(),
        snap.followers_count.to_string(),
        snap.biography.clone(),
        record.profile_link.clone(),
        record.median_comments.to_string(),
        record.median_likes.to_string(),
        format!("{:.2}", record.engagement_rate),
    ]
}

/// Hashtags worksheet schema: `[timestamp, raw_input, normalized_hashtags]`.
fn audit_row(record: &AuditRecord) -> Vec<String> {
    vec![
        record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        record.raw_input.clone(),
        record.normalized_hashtags.join(", "),
    ]
}
