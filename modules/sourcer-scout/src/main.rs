use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sourcer_common::{Config, Platform, SourcerError};
use sourcer_scout::adapters::{InstagramAdapter, TikTokAdapter};
use sourcer_scout::pipeline::Pipeline;
use sourcer_sheets::SheetStore;

#[derive(Parser)]
#[command(
    name = "sourcer-scout",
    about = "Discover, score, and store influencer accounts by hashtag"
)]
struct Args {
    /// Platform to source from (instagram or tiktok).
    #[arg(long)]
    platform: Platform,

    /// Comma-separated hashtags, e.g. "#IBExams, #IBDiploma".
    #[arg(long)]
    hashtags: String,

    /// Posts to scrape per hashtag.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..=1000))]
    limit: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sourcer_scout=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    info!(platform = %args.platform, "Influencer sourcer starting...");

    // Fail fast: without the store there is nowhere to audit or persist.
    let store = SheetStore::open(&config.sheets_token, &config.spreadsheet_id)
        .await
        .map_err(|e| SourcerError::Store(e.to_string()))?;

    let result = match args.platform {
        Platform::Instagram => {
            let adapter = InstagramAdapter::new(&config.apify_api_token);
            Pipeline::new(&adapter, &store, config.thresholds, config.concurrency)
                .run(&args.hashtags, args.limit)
                .await
        }
        Platform::TikTok => {
            let adapter = TikTokAdapter::new(&config.apify_api_token);
            Pipeline::new(&adapter, &store, config.thresholds, config.concurrency)
                .run(&args.hashtags, args.limit)
                .await
        }
    };

    match result {
        Ok(stats) => {
            println!("{stats}");
            Ok(())
        }
        Err(SourcerError::Validation(message)) => {
            eprintln!("{message}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
