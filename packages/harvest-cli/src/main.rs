//! Harvest runner: boots the browser session, runs the pipeline, writes
//! both sinks best-effort, reports the count.

mod sinks;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harvester::{HarvestConfig, Harvester, WebDriverSession};

#[derive(Parser, Debug)]
#[command(
    name = "harvest",
    about = "Harvest specification documents from the OpenID specs index"
)]
struct Args {
    /// WebDriver endpoint to attach to
    #[arg(long, default_value = "http://localhost:9515")]
    webdriver: String,

    /// Listing page to traverse (defaults to the OpenID specs index)
    #[arg(long)]
    listing_url: Option<String>,

    /// Maximum documents to collect (0 = no cap)
    #[arg(long, default_value_t = 50)]
    max_documents: usize,

    /// Binary snapshot output path
    #[arg(long, default_value = "backup/documents.backup.bin")]
    snapshot: PathBuf,

    /// CSV export output path
    #[arg(long, default_value = "out/openid_documents.csv")]
    export: PathBuf,

    /// Run the browser headless
    #[arg(long)]
    headless: bool,

    /// Stop at the first document already present in the previous snapshot
    #[arg(long)]
    incremental: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,harvester=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = HarvestConfig::default().with_max_documents(args.max_documents);
    if let Some(listing_url) = args.listing_url {
        config = config.with_listing_url(listing_url);
    }

    // The session is the only fatal dependency; everything past this point
    // degrades to partial results or a skipped sink.
    let session = WebDriverSession::connect(&args.webdriver, args.headless)
        .await
        .context("failed to start browser-automation session")?;

    let mut harvester = Harvester::new(&session, config);
    if args.incremental {
        match sinks::read_snapshot(&args.snapshot) {
            Ok(previous) => {
                if let Some(last) = previous.first() {
                    harvester = harvester.with_last_document(last);
                }
            }
            Err(e) => eprintln!("ignoring previous snapshot: {e}"),
        }
    }

    let docs = harvester.content().await;
    drop(harvester);

    // Each sink is best-effort; one failing must not stop the other
    if let Err(e) = sinks::write_snapshot(&args.snapshot, &docs) {
        eprintln!("{e}");
    }
    if let Err(e) = sinks::write_export(&args.export, &docs) {
        eprintln!("{e}");
    }

    if let Err(e) = session.quit().await {
        eprintln!("failed to close browser session: {e}");
    }

    println!("{}", docs.len());
    Ok(())
}
