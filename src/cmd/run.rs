use std::sync::Arc;

use anyhow::Result;

use nowshowing::{
    listing, BatchPipeline, Config, DataDir, DetailExtractor, EnrichmentCoordinator, PageClient,
    YearWindow,
};

use super::{build_provider, close_session};
use super::output::{print_summary, ConsoleProgress};

pub async fn cmd_run(config: &Config) -> Result<()> {
    config.validate()?;

    println!("🚀 Fetching now playing movies from {}", config.listing_url);

    let window = YearWindow::current();
    let client = PageClient::new()?;
    let data = DataDir::new(&config.data_dir);

    let entries = listing::discover(&client, &config.listing_url).await?;
    println!("📽️  Found {} movies playing", entries.len());
    data.write_listing(&entries)?;

    let setup = build_provider(config, &client, window).await?;
    println!("🔍 Scraping details (ratings via {})...", setup.provider.name());

    let coordinator = EnrichmentCoordinator::new(setup.provider, window);
    let pipeline = BatchPipeline::new(
        Arc::new(client),
        DetailExtractor::new(window),
        coordinator,
        config.request_delay(),
    );
    let report = pipeline.run(&entries, &ConsoleProgress).await;

    close_session(setup.session.as_ref()).await;

    let path = data.write_records(&report.records)?;
    print_summary(&report, &path);

    Ok(())
}
