use anyhow::{Context, Result};

use nowshowing::{DetailExtractor, PageClient};

pub async fn cmd_detail(url: &str, show_trace: bool) -> Result<()> {
    let client = PageClient::new()?;
    let html = client
        .fetch_text(url)
        .await
        .with_context(|| format!("failed to fetch detail page {url}"))?;

    let extraction = DetailExtractor::default().extract_traced(&html, url);
    println!("{}", serde_json::to_string_pretty(&extraction.record)?);

    if show_trace {
        let trace = &extraction.trace;
        eprintln!("year:   {}", trace.year.join(" -> "));
        eprintln!("genres: {}", trace.genres.join(" -> "));
        eprintln!("rating: {}", trace.rating.join(" -> "));
    }

    if extraction.record.external_id.is_none() {
        eprintln!("⚠️  No external id found; a batch run would drop this movie");
    }

    Ok(())
}
