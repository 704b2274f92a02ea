use anyhow::{bail, Result};

use nowshowing::{model::external_url_for, Config, PageClient, YearWindow};

use super::{build_provider, close_session};

pub async fn cmd_lookup(config: &Config, external_id: &str) -> Result<()> {
    let id = external_id.trim();
    let digits = id.strip_prefix("tt").unwrap_or_default();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        bail!("not an external title id: {external_id} (expected tt followed by digits)");
    }

    let window = YearWindow::current();
    let client = PageClient::new()?;
    let setup = build_provider(config, &client, window).await?;

    println!("📊 Looking up {id} via {}", setup.provider.name());
    let result = setup.provider.lookup(id).await;
    close_session(setup.session.as_ref()).await;

    let enrichment = result?.validated(window);
    println!("🔗 {}", external_url_for(id));
    println!("{}", serde_json::to_string_pretty(&enrichment)?);

    Ok(())
}
