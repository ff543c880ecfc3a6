//! Render a browser path against the configured catalog and print the view.
//! Usage:
//!   cargo run --bin catalog_props -- /
//!   cargo run --bin catalog_props -- /movie/550
//!   cargo run --bin catalog_props -- "/search?q=matrix"
//! Reads CATALOG_SOURCE / TMDB_API_KEY like the server (.env supported).

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use reelhouse::config::Config;
use reelhouse::pages::Navigator;
use reelhouse::provider::CatalogProvider;
use serde_json::json;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin catalog_props -- <path>");
        eprintln!("       e.g. /category/top_rated?sort=title");
        std::process::exit(1);
    }

    let config = Config::from_env()?;
    let api = config.build_catalog()?;
    let provider = Arc::new(CatalogProvider::new(api.clone()));
    let mut navigator = Navigator::new(config.page_context(api), provider);

    if !navigator.navigate_path(&args[1]) {
        return Err(anyhow!("unknown path '{}'", args[1]));
    }

    let state = navigator.settled().await;
    let output = match state.error() {
        Some(message) => json!({ "status": "error", "message": message }),
        None => serde_json::to_value(&state)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
