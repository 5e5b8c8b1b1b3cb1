mod catalog;
mod clock;
mod config;
mod error;
mod icons;
mod item_service;
mod latest_prices;
mod market_data;
mod price_source;
mod search_service;
mod stats;
#[cfg(test)]
mod test_support;
mod ttl_cache;
mod web;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use wiki_prices::WikiPricesClient;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::icons::IconResolver;
use crate::item_service::ItemService;
use crate::market_data::MarketData;
use crate::search_service::SearchService;
use crate::web::WebState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::from_env();
    info!(wiki = %config.wiki.base_url, "starting flipper");
    let client = WikiPricesClient::new(config.wiki.clone())?;
    let market = MarketData::new(
        Arc::new(client),
        Arc::new(SystemClock),
        config.mapping_ttl,
        config.latest_ttl,
    );
    // prime the catalog so the first search doesn't pay for it
    let warmup = market.clone();
    tokio::spawn(async move {
        match warmup.catalog().await {
            Ok(catalog) => info!(items = catalog.items().len(), "item catalog loaded"),
            Err(e) => warn!("unable to preload the item catalog {e}"),
        }
    });
    let icons = IconResolver::new(&config.icon_base_url);
    let web_state = WebState {
        search_service: SearchService::new(market.clone(), icons.clone()),
        item_service: ItemService::new(market, icons),
    };
    web::start_web(web_state, &config).await?;
    Ok(())
}
