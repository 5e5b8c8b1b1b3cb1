use std::{collections::HashMap, sync::Arc};

use chrono::Duration;
use wiki_prices::{ItemId, LatestPrice};

use crate::{clock::Clock, error::ServiceError, price_source::PriceSource, ttl_cache::TtlCache};

/// The `/latest` map as of one refresh. Replaced wholesale, never merged.
#[derive(Debug, Default)]
pub(crate) struct LatestPrices(HashMap<ItemId, LatestPrice>);

impl LatestPrices {
    pub(crate) fn new(prices: HashMap<ItemId, LatestPrice>) -> Self {
        Self(prices)
    }

    pub(crate) fn get(&self, item_id: ItemId) -> Option<&LatestPrice> {
        self.0.get(&item_id)
    }
}

pub(crate) struct LatestPriceCache {
    cache: TtlCache<LatestPrices>,
    source: Arc<dyn PriceSource>,
}

impl LatestPriceCache {
    pub(crate) fn new(source: Arc<dyn PriceSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new("latest_prices", ttl, clock),
            source,
        }
    }

    pub(crate) async fn get(&self) -> Result<Arc<LatestPrices>, ServiceError> {
        self.cache
            .get_or_refresh(|| async {
                let prices = self.source.latest().await?;
                Ok::<_, ServiceError>(LatestPrices::new(prices))
            })
            .await
    }
}
