use std::sync::Arc;

use chrono::Duration;

use crate::{
    catalog::{Catalog, CatalogCache},
    clock::Clock,
    error::ServiceError,
    latest_prices::{LatestPriceCache, LatestPrices},
    price_source::PriceSource,
};

/// Both caches plus the upstream they refresh from. Cheap to clone.
#[derive(Clone)]
pub(crate) struct MarketData {
    catalog: Arc<CatalogCache>,
    latest: Arc<LatestPriceCache>,
    source: Arc<dyn PriceSource>,
}

impl MarketData {
    pub(crate) fn new(
        source: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
        catalog_ttl: Duration,
        latest_ttl: Duration,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogCache::new(source.clone(), clock.clone(), catalog_ttl)),
            latest: Arc::new(LatestPriceCache::new(source.clone(), clock, latest_ttl)),
            source,
        }
    }

    pub(crate) async fn catalog(&self) -> Result<Arc<Catalog>, ServiceError> {
        self.catalog.get().await
    }

    /// Fetches the catalog and latest prices concurrently. The pair returned is what a single
    /// response must be built from; the two caches refresh independently of each other.
    pub(crate) async fn snapshot(&self) -> Result<(Arc<Catalog>, Arc<LatestPrices>), ServiceError> {
        futures::future::try_join(self.catalog.get(), self.latest.get()).await
    }

    pub(crate) fn source(&self) -> &dyn PriceSource {
        self.source.as_ref()
    }
}
