use std::collections::HashMap;

use async_trait::async_trait;
use wiki_prices::{ItemId, LatestPrice, MappingItem, PricePoint, Timestep, WikiPricesClient};

/// Everything the service needs from the outside world. The only network boundary.
#[async_trait]
pub(crate) trait PriceSource: Send + Sync {
    async fn mapping(&self) -> Result<Vec<MappingItem>, wiki_prices::Error>;

    async fn latest(&self) -> Result<HashMap<ItemId, LatestPrice>, wiki_prices::Error>;

    async fn timeseries(
        &self,
        item_id: ItemId,
        timestep: Timestep,
    ) -> Result<Vec<PricePoint>, wiki_prices::Error>;
}

#[async_trait]
impl PriceSource for WikiPricesClient {
    async fn mapping(&self) -> Result<Vec<MappingItem>, wiki_prices::Error> {
        self.get_mapping().await
    }

    async fn latest(&self) -> Result<HashMap<ItemId, LatestPrice>, wiki_prices::Error> {
        self.get_latest().await
    }

    async fn timeseries(
        &self,
        item_id: ItemId,
        timestep: Timestep,
    ) -> Result<Vec<PricePoint>, wiki_prices::Error> {
        self.get_timeseries(item_id, timestep).await
    }
}
