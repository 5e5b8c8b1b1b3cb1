use flipper_api_types::{GraphData, ItemDetail, ItemDetailResult, LatestPrice, PricePoint, PriceTrend};
use tracing::instrument;
use wiki_prices::{ItemId, MappingItem, Timestep};

use crate::{error::ServiceError, icons::IconResolver, market_data::MarketData, stats::derive};

fn latest_view(latest: &wiki_prices::LatestPrice) -> LatestPrice {
    LatestPrice {
        high: latest.high,
        high_time: latest.high_time,
        low: latest.low,
        low_time: latest.low_time,
    }
}

fn point_view(point: &wiki_prices::PricePoint) -> PricePoint {
    PricePoint {
        timestamp: point.timestamp,
        avg_high_price: point.avg_high_price,
        avg_low_price: point.avg_low_price,
        high_price_volume: point.high_price_volume,
        low_price_volume: point.low_price_volume,
    }
}

fn detail(
    item: &MappingItem,
    latest: Option<&wiki_prices::LatestPrice>,
    icons: &IconResolver,
) -> ItemDetail {
    let stats = derive(item, latest);
    let latest_buy = latest.and_then(|l| l.low);
    let latest_sell = latest.and_then(|l| l.high);
    let headline = latest_sell.or(latest_buy).unwrap_or(stats.base);
    ItemDetail {
        id: item.id.0,
        name: item.name.clone(),
        description: item.examine.clone().unwrap_or_default(),
        icon: icons.resolve(item),
        members: item.members.unwrap_or_default(),
        current: PriceTrend::neutral(headline),
        today: PriceTrend::neutral(headline),
        latest_buy,
        latest_sell,
        latest_buy_time: latest.and_then(|l| l.low_time),
        latest_sell_time: latest.and_then(|l| l.high_time),
        buy_price: stats.buy,
        sell_price: stats.sell,
        margin: stats.margin,
        tax: stats.tax,
        profit: stats.profit,
        roi: stats.roi,
        high_alch: item.highalch,
        low_alch: item.lowalch,
        limit: item.limit,
        value: item.value,
    }
}

/// Single item lookups: the detail card and the price history graph.
#[derive(Clone)]
pub(crate) struct ItemService {
    market: MarketData,
    icons: IconResolver,
}

impl ItemService {
    pub(crate) fn new(market: MarketData, icons: IconResolver) -> Self {
        Self { market, icons }
    }

    #[instrument(skip(self))]
    pub(crate) async fn get_detail(&self, item_id: ItemId) -> Result<ItemDetailResult, ServiceError> {
        let (catalog, latest_prices) = self.market.snapshot().await?;
        let item = catalog
            .get(item_id)
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;
        let latest = latest_prices.get(item_id);
        Ok(ItemDetailResult {
            item: detail(item, latest, &self.icons),
            latest: latest.map(latest_view),
        })
    }

    /// Unknown timesteps are served as six hour buckets.
    #[instrument(skip(self))]
    pub(crate) async fn get_graph(
        &self,
        item_id: ItemId,
        timestep: Option<&str>,
    ) -> Result<GraphData, ServiceError> {
        let timestep = Timestep::normalize(timestep);
        let series = self.market.source().timeseries(item_id, timestep).await?;
        Ok(GraphData {
            data: series.iter().map(point_view).collect(),
            item_id: item_id.0,
        })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::Duration;
    use wiki_prices::{ItemId, PricePoint, Timestep};

    use super::ItemService;
    use crate::{
        clock::ManualClock,
        error::ServiceError,
        icons::IconResolver,
        market_data::MarketData,
        search_service::{SearchQuery, SearchService},
        test_support::{item_with_values, latest, FakeSource},
    };

    fn market(source: Arc<FakeSource>) -> MarketData {
        MarketData::new(
            source,
            Arc::new(ManualClock::new()),
            Duration::hours(6),
            Duration::minutes(2),
        )
    }

    fn icons() -> IconResolver {
        IconResolver::new("https://oldschool.runescape.wiki/images/")
    }

    fn source() -> Arc<FakeSource> {
        let mut cannonball = item_with_values(2, "Cannonball", Some(2), Some(0), Some(0));
        cannonball.examine = Some("Ammo for the Dwarf Cannon.".to_string());
        cannonball.members = Some(true);
        let source = Arc::new(FakeSource::new(vec![
            cannonball,
            item_with_values(1, "Rune bar", Some(5000), Some(3000), Some(2000)),
        ]));
        source.set_latest(vec![(2, latest(Some(3), Some(5)))]);
        source
    }

    #[tokio::test]
    async fn test_detail() {
        let service = ItemService::new(market(source()), icons());
        let result = service.get_detail(ItemId(2)).await.unwrap();
        let detail = &result.item;
        assert_eq!(detail.name, "Cannonball");
        assert_eq!(detail.description, "Ammo for the Dwarf Cannon.");
        assert!(detail.members);
        assert_eq!(detail.latest_buy, Some(3));
        assert_eq!(detail.latest_sell, Some(5));
        assert_eq!(detail.latest_sell_time, Some(1_700_000_000));
        assert_eq!(detail.latest_buy_time, Some(1_700_000_060));
        assert_eq!(detail.current.price, 5);
        assert_eq!(detail.current.trend, "neutral");
        assert_eq!(detail.margin, 2);
        assert_eq!(detail.roi, Some(65.0));
        assert_eq!(result.latest.unwrap().low, Some(3));
    }

    #[tokio::test]
    async fn test_detail_without_recent_trades() {
        let service = ItemService::new(market(source()), icons());
        let result = service.get_detail(ItemId(1)).await.unwrap();
        assert!(result.latest.is_none());
        assert_eq!(result.item.latest_buy, None);
        assert_eq!(result.item.buy_price, 2000);
        assert_eq!(result.item.sell_price, 3000);
        // headline price falls back to the base value
        assert_eq!(result.item.current.price, 5000);
        assert_eq!(result.item.description, "");
    }

    #[tokio::test]
    async fn test_detail_matches_search_row() {
        let source = source();
        let market = market(source.clone());
        let detail = ItemService::new(market.clone(), icons())
            .get_detail(ItemId(2))
            .await
            .unwrap()
            .item;
        let row = SearchService::new(market, icons())
            .search(&SearchQuery {
                term: "cannonball".to_string(),
                page: 1,
                page_size: 11,
                ..Default::default()
            })
            .await
            .unwrap()
            .items
            .remove(0);
        assert_eq!(detail.buy_price, row.buy_price);
        assert_eq!(detail.sell_price, row.sell_price);
        assert_eq!(detail.margin, row.margin);
        assert_eq!(detail.tax, row.tax);
        assert_eq!(detail.profit, row.profit);
        assert_eq!(detail.roi, row.roi);
        assert_eq!(detail.icon, row.icon);
        assert_eq!(source.mapping_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let service = ItemService::new(market(source()), icons());
        match service.get_detail(ItemId(999)).await {
            Err(ServiceError::NotFound(message)) => assert_eq!(message, "Item not found"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_detail_rate_limited() {
        let source = source();
        source.fail_latest_with(429);
        let service = ItemService::new(market(source), icons());
        assert!(matches!(
            service.get_detail(ItemId(2)).await,
            Err(ServiceError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_graph_timesteps() {
        let source = source();
        source.set_series(vec![PricePoint {
            timestamp: 1_700_000_000,
            avg_high_price: Some(5),
            avg_low_price: None,
            high_price_volume: Some(120),
            low_price_volume: None,
        }]);
        let service = ItemService::new(market(source.clone()), icons());
        let graph = service.get_graph(ItemId(2), Some("bogus")).await.unwrap();
        assert_eq!(graph.item_id, 2);
        assert_eq!(graph.data.len(), 1);
        assert_eq!(graph.data[0].avg_high_price, Some(5));
        service.get_graph(ItemId(2), Some("1h")).await.unwrap();
        service.get_graph(ItemId(2), None).await.unwrap();
        assert_eq!(
            source.timeseries_requests(),
            vec![
                (ItemId(2), Timestep::SixHours),
                (ItemId(2), Timestep::OneHour),
                (ItemId(2), Timestep::SixHours),
            ]
        );
        // the graph goes straight to upstream and never touches the caches
        assert_eq!(source.mapping_calls(), 0);
    }

    #[tokio::test]
    async fn test_graph_unknown_item() {
        let service = ItemService::new(market(source()), icons());
        assert!(matches!(
            service.get_graph(ItemId(999), Some("5m")).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
