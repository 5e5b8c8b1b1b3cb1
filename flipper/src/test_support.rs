use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::Duration;
use wiki_prices::{ItemId, LatestPrice, MappingItem, PricePoint, Timestep};

use crate::{
    clock::ManualClock,
    config::DEFAULT_ICON_BASE_URL,
    icons::IconResolver,
    item_service::ItemService,
    market_data::MarketData,
    price_source::PriceSource,
    search_service::SearchService,
    web::WebState,
};

pub(crate) fn item(id: i32, name: &str) -> MappingItem {
    MappingItem {
        id: ItemId(id),
        name: name.to_string(),
        examine: None,
        members: Some(false),
        icon: Some(format!("{name}.png")),
        icon_large: None,
        lowalch: None,
        highalch: None,
        limit: None,
        value: None,
    }
}

pub(crate) fn item_with_values(
    id: i32,
    name: &str,
    value: Option<i64>,
    highalch: Option<i64>,
    lowalch: Option<i64>,
) -> MappingItem {
    MappingItem {
        value,
        highalch,
        lowalch,
        ..item(id, name)
    }
}

pub(crate) fn latest(low: Option<i64>, high: Option<i64>) -> LatestPrice {
    LatestPrice {
        high,
        high_time: high.map(|_| 1_700_000_000),
        low,
        low_time: low.map(|_| 1_700_000_060),
    }
}

fn error_for(status: u16) -> wiki_prices::Error {
    match status {
        404 => wiki_prices::Error::NotFound,
        429 => wiki_prices::Error::RateLimited,
        s if s >= 500 => wiki_prices::Error::Unavailable { status: s },
        s => wiki_prices::Error::Upstream {
            message: "Upstream error".to_string(),
            status: Some(s),
        },
    }
}

/// In-memory wiki that counts how often it gets asked.
#[derive(Default)]
pub(crate) struct FakeSource {
    items: Mutex<Vec<MappingItem>>,
    latest: Mutex<HashMap<ItemId, LatestPrice>>,
    series: Mutex<Vec<PricePoint>>,
    mapping_failure: Mutex<Option<u16>>,
    latest_failure: Mutex<Option<u16>>,
    mapping_calls: AtomicUsize,
    latest_calls: AtomicUsize,
    timeseries_requests: Mutex<Vec<(ItemId, Timestep)>>,
}

impl FakeSource {
    pub(crate) fn new(items: Vec<MappingItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub(crate) fn set_items(&self, items: Vec<MappingItem>) {
        *self.items.lock().unwrap() = items;
    }

    pub(crate) fn set_latest(&self, prices: Vec<(i32, LatestPrice)>) {
        *self.latest.lock().unwrap() = prices
            .into_iter()
            .map(|(id, price)| (ItemId(id), price))
            .collect();
    }

    pub(crate) fn set_series(&self, series: Vec<PricePoint>) {
        *self.series.lock().unwrap() = series;
    }

    pub(crate) fn fail_mapping_with(&self, status: u16) {
        *self.mapping_failure.lock().unwrap() = Some(status);
    }

    pub(crate) fn fail_latest_with(&self, status: u16) {
        *self.latest_failure.lock().unwrap() = Some(status);
    }

    pub(crate) fn mapping_calls(&self) -> usize {
        self.mapping_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn timeseries_requests(&self) -> Vec<(ItemId, Timestep)> {
        self.timeseries_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for FakeSource {
    async fn mapping(&self) -> Result<Vec<MappingItem>, wiki_prices::Error> {
        self.mapping_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.mapping_failure.lock().unwrap() {
            return Err(error_for(status));
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn latest(&self) -> Result<HashMap<ItemId, LatestPrice>, wiki_prices::Error> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.latest_failure.lock().unwrap() {
            return Err(error_for(status));
        }
        Ok(self.latest.lock().unwrap().clone())
    }

    async fn timeseries(
        &self,
        item_id: ItemId,
        timestep: Timestep,
    ) -> Result<Vec<PricePoint>, wiki_prices::Error> {
        self.timeseries_requests
            .lock()
            .unwrap()
            .push((item_id, timestep));
        if !self.items.lock().unwrap().iter().any(|i| i.id == item_id) {
            return Err(wiki_prices::Error::NotFound);
        }
        Ok(self.series.lock().unwrap().clone())
    }
}

/// Services wired the way `main` wires them, minus the network and the wall clock.
pub(crate) fn web_state(source: Arc<FakeSource>) -> WebState {
    let market = MarketData::new(
        source,
        Arc::new(ManualClock::new()),
        Duration::hours(6),
        Duration::minutes(2),
    );
    let icons = IconResolver::new(DEFAULT_ICON_BASE_URL);
    WebState {
        search_service: SearchService::new(market.clone(), icons.clone()),
        item_service: ItemService::new(market, icons),
    }
}
