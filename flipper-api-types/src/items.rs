use serde::{Deserialize, Serialize};

use crate::prices::LatestPrice;

/// One row of the item search table: the catalog entry with derived trading numbers merged in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: i32,
    pub name: String,
    pub examine: Option<String>,
    pub members: Option<bool>,
    /// Fully resolved image URL
    pub icon: String,
    #[serde(rename = "lowalch")]
    pub low_alch: Option<i64>,
    #[serde(rename = "highalch")]
    pub high_alch: Option<i64>,
    pub limit: Option<i64>,
    pub value: Option<i64>,
    pub buy_price: i64,
    pub sell_price: i64,
    pub latest_sell: i64,
    pub margin: i64,
    pub tax: f64,
    pub profit: f64,
    pub roi: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub items: Vec<ItemSummary>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTrend {
    pub trend: String,
    pub price: i64,
}

impl PriceTrend {
    pub fn neutral(price: i64) -> Self {
        Self {
            trend: "neutral".to_string(),
            price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub members: bool,
    pub current: PriceTrend,
    pub today: PriceTrend,
    /// Raw observations, `None` when nobody traded recently.
    pub latest_buy: Option<i64>,
    pub latest_sell: Option<i64>,
    pub latest_buy_time: Option<i64>,
    pub latest_sell_time: Option<i64>,
    pub buy_price: i64,
    pub sell_price: i64,
    pub margin: i64,
    pub tax: f64,
    pub profit: f64,
    pub roi: Option<f64>,
    pub high_alch: Option<i64>,
    pub low_alch: Option<i64>,
    pub limit: Option<i64>,
    pub value: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemDetailResult {
    pub item: ItemDetail,
    pub latest: Option<LatestPrice>,
}
