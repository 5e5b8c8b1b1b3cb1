use serde::{Deserialize, Serialize};

/// Latest instant buy/sell observation for one item as served to clients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPrice {
    pub high: Option<i64>,
    pub high_time: Option<i64>,
    pub low: Option<i64>,
    pub low_time: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub timestamp: i64,
    pub avg_high_price: Option<i64>,
    pub avg_low_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_price_volume: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_price_volume: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub data: Vec<PricePoint>,
    pub item_id: i32,
}
