mod items;
mod prices;

pub mod result;

pub use items::{ItemDetail, ItemDetailResult, ItemSummary, PriceTrend, SearchResults};
pub use prices::{GraphData, LatestPrice, PricePoint};

#[cfg(test)]
mod test {
    use crate::{result::JsonError, GraphData, ItemSummary, PricePoint};

    #[test]
    fn test_summary_keeps_wiki_field_names() {
        let summary = ItemSummary {
            id: 2,
            name: "Cannonball".to_string(),
            examine: None,
            members: Some(true),
            icon: "https://oldschool.runescape.wiki/images/Cannonball.png".to_string(),
            low_alch: Some(0),
            high_alch: Some(0),
            limit: Some(11000),
            value: Some(2),
            buy_price: 3,
            sell_price: 5,
            latest_sell: 5,
            margin: 2,
            tax: 0.05,
            profit: 1.95,
            roi: Some(65.0),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["highalch"], 0);
        assert_eq!(json["buyPrice"], 3);
        assert_eq!(json["roi"], 65.0);
        assert!(json["examine"].is_null());
    }

    #[test]
    fn test_graph_and_error_shapes() {
        let graph = GraphData {
            data: vec![PricePoint {
                timestamp: 1,
                avg_high_price: None,
                avg_low_price: Some(4),
                high_price_volume: None,
                low_price_volume: None,
            }],
            item_id: 2,
        };
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(
            json,
            r#"{"data":[{"timestamp":1,"avgHighPrice":null,"avgLowPrice":4}],"itemId":2}"#
        );
        let error = serde_json::to_string(&JsonError {
            error: "Item not found".to_string(),
        })
        .unwrap();
        assert_eq!(error, r#"{"error":"Item not found"}"#);
    }
}
