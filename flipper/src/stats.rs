use wiki_prices::{LatestPrice, MappingItem};

/// Grand Exchange tax taken from the selling side.
const SELL_TAX_RATE: f64 = 0.01;

/// Trading numbers derived from one catalog entry and its latest price.
/// Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DerivedStats {
    /// Fallback valuation when nothing better is known
    pub(crate) base: i64,
    pub(crate) buy: i64,
    pub(crate) sell: i64,
    pub(crate) margin: i64,
    pub(crate) tax: f64,
    pub(crate) profit: f64,
    /// Percent return on the buy price, `None` when the buy price is not positive.
    pub(crate) roi: Option<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Missing prices fall back to the alch values and then to the base value, so this
/// always produces numbers.
pub(crate) fn derive(item: &MappingItem, latest: Option<&LatestPrice>) -> DerivedStats {
    let base = item.value.or(item.highalch).or(item.lowalch).unwrap_or(0);
    let buy = latest
        .and_then(|l| l.low)
        .or(item.lowalch)
        .unwrap_or(base);
    let sell = latest
        .and_then(|l| l.high)
        .or(item.highalch)
        .unwrap_or(base);
    let margin = sell - buy;
    let tax = sell as f64 * SELL_TAX_RATE;
    let profit = margin as f64 - tax;
    let roi = (buy > 0).then(|| round2(profit / buy as f64 * 100.0));
    DerivedStats {
        base,
        buy,
        sell,
        margin,
        tax,
        profit,
        roi,
    }
}
