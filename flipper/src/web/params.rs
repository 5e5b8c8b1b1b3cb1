use wiki_prices::ItemId;

use super::error::ApiError;

pub(crate) const DEFAULT_PAGE_SIZE: usize = 11;
pub(crate) const MAX_PAGE_SIZE: usize = 100;
pub(crate) const MAX_PAGE: usize = 100_000;

pub(crate) fn parse_item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map(ItemId)
        .map_err(|_| ApiError::BadRequest("Missing or invalid item id".to_string()))
}

/// Lenient query number: anything missing, unparsable or below one becomes `fallback`,
/// fractions are floored and the result is capped at `max`.
pub(crate) fn parse_positive_int(raw: Option<&str>, fallback: usize, max: Option<usize>) -> usize {
    let value = raw
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 1.0)
        .map(|value| value.floor().min(usize::MAX as f64) as usize)
        .unwrap_or(fallback);
    match max {
        Some(max) => value.min(max),
        None => value,
    }
}
