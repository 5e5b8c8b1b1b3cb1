use std::cmp::Ordering;

use flipper_api_types::{ItemSummary, SearchResults};
use tracing::instrument;
use wiki_prices::MappingItem;

use crate::{
    error::ServiceError,
    icons::IconResolver,
    market_data::MarketData,
    stats::{derive, DerivedStats},
};

/// Columns that sort by a derived number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Metric {
    Sell,
    Buy,
    Margin,
    Tax,
    Profit,
    Roi,
}

impl Metric {
    /// Missing values sort below everything else.
    fn value(&self, stats: &DerivedStats) -> f64 {
        match self {
            Metric::Sell => stats.sell as f64,
            Metric::Buy => stats.buy as f64,
            Metric::Margin => stats.margin as f64,
            Metric::Tax => stats.tax,
            Metric::Profit => stats.profit,
            Metric::Roi => stats.roi.unwrap_or(f64::NEG_INFINITY),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortKey {
    Name,
    Metric(Metric),
}

impl SortKey {
    /// `None` for anything that isn't a known column.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        let metric = match raw {
            "name" => return Some(SortKey::Name),
            "sell" => Metric::Sell,
            "buy" => Metric::Buy,
            "margin" => Metric::Margin,
            "tax" => Metric::Tax,
            "profit" => Metric::Profit,
            "roi" => Metric::Roi,
            _ => return None,
        };
        Some(SortKey::Metric(metric))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Only an explicit `asc` sorts ascending.
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SearchQuery {
    pub(crate) term: String,
    pub(crate) page: usize,
    pub(crate) page_size: usize,
    pub(crate) sort_key: Option<String>,
    pub(crate) sort_dir: Option<String>,
}

struct Row<'a> {
    item: &'a MappingItem,
    folded_name: String,
    stats: DerivedStats,
}

/// Case-insensitive first; on a case-insensitive tie lowercase comes before uppercase,
/// which is how an English collator orders "abyssal" and "Abyssal".
fn compare_names(a: &Row, b: &Row) -> Ordering {
    a.folded_name
        .cmp(&b.folded_name)
        .then_with(|| b.item.name.cmp(&a.item.name))
}

/// Stable sort, ties keep the order they came in.
fn sort_rows(rows: &mut [Row], key: Option<SortKey>, direction: SortDirection) {
    match key {
        // an unknown column falls back to name order and ignores the requested direction
        None => rows.sort_by(compare_names),
        Some(SortKey::Name) => rows.sort_by(|a, b| direction.apply(compare_names(a, b))),
        Some(SortKey::Metric(metric)) => rows.sort_by(|a, b| {
            direction.apply(metric.value(&a.stats).total_cmp(&metric.value(&b.stats)))
        }),
    }
}

fn summarize(item: &MappingItem, stats: &DerivedStats, icons: &IconResolver) -> ItemSummary {
    ItemSummary {
        id: item.id.0,
        name: item.name.clone(),
        examine: item.examine.clone(),
        members: item.members,
        icon: icons.resolve(item),
        low_alch: item.lowalch,
        high_alch: item.highalch,
        limit: item.limit,
        value: item.value,
        buy_price: stats.buy,
        sell_price: stats.sell,
        latest_sell: stats.sell,
        margin: stats.margin,
        tax: stats.tax,
        profit: stats.profit,
        roi: stats.roi,
    }
}

/// Filters, sorts and pages the catalog with derived trading numbers attached.
#[derive(Clone)]
pub(crate) struct SearchService {
    market: MarketData,
    icons: IconResolver,
}

impl SearchService {
    pub(crate) fn new(market: MarketData, icons: IconResolver) -> Self {
        Self { market, icons }
    }

    #[instrument(skip(self))]
    pub(crate) async fn search(&self, query: &SearchQuery) -> Result<SearchResults, ServiceError> {
        let (catalog, latest) = self.market.snapshot().await?;
        let term = query.term.trim().to_lowercase();

        let mut rows = catalog
            .items()
            .iter()
            .map(|item| (item, item.name.to_lowercase()))
            .filter(|(_, folded_name)| term.is_empty() || folded_name.contains(&term))
            .map(|(item, folded_name)| Row {
                item,
                folded_name,
                stats: derive(item, latest.get(item.id)),
            })
            .collect::<Vec<_>>();

        sort_rows(
            &mut rows,
            query.sort_key.as_deref().and_then(SortKey::parse),
            SortDirection::parse(query.sort_dir.as_deref()),
        );

        let total = rows.len();
        let page_size = query.page_size.max(1);
        let total_pages = total.div_ceil(page_size);
        let page = if total_pages > 0 && query.page > total_pages {
            total_pages
        } else {
            query.page
        };
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let items = rows
            .iter()
            .skip(start)
            .take(page_size)
            .map(|row| summarize(row.item, &row.stats, &self.icons))
            .collect();

        Ok(SearchResults {
            items,
            page,
            page_size,
            total,
            total_pages,
        })
    }
}
