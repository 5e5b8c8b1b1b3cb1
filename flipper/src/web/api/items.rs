use axum::{
    extract::{Path, Query, State},
    Json,
};
use flipper_api_types::{GraphData, ItemDetailResult, SearchResults};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    item_service::ItemService,
    search_service::{SearchQuery, SearchService},
    web::{
        error::ApiError,
        params::{
            parse_item_id, parse_positive_int, DEFAULT_PAGE_SIZE, MAX_PAGE, MAX_PAGE_SIZE,
        },
    },
};

/// Raw query string values; parsing is lenient and happens in the handler.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchParams {
    q: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
    sort_key: Option<String>,
    sort_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphParams {
    timestep: Option<String>,
}

#[instrument(skip(search))]
pub(crate) async fn search_items(
    State(search): State<SearchService>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let query = SearchQuery {
        term: params.q.unwrap_or_default(),
        page: parse_positive_int(params.page.as_deref(), 1, Some(MAX_PAGE)),
        page_size: parse_positive_int(
            params.page_size.as_deref(),
            DEFAULT_PAGE_SIZE,
            Some(MAX_PAGE_SIZE),
        ),
        sort_key: params.sort_key,
        sort_dir: params.sort_dir,
    };
    Ok(Json(search.search(&query).await?))
}

#[instrument(skip(items))]
pub(crate) async fn item_detail(
    State(items): State<ItemService>,
    Path(id): Path<String>,
) -> Result<Json<ItemDetailResult>, ApiError> {
    let item_id = parse_item_id(&id)?;
    Ok(Json(items.get_detail(item_id).await?))
}

#[instrument(skip(items))]
pub(crate) async fn item_graph(
    State(items): State<ItemService>,
    Path(id): Path<String>,
    Query(params): Query<GraphParams>,
) -> Result<Json<GraphData>, ApiError> {
    let item_id = parse_item_id(&id)?;
    Ok(Json(
        items
            .get_graph(item_id, params.timestep.as_deref())
            .await?,
    ))
}
