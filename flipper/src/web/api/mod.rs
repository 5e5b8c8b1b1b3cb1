mod items;

pub(crate) use items::{item_detail, item_graph, search_items};

use super::error::ApiError;

pub(crate) async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
