use axum::extract::FromRef;

use crate::{item_service::ItemService, search_service::SearchService};

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) search_service: SearchService,
    pub(crate) item_service: ItemService,
}

impl FromRef<WebState> for SearchService {
    fn from_ref(input: &WebState) -> Self {
        input.search_service.clone()
    }
}

impl FromRef<WebState> for ItemService {
    fn from_ref(input: &WebState) -> Self {
        input.item_service.clone()
    }
}
