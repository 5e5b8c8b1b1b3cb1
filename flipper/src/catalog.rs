use std::{collections::HashMap, sync::Arc};

use chrono::Duration;
use wiki_prices::{ItemId, MappingItem};

use crate::{clock::Clock, error::ServiceError, price_source::PriceSource, ttl_cache::TtlCache};

/// One generation of the wiki item catalog, kept in upstream order with an id index on the side.
#[derive(Debug, Default)]
pub(crate) struct Catalog {
    items: Vec<MappingItem>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    pub(crate) fn new(items: Vec<MappingItem>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            // first entry wins if the wiki ever repeats an id
            index.entry(item.id).or_insert(position);
        }
        Self { items, index }
    }

    pub(crate) fn items(&self) -> &[MappingItem] {
        &self.items
    }

    pub(crate) fn get(&self, item_id: ItemId) -> Option<&MappingItem> {
        self.index.get(&item_id).map(|position| &self.items[*position])
    }
}

pub(crate) struct CatalogCache {
    cache: TtlCache<Catalog>,
    source: Arc<dyn PriceSource>,
}

impl CatalogCache {
    pub(crate) fn new(source: Arc<dyn PriceSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new("catalog", ttl, clock),
            source,
        }
    }

    pub(crate) async fn get(&self) -> Result<Arc<Catalog>, ServiceError> {
        self.cache
            .get_or_refresh(|| async {
                let items = self.source.mapping().await?;
                Ok::<_, ServiceError>(Catalog::new(items))
            })
            .await
    }
}
