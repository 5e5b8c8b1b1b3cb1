use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use wiki_prices::MappingItem;

const SPRITE_BASE_URL: &str = "https://secure.runescape.com/m=itemdb_oldschool/obj_sprite.gif?id=";

/// Characters left alone when encoding a URI component.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Turns catalog icon names into image URLs.
#[derive(Debug, Clone)]
pub(crate) struct IconResolver {
    wiki_base_url: Arc<str>,
}

impl IconResolver {
    pub(crate) fn new(wiki_base_url: &str) -> Self {
        Self {
            wiki_base_url: Arc::from(wiki_base_url),
        }
    }

    fn wiki_icon(&self, icon: &str) -> Option<String> {
        if icon.is_empty() {
            return None;
        }
        let file = icon.replace(' ', "_");
        Some(format!(
            "{}{}",
            self.wiki_base_url,
            utf8_percent_encode(&file, URI_COMPONENT)
        ))
    }

    /// Wiki image when the item names one, otherwise the game's own sprite for the id.
    pub(crate) fn resolve(&self, item: &MappingItem) -> String {
        item.icon
            .as_deref()
            .and_then(|icon| self.wiki_icon(icon))
            .unwrap_or_else(|| format!("{SPRITE_BASE_URL}{}", item.id))
    }
}

#[cfg(test)]
mod test {
    use super::IconResolver;
    use crate::test_support::item;

    const BASE: &str = "https://oldschool.runescape.wiki/images/";

    #[test]
    fn test_wiki_icon() {
        let icons = IconResolver::new(BASE);
        let mut platebody = item(2615, "Rune platebody (g)");
        platebody.icon = Some("Rune platebody (g).png".to_string());
        assert_eq!(
            icons.resolve(&platebody),
            "https://oldschool.runescape.wiki/images/Rune_platebody_(g).png"
        );
        let mut hood = item(4708, "Ahrim's hood");
        hood.icon = Some("Ahrim's hood.png".to_string());
        assert_eq!(
            icons.resolve(&hood),
            "https://oldschool.runescape.wiki/images/Ahrim's_hood.png"
        );
        let mut dagger = item(5698, "Dragon dagger(p++)");
        dagger.icon = Some("Dragon dagger(p++).png".to_string());
        assert_eq!(
            icons.resolve(&dagger),
            "https://oldschool.runescape.wiki/images/Dragon_dagger(p%2B%2B).png"
        );
    }

    #[test]
    fn test_sprite_fallback() {
        let icons = IconResolver::new(BASE);
        let mut unnamed = item(4151, "Abyssal whip");
        unnamed.icon = None;
        assert_eq!(
            icons.resolve(&unnamed),
            "https://secure.runescape.com/m=itemdb_oldschool/obj_sprite.gif?id=4151"
        );
        unnamed.icon = Some(String::new());
        assert!(icons.resolve(&unnamed).ends_with("?id=4151"));
    }
}
