use std::{path::PathBuf, str::FromStr, time::Duration as StdDuration};

use chrono::Duration;
use tracing::warn;
use wiki_prices::WikiPricesConfig;

pub(crate) const DEFAULT_PORT: u16 = 5000;
pub(crate) const DEFAULT_ICON_BASE_URL: &str = "https://oldschool.runescape.wiki/images/";
const DEFAULT_TIMEOUT_MS: u64 = 2000;
const DEFAULT_MAPPING_TTL_SECS: i64 = 6 * 60 * 60;
const DEFAULT_LATEST_TTL_SECS: i64 = 120;

/// Settings read once from the environment at startup.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) port: u16,
    pub(crate) wiki: WikiPricesConfig,
    pub(crate) icon_base_url: String,
    pub(crate) mapping_ttl: Duration,
    pub(crate) latest_ttl: Duration,
    pub(crate) cors_origin: Option<String>,
    pub(crate) static_dir: Option<PathBuf>,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset, unparsable ones fall back to the default.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let wiki_defaults = WikiPricesConfig::default();
        Self {
            port: parse_or("PORT", text("PORT"), DEFAULT_PORT),
            wiki: WikiPricesConfig {
                base_url: text("OSRS_WIKI_BASE_URL").unwrap_or(wiki_defaults.base_url),
                user_agent: text("OSRS_WIKI_USER_AGENT").unwrap_or(wiki_defaults.user_agent),
                timeout: StdDuration::from_millis(parse_or(
                    "OSRS_WIKI_TIMEOUT_MS",
                    text("OSRS_WIKI_TIMEOUT_MS"),
                    DEFAULT_TIMEOUT_MS,
                )),
            },
            icon_base_url: text("OSRS_WIKI_ICON_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ICON_BASE_URL.to_string()),
            mapping_ttl: ttl_or(
                "MAPPING_TTL_SECS",
                text("MAPPING_TTL_SECS"),
                DEFAULT_MAPPING_TTL_SECS,
            ),
            latest_ttl: ttl_or(
                "LATEST_TTL_SECS",
                text("LATEST_TTL_SECS"),
                DEFAULT_LATEST_TTL_SECS,
            ),
            cors_origin: text("CORS_ORIGIN"),
            static_dir: text("STATIC_DIR").map(PathBuf::from),
        }
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparsable setting");
            default
        }),
    }
}

/// TTLs must be positive and representable as a chrono duration.
fn ttl_or(key: &str, raw: Option<String>, default_secs: i64) -> Duration {
    let default = Duration::seconds(default_secs);
    let secs = parse_or(key, raw, default_secs);
    match Duration::try_seconds(secs).filter(|ttl| *ttl > Duration::zero()) {
        Some(ttl) => ttl,
        None => {
            warn!(key, secs, "ignoring out of range ttl");
            default
        }
    }
}
