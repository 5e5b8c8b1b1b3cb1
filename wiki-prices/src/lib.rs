use log::info;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Hash, Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(pub i32);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every failure the wiki client can produce. Request failures are classified into
/// `NotFound`, `RateLimited`, `Unavailable` and `Upstream` so callers never see raw
/// transport errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("Unable to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Resource not found")]
    NotFound,
    #[error("Rate limited by OSRS Wiki")]
    RateLimited,
    #[error("OSRS Wiki service unavailable ({status})")]
    Unavailable { status: u16 },
    #[error("{message}")]
    Upstream { message: String, status: Option<u16> },
}

impl Error {
    /// HTTP status returned by the wiki, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound => Some(404),
            Error::RateLimited => Some(429),
            Error::Unavailable { status } => Some(*status),
            Error::Upstream { status, .. } => *status,
            Error::InvalidBaseUrl(_) | Error::ClientBuild(_) => None,
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            404 => Error::NotFound,
            429 => Error::RateLimited,
            code if code >= 500 => Error::Unavailable { status: code },
            code => {
                let message = serde_json::from_str::<ErrorBody>(body)
                    .ok()
                    .and_then(|b| b.error)
                    .filter(|m| !m.is_empty())
                    .or_else(|| status.canonical_reason().map(str::to_string))
                    .unwrap_or_else(|| "Upstream error".to_string());
                Error::Upstream {
                    message,
                    status: Some(code),
                }
            }
        }
    }

    fn transport(error: reqwest::Error) -> Self {
        Error::Upstream {
            message: error.to_string(),
            status: error.status().map(|s| s.as_u16()),
        }
    }

    fn unexpected(message: &str, status: u16) -> Self {
        Error::Upstream {
            message: message.to_string(),
            status: Some(status),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// One entry of the `/mapping` catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MappingItem {
    pub id: ItemId,
    pub name: String,
    pub examine: Option<String>,
    pub members: Option<bool>,
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_large: Option<String>,
    pub lowalch: Option<i64>,
    pub highalch: Option<i64>,
    pub limit: Option<i64>,
    pub value: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LatestPrice {
    /// Most recent instant-buy observation, i.e. what sellers received.
    pub high: Option<i64>,
    pub high_time: Option<i64>,
    /// Most recent instant-sell observation, i.e. what buyers paid.
    pub low: Option<i64>,
    pub low_time: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub timestamp: i64,
    pub avg_high_price: Option<i64>,
    pub avg_low_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_price_volume: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_price_volume: Option<i64>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Timestep {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    TwentyFourHours,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown timestep {0}")]
pub struct UnknownTimestep(pub String);

impl Timestep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timestep::FiveMinutes => "5m",
            Timestep::OneHour => "1h",
            Timestep::SixHours => "6h",
            Timestep::TwentyFourHours => "24h",
        }
    }

    /// Falls back to six hour buckets for anything the wiki doesn't know about.
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(|r| r.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Timestep {
    type Err = UnknownTimestep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5m" => Ok(Timestep::FiveMinutes),
            "1h" => Ok(Timestep::OneHour),
            "6h" => Ok(Timestep::SixHours),
            "24h" => Ok(Timestep::TwentyFourHours),
            other => Err(UnknownTimestep(other.to_string())),
        }
    }
}

impl Display for Timestep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn parse_mapping(body: &str, status: u16) -> Result<Vec<MappingItem>, Error> {
    let value: Value = serde_json::from_str(body)
        .map_err(|_| Error::unexpected("Unexpected mapping response from OSRS Wiki", status))?;
    if !value.is_array() {
        return Err(Error::unexpected(
            "Unexpected mapping response from OSRS Wiki",
            status,
        ));
    }
    serde_json::from_value(value).map_err(|e| Error::Upstream {
        message: format!("Unable to read mapping entry: {e}"),
        status: Some(status),
    })
}

pub fn parse_latest(body: &str, status: u16) -> Result<HashMap<ItemId, LatestPrice>, Error> {
    serde_json::from_str::<DataEnvelope<HashMap<ItemId, LatestPrice>>>(body)
        .ok()
        .and_then(|envelope| envelope.data)
        .ok_or_else(|| Error::unexpected("Unexpected latest price response from OSRS Wiki", status))
}

/// A response without a `data` field is treated as an empty series.
pub fn parse_timeseries(body: &str, status: u16) -> Result<Vec<PricePoint>, Error> {
    let envelope: DataEnvelope<Vec<PricePoint>> =
        serde_json::from_str(body).map_err(|e| Error::Upstream {
            message: format!("Unable to read timeseries response: {e}"),
            status: Some(status),
        })?;
    Ok(envelope.data.unwrap_or_default())
}

/// Classifies a response once its body has been read. A body that fails to arrive still
/// carries the status the wiki sent.
fn read_response(
    status: StatusCode,
    body: Result<String, reqwest::Error>,
) -> Result<(u16, String), Error> {
    match body {
        Ok(body) if status.is_success() => Ok((status.as_u16(), body)),
        Ok(body) => Err(Error::from_status(status, &body)),
        Err(e) if status.is_success() => Err(Error::Upstream {
            message: e.to_string(),
            status: Some(status.as_u16()),
        }),
        Err(_) => Err(Error::from_status(status, "")),
    }
}

#[derive(Debug, Clone)]
pub struct WikiPricesConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for WikiPricesConfig {
    fn default() -> Self {
        Self {
            base_url: WikiPricesClient::DEFAULT_BASE_URL.to_string(),
            user_agent: WikiPricesClient::DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(2),
        }
    }
}

/// Thin accessor for the OSRS Wiki real-time prices API. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct WikiPricesClient {
    client: Client,
    base_url: Url,
}

impl WikiPricesClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://prices.runescape.wiki/api/v1/osrs";
    pub const DEFAULT_USER_AGENT: &'static str =
        "flipper/0.1 (+https://oldschool.runescape.wiki/)";

    pub fn new(config: WikiPricesConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(Error::ClientBuild)?;
        Ok(WikiPricesClient { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        url
    }

    async fn get_body(&self, url: Url) -> Result<(u16, String), Error> {
        info!("requesting {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Error::transport)?;
        let status = response.status();
        read_response(status, response.text().await)
    }

    pub async fn get_mapping(&self) -> Result<Vec<MappingItem>, Error> {
        let (status, body) = self.get_body(self.endpoint("mapping")).await?;
        parse_mapping(&body, status)
    }

    pub async fn get_latest(&self) -> Result<HashMap<ItemId, LatestPrice>, Error> {
        let (status, body) = self.get_body(self.endpoint("latest")).await?;
        parse_latest(&body, status)
    }

    pub async fn get_timeseries(
        &self,
        item_id: ItemId,
        timestep: Timestep,
    ) -> Result<Vec<PricePoint>, Error> {
        let mut url = self.endpoint("timeseries");
        url.query_pairs_mut()
            .append_pair("id", &item_id.to_string())
            .append_pair("timestep", timestep.as_str());
        let (status, body) = self.get_body(url).await?;
        parse_timeseries(&body, status)
    }
}
