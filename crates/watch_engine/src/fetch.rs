use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use url::Url;
use watch_core::{Record, TrackedTarget};
use watch_logging::watch_debug;

use crate::http::{build_client, failure_kind};
use crate::wire::ObservationPage;
use crate::{FailureKind, FetchError};

/// Field selection sent with every query; names exactly what `Record` needs.
pub const OBSERVATION_FIELDS: &str = "(created_at:!t,created_at_details:all,created_time_zone:!t,geoprivacy:!t,id:!t,location:!t,mappable:!t,obscured:!t,observed_on:!t,observed_on_details:all,observed_time_zone:!t,place_guess:!t,private_geojson:!t,quality_grade:!t,taxon:(preferred_common_name:!t))";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub per_page: u32,
    pub locale: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.inaturalist.org/v2/observations".to_string(),
            per_page: 50,
            locale: "en-US".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Returns the first page of records for `target`, newest first.
    ///
    /// An empty page is `Ok(vec![])`.
    async fn fetch(&self, target: TrackedTarget) -> Result<Vec<Record>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct INaturalistFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl INaturalistFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = build_client(settings.connect_timeout, settings.request_timeout)
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Builds the query URL for one target.
    pub fn query_url(&self, target: TrackedTarget) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("verifiable", "true")
            .append_pair("order_by", "created_at")
            .append_pair("order", "desc")
            .append_pair("page", "1")
            .append_pair("spam", "false")
            .append_pair("taxon_id", &target.taxon_id.to_string())
            .append_pair("place_id", &target.place_id.to_string())
            .append_pair("locale", &self.settings.locale)
            .append_pair("per_page", &self.settings.per_page.to_string())
            .append_pair("fields", OBSERVATION_FIELDS);
        Ok(url)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|err| FetchError::new(failure_kind(&err), err.to_string()))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl RecordFetcher for INaturalistFetcher {
    async fn fetch(&self, target: TrackedTarget) -> Result<Vec<Record>, FetchError> {
        let url = self.query_url(target)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::new(failure_kind(&err), err.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        let page: ObservationPage = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Malformed, err.to_string()))?;

        watch_debug!(
            "taxon_id={} place_id={} total_results={} page={} per_page={} returned={}",
            target.taxon_id,
            target.place_id,
            page.total_results,
            page.page,
            page.per_page,
            page.results.len()
        );

        Ok(page
            .results
            .into_iter()
            .map(|observation| observation.into_record(target.taxon_id))
            .collect())
    }
}
