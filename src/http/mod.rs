use crate::models::charts::RawChartPayload;
use crate::models::operation::RawOperation;
use crate::models::resources::RawResourceSnapshot;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Why a dashboard fetch produced nothing renderable. Every non-2xx status
/// is a failure regardless of body content; a 2xx body that does not match
/// the expected shape is a failure of its own kind.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error {0}")]
    Status(StatusCode),
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Thin typed client over the dashboard's four backend endpoints.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch_operations(
        &self,
        filter_code: &str,
        limit: u32,
    ) -> Result<Vec<RawOperation>, FetchError> {
        self.get_json(&format!(
            "/api/operations?type={}&limit={limit}",
            urlencoding::encode(filter_code)
        ))
        .await
    }

    pub async fn fetch_resources(
        &self,
        force_update: bool,
    ) -> Result<RawResourceSnapshot, FetchError> {
        self.get_json(&format!("/api/system/resources?forceUpdate={force_update}"))
            .await
    }

    pub async fn fetch_operation_type_chart(&self) -> Result<RawChartPayload, FetchError> {
        self.get_json("/api/charts/operation-types").await
    }

    pub async fn fetch_timeline_chart(&self) -> Result<RawChartPayload, FetchError> {
        self.get_json("/api/charts/operations-timeline").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized_away() {
        let client = ApiClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn shape_errors_are_distinct_from_transport() {
        let err: FetchError = serde_json::from_str::<Vec<RawOperation>>("{\"not\": \"a list\"}")
            .unwrap_err()
            .into();
        assert!(matches!(err, FetchError::Shape(_)));
        assert!(err.to_string().starts_with("unexpected response shape"));
    }
}
