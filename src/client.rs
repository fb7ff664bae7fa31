use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: ureq::Error,
    },
    #[error("Failed to parse JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: ureq::Error,
    },
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Blocking client for the chunirec v2 API.
///
/// Every request carries `region` and `token` as query parameters.
pub struct ChunirecClient {
    base_url: String,
    region: String,
    token: String,
}

impl ChunirecClient {
    pub fn new(api: ApiConfig) -> Self {
        Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            region: api.region,
            token: api.token,
        }
    }

    /// Build the full URL for an endpoint path such as `records/showall.json`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// GET an endpoint and decode its JSON body.
    /// `user_name` targets another player; `None` means the token owner.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        user_name: Option<&str>,
    ) -> Result<T> {
        let url = self.endpoint_url(endpoint);
        // The token is in the query string, so only the endpoint is logged.
        log::debug!("Fetching {endpoint} (region {})", self.region);

        let mut request = ureq::get(&url)
            .query("region", &self.region)
            .query("token", &self.token);
        if let Some(name) = user_name {
            request = request.query("user_name", name);
        }

        let value: T = request
            .call()
            .map_err(|source| ApiError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?
            .body_mut()
            .read_json()
            .map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;

        Ok(value)
    }
}
