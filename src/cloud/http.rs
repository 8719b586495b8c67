use crate::error::Endpoint;
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Minimal JSON-over-HTTPS client for Google REST APIs keyed by `?key=`.
///
/// Shared by the vision and speech clients. Never retries.
#[derive(Clone)]
pub struct GoogleApiClient {
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl GoogleApiClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            timeout,
        }
    }

    pub async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
        request: &Req,
    ) -> Result<Resp> {
        tracing::debug!("Sending request to {} API", endpoint);

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to {} API: {}", endpoint, e);
                transport_error(endpoint, e)
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        if !status.is_success() {
            tracing::error!(
                "{} API error (status {}): {}",
                endpoint,
                status,
                String::from_utf8_lossy(&body)
            );
            return Err(Error::RemoteService {
                endpoint,
                status: Some(status.as_u16()),
                body: body.to_vec(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse {} response: {}\nBody: {}",
                endpoint,
                e,
                String::from_utf8_lossy(&body)
            );
            Error::Serialization(e)
        })
    }
}

// Timeouts count as a remote failure without a status code.
fn transport_error(endpoint: Endpoint, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::RemoteService {
            endpoint,
            status: None,
            body: e.to_string().into_bytes(),
        }
    } else {
        Error::Http(e)
    }
}
