//! HTTP API Client
//!
//! Transport for the Errorly bootstrap endpoints. Bodies are returned as raw
//! text so that every response goes through the numeric-safe decoder.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use super::decode::decode_as;
use super::envelope::Envelope;
use super::error::CallFailure;

/// Session endpoint
pub const ME_ENDPOINT: &str = "/api/me";

/// Route dictionary endpoint
pub const DICTIONARY_ENDPOINT: &str = "/api/dictionary";

/// Local storage key overriding the API origin
pub const API_BASE_KEY: &str = "errorly_api_url";

/// Local storage key selecting the route dictionary shape (`"bare"`)
pub const ROUTE_CONTRACT_KEY: &str = "errorly_route_contract";

/// Same-origin by default
pub const DEFAULT_API_BASE: &str = "";

/// Read a setting from local storage
pub fn stored_setting(key: &str) -> Option<String> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(key).ok().flatten())
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = stored_setting(API_BASE_KEY).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Anything able to GET a path and hand back the body
#[async_trait(?Send)]
pub trait ApiClient {
    async fn get(&self, path: &str) -> Result<String, CallFailure>;
}

/// Browser transport built on `gloo-net`
#[derive(Debug, Clone)]
pub struct GlooClient {
    base: String,
}

impl GlooClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Client for the origin configured in local storage
    pub fn from_storage() -> Self {
        Self::new(get_api_base())
    }
}

#[async_trait(?Send)]
impl ApiClient for GlooClient {
    async fn get(&self, path: &str) -> Result<String, CallFailure> {
        let url = format!("{}{}", self.base, path);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| CallFailure::transport(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            tracing::warn!(url = %url, status, "request failed");
            return Err(CallFailure::Http { status, body });
        }

        response
            .text()
            .await
            .map_err(|e| CallFailure::transport(e.to_string()))
    }
}

/// GET an enveloped endpoint and decode it without losing large integers
pub async fn fetch_envelope<T, C>(client: &C, path: &str) -> Result<Envelope<T>, CallFailure>
where
    T: DeserializeOwned,
    C: ApiClient + ?Sized,
{
    let raw = client.get(path).await?;
    Ok(decode_as(&raw)?)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedClient;
    use super::*;
    use futures::executor::block_on;
    use serde_json::Value;

    #[test]
    fn test_fetch_envelope_decodes_safely() {
        let client = ScriptedClient::new().with(
            ME_ENDPOINT,
            Ok(r#"{"success":true,"data":{"id":1152921504606846976}}"#),
        );

        let envelope: Envelope<Value> = block_on(fetch_envelope(&client, ME_ENDPOINT)).unwrap();
        assert_eq!(
            envelope.data.unwrap()["id"],
            Value::from("1152921504606846976")
        );
        assert_eq!(client.calls(), vec![ME_ENDPOINT.to_string()]);
    }

    #[test]
    fn test_fetch_envelope_malformed() {
        let client = ScriptedClient::new().with(ME_ENDPOINT, Ok("<!doctype html>"));
        let result = block_on(fetch_envelope::<Value, _>(&client, ME_ENDPOINT));
        assert!(matches!(result, Err(CallFailure::Decode(_))));
    }

    #[test]
    fn test_fetch_envelope_passes_failures_through() {
        let client = ScriptedClient::new();
        let result = block_on(fetch_envelope::<Value, _>(&client, DICTIONARY_ENDPOINT));
        assert_eq!(
            result.unwrap_err(),
            CallFailure::Http {
                status: 404,
                body: None
            }
        );
    }
}
