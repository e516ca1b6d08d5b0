//! Thin AMap REST client.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::tools::ToolError;

const DEFAULT_BASE_URL: &str = "https://restapi.amap.com";

/// HTTP client for the AMap v3 REST API.
///
/// Transport errors and provider-level status codes are both mapped onto
/// [`ToolError`] so the invoker can classify them for retry.
pub struct AmapClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AmapClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different host; used by tests.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, ToolError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "amap request");
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ToolError::unauthorized(format!("amap returned {status}")));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ToolError::rate_limited(None));
        }
        if !status.is_success() {
            return Err(ToolError::failed(format!("amap returned {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ToolError::failed(format!("unreadable amap response: {e}")))?;
        check_provider_status(&body)?;
        Ok(body)
    }

    pub async fn search_poi(
        &self,
        keywords: &str,
        city: &str,
        types: Option<&str>,
        offset: u32,
    ) -> Result<Value, ToolError> {
        let offset = offset.to_string();
        let mut params = vec![
            ("keywords", keywords),
            ("city", city),
            ("offset", offset.as_str()),
            ("page", "1"),
            ("extensions", "all"),
        ];
        if let Some(types) = types {
            params.push(("types", types));
        }
        self.get("/v3/place/text", &params).await
    }

    pub async fn weather(&self, city: &str, extensions: &str) -> Result<Value, ToolError> {
        self.get(
            "/v3/weather/weatherInfo",
            &[("city", city), ("extensions", extensions)],
        )
        .await
    }

    pub async fn geocode(&self, address: &str) -> Result<Value, ToolError> {
        self.get("/v3/geocode/geo", &[("address", address)]).await
    }

    pub async fn driving_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Value, ToolError> {
        self.get(
            "/v3/direction/driving",
            &[("origin", origin), ("destination", destination)],
        )
        .await
    }
}

fn classify_transport(e: reqwest::Error) -> ToolError {
    if e.is_timeout() {
        ToolError::timeout(10_000)
    } else {
        ToolError::network(e.to_string())
    }
}

/// AMap reports application errors inside a 200 response: `status` is "0"
/// and `info` carries the reason.
fn check_provider_status(body: &Value) -> Result<(), ToolError> {
    if body.get("status").and_then(Value::as_str) != Some("0") {
        return Ok(());
    }
    let info = body
        .get("info")
        .and_then(Value::as_str)
        .unwrap_or("unknown provider error");
    if info.contains("KEY") {
        Err(ToolError::unauthorized(info))
    } else if info.contains("QPS") || info.contains("LIMIT") {
        Err(ToolError::rate_limited(None))
    } else {
        Err(ToolError::failed(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_classification() {
        let ok = serde_json::json!({"status": "1", "info": "OK"});
        assert!(check_provider_status(&ok).is_ok());

        let bad_key = serde_json::json!({"status": "0", "info": "INVALID_USER_KEY"});
        assert!(matches!(
            check_provider_status(&bad_key),
            Err(ToolError::Unauthorized(_))
        ));

        let throttled =
            serde_json::json!({"status": "0", "info": "CUQPS_HAS_EXCEEDED_THE_LIMIT"});
        assert!(matches!(
            check_provider_status(&throttled),
            Err(ToolError::RateLimited { .. })
        ));

        let other = serde_json::json!({"status": "0", "info": "ENGINE_RESPONSE_DATA_ERROR"});
        assert!(matches!(
            check_provider_status(&other),
            Err(ToolError::Failed(_))
        ));
    }
}
