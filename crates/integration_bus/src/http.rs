//! Shared request and envelope handling
//!
//! The data.go.kr gateway fronts Gyeonggi, Busan and TAGO, so they share the
//! gateway header and (for Busan and TAGO) the standard response envelope.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::BusApiConfig;
use crate::error::BusApiError;

/// Build the HTTP client shared by one provider
pub(crate) fn build_client(config: &BusApiConfig) -> Result<Client, BusApiError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| BusApiError::ConfigurationError(e.to_string()))
}

/// A fetched provider response, body already read
#[derive(Debug)]
pub(crate) struct ProviderResponse {
    pub status: StatusCode,
    pub is_xml: bool,
    pub body: String,
}

impl ProviderResponse {
    /// Fail on a non-success HTTP status
    pub fn ensure_success(&self) -> Result<(), BusApiError> {
        if self.status.is_success() {
            Ok(())
        } else {
            Err(BusApiError::RequestFailed(format!("HTTP {}", self.status)))
        }
    }
}

/// GET `url` with `query` under a per-request timeout
pub(crate) async fn fetch(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
    timeout_secs: u64,
) -> Result<ProviderResponse, BusApiError> {
    debug!(url, timeout_secs, "Provider request");
    send(client.get(url).query(query), timeout_secs).await
}

/// GET a URL whose query string the caller has already encoded
pub(crate) async fn fetch_encoded(
    client: &Client,
    url: &str,
    timeout_secs: u64,
) -> Result<ProviderResponse, BusApiError> {
    debug!(url, timeout_secs, "Provider request");
    send(client.get(url), timeout_secs).await
}

async fn send(request: RequestBuilder, timeout_secs: u64) -> Result<ProviderResponse, BusApiError> {
    let response = request
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await
        .map_err(|e| BusApiError::from_send(&e, timeout_secs))?;

    let status = response.status();
    let is_xml = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("xml"));

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            BusApiError::Timeout { timeout_secs }
        } else {
            BusApiError::RequestFailed(e.to_string())
        }
    })?;

    Ok(ProviderResponse {
        status,
        is_xml,
        body,
    })
}

/// Deserialize an XML payload; a shape mismatch is a protocol error
pub(crate) fn decode_xml<T: DeserializeOwned>(body: &str) -> Result<T, BusApiError> {
    quick_xml::de::from_str(body)
        .map_err(|e| BusApiError::RemoteProtocol(format!("malformed payload: {e}")))
}

/// Trimmed, non-empty element text
pub(crate) fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Outcome of a successfully classified response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseStatus {
    Success,
    NoData,
}

/// Result codes of one provider
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResultCodes {
    pub success: u16,
    pub no_data: u16,
    pub auth: Option<u16>,
}

impl ResultCodes {
    /// Classify a result code; unknown codes carry the provider message
    pub fn classify(self, code: &str, message: Option<&str>) -> Result<ResponseStatus, BusApiError> {
        let message = || message.map_or_else(|| format!("result code {code}"), str::to_string);
        let Ok(value) = code.trim().parse::<u16>() else {
            return Err(BusApiError::RemoteProtocol(message()));
        };

        if value == self.success {
            Ok(ResponseStatus::Success)
        } else if value == self.no_data {
            Ok(ResponseStatus::NoData)
        } else if self.auth == Some(value) {
            Err(BusApiError::AuthKey(message()))
        } else {
            Err(BusApiError::RemoteProtocol(message()))
        }
    }
}

/// `cmmMsgHeader` written by the data.go.kr gateway in place of a payload
#[derive(Debug, Deserialize)]
pub(crate) struct RawGatewayHeader {
    #[serde(rename = "errMsg")]
    pub error_message: Option<String>,
    #[serde(rename = "returnAuthMsg")]
    pub auth_message: Option<String>,
}

/// A gateway header carrying an auth message means the key was rejected
pub(crate) fn check_gateway(gateway: Option<&RawGatewayHeader>) -> Result<(), BusApiError> {
    match gateway {
        Some(RawGatewayHeader {
            auth_message: Some(auth),
            ..
        }) => Err(BusApiError::AuthKey(auth.trim().to_string())),
        Some(RawGatewayHeader {
            error_message: Some(err),
            auth_message: None,
        }) => Err(BusApiError::RemoteProtocol(err.trim().to_string())),
        _ => Ok(()),
    }
}

/// Standard data.go.kr envelope (`response/header`, `response/body/items/item`)
#[derive(Debug, Deserialize)]
pub(crate) struct RawPortalResponse<T> {
    #[serde(rename = "cmmMsgHeader")]
    pub gateway: Option<RawGatewayHeader>,
    pub header: Option<RawPortalHeader>,
    pub body: Option<RawPortalBody<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPortalHeader {
    #[serde(rename = "resultCode")]
    pub code: Option<String>,
    #[serde(rename = "resultMsg")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPortalBody<T> {
    pub items: Option<RawPortalItems<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPortalItems<T> {
    #[serde(default = "Vec::new")]
    pub item: Vec<T>,
}

impl<T> RawPortalResponse<T> {
    /// Classify the envelope and take its items
    ///
    /// `NoData` (or a missing item list) yields an empty vector.
    pub fn into_items(self, codes: ResultCodes) -> Result<(ResponseStatus, Vec<T>), BusApiError> {
        check_gateway(self.gateway.as_ref())?;

        let Some(header) = self.header else {
            return Err(BusApiError::RemoteProtocol("missing response header".to_string()));
        };
        let Some(code) = header.code else {
            return Err(BusApiError::RemoteProtocol("missing resultCode".to_string()));
        };

        let status = codes.classify(&code, header.message.as_deref())?;
        let items = match status {
            ResponseStatus::Success => self
                .body
                .and_then(|body| body.items)
                .map(|items| items.item)
                .unwrap_or_default(),
            ResponseStatus::NoData => Vec::new(),
        };
        Ok((status, items))
    }
}
