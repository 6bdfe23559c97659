//! EsploraBroadcaster - POST a raw transaction to an Esplora `/tx` endpoint

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{info, warn};

use super::RawBroadcaster;
use crate::core::paths::endpoints::TX_SUFFIX;
use crate::error::{BroadcastError, BroadcastResult};

#[derive(Debug, Clone)]
pub struct EsploraBroadcaster {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl EsploraBroadcaster {
    /// `base_url` is the API root (e.g. `https://blockstream.info/testnet/api`).
    pub fn new(base_url: &str, timeout: Duration) -> BroadcastResult<Self> {
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), TX_SUFFIX);
        Self::with_endpoint(endpoint, timeout)
    }

    /// Use `endpoint` exactly as given.
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> BroadcastResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BroadcastError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self { client, endpoint: endpoint.into(), timeout })
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }
}

#[async_trait]
impl RawBroadcaster for EsploraBroadcaster {
    async fn broadcast(&self, raw_hex: &str) -> BroadcastResult<String> {
        let response = self.client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(raw_hex.to_owned())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BroadcastError::Network(format!("timed out after {}s", self.timeout.as_secs()))
                } else {
                    BroadcastError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| BroadcastError::Network(format!("read body: {}", e)))?;

        if !status.is_success() {
            return Err(BroadcastError::Rejected { status: status.as_u16(), body: body.trim().to_string() });
        }

        // Any non-empty body is taken as the txid.
        let txid = body.trim().to_string();
        if txid.is_empty() {
            return Err(BroadcastError::Network(format!("empty txid in {} response", status.as_u16())));
        }
        if txid.len() != 64 || !txid.bytes().all(|b| b.is_ascii_hexdigit()) {
            warn!(txid = %txid, "Endpoint accepted the transaction but returned an unusual txid");
        }
        info!(endpoint = %self.endpoint, txid = %txid, "Raw transaction broadcast");
        Ok(txid)
    }
}
