//! # Remote Time-Series Backend
//!
//! [`TimeSeriesProxy`] implementation that forwards raw queries to a
//! configured time-series database over HTTP. The query payload is opaque:
//! it is forwarded verbatim and whatever the backend answers comes back
//! verbatim. Transport failures map to [`ProxyError::Unreachable`], non-2xx
//! answers to [`ProxyError::Rejected`] with the upstream status and body.
//! No retries; a slow backend blocks its request.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::store::{ProxyError, StartupError, TimeSeriesProxy, TimeSeriesQuery};

const BACKEND: &str = "influx";

/// HTTP client bound to one time-series server.
#[derive(Debug)]
pub struct RemoteTimeSeries {
    client: reqwest::Client,
    base: Url,
    query_url: Url,
}

impl RemoteTimeSeries {
    /// Validate the server URL and build the client. Called once at wiring
    /// time; an invalid URL is fatal.
    pub fn connect(server_url: &str) -> Result<Self, StartupError> {
        let base = Url::parse(server_url).map_err(|e| StartupError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(StartupError::InvalidServerUrl {
                url: server_url.to_string(),
                reason: format!("unsupported scheme {}", base.scheme()),
            });
        }

        // Append the query segment under whatever path prefix the server
        // was configured with.
        let mut query_url = base.clone();
        match query_url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().push("query");
            }
            Err(()) => {
                return Err(StartupError::InvalidServerUrl {
                    url: server_url.to_string(),
                    reason: "cannot be used as a base url".to_string(),
                });
            }
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base,
            query_url,
        })
    }

    fn query_url(&self) -> Url {
        self.query_url.clone()
    }
}

#[async_trait]
impl TimeSeriesProxy for RemoteTimeSeries {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn query(&self, source_id: u64, query: TimeSeriesQuery) -> Result<Value, ProxyError> {
        let mut params: Vec<(&str, String)> = vec![("q", query.query)];
        if let Some(db) = query.db {
            params.push(("db", db));
        }
        if let Some(rp) = query.rp {
            params.push(("rp", rp));
        }
        if let Some(epoch) = query.epoch {
            params.push(("epoch", epoch));
        }

        tracing::debug!(source_id, url = %self.base, "forwarding query");
        let response = self
            .client
            .post(self.query_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| ProxyError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProxyError::Unreachable(e.to_string()))
    }
}
