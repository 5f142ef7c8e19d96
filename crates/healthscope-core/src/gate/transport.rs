//! HTTP transport for the launch probe

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use tracing::debug;

use super::{ProbeOutcome, ProbeResponse};
use crate::config::GateConfig;
use crate::error::Result;

/// Performs the single probe request
#[async_trait]
pub trait GateTransport: Send + Sync {
    async fn fetch(&self, url: &Url, config: &GateConfig) -> ProbeOutcome;
}

/// reqwest client with the gate timeout and no redirect following
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &GateConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl GateTransport for ReqwestTransport {
    async fn fetch(&self, url: &Url, config: &GateConfig) -> ProbeOutcome {
        let mut request = self.http_client.get(url.clone());
        for (name, value) in config.headers() {
            request = request.header(name, value);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::TransportError(e.to_string()),
        };

        let status = response.status().as_u16();
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        // Only a 200 is classified by its body; any other status stands alone
        let body_len = if status == 200 {
            match response.bytes().await {
                Ok(body) => body.len(),
                Err(e) => return ProbeOutcome::TransportError(e.to_string()),
            }
        } else {
            0
        };

        debug!(
            status,
            content_length = content_length.as_deref().unwrap_or("-"),
            body_len,
            "Gate probe response"
        );

        ProbeOutcome::Response(ProbeResponse {
            status,
            content_length,
            body_len,
        })
    }
}
