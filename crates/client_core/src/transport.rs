//! HTTP binding of the analysis gateway.

use std::error::Error as _;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{AnalysisResult, OperationKind},
    error::RemoteErrorBody,
    protocol::{ClassifyResponse, KeywordsResponse, SentimentResponse, SummarizeResponse},
};
use tracing::{debug, warn};
use url::Url;

use crate::{error::GatewayError, AnalysisGateway, AnalysisRequest};

pub const SUMMARIZE_PATH: &str = "api/text-summary/";
pub const CLASSIFY_PATH: &str = "api/classify-text/";
pub const SENTIMENT_PATH: &str = "api/sentiment/";
pub const KEYWORDS_PATH: &str = "api/keywords/";

pub fn endpoint_path(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Summary => SUMMARIZE_PATH,
        OperationKind::Classification => CLASSIFY_PATH,
        OperationKind::Sentiment => SENTIMENT_PATH,
        OperationKind::Keywords => KEYWORDS_PATH,
    }
}

/// Stateless between calls; every `invoke` is one POST.
#[derive(Debug, Clone)]
pub struct HttpAnalysisGateway {
    http: Client,
    base_url: Url,
}

impl HttpAnalysisGateway {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid analysis service url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("analysis service url '{base_url}' cannot be used as a base");
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, kind: OperationKind) -> Result<Url, GatewayError> {
        self.base_url
            .join(endpoint_path(kind))
            .map_err(|err| GatewayError::transport(format!("invalid endpoint url: {err}")))
    }

    async fn post_json<B, R>(&self, kind: OperationKind, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(kind)?;
        debug!(kind = %kind, url = %url, "dispatching analysis request");

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| GatewayError::transport(describe_transport_error(&err)))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GatewayError::transport(describe_transport_error(&err)))?;
        debug!(kind = %kind, status = status.as_u16(), bytes = bytes.len(), "analysis response received");

        if !status.is_success() {
            let message = serde_json::from_slice::<RemoteErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message().map(str::to_string));
            warn!(
                kind = %kind,
                status = status.as_u16(),
                remote_message = message.as_deref().unwrap_or(""),
                "analysis service rejected request"
            );
            return Err(GatewayError::remote(status.as_u16(), message));
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| GatewayError::transport(format!("invalid response body: {err}")))
    }
}

#[async_trait]
impl AnalysisGateway for HttpAnalysisGateway {
    async fn invoke(&self, request: AnalysisRequest) -> Result<AnalysisResult, GatewayError> {
        let kind = request.kind();
        match &request {
            AnalysisRequest::Summarize(body) => self
                .post_json::<_, SummarizeResponse>(kind, body)
                .await
                .map(Into::into),
            AnalysisRequest::Classify(body) => self
                .post_json::<_, ClassifyResponse>(kind, body)
                .await
                .map(Into::into),
            AnalysisRequest::Sentiment(body) => self
                .post_json::<_, SentimentResponse>(kind, body)
                .await
                .map(Into::into),
            AnalysisRequest::Keywords(body) => self
                .post_json::<_, KeywordsResponse>(kind, body)
                .await
                .map(Into::into),
        }
    }
}

/// reqwest's top-level message omits the cause ("error sending request for url ..."),
/// so the source chain is appended.
fn describe_transport_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
