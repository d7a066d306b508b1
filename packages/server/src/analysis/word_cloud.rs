use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::AnalysisConfig;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("word cloud request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("word cloud service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Turns raw text into a PNG word cloud.
#[async_trait]
pub trait WordCloudRenderer: Send + Sync {
    async fn render(&self, text: &str) -> Result<Vec<u8>, RenderError>;
}

/// Renderer backed by a QuickChart-compatible HTTP endpoint.
pub struct QuickChartRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl QuickChartRenderer {
    pub fn new(config: &AnalysisConfig) -> Result<Self, RenderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.word_cloud_url.clone(),
        })
    }
}

/// Request body understood by the chart endpoint.
pub fn chart_request(text: &str) -> Value {
    json!({
        "format": "png",
        "chart": {
            "type": "wordcloud",
            "data": { "text": text },
        },
    })
}

#[async_trait]
impl WordCloudRenderer for QuickChartRenderer {
    async fn render(&self, text: &str) -> Result<Vec<u8>, RenderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&chart_request(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
