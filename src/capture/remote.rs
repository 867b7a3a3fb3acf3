// HTTP OCR service client
use crate::capture::traits::{Observation, OcrProvider};
use crate::model::{CaptureError, Position};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct OcrResponse {
    lines: Vec<OcrLine>,
}

#[derive(Debug, Deserialize)]
struct OcrLine {
    text: String,
    confidence: Option<f64>,
    bbox: Option<Position>,
}

/// Posts the raw image to an OCR endpoint and reads back recognised lines.
pub struct RemoteOcrProvider {
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl RemoteOcrProvider {
    pub fn new(endpoint: String, timeout_seconds: u64) -> Result<Self, CaptureError> {
        let client = Client::builder()
            .user_agent("FridgeNote/0.1")
            .build()
            .map_err(|e| CaptureError::HttpError(e.to_string()))?;
        Ok(Self {
            endpoint,
            client,
            timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

/// Engines report 0..1 or 0..100; missing scores count as 0.8.
fn normalize_confidence(raw: Option<f64>) -> f64 {
    match raw {
        Some(c) if c > 1.0 => c / 100.0,
        Some(c) => c,
        None => 0.8,
    }
}

fn parse_response(body: &str) -> Result<Vec<Observation>, CaptureError> {
    let response: OcrResponse =
        serde_json::from_str(body).map_err(|e| CaptureError::InvalidResponse(e.to_string()))?;
    Ok(response
        .lines
        .into_iter()
        .map(|line| Observation {
            text: line.text,
            confidence: normalize_confidence(line.confidence),
            position: line.bbox,
        })
        .collect())
}

#[async_trait::async_trait]
impl OcrProvider for RemoteOcrProvider {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<Observation>, CaptureError> {
        info!("Sending {} bytes to OCR endpoint {}", image.len(), self.endpoint);
        let request = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/octet-stream")
            .body(image.to_vec())
            .send();

        let response = match timeout(self.timeout, request).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!("OCR send() failed: {:?}", e);
                return Err(CaptureError::HttpError(e.to_string()));
            }
            Err(_) => {
                warn!("OCR request timed out");
                return Err(CaptureError::Timeout);
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CaptureError::HttpError(e.to_string()))?;
        if !status.is_success() {
            warn!("OCR endpoint responded [{}]: {}", status, body);
            return Err(CaptureError::InvalidResponse(format!("status {}", status)));
        }

        parse_response(&body)
    }
}
