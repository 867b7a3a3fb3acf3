// OCR provider seam
use crate::model::{CaptureError, Position};

/// One recognised line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub text: String,
    /// 0.0 ..= 1.0
    pub confidence: f64,
    pub position: Option<Position>,
}

impl Observation {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
            position: None,
        }
    }
}

#[async_trait::async_trait]
pub trait OcrProvider: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<Observation>, CaptureError>;
}
