// Turning recognised text into shopping items
use crate::capture::traits::{Observation, OcrProvider};
use crate::config::{OcrConfig, OcrFallback};
use crate::model::{CaptureError, ShoppingItem};
use crate::utils::item_id;
use tracing::{info, warn};

pub const PLACEHOLDER_TEXT: &str = "Unable to process image";

const MIN_LINE_LEN: usize = 2;
const CONFIDENCE_FLOOR: f64 = 0.5;

/// Cleans recognised lines into items. Noise lines (too short, no letters)
/// are skipped and confidence is clamped to [0.5, 1.0].
pub fn items_from_observations(observations: &[Observation], min_confidence: f64) -> Vec<ShoppingItem> {
    let mut items = Vec::new();

    for observation in observations {
        for line in observation.text.lines() {
            let trimmed = line.trim();
            if trimmed.chars().count() <= MIN_LINE_LEN || !trimmed.chars().any(char::is_alphabetic) {
                continue;
            }

            let text = clean_line(trimmed);
            let confidence = if observation.confidence.is_nan() {
                CONFIDENCE_FLOOR
            } else {
                observation.confidence.clamp(CONFIDENCE_FLOOR, 1.0)
            };
            if text.is_empty() || confidence <= min_confidence {
                continue;
            }

            let mut item = ShoppingItem::new(item_id("ocr"), text, confidence);
            item.position = observation.position;
            items.push(item);
        }
    }

    items
}

/// Keeps letters, digits, underscores, whitespace, parentheses and hyphens,
/// then collapses runs of whitespace.
fn clean_line(line: &str) -> String {
    let kept: String = line
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '(' | ')' | '-'))
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Runs OCR on an image. Provider failures are logged and replaced by the
/// configured fallback rather than surfaced.
pub async fn capture_image(
    provider: &dyn OcrProvider,
    image: &[u8],
    config: &OcrConfig,
) -> Vec<ShoppingItem> {
    match provider.recognize(image).await {
        Ok(observations) => {
            let items = items_from_observations(&observations, config.min_confidence);
            info!(
                "OCR produced {} lines, {} usable items",
                observations.len(),
                items.len()
            );
            items
        }
        Err(e) => {
            warn!("OCR processing failed: {}", e);
            fallback_items(config.failure_fallback)
        }
    }
}

pub fn fallback_items(fallback: OcrFallback) -> Vec<ShoppingItem> {
    match fallback {
        OcrFallback::Placeholder => vec![ShoppingItem::new(item_id("fallback"), PLACEHOLDER_TEXT, 0.5)],
        OcrFallback::Empty => Vec::new(),
    }
}

/// Provider used when no OCR endpoint is configured.
pub struct NoOcr;

#[async_trait::async_trait]
impl OcrProvider for NoOcr {
    async fn recognize(&self, _image: &[u8]) -> Result<Vec<Observation>, CaptureError> {
        Err(CaptureError::Unavailable)
    }
}
