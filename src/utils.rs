// Utility functions
use chrono::Utc;
use scraper::Html;
use std::sync::atomic::{AtomicU64, Ordering};

pub const MAX_INPUT_LENGTH: usize = 1000;

/// Strips markup and keeps only the text content, trimmed.
pub fn strip_html(input: &str) -> String {
    if !input.contains('<') && !input.contains('&') {
        return input.trim().to_string();
    }
    let fragment = Html::parse_fragment(input);
    fragment.root_element().text().collect::<String>().trim().to_string()
}

pub fn validate_input_length(input: &str, max_len: usize) -> bool {
    input.chars().count() <= max_len
}

static NEXT_ITEM_SEQ: AtomicU64 = AtomicU64::new(0);

/// Item ids look like `ocr-1700000000000-3`. The trailing sequence is
/// process-wide, so captures in the same millisecond never collide.
pub fn item_id(prefix: &str) -> String {
    let seq = NEXT_ITEM_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), seq)
}
