// Capture: turning photos and typed text into unclassified shopping items

pub mod manual;
pub mod ocr;
pub mod remote;
pub mod traits;

pub use manual::manual_entry;
pub use ocr::{capture_image, items_from_observations};
pub use remote::RemoteOcrProvider;
pub use traits::{Observation, OcrProvider};
