use crate::model::ConfigError;
use crate::taxonomy::{StoreCategory, Taxonomy};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

/// What a failed OCR run hands to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrFallback {
    /// A single "Unable to process image" item.
    Placeholder,
    Empty,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: u64,
    pub min_confidence: f64,
    pub failure_fallback: OcrFallback,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: 30,
            min_confidence: 0.4,
            failure_fallback: OcrFallback::Placeholder,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: String,
    pub storage: StorageBackend,
    pub search_radius_km: f64,
    pub home: Option<HomeLocation>,
    pub ocr: OcrConfig,
    pub categories: Option<Vec<StoreCategory>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "data.db".to_string(),
            storage: StorageBackend::Sqlite,
            search_radius_km: 5.0,
            home: None,
            ocr: OcrConfig::default(),
            categories: None,
        }
    }
}

impl AppConfig {
    /// Configured aisle layout, or the built-in UK one.
    pub fn taxonomy(&self) -> Result<Taxonomy, ConfigError> {
        match &self.categories {
            Some(categories) => Taxonomy::from_categories(categories.clone()),
            None => Ok(Taxonomy::default_uk()),
        }
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.taxonomy()?;
    Ok(config)
}

/// Like `load_config`, but a missing file means defaults.
pub fn load_or_default(path: &str) -> Result<AppConfig, ConfigError> {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        tracing::info!("No config at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}
