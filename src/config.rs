//! Pipeline configuration with documented defaults.
//!
//! Every tuning constant of the pipeline lives here instead of inline at its
//! use site: the trim bound, the JPEG target, and the COLMAP stage knobs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory holding one subdirectory per capture session.
    pub workspace: PathBuf,
    /// MJPEG feed URL of the network camera.
    pub camera_url: Option<String>,
    /// Maximum images retained per session; the trimmer enforces this.
    pub max_collection: usize,
    /// External viewer opened on the fused artifact.
    pub viewer_binary: String,
    pub capture: CaptureSettings,
    pub reconstruction: ReconstructionSettings,
}

/// Frame preprocessing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Stored image width in pixels.
    pub target_width: u32,
    /// Stored image height in pixels.
    pub target_height: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

/// COLMAP stage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionSettings {
    /// COLMAP binary name or path.
    pub colmap_binary: String,
    /// Sequential matching compares each image against this many neighbours.
    pub overlap_window: u32,
    /// Minimum feature matches for the sparse mapper to link two images.
    pub min_num_matches: u32,
    /// SIFT feature cap per image.
    pub max_num_features: u32,
    /// Per-stage wall-clock limit; the stage process is killed on expiry.
    pub stage_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("scans"),
            camera_url: None,
            max_collection: 200,
            viewer_binary: "meshlab".to_string(),
            capture: CaptureSettings::default(),
            reconstruction: ReconstructionSettings::default(),
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            target_width: 1280,
            target_height: 960,
            jpeg_quality: 85,
        }
    }
}

impl Default for ReconstructionSettings {
    fn default() -> Self {
        Self {
            colmap_binary: "colmap".to_string(),
            overlap_window: 10,
            min_num_matches: 20,
            max_num_features: 8192,
            stage_timeout_secs: 3600,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file, returning defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_returns_defaults_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let config = ScanConfig::load(&dir.path().join("nonexistent.json")).unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn load_returns_error_for_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not valid json!!!").unwrap();
        assert!(matches!(
            ScanConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn partial_file_falls_back_to_defaults_per_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"max_collection": 50}"#).unwrap();

        let config = ScanConfig::load(&path).unwrap();
        assert_eq!(config.max_collection, 50);
        assert_eq!(config.reconstruction.overlap_window, 10);
        assert_eq!(config.capture.jpeg_quality, 85);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ScanConfig {
            camera_url: Some("http://192.168.0.2:4747/videofeed".to_string()),
            reconstruction: ReconstructionSettings {
                max_num_features: 4096,
                ..ReconstructionSettings::default()
            },
            ..ScanConfig::default()
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ScanConfig::default();
        assert_eq!(config.max_collection, 200);
        assert_eq!(config.reconstruction.overlap_window, 10);
        assert_eq!(config.reconstruction.min_num_matches, 20);
        assert_eq!(config.reconstruction.max_num_features, 8192);
        assert_eq!(config.viewer_binary, "meshlab");
    }
}
