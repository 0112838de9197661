// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.
//
// Defaults reproduce the fixed constants of the scanning pipeline. Every
// section is `#[serde(default)]`, so a JSON file only needs the keys it
// overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Complete scanner settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub preprocess: PreprocessConfig,
    pub detect: DetectConfig,
    pub enhance: EnhanceConfig,
    pub ocr: OcrSettings,
}

/// Edge-map settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Side length of the square Gaussian kernel (odd, >= 3).
    pub blur_kernel: u32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            canny_low: 75.0,
            canny_high: 200.0,
        }
    }
}

/// Quadrilateral selection policy.
///
/// The defaults keep the greedy rule: the first (largest) contour whose
/// approximation has exactly four vertices wins. The two extra checks are
/// opt-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Approximation tolerance as a fraction of the contour perimeter.
    pub epsilon_ratio: f64,
    /// Skip 4-vertex candidates that are not convex.
    pub require_convex: bool,
    /// Skip 4-vertex candidates smaller than this fraction of the image area.
    pub min_area_fraction: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            epsilon_ratio: 0.02,
            require_convex: false,
            min_area_fraction: 0.0,
        }
    }
}

/// OCR-legibility enhancement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Integer upsampling factor applied before thresholding.
    pub upscale: u32,
    /// Side length of the adaptive-threshold neighbourhood (odd, >= 3).
    pub block_size: u32,
    /// Constant subtracted from the weighted local mean.
    pub offset: i32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            upscale: 2,
            block_size: 11,
            offset: 2,
        }
    }
}

/// Settings for the text-recognition collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Directory holding `text-detection.rten` and `text-recognition.rten`.
    /// `None` means the front end picks its platform default.
    pub model_dir: Option<PathBuf>,
}

impl ScanConfig {
    /// Read a JSON configuration file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let p = &self.preprocess;
        check_odd_kernel("preprocess.blur_kernel", p.blur_kernel)?;
        if !(p.canny_low.is_finite() && p.canny_low > 0.0) {
            return Err(ScanError::Config(format!(
                "preprocess.canny_low must be positive, got {}",
                p.canny_low
            )));
        }
        if !(p.canny_high.is_finite() && p.canny_high >= p.canny_low) {
            return Err(ScanError::Config(format!(
                "preprocess.canny_high ({}) must be >= canny_low ({})",
                p.canny_high, p.canny_low
            )));
        }

        let d = &self.detect;
        if !(d.epsilon_ratio > 0.0 && d.epsilon_ratio < 1.0) {
            return Err(ScanError::Config(format!(
                "detect.epsilon_ratio must be in (0, 1), got {}",
                d.epsilon_ratio
            )));
        }
        if !(0.0..1.0).contains(&d.min_area_fraction) {
            return Err(ScanError::Config(format!(
                "detect.min_area_fraction must be in [0, 1), got {}",
                d.min_area_fraction
            )));
        }

        let e = &self.enhance;
        if e.upscale == 0 {
            return Err(ScanError::Config("enhance.upscale must be at least 1".into()));
        }
        check_odd_kernel("enhance.block_size", e.block_size)?;

        Ok(())
    }
}

fn check_odd_kernel(name: &str, size: u32) -> Result<()> {
    if size < 3 || size % 2 == 0 {
        return Err(ScanError::Config(format!(
            "{name} must be an odd number >= 3, got {size}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_constants() {
        let config = ScanConfig::default();
        assert_eq!(config.preprocess.blur_kernel, 5);
        assert_eq!(config.preprocess.canny_low, 75.0);
        assert_eq!(config.preprocess.canny_high, 200.0);
        assert_eq!(config.detect.epsilon_ratio, 0.02);
        assert!(!config.detect.require_convex);
        assert_eq!(config.enhance.upscale, 2);
        assert_eq!(config.enhance.block_size, 11);
        assert_eq!(config.enhance.offset, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{ "detect": { "require_convex": true } }"#).unwrap();
        assert!(config.detect.require_convex);
        assert_eq!(config.detect.epsilon_ratio, 0.02);
        assert_eq!(config.enhance, EnhanceConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");

        let mut config = ScanConfig::default();
        config.enhance.offset = 5;
        config.ocr.model_dir = Some(PathBuf::from("/opt/models"));
        config.save(&path).unwrap();

        let loaded = ScanConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn even_kernel_rejected() {
        let mut config = ScanConfig::default();
        config.preprocess.blur_kernel = 4;
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));
    }

    #[test]
    fn inverted_canny_thresholds_rejected() {
        let mut config = ScanConfig::default();
        config.preprocess.canny_high = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn epsilon_ratio_out_of_range_rejected() {
        let mut config = ScanConfig::default();
        config.detect.epsilon_ratio = 0.0;
        assert!(config.validate().is_err());
        config.detect.epsilon_ratio = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "enhance": { "upscale": 0 } }"#).unwrap();
        assert!(matches!(ScanConfig::load(&path), Err(ScanError::Config(_))));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ScanConfig::load(&path),
            Err(ScanError::Serialization(_))
        ));
    }
}
