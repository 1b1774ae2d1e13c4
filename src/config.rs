use std::path::Path;

use anyhow::{bail, Context};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::inertia::{InertiaTuning, MAX_GLIDE_FRAMES};

pub const DEFAULT_EYE: [f32; 3] = [0.0, 1.5, -12.0];
pub const DEFAULT_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

/// Camera tuning, loadable from JSON. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    #[serde(flatten)]
    pub inertia: InertiaTuning,
    pub default_eye: [f32; 3],
    pub default_target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            inertia: InertiaTuning::default(),
            default_eye: DEFAULT_EYE,
            default_target: DEFAULT_TARGET,
        }
    }
}

impl CameraConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded camera config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: CameraConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tunings that break the inertia model
    pub fn validate(&self) -> anyhow::Result<()> {
        let t = &self.inertia;

        let celerities = [
            ("cruise_celerity", t.cruise_celerity),
            ("turbo_celerity", t.turbo_celerity),
        ];
        for (name, value) in celerities {
            if !value.is_finite() || value <= 0.0 {
                bail!("{name} must be a positive number, got {value}");
            }
        }
        if t.turbo_celerity < t.cruise_celerity {
            bail!(
                "turbo_celerity ({}) is below cruise_celerity ({})",
                t.turbo_celerity,
                t.cruise_celerity
            );
        }
        if !(t.produce_forward > 0.0) || !(t.produce_backward < 0.0) {
            bail!("produce_forward must be positive and produce_backward negative");
        }
        if !(t.consume_forward < 0.0) || !(t.consume_backward > 0.0) {
            bail!("consume_forward must be negative and consume_backward positive");
        }
        for (name, decay) in [
            ("consume_forward", t.consume_forward),
            ("consume_backward", t.consume_backward),
        ] {
            if t.turbo_celerity / decay.abs() > f64::from(MAX_GLIDE_FRAMES) {
                bail!(
                    "{name} ({decay}) is too small: stopping from turbo_celerity would take \
                     more than {MAX_GLIDE_FRAMES} frames"
                );
            }
        }
        if !self.default_eye.iter().chain(&self.default_target).all(|v| v.is_finite()) {
            bail!("default_eye and default_target must be finite");
        }

        Ok(())
    }

    pub fn default_eye(&self) -> Vec3 {
        Vec3::from_array(self.default_eye)
    }

    pub fn default_target(&self) -> Vec3 {
        Vec3::from_array(self.default_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        CameraConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = CameraConfig::from_json("{}").unwrap();
        assert_eq!(config, CameraConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config =
            CameraConfig::from_json(r#"{"turbo_celerity": 1.0, "default_eye": [1.0, 2.0, 3.0]}"#)
                .unwrap();
        assert_eq!(config.inertia.turbo_celerity, 1.0);
        assert_eq!(config.inertia.cruise_celerity, crate::inertia::CELERITY_CRUISE);
        assert_eq!(config.default_eye(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rejects_non_positive_celerity() {
        let err = CameraConfig::from_json(r#"{"cruise_celerity": 0.0}"#).unwrap_err();
        assert!(err.to_string().contains("cruise_celerity"));
    }

    #[test]
    fn rejects_turbo_slower_than_cruise() {
        let json = r#"{"cruise_celerity": 1.0, "turbo_celerity": 0.5}"#;
        assert!(CameraConfig::from_json(json).is_err());
    }

    #[test]
    fn rejects_wrong_sign_constants() {
        assert!(CameraConfig::from_json(r#"{"produce_backward": 0.25}"#).is_err());
        assert!(CameraConfig::from_json(r#"{"consume_forward": 0.01}"#).is_err());
    }

    #[test]
    fn rejects_decay_too_small_to_stop() {
        let err = CameraConfig::from_json(r#"{"consume_forward": -1e-12}"#).unwrap_err();
        assert!(err.to_string().contains("consume_forward"));
        assert!(CameraConfig::from_json(r#"{"consume_backward": 1e-12}"#).is_err());
    }

    #[test]
    fn rejects_unknown_json() {
        assert!(CameraConfig::from_json("not json").is_err());
    }
}
