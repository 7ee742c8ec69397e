use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine configuration, fixed for the lifetime of a session.
///
/// Every field has a default so partial configuration files stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub stability: StabilityConfig,

    #[serde(default)]
    pub keypoints: KeypointConfig,

    #[serde(default)]
    pub squat: SquatThresholds,

    #[serde(default)]
    pub lunge: LungeThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// Consecutive fully visible frames before classification starts (N)
    #[serde(default = "default_required_stable_frames")]
    pub required_stable_frames: u32,

    /// Consecutive unreliable frames before the "lost too long" message (M)
    #[serde(default = "default_max_unstable_frames")]
    pub max_unstable_frames: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeypointConfig {
    /// Landmarks below this visibility are treated as absent
    #[serde(default = "default_min_visibility")]
    pub min_visibility: f64,
}

/// Squat bands, all in degrees
///
/// Stored as `f64` so hand-written values survive a TOML round trip; the
/// exercise tables narrow them to `f32`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquatThresholds {
    /// Knee angle above this is the standing position
    #[serde(default = "default_extended_min")]
    pub extended_min: f64,

    /// Lower bound of the valid squat depth; anything below is too deep
    #[serde(default = "default_squat_target_min")]
    pub target_min: f64,

    #[serde(default = "default_squat_target_max")]
    pub target_max: f64,

    /// Torso angle below this is flagged while down, whatever the depth
    #[serde(default = "default_torso_critical_min")]
    pub torso_critical_min: f64,

    #[serde(default = "default_torso_forward_min")]
    pub torso_forward_min: f64,

    #[serde(default = "default_torso_backward_max")]
    pub torso_backward_max: f64,
}

/// Lunge bands, all in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LungeThresholds {
    /// Both knees above this is the standing position
    #[serde(default = "default_extended_min")]
    pub extended_min: f64,

    #[serde(default = "default_lunge_front_min")]
    pub front_min: f64,

    #[serde(default = "default_lunge_front_max")]
    pub front_max: f64,

    #[serde(default = "default_lunge_back_min")]
    pub back_min: f64,

    #[serde(default = "default_lunge_back_max")]
    pub back_max: f64,

    /// Both knees below this is too deep
    #[serde(default = "default_lunge_over_flexed_max")]
    pub over_flexed_max: f64,
}

// Default value functions
fn default_required_stable_frames() -> u32 {
    20
}

fn default_max_unstable_frames() -> u32 {
    15
}

fn default_min_visibility() -> f64 {
    0.3
}

fn default_extended_min() -> f64 {
    160.0
}

fn default_squat_target_min() -> f64 {
    90.0
}

fn default_squat_target_max() -> f64 {
    120.0
}

fn default_torso_critical_min() -> f64 {
    40.0
}

fn default_torso_forward_min() -> f64 {
    45.0
}

fn default_torso_backward_max() -> f64 {
    150.0
}

fn default_lunge_front_min() -> f64 {
    75.0
}

fn default_lunge_front_max() -> f64 {
    115.0
}

fn default_lunge_back_min() -> f64 {
    65.0
}

fn default_lunge_back_max() -> f64 {
    150.0
}

fn default_lunge_over_flexed_max() -> f64 {
    65.0
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            required_stable_frames: default_required_stable_frames(),
            max_unstable_frames: default_max_unstable_frames(),
        }
    }
}

impl Default for KeypointConfig {
    fn default() -> Self {
        Self {
            min_visibility: default_min_visibility(),
        }
    }
}

impl Default for SquatThresholds {
    fn default() -> Self {
        Self {
            extended_min: default_extended_min(),
            target_min: default_squat_target_min(),
            target_max: default_squat_target_max(),
            torso_critical_min: default_torso_critical_min(),
            torso_forward_min: default_torso_forward_min(),
            torso_backward_max: default_torso_backward_max(),
        }
    }
}

impl Default for LungeThresholds {
    fn default() -> Self {
        Self {
            extended_min: default_extended_min(),
            front_min: default_lunge_front_min(),
            front_max: default_lunge_front_max(),
            back_min: default_lunge_back_min(),
            back_max: default_lunge_back_max(),
            over_flexed_max: default_lunge_over_flexed_max(),
        }
    }
}

impl EngineConfig {
    /// Check that counters are usable and every exercise's bands are disjoint
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stability.required_stable_frames == 0 {
            return Err(ConfigError::ZeroStableFrames);
        }
        if self.stability.max_unstable_frames == 0 {
            return Err(ConfigError::ZeroUnstableFrames);
        }
        let visibility = self.keypoints.min_visibility;
        if !(0.0..=1.0).contains(&visibility) {
            return Err(ConfigError::VisibilityOutOfRange(visibility));
        }

        self.squat.validate()?;
        self.lunge.validate()
    }
}

impl SquatThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBands {
            exercise: "squat",
            reason,
        };

        if !(self.target_min < self.target_max) {
            return Err(invalid(format!(
                "target_min ({}) must be below target_max ({})",
                self.target_min, self.target_max
            )));
        }
        if self.target_max > self.extended_min {
            return Err(invalid(format!(
                "target_max ({}) overlaps the extended band starting at {}",
                self.target_max, self.extended_min
            )));
        }
        if self.torso_critical_min > self.torso_forward_min
            || self.torso_forward_min >= self.torso_backward_max
        {
            return Err(invalid(format!(
                "torso bounds must satisfy critical ({}) <= forward ({}) < backward ({})",
                self.torso_critical_min, self.torso_forward_min, self.torso_backward_max
            )));
        }

        Ok(())
    }
}

impl LungeThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBands {
            exercise: "lunge",
            reason,
        };

        if !(self.front_min < self.front_max) || !(self.back_min < self.back_max) {
            return Err(invalid("front and back bands must have min below max".to_string()));
        }
        if self.front_max > self.extended_min || self.back_max > self.extended_min {
            return Err(invalid(format!(
                "front ({}) and back ({}) bands must end at or below the extended band ({})",
                self.front_max, self.back_max, self.extended_min
            )));
        }
        if self.over_flexed_max > self.front_min || self.over_flexed_max > self.back_min {
            return Err(invalid(format!(
                "over_flexed_max ({}) overlaps the front/back bands",
                self.over_flexed_max
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.stability.required_stable_frames, 20);
        assert_eq!(config.stability.max_unstable_frames, 15);
        assert_eq!(config.keypoints.min_visibility, 0.3);
        assert_eq!(config.squat.target_min, 90.0);
        assert_eq!(config.squat.target_max, 120.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = EngineConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: EngineConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_serialized_values_keep_their_decimal_form() {
        let serialized = toml::to_string(&EngineConfig::default()).unwrap();
        assert!(serialized.contains("min_visibility = 0.3\n"));

        let mut config = EngineConfig::default();
        config.squat.target_min = 92.3;
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("target_min = 92.3\n"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [stability]
            required_stable_frames = 5

            [squat]
            target_min = 100.0
            "#,
        )
        .unwrap();

        assert_eq!(config.stability.required_stable_frames, 5);
        assert_eq!(config.stability.max_unstable_frames, 15);
        assert_eq!(config.squat.target_min, 100.0);
        assert_eq!(config.squat.target_max, 120.0);
        assert_eq!(config.lunge, LungeThresholds::default());
    }

    #[test]
    fn test_rejects_zero_counters() {
        let mut config = EngineConfig::default();
        config.stability.required_stable_frames = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStableFrames));

        let mut config = EngineConfig::default();
        config.stability.max_unstable_frames = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroUnstableFrames));
    }

    #[test]
    fn test_rejects_overlapping_squat_bands() {
        let mut config = EngineConfig::default();
        config.squat.target_max = 170.0;
        assert_matches!(
            config.validate(),
            Err(ConfigError::InvalidBands { exercise: "squat", .. })
        );
    }

    #[test]
    fn test_rejects_inverted_lunge_band() {
        let mut config = EngineConfig::default();
        config.lunge.front_min = 120.0;
        assert_matches!(
            config.validate(),
            Err(ConfigError::InvalidBands { exercise: "lunge", .. })
        );
    }

    #[test]
    fn test_rejects_visibility_out_of_range() {
        let mut config = EngineConfig::default();
        config.keypoints.min_visibility = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::VisibilityOutOfRange(1.5)));
    }
}
