use emath::Rect;
use serde::{Deserialize, Serialize};

use crate::ScaleMode;

/// Sizing limits applied while a selection is created or resized.
///
/// Every field follows the "unset means unconstrained" convention: a `None`
/// min/max leaves that side open and a `None` fixed extent leaves the axis
/// free. `fixed_ratio` is width divided by height. If a fixed extent and a
/// ratio are both given, the fixed extent wins its axis and the ratio derives
/// the other one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub fixed_width: Option<f32>,
    pub fixed_height: Option<f32>,
    pub fixed_ratio: Option<f32>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
}

impl Constraints {
    /// Check the set for internal conflicts. Called once when a session is
    /// built; gesture handling assumes a validated set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("fixed_width", self.fixed_width),
            ("fixed_height", self.fixed_height),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("max_width", self.max_width),
            ("max_height", self.max_height),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidValue { field, value });
                }
            }
        }
        if let Some(ratio) = self.fixed_ratio {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(ConfigError::InvalidRatio(ratio));
            }
        }
        for (axis, min, max, fixed) in [
            ("width", self.min_width, self.max_width, self.effective_fixed_width()),
            ("height", self.min_height, self.max_height, self.effective_fixed_height()),
        ] {
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(ConfigError::MinExceedsMax { axis, min, max });
                }
            }
            if let Some(fixed) = fixed {
                let below = min.map_or(false, |m| fixed < m);
                let above = max.map_or(false, |m| fixed > m);
                if below || above {
                    return Err(ConfigError::FixedOutsideRange {
                        axis,
                        fixed,
                        min: min.unwrap_or(0.0),
                        max: max.unwrap_or(f32::INFINITY),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fixed horizontal extent, deriving it from the ratio when only the
    /// vertical one is pinned.
    pub(crate) fn effective_fixed_width(&self) -> Option<f32> {
        self.fixed_width
            .or_else(|| Some(self.fixed_height? * self.fixed_ratio?))
    }

    /// Fixed vertical extent, deriving it from the ratio when only the
    /// horizontal one is pinned.
    pub(crate) fn effective_fixed_height(&self) -> Option<f32> {
        self.fixed_height
            .or_else(|| Some(self.fixed_width? / self.fixed_ratio?))
    }

    /// The ratio drives a gesture only while neither axis is pinned outright;
    /// a fixed extent plus a ratio pins both axes instead.
    pub(crate) fn gesture_ratio(&self) -> Option<f32> {
        if self.fixed_width.is_some() || self.fixed_height.is_some() {
            None
        } else {
            self.fixed_ratio
        }
    }

    pub(crate) fn has_fixed_extent(&self) -> bool {
        self.fixed_width.is_some() || self.fixed_height.is_some()
    }
}

/// Where the selection starts out when a session is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum StartingSelection {
    /// No selection until the first gesture or command.
    #[default]
    None,
    /// Select the whole image.
    All,
    /// A natural-unit rectangle, clamped into the image like
    /// [`set_selection`](crate::CropSession::set_selection).
    Rect(Rect),
}

/// Host-facing session configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    #[serde(flatten)]
    pub constraints: Constraints,
    pub starting_selection: StartingSelection,
    pub scale_mode: ScaleMode,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidValue { field: &'static str, value: f32 },
    #[error("fixed_ratio must be finite and positive (got {0})")]
    InvalidRatio(f32),
    #[error("min_{axis} {min} exceeds max_{axis} {max}")]
    MinExceedsMax { axis: &'static str, min: f32, max: f32 },
    #[error("fixed {axis} {fixed} lies outside [{min}, {max}]")]
    FixedOutsideRange { axis: &'static str, fixed: f32, min: f32, max: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_valid() {
        Constraints::default().validate().unwrap();
    }

    #[test]
    fn min_above_max_is_rejected() {
        let c = Constraints {
            min_width: Some(200.0),
            max_width: Some(100.0),
            ..Default::default()
        };
        assert_eq!(
            c.validate().unwrap_err(),
            ConfigError::MinExceedsMax { axis: "width", min: 200.0, max: 100.0 }
        );
    }

    #[test]
    fn fixed_above_max_is_rejected() {
        let c = Constraints {
            fixed_width: Some(300.0),
            max_width: Some(150.0),
            ..Default::default()
        };
        c.validate().unwrap_err();
    }

    #[test]
    fn derived_fixed_extent_is_checked_too() {
        // width 100 at ratio 2 pins the height to 50, below the minimum
        let c = Constraints {
            fixed_width: Some(100.0),
            fixed_ratio: Some(2.0),
            min_height: Some(60.0),
            ..Default::default()
        };
        assert_eq!(
            c.validate().unwrap_err(),
            ConfigError::FixedOutsideRange { axis: "height", fixed: 50.0, min: 60.0, max: f32::INFINITY }
        );
    }

    #[test]
    fn negative_and_non_finite_values_are_rejected() {
        let c = Constraints { min_width: Some(-1.0), ..Default::default() };
        c.validate().unwrap_err();
        let c = Constraints { max_height: Some(f32::NAN), ..Default::default() };
        c.validate().unwrap_err();
        let c = Constraints { fixed_ratio: Some(0.0), ..Default::default() };
        assert_eq!(c.validate().unwrap_err(), ConfigError::InvalidRatio(0.0));
    }

    #[test]
    fn ratio_is_inert_while_an_axis_is_pinned() {
        let c = Constraints {
            fixed_width: Some(100.0),
            fixed_ratio: Some(2.0),
            ..Default::default()
        };
        assert_eq!(c.gesture_ratio(), None);
        assert_eq!(c.effective_fixed_width(), Some(100.0));
        assert_eq!(c.effective_fixed_height(), Some(50.0));
    }

    #[test]
    fn config_deserializes_with_flattened_constraints() {
        let config: CropConfig = serde_json::from_str(
            r#"{
                "fixed_ratio": 1.5,
                "min_width": 30.0,
                "starting_selection": "All"
            }"#,
        )
        .unwrap();
        assert_eq!(config.constraints.fixed_ratio, Some(1.5));
        assert_eq!(config.constraints.min_width, Some(30.0));
        assert_eq!(config.starting_selection, StartingSelection::All);
        assert_eq!(config.scale_mode, ScaleMode::None);

        let round_trip: CropConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }
}
