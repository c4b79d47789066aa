use serde::Deserialize;
use std::path::Path;

/// Light gray assigned to clouds without usable colors; also the color of
/// points that were never segmented.
pub const DEFAULT_GRAY: [f32; 3] = [200.0 / 255.0, 200.0 / 255.0, 200.0 / 255.0];

/// Marker color of densified box outlines.
pub const OUTLINE_BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// Camera-0 to lidar calibration of the KITTI-360 capture rig, row-major.
pub const CAM0_TO_LIDAR: [[f64; 4]; 4] = [
    [0.04307104361, -0.08829286498, 0.995162929, 0.8043914418],
    [-0.999004371, 0.007784614041, 0.04392796942, 0.2993489574],
    [-0.01162548558, -0.9960641394, -0.08786966659, -0.1770225824],
    [0.0, 0.0, 0.0, 1.0],
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("samples_per_edge must be at least 1, got {0}")]
    InvalidSampleCount(usize),
    #[error("transform entry ({row}, {col}) is not finite")]
    NonFiniteTransform { row: usize, col: usize },
    #[error("transform bottom row must be [0, 0, 0, 1], got {0:?}")]
    NotRigidHomogeneous([f64; 4]),
    #[error("background tolerance for {rgb:?} must be finite and >= 0, got {tolerance}")]
    InvalidTolerance { rgb: [f32; 3], tolerance: f32 },
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read engine config: {0}")]
    Io(#[from] std::io::Error),
}

/// A color excluded from grouping, matched per channel within `tolerance`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BackgroundColor {
    pub rgb: [f32; 3],
    pub tolerance: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaletteEntry {
    pub rgb: [f32; 3],
    pub name: String,
}

/// Fixed parameters of the attribution engine for a whole batch.
///
/// Every field has a default, so a config file only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Homogeneous source-to-cloud transform, row-major.
    pub transform: [[f64; 4]; 4],
    pub samples_per_edge: usize,
    pub background: Vec<BackgroundColor>,
    /// Substituted when a cloud's colors are missing or mismatched.
    pub default_color: [f32; 3],
    pub outline_color: [f32; 3],
    pub palette: Vec<PaletteEntry>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transform: CAM0_TO_LIDAR,
            samples_per_edge: 100,
            background: vec![
                BackgroundColor {
                    rgb: DEFAULT_GRAY,
                    tolerance: 0.01,
                },
                BackgroundColor {
                    rgb: OUTLINE_BLACK,
                    tolerance: 0.005,
                },
            ],
            default_color: DEFAULT_GRAY,
            outline_color: OUTLINE_BLACK,
            palette: default_palette(),
        }
    }
}

pub fn default_palette() -> Vec<PaletteEntry> {
    [
        ([1.0, 0.0, 0.0], "Red"),
        ([0.0, 1.0, 0.0], "Green"),
        ([0.0, 0.0, 1.0], "Blue"),
        ([1.0, 1.0, 0.0], "Yellow"),
        ([1.0, 0.5, 0.0], "Orange"),
        ([0.5, 0.0, 0.5], "Purple"),
        ([0.0, 1.0, 1.0], "Cyan"),
        ([1.0, 0.0, 1.0], "Magenta"),
        ([0.5, 0.5, 0.5], "Gray"),
        ([0.8, 0.8, 0.8], "Light Gray"),
    ]
    .into_iter()
    .map(|(rgb, name)| PaletteEntry {
        rgb,
        name: name.to_string(),
    })
    .collect()
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn identity() -> Self {
        Self {
            transform: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_edge == 0 {
            return Err(ConfigError::InvalidSampleCount(self.samples_per_edge));
        }

        for (row, values) in self.transform.iter().enumerate() {
            if let Some(col) = values.iter().position(|v| !v.is_finite()) {
                return Err(ConfigError::NonFiniteTransform { row, col });
            }
        }

        // Rotation part is trusted; only the homogeneous row is checked.
        if self.transform[3] != [0.0, 0.0, 0.0, 1.0] {
            return Err(ConfigError::NotRigidHomogeneous(self.transform[3]));
        }

        for bg in &self.background {
            if !bg.tolerance.is_finite() || bg.tolerance < 0.0 {
                return Err(ConfigError::InvalidTolerance {
                    rgb: bg.rgb,
                    tolerance: bg.tolerance,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.samples_per_edge, 100);
        assert_eq!(config.palette.len(), 10);
        assert_eq!(config.background.len(), 2);
    }

    #[test]
    fn zero_samples_rejected() {
        let config = EngineConfig {
            samples_per_edge: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSampleCount(0))
        ));
    }

    #[test]
    fn non_finite_transform_rejected() {
        let mut config = EngineConfig::default();
        config.transform[1][2] = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteTransform { row: 1, col: 2 })
        ));
    }

    #[test]
    fn projective_bottom_row_rejected() {
        let mut config = EngineConfig::identity();
        config.transform[3] = [0.0, 0.0, 0.5, 1.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotRigidHomogeneous(_))
        ));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let mut config = EngineConfig::default();
        config.background[0].tolerance = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTolerance { .. })
        ));
    }

    #[test]
    fn json_overrides_only_given_fields() {
        let config = EngineConfig::from_json_str(r#"{ "samples_per_edge": 7 }"#).unwrap();
        assert_eq!(config.samples_per_edge, 7);
        assert_eq!(config.transform, CAM0_TO_LIDAR);
    }

    #[test]
    fn json_negative_samples_is_parse_error() {
        let err = EngineConfig::from_json_str(r#"{ "samples_per_edge": -3 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn json_short_transform_row_is_parse_error() {
        let json = r#"{ "transform": [[1, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]] }"#;
        assert!(matches!(
            EngineConfig::from_json_str(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn json_zero_samples_is_validation_error() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "samples_per_edge": 0 }"#),
            Err(ConfigError::InvalidSampleCount(0))
        ));
    }

    #[test]
    fn config_file_roundtrip() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{ "palette": [{{ "rgb": [0.3, 0.3, 0.3], "name": "Slate" }}] }}"#
        )
        .unwrap();
        let config = EngineConfig::from_json_file(tmp.path()).unwrap();
        assert_eq!(config.palette.len(), 1);
        assert_eq!(config.palette[0].name, "Slate");
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = EngineConfig::from_json_file("/tmp/cloudbox_no_such_config_12345.json");
        assert!(matches!(err, Err(ConfigError::Io(_))));
    }
}
