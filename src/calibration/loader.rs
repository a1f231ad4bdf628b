use crate::calibration::{
    AccelerometerCalibration, CalibrationProfile, GyroscopeCalibration, MagnetometerCalibration,
    RAW_SENSOR_COORDINATES,
};
use crate::error::Error;
use crate::num::Real;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// The on-disk layout of a calibration run.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CalibrationFile {
    timestamp: Option<String>,
    coordinate_system: Option<String>,
    accelerometer: Option<AccelerometerSection>,
    gyroscope: Option<GyroscopeSection>,
    magnetometer: Option<MagnetometerSection>,
    abnormalities: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AccelerometerSection {
    bias_raw: Option<[f64; 3]>,
    scale_factors: Option<[f64; 3]>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GyroscopeSection {
    bias_raw: Option<[f64; 3]>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MagnetometerSection {
    hard_iron_offset_raw: Option<[f64; 3]>,
    soft_iron_scale_raw: Option<[f64; 3]>,
}

fn convert<T: Real>(values: Option<[f64; 3]>, default: f64) -> [T; 3] {
    values.unwrap_or([default; 3]).map(nalgebra::convert::<f64, T>)
}

impl<T> CalibrationProfile<T>
where
    T: Real,
{
    /// Parses a calibration profile from its JSON representation.
    ///
    /// Missing sections are kept absent, missing fields of a present section
    /// default to zero offsets and unit scales. A missing `coordinate_system`, or one
    /// other than `"raw_sensor_coordinates"`, is reported as a warning; the profile
    /// is still used.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let file: CalibrationFile = serde_json::from_str(json)?;

        let profile = Self {
            timestamp: file.timestamp,
            coordinate_system: file.coordinate_system,
            accelerometer: file.accelerometer.map(|s| AccelerometerCalibration {
                bias: convert(s.bias_raw, 0.0),
                scale: convert(s.scale_factors, 1.0),
            }),
            gyroscope: file.gyroscope.map(|s| GyroscopeCalibration {
                bias: convert(s.bias_raw, 0.0),
            }),
            magnetometer: file.magnetometer.map(|s| MagnetometerCalibration {
                hard_iron_offset: convert(s.hard_iron_offset_raw, 0.0),
                soft_iron_scale: convert(s.soft_iron_scale_raw, 1.0),
            }),
            quality_issues: file.abnormalities,
        };

        profile.validate()?;

        if !profile.has_expected_coordinate_system() {
            warn!(
                coordinate_system = profile.coordinate_system.as_deref().unwrap_or("unknown"),
                expected = RAW_SENSOR_COORDINATES,
                "Calibration was recorded in an unexpected coordinate system"
            );
        }

        debug!(
            timestamp = profile.timestamp.as_deref(),
            accelerometer = profile.accelerometer.is_some(),
            gyroscope = profile.gyroscope.is_some(),
            magnetometer = profile.magnetometer.is_some(),
            quality = ?profile.quality(),
            "Loaded calibration profile"
        );

        Ok(profile)
    }

    /// Reads and parses a calibration profile from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
