use crate::error::Error;
use crate::num::Real;
use alloc::string::String;
use alloc::vec::Vec;

/// The coordinate system calibration values are expected to be expressed in.
pub const RAW_SENSOR_COORDINATES: &str = "raw_sensor_coordinates";

/// Accelerometer bias and per-axis scale, in g.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AccelerometerCalibration<T> {
    /// The zero-g offset of each axis, in g.
    pub bias: [T; 3],
    /// The scale factor applied after bias removal.
    pub scale: [T; 3],
}

/// Gyroscope zero-rate bias, in degrees per second.
///
/// Scale errors of the gyroscope are not modeled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GyroscopeCalibration<T> {
    pub bias: [T; 3],
}

/// Magnetometer hard-iron offset and soft-iron (per-axis) scale, in µT.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MagnetometerCalibration<T> {
    pub hard_iron_offset: [T; 3],
    pub soft_iron_scale: [T; 3],
}

/// The overall grade of a calibration run, derived from its quality issues.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CalibrationQuality {
    /// No issues were reported.
    Excellent,
    /// Up to three issues were reported.
    Good,
    /// More than three issues were reported.
    Poor,
}

/// Correction parameters for all three sensors of one device.
///
/// A missing section means the respective sensor is passed through unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationProfile<T> {
    /// When the calibration was recorded, as an ISO-8601 string.
    pub timestamp: Option<String>,
    /// The declared coordinate system of the calibration values.
    pub coordinate_system: Option<String>,
    pub accelerometer: Option<AccelerometerCalibration<T>>,
    pub gyroscope: Option<GyroscopeCalibration<T>>,
    pub magnetometer: Option<MagnetometerCalibration<T>>,
    /// Diagnostic findings of the calibration run; informational only.
    pub quality_issues: Vec<String>,
}

impl<T> CalibrationProfile<T> {
    /// A profile without any correction sections.
    pub const fn identity() -> Self {
        Self {
            timestamp: None,
            coordinate_system: None,
            accelerometer: None,
            gyroscope: None,
            magnetometer: None,
            quality_issues: Vec::new(),
        }
    }

    /// Grades the calibration by the number of reported quality issues.
    pub fn quality(&self) -> CalibrationQuality {
        match self.quality_issues.len() {
            0 => CalibrationQuality::Excellent,
            1..=3 => CalibrationQuality::Good,
            _ => CalibrationQuality::Poor,
        }
    }

    /// Determines whether the declared coordinate system is the expected raw sensor frame.
    ///
    /// A profile without a declaration does not qualify.
    pub fn has_expected_coordinate_system(&self) -> bool {
        self.coordinate_system.as_deref() == Some(RAW_SENSOR_COORDINATES)
    }
}

impl<T> CalibrationProfile<T>
where
    T: Real,
{
    /// Ensures all correction values are finite.
    pub fn validate(&self) -> Result<(), Error> {
        fn check<T: Real>(
            values: &[T; 3],
            sensor: &'static str,
            field: &'static str,
        ) -> Result<(), Error> {
            if values.iter().all(|v| v.is_finite()) {
                Ok(())
            } else {
                Err(Error::NonFinite { sensor, field })
            }
        }

        if let Some(accelerometer) = &self.accelerometer {
            check(&accelerometer.bias, "accelerometer", "bias_raw")?;
            check(&accelerometer.scale, "accelerometer", "scale_factors")?;
        }
        if let Some(gyroscope) = &self.gyroscope {
            check(&gyroscope.bias, "gyroscope", "bias_raw")?;
        }
        if let Some(magnetometer) = &self.magnetometer {
            check(
                &magnetometer.hard_iron_offset,
                "magnetometer",
                "hard_iron_offset_raw",
            )?;
            check(
                &magnetometer.soft_iron_scale,
                "magnetometer",
                "soft_iron_scale_raw",
            )?;
        }
        Ok(())
    }
}

impl<T> Default for CalibrationProfile<T> {
    fn default() -> Self {
        Self::identity()
    }
}
