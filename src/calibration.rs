//! Per-sensor calibration data and the bias/scale corrections derived from it.

mod corrector;
#[cfg(feature = "std")]
mod loader;
mod profile;

pub use profile::{
    AccelerometerCalibration, CalibrationProfile, CalibrationQuality, GyroscopeCalibration,
    MagnetometerCalibration, RAW_SENSOR_COORDINATES,
};
