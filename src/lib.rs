//! Orientation estimation for MARG (Magnetic, Angular Rate, and Gravity) sensors.
//!
//! Raw samples pass through three stages per tick:
//!
//! 1. [`calibration`] removes sensor biases and scale errors,
//! 2. [`frame`] maps each sensor's device axes into the North-East-Down frame,
//! 3. [`ekf`] fuses the readings into roll, pitch, yaw and a gyroscope bias estimate.
//!
//! [`OrientationPipeline`] wires these stages together for a [`device::ImuDevice`].

// Enable no_std mode.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod accelerometer_noise;
mod accelerometer_reading;
pub mod calibration;
pub mod device;
pub mod ekf;
mod error;
mod euler_angles;
pub mod frame;
mod gyroscope_bias;
mod gyroscope_reading;
mod magnetometer_reading;
mod num;
mod pipeline;

pub use crate::accelerometer_noise::AccelerometerNoise;
pub use crate::accelerometer_reading::AccelerometerReading;
pub use crate::calibration::CalibrationProfile;
pub use crate::ekf::{EstimatorConfig, OrientationEstimator, OrientationReport};
pub use crate::error::Error;
pub use crate::euler_angles::EulerAngles;
pub use crate::frame::MountingTable;
pub use crate::gyroscope_bias::GyroscopeBias;
pub use crate::gyroscope_reading::GyroscopeReading;
pub use crate::magnetometer_reading::MagnetometerReading;
pub use crate::num::{degrees, radians, DetectGimbalLock, NormalizeAngle, Real};
pub use crate::pipeline::OrientationPipeline;
