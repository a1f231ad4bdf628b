//! An Extended Kalman Filter estimating Euler angles and gyroscope bias.
//!
//! The state is `[roll, pitch, yaw, bias_x, bias_y, bias_z]`. Gyroscope
//! rates drive the prediction through the Euler-angle kinematics; gravity
//! (accelerometer) corrects roll and pitch, and a tilt-free magnetic heading
//! corrects yaw. All covariance updates use the Joseph form.
//!
//! Like every Euler-angle parameterization, the model is singular at ±90°
//! pitch. The singularity is reported, not masked.

mod config;
mod filter;
mod report;
mod types;

pub use config::{EstimatorConfig, ProcessNoise};
pub use filter::OrientationEstimator;
pub use report::OrientationReport;
pub use types::{StateCovariance, StateVector, STATES};
