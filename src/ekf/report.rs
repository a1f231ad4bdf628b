use crate::{EulerAngles, GyroscopeBias};

/// A snapshot of the estimator output in display units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrientationReport<T> {
    /// Roll, pitch and yaw, in degrees.
    pub angles: EulerAngles<T>,
    /// The estimated gyroscope bias, in degrees per second.
    pub bias: GyroscopeBias<T>,
    /// The 1σ uncertainty of roll, pitch and yaw, in degrees.
    pub angle_uncertainty: EulerAngles<T>,
    /// The 1σ uncertainty of the gyroscope bias, in degrees per second.
    pub bias_uncertainty: GyroscopeBias<T>,
}
