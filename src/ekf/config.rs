use crate::error::Error;
use crate::num::{radians, Real};
use crate::AccelerometerNoise;
use serde::{Deserialize, Serialize};

/// Process noise spectral densities, added as `Q·dt` on every prediction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Real + Deserialize<'de>"))]
pub struct ProcessNoise<T> {
    /// Random-walk variance rate of roll, pitch and yaw, in rad²/s.
    pub angle: T,
    /// Random-walk variance rate of the gyroscope bias, in (rad/s)²/s.
    pub bias: T,
}

impl<T> Default for ProcessNoise<T>
where
    T: Real,
{
    fn default() -> Self {
        Self {
            angle: nalgebra::convert::<f64, T>(1e-6),
            bias: nalgebra::convert::<f64, T>(1e-6),
        }
    }
}

/// Tuning and environment parameters of the [`OrientationEstimator`](crate::ekf::OrientationEstimator).
///
/// Every field has a default, so a configuration file only needs to list
/// the values it changes:
///
/// ```toml
/// gravity = 9.80665
/// heading_noise = 0.5
///
/// [process_noise]
/// bias = 1e-8
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Real + Deserialize<'de>"))]
pub struct EstimatorConfig<T> {
    /// The initial variance of roll, pitch and yaw, in rad².
    pub initial_angle_variance: T,
    /// The initial variance of each gyroscope bias term, in (rad/s)².
    pub initial_bias_variance: T,
    pub process_noise: ProcessNoise<T>,
    /// The gravity measurement noise variances, in (m/s²)².
    pub accelerometer_noise: AccelerometerNoise<T>,
    /// The variance of the magnetic heading observation, in rad².
    pub heading_noise: T,
    /// The local gravity magnitude, in m/s².
    pub gravity: T,
    /// The magnetic declination added to magnetic headings, in radians.
    pub declination: T,
    /// The minimum field strength for a magnetometer sample to be used, in µT.
    pub min_magnetic_field: T,
    /// How close pitch may come to ±90° before a warning is emitted, in radians.
    pub gimbal_lock_tolerance: T,
}

impl<T> Default for EstimatorConfig<T>
where
    T: Real,
{
    fn default() -> Self {
        Self {
            initial_angle_variance: nalgebra::convert::<f64, T>(0.01),
            initial_bias_variance: nalgebra::convert::<f64, T>(1e-4),
            process_noise: ProcessNoise::default(),
            accelerometer_noise: AccelerometerNoise::uniform(nalgebra::convert::<f64, T>(0.01)),
            heading_noise: nalgebra::convert::<f64, T>(25.0),
            gravity: nalgebra::convert::<f64, T>(9.81),
            declination: T::zero(),
            min_magnetic_field: T::one(),
            gimbal_lock_tolerance: radians(T::one()),
        }
    }
}

impl<T> EstimatorConfig<T>
where
    T: Real,
{
    /// Sets the magnetic declination from a value in degrees.
    pub fn with_declination_degrees(mut self, declination: T) -> Self {
        self.declination = radians(declination);
        self
    }

    /// Ensures all values are finite and within their valid ranges.
    pub fn validate(&self) -> Result<(), Error> {
        let positive = |value: T| value.is_finite() && value > T::zero();
        let non_negative = |value: T| value.is_finite() && value >= T::zero();

        if !positive(self.initial_angle_variance) || !positive(self.initial_bias_variance) {
            return Err(Error::InvalidConfig(
                "initial variances must be positive and finite",
            ));
        }
        if !non_negative(self.process_noise.angle) || !non_negative(self.process_noise.bias) {
            return Err(Error::InvalidConfig(
                "process noise must be non-negative and finite",
            ));
        }
        let r = &self.accelerometer_noise;
        if !positive(r.x) || !positive(r.y) || !positive(r.z) {
            return Err(Error::InvalidConfig(
                "accelerometer noise must be positive and finite",
            ));
        }
        if !positive(self.heading_noise) {
            return Err(Error::InvalidConfig(
                "heading noise must be positive and finite",
            ));
        }
        if !positive(self.gravity) {
            return Err(Error::InvalidConfig("gravity must be positive and finite"));
        }
        if !self.declination.is_finite() {
            return Err(Error::InvalidConfig("declination must be finite"));
        }
        if !non_negative(self.min_magnetic_field) || !non_negative(self.gimbal_lock_tolerance) {
            return Err(Error::InvalidConfig(
                "thresholds must be non-negative and finite",
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML; missing keys keep their defaults.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn from_toml_str(toml: &str) -> Result<Self, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }
}
