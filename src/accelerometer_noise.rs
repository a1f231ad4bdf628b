use crate::num::Real;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Per-axis accelerometer measurement noise variances, in (m/s²)².
///
/// These form the diagonal of the accelerometer measurement noise
/// covariance matrix R.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct AccelerometerNoise<T> {
    /// The noise variance along the x-axis.
    pub x: T,
    /// The noise variance along the y-axis.
    pub y: T,
    /// The noise variance along the z-axis.
    pub z: T,
}

impl<T> AccelerometerNoise<T> {
    /// Initializes a new [`AccelerometerNoise`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Initializes a new [`AccelerometerNoise`] instance with the same variance on all axes.
    #[inline(always)]
    pub const fn uniform(variance: T) -> Self
    where
        T: Copy,
    {
        Self::new(variance, variance, variance)
    }

    /// Builds the 3×3 measurement noise covariance matrix.
    pub fn covariance(&self) -> Matrix3<T>
    where
        T: Real,
    {
        Matrix3::from_diagonal(&nalgebra::Vector3::new(self.x, self.y, self.z))
    }
}
