use crate::num::{radians, Real};

/// An angular rate reading.
///
/// Device-side readings are expressed in degrees per second; the estimator
/// consumes radians per second (see [`GyroscopeReading::to_radians`]).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct GyroscopeReading<T> {
    /// The angular rate around the x-axis.
    pub omega_x: T,
    /// The angular rate around the y-axis.
    pub omega_y: T,
    /// The angular rate around the z-axis.
    pub omega_z: T,
}

impl<T> GyroscopeReading<T> {
    /// Initializes a new [`GyroscopeReading`] instance.
    #[inline(always)]
    pub const fn new(omega_x: T, omega_y: T, omega_z: T) -> Self {
        Self {
            omega_x,
            omega_y,
            omega_z,
        }
    }

    /// Returns the length of the [`GyroscopeReading`] vector.
    #[inline(always)]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        3
    }

    /// Converts a reading in degrees per second into radians per second.
    pub fn to_radians(&self) -> Self
    where
        T: Real,
    {
        Self::new(
            radians(self.omega_x),
            radians(self.omega_y),
            radians(self.omega_z),
        )
    }
}

impl<T> From<[T; 3]> for GyroscopeReading<T> {
    #[inline]
    fn from([omega_x, omega_y, omega_z]: [T; 3]) -> Self {
        Self::new(omega_x, omega_y, omega_z)
    }
}

impl<T> From<GyroscopeReading<T>> for [T; 3] {
    #[inline]
    fn from(value: GyroscopeReading<T>) -> Self {
        [value.omega_x, value.omega_y, value.omega_z]
    }
}

impl<T> core::ops::Index<usize> for GyroscopeReading<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.omega_x,
            1 => &self.omega_y,
            2 => &self.omega_z,
            _ => panic!("Index out of bounds"),
        }
    }
}
