use crate::num::{degrees, Real};
use core::fmt::{Debug, Formatter};
use uniform_array_derive::UniformArray;

/// The estimated gyroscope bias (drift) terms.
#[derive(UniformArray, Copy, Clone, PartialEq)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct GyroscopeBias<T> {
    /// The angular rate bias around the x-axis, in radians per second.
    pub omega_x: T,
    /// The angular rate bias around the y-axis, in radians per second.
    pub omega_y: T,
    /// The angular rate bias around the z-axis, in radians per second.
    pub omega_z: T,
}

impl<T> GyroscopeBias<T> {
    /// Initializes a new [`GyroscopeBias`] instance.
    #[inline(always)]
    pub const fn new(omega_x: T, omega_y: T, omega_z: T) -> Self {
        Self {
            omega_x,
            omega_y,
            omega_z,
        }
    }

    /// Converts the bias terms from radians per second to degrees per second.
    pub fn to_degrees(&self) -> Self
    where
        T: Real,
    {
        Self::new(
            degrees(self.omega_x),
            degrees(self.omega_y),
            degrees(self.omega_z),
        )
    }
}

impl<T> Default for GyroscopeBias<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Debug for GyroscopeBias<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("GyroscopeBias")
            .field(&self.omega_x)
            .field(&self.omega_y)
            .field(&self.omega_z)
            .finish()
    }
}
