use crate::num::Real;
use core::fmt::{Debug, Formatter};

/// A magnetic field reading, in microtesla (µT).
///
/// Stale or overflowed device readings are represented by the absence of a
/// reading (`Option::None`) rather than by a flag on this type.
#[derive(Copy, PartialEq)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct MagnetometerReading<T> {
    /// The magnetic field strength along the x-axis, in µT.
    pub x: T,
    /// The magnetic field strength along the y-axis, in µT.
    pub y: T,
    /// The magnetic field strength along the z-axis, in µT.
    pub z: T,
}

impl<T> MagnetometerReading<T> {
    /// Initializes a new [`MagnetometerReading`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Returns the length of the [`MagnetometerReading`] vector.
    #[inline(always)]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        3
    }

    /// Calculates the field strength, i.e. the vector norm.
    #[inline]
    pub fn norm(&self) -> T
    where
        T: Real,
    {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Calculates the strength of the field's x/y components.
    #[inline]
    pub fn horizontal_norm(&self) -> T
    where
        T: Real,
    {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl<T> Default for MagnetometerReading<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Clone for MagnetometerReading<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
        }
    }
}

impl<T> Debug for MagnetometerReading<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("MagnetometerReading")
            .field(&self.x)
            .field(&self.y)
            .field(&self.z)
            .finish()
    }
}

impl<T> From<[T; 3]> for MagnetometerReading<T> {
    #[inline]
    fn from([x, y, z]: [T; 3]) -> Self {
        Self { x, y, z }
    }
}

impl<T> From<MagnetometerReading<T>> for [T; 3] {
    #[inline]
    fn from(value: MagnetometerReading<T>) -> Self {
        [value.x, value.y, value.z]
    }
}

impl<T> core::ops::Index<usize> for MagnetometerReading<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Index out of bounds"),
        }
    }
}
