use crate::num::Real;
use core::fmt::{Debug, Formatter};

/// A specific-force reading, in multiples of the standard gravity (g).
#[derive(Copy, PartialEq)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct AccelerometerReading<T> {
    /// The acceleration along the x-axis, in g.
    pub x: T,
    /// The acceleration along the y-axis, in g.
    pub y: T,
    /// The acceleration along the z-axis, in g.
    pub z: T,
}

impl<T> AccelerometerReading<T> {
    /// Initializes a new [`AccelerometerReading`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Returns the length of the [`AccelerometerReading`] vector.
    #[inline(always)]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        3
    }

    /// Calculates the vector length, i.e. its norm.
    #[inline]
    pub fn norm(&self) -> T
    where
        T: Real,
    {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Determines whether all components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool
    where
        T: Real,
    {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl<T> Default for AccelerometerReading<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Clone for AccelerometerReading<T>
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

impl<T> Debug for AccelerometerReading<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("AccelerometerReading")
            .field(&self.x)
            .field(&self.y)
            .field(&self.z)
            .finish()
    }
}

impl<T> From<[T; 3]> for AccelerometerReading<T> {
    #[inline]
    fn from([x, y, z]: [T; 3]) -> Self {
        Self { x, y, z }
    }
}

impl<T> From<AccelerometerReading<T>> for [T; 3] {
    #[inline]
    fn from(value: AccelerometerReading<T>) -> Self {
        [value.x, value.y, value.z]
    }
}

impl<T> core::ops::Index<usize> for AccelerometerReading<T> {
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_len() {
        let reading = AccelerometerReading::<f32>::default();
        assert_eq!(reading.len(), 3);
    }

    #[test]
    fn test_index() {
        let reading = AccelerometerReading::<f32> {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };

        assert_eq!(reading[0], 1.0);
        assert_eq!(reading[1], 2.0);
        assert_eq!(reading[2], 3.0);
    }

    #[test]
    fn test_norm() {
        let reading = AccelerometerReading::new(0.0_f64, 3.0, 4.0);
        assert_eq!(reading.norm(), 5.0);
        assert!(reading.is_finite());
        assert!(!AccelerometerReading::new(f64::NAN, 0.0, 1.0).is_finite());
    }
}
