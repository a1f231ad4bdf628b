use core::fmt::Debug;
use nalgebra::RealField;

/// The scalar type the estimator operates on, i.e. `f32` or `f64`.
pub trait Real: RealField + Copy + Debug {}

impl<T> Real for T where T: RealField + Copy + Debug {}

/// Wraps angles into the canonical range.
pub trait NormalizeAngle<T = Self> {
    type Output;

    /// Wraps the angle (in radians) into the half-open range `(-π, π]`.
    ///
    /// The reduction uses the floating-point remainder, which is exact, so
    /// the result stays in range for any finite input.
    fn normalize_angle(self) -> Self::Output;
}

impl<T> NormalizeAngle<T> for T
where
    T: Real,
{
    type Output = T;

    #[inline]
    fn normalize_angle(self) -> Self::Output {
        let pi = T::pi();
        let two_pi = T::two_pi();

        // Remainder is in (-2π, 2π) and carries the sign of the input.
        let mut angle = self % two_pi;
        if angle <= -pi {
            angle += two_pi;
        } else if angle > pi {
            angle -= two_pi;
        }
        angle
    }
}

pub trait DetectGimbalLock<T> {
    /// Determines whether a Gimbal Lock situation is about to occur
    /// because the angle (provided in radians) is close to π/2 or -π/2.
    ///
    /// ## Arguments
    /// * `tolerance` - The tolerance in radians, e.g. 0.01 rad.
    fn close_to_zenith_or_nadir(&self, tolerance: T) -> bool;
}

impl<T> DetectGimbalLock<T> for T
where
    T: Real,
{
    #[inline]
    fn close_to_zenith_or_nadir(&self, tolerance: T) -> bool {
        let zenith = T::frac_pi_2();
        let nadir = -zenith;
        (*self - zenith).abs() <= tolerance || (*self - nadir).abs() <= tolerance
    }
}

/// Converts an angle from radians to degrees.
#[inline]
pub fn degrees<T: Real>(radians: T) -> T {
    radians * nalgebra::convert::<f64, T>(180.0) / T::pi()
}

/// Converts an angle from degrees to radians.
#[inline]
pub fn radians<T: Real>(degrees: T) -> T {
    degrees * T::pi() / nalgebra::convert::<f64, T>(180.0)
}
