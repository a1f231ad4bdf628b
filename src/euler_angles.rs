use crate::num::{degrees, NormalizeAngle, Real};
use core::fmt::{Debug, Formatter};
use nalgebra::Matrix3;
use uniform_array_derive::UniformArray;

/// Roll, pitch and yaw angles of the body with respect to the NED frame.
///
/// The rotation sequence is yaw (ψ, about down), then pitch (θ, about the
/// new east axis), then roll (φ, about the new north axis).
#[derive(UniformArray, Copy, Clone, PartialEq)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct EulerAngles<T> {
    /// The roll angle, in radians.
    pub roll_phi: T,
    /// The pitch angle, in radians.
    pub pitch_theta: T,
    /// The yaw angle, in radians.
    pub yaw_psi: T,
}

impl<T> EulerAngles<T> {
    /// Initializes a new [`EulerAngles`] instance.
    #[inline(always)]
    pub const fn new(roll_phi: T, pitch_theta: T, yaw_psi: T) -> Self {
        Self {
            roll_phi,
            pitch_theta,
            yaw_psi,
        }
    }
}

impl<T> EulerAngles<T>
where
    T: Real,
{
    /// Wraps all three angles into `(-π, π]`.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.roll_phi.normalize_angle(),
            self.pitch_theta.normalize_angle(),
            self.yaw_psi.normalize_angle(),
        )
    }

    /// Converts the angles from radians to degrees.
    pub fn to_degrees(&self) -> Self {
        Self::new(
            degrees(self.roll_phi),
            degrees(self.pitch_theta),
            degrees(self.yaw_psi),
        )
    }

    /// Resolves the flipped representation that appears after large rotations.
    ///
    /// The angles `(φ, θ, ψ)` and `(φ + π, π − θ, ψ + π)` describe the same
    /// rotation. When both roll and pitch lie within `margin` radians of ±π,
    /// the latter (normalized) representation is returned, bringing roll and
    /// pitch back near zero. Returns `None` when no remapping applies.
    pub fn unflipped(&self, margin: T) -> Option<Self> {
        let threshold = T::pi() - margin;
        if self.roll_phi.abs() < threshold || self.pitch_theta.abs() < threshold {
            return None;
        }

        Some(Self::new(
            (self.roll_phi + T::pi()).normalize_angle(),
            (T::pi() - self.pitch_theta).normalize_angle(),
            (self.yaw_psi + T::pi()).normalize_angle(),
        ))
    }

    /// Builds the body-to-NED rotation matrix of these angles.
    pub fn rotation_matrix(&self) -> Matrix3<T> {
        let (sr, cr) = self.roll_phi.sin_cos();
        let (sp, cp) = self.pitch_theta.sin_cos();
        let (sy, cy) = self.yaw_psi.sin_cos();

        Matrix3::new(
            cp * cy,
            sr * sp * cy - cr * sy,
            cr * sp * cy + sr * sy,
            cp * sy,
            sr * sp * sy + cr * cy,
            cr * sp * sy - sr * cy,
            -sp,
            sr * cp,
            cr * cp,
        )
    }
}

impl<T> Default for EulerAngles<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Debug for EulerAngles<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("EulerAngles")
            .field(&self.roll_phi)
            .field(&self.pitch_theta)
            .field(&self.yaw_psi)
            .finish()
    }
}
