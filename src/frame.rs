//! Fixed device-frame to North-East-Down (NED) transforms.
//!
//! Each sensor die inside a package may be wired with its own axis
//! convention, so every sensor type carries its own [`FrameTransform`].
//! The transforms are plain data: a [`MountingTable`] can be replaced per
//! deployment (e.g. loaded from TOML) without touching the estimator.

use crate::error::Error;
use crate::{AccelerometerReading, GyroscopeReading, MagnetometerReading};
use alloc::string::{String, ToString};
use core::fmt::{Display, Formatter};
use core::ops::Neg;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A device axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline(always)]
    const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// The sign applied to a device axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

/// Selects one signed device axis as the source of a NED axis.
///
/// Serialized in the compact form `"+x"`, `"-y"`, ... .
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AxisMapping {
    pub sign: Sign,
    pub axis: Axis,
}

impl AxisMapping {
    pub const PLUS_X: Self = Self::new(Sign::Positive, Axis::X);
    pub const MINUS_X: Self = Self::new(Sign::Negative, Axis::X);
    pub const PLUS_Y: Self = Self::new(Sign::Positive, Axis::Y);
    pub const MINUS_Y: Self = Self::new(Sign::Negative, Axis::Y);
    pub const PLUS_Z: Self = Self::new(Sign::Positive, Axis::Z);
    pub const MINUS_Z: Self = Self::new(Sign::Negative, Axis::Z);

    /// Initializes a new [`AxisMapping`] instance.
    #[inline(always)]
    pub const fn new(sign: Sign, axis: Axis) -> Self {
        Self { sign, axis }
    }

    /// Picks the mapped component out of a device-frame vector.
    #[inline]
    pub fn select<T>(&self, device: &[T; 3]) -> T
    where
        T: Copy + Neg<Output = T>,
    {
        let value = device[self.axis.index()];
        match self.sign {
            Sign::Positive => value,
            Sign::Negative => -value,
        }
    }
}

impl Display for AxisMapping {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let sign = match self.sign {
            Sign::Positive => '+',
            Sign::Negative => '-',
        };
        let axis = match self.axis {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        };
        write!(f, "{sign}{axis}")
    }
}

impl FromStr for AxisMapping {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAxis(s.to_string());
        let (sign, axis) = match s.trim().as_bytes() {
            [b'+', axis] => (Sign::Positive, axis),
            [b'-', axis] => (Sign::Negative, axis),
            [axis] => (Sign::Positive, axis),
            _ => return Err(invalid()),
        };

        let axis = match axis.to_ascii_lowercase() {
            b'x' => Axis::X,
            b'y' => Axis::Y,
            b'z' => Axis::Z,
            _ => return Err(invalid()),
        };

        Ok(Self::new(sign, axis))
    }
}

impl TryFrom<String> for AxisMapping {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AxisMapping> for String {
    fn from(value: AxisMapping) -> Self {
        value.to_string()
    }
}

/// Maps a device-frame vector into the NED frame, one signed device axis per NED axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTransform {
    /// The source of the north (x) component.
    pub north: AxisMapping,
    /// The source of the east (y) component.
    pub east: AxisMapping,
    /// The source of the down (z) component.
    pub down: AxisMapping,
}

impl FrameTransform {
    /// The device frame already is NED.
    pub const IDENTITY: Self = Self::new(
        AxisMapping::PLUS_X,
        AxisMapping::PLUS_Y,
        AxisMapping::PLUS_Z,
    );

    /// Initializes a new [`FrameTransform`] instance.
    #[inline(always)]
    pub const fn new(north: AxisMapping, east: AxisMapping, down: AxisMapping) -> Self {
        Self { north, east, down }
    }

    /// Transforms a device-frame vector into the NED frame.
    #[inline]
    pub fn apply<T>(&self, device: [T; 3]) -> [T; 3]
    where
        T: Copy + Neg<Output = T>,
    {
        [
            self.north.select(&device),
            self.east.select(&device),
            self.down.select(&device),
        ]
    }

    /// Determines whether every device axis is used exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut used = [false; 3];
        for mapping in [self.north, self.east, self.down] {
            let index = mapping.axis.index();
            if used[index] {
                return false;
            }
            used[index] = true;
        }
        true
    }
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The per-sensor frame transforms of one physical mounting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountingTable {
    pub accelerometer: FrameTransform,
    pub gyroscope: FrameTransform,
    pub magnetometer: FrameTransform,
}

impl MountingTable {
    /// The empirically derived mounting of the ICM-20948 breakout.
    ///
    /// | Sensor        | North | East | Down |
    /// |---------------|-------|------|------|
    /// | Accelerometer | +X    | +Y   | −Z   |
    /// | Gyroscope     | −X    | −Y   | +Z   |
    /// | Magnetometer  | −X    | −Y   | −Z   |
    pub const ICM20948: Self = Self {
        accelerometer: FrameTransform::new(
            AxisMapping::PLUS_X,
            AxisMapping::PLUS_Y,
            AxisMapping::MINUS_Z,
        ),
        gyroscope: FrameTransform::new(
            AxisMapping::MINUS_X,
            AxisMapping::MINUS_Y,
            AxisMapping::PLUS_Z,
        ),
        magnetometer: FrameTransform::new(
            AxisMapping::MINUS_X,
            AxisMapping::MINUS_Y,
            AxisMapping::MINUS_Z,
        ),
    };

    /// Ensures every transform is an axis permutation.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.accelerometer.is_permutation() {
            return Err(Error::InvalidMounting("accelerometer"));
        }
        if !self.gyroscope.is_permutation() {
            return Err(Error::InvalidMounting("gyroscope"));
        }
        if !self.magnetometer.is_permutation() {
            return Err(Error::InvalidMounting("magnetometer"));
        }
        Ok(())
    }

    /// Parses and validates a mounting table from TOML.
    ///
    /// ```toml
    /// [accelerometer]
    /// north = "+x"
    /// east = "+y"
    /// down = "-z"
    /// ```
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn from_toml_str(toml: &str) -> Result<Self, Error> {
        let table: Self = toml::from_str(toml)?;
        table.validate()?;
        Ok(table)
    }

    /// Transforms an accelerometer reading into the NED frame.
    pub fn accelerometer_to_ned<T>(
        &self,
        reading: &AccelerometerReading<T>,
    ) -> AccelerometerReading<T>
    where
        T: Copy + Neg<Output = T>,
    {
        self.accelerometer.apply((*reading).into()).into()
    }

    /// Transforms a gyroscope reading into the NED frame.
    pub fn gyroscope_to_ned<T>(&self, reading: &GyroscopeReading<T>) -> GyroscopeReading<T>
    where
        T: Copy + Neg<Output = T>,
    {
        self.gyroscope.apply((*reading).into()).into()
    }

    /// Transforms a magnetometer reading into the NED frame.
    pub fn magnetometer_to_ned<T>(&self, reading: &MagnetometerReading<T>) -> MagnetometerReading<T>
    where
        T: Copy + Neg<Output = T>,
    {
        self.magnetometer.apply((*reading).into()).into()
    }
}

impl Default for MountingTable {
    fn default() -> Self {
        Self::ICM20948
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icm20948_accelerometer() {
        let table = MountingTable::ICM20948;
        let ned = table.accelerometer_to_ned(&AccelerometerReading::new(1.0, 2.0, 3.0));
        assert_eq!(ned, AccelerometerReading::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn test_icm20948_gyroscope() {
        let table = MountingTable::ICM20948;
        let ned = table.gyroscope_to_ned(&GyroscopeReading::new(1.0, 2.0, 3.0));
        assert_eq!(ned, GyroscopeReading::new(-1.0, -2.0, 3.0));
    }

    #[test]
    fn test_icm20948_magnetometer() {
        let table = MountingTable::ICM20948;
        let ned = table.magnetometer_to_ned(&MagnetometerReading::new(1.0, 2.0, 3.0));
        assert_eq!(ned, MagnetometerReading::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_axis_swap() {
        let transform = FrameTransform::new(
            AxisMapping::PLUS_Y,
            AxisMapping::MINUS_X,
            AxisMapping::PLUS_Z,
        );
        assert_eq!(transform.apply([1, 2, 3]), [2, -1, 3]);
        assert!(transform.is_permutation());
    }

    #[test]
    fn test_duplicate_axis_is_rejected() {
        let mut table = MountingTable::ICM20948;
        table.gyroscope.east = AxisMapping::PLUS_X;
        assert!(!table.gyroscope.is_permutation());
        assert!(matches!(
            table.validate(),
            Err(Error::InvalidMounting("gyroscope"))
        ));
    }

    #[test]
    fn test_parse_axis_mapping() {
        assert_eq!("+x".parse::<AxisMapping>().unwrap(), AxisMapping::PLUS_X);
        assert_eq!("-Y".parse::<AxisMapping>().unwrap(), AxisMapping::MINUS_Y);
        assert_eq!(" z ".parse::<AxisMapping>().unwrap(), AxisMapping::PLUS_Z);
        assert!("+w".parse::<AxisMapping>().is_err());
        assert!("+-x".parse::<AxisMapping>().is_err());
        assert_eq!(AxisMapping::MINUS_Z.to_string(), "-z");
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_from_toml() {
        let toml = r#"
            [accelerometer]
            north = "+x"
            east = "+y"
            down = "-z"

            [gyroscope]
            north = "-x"
            east = "-y"
            down = "+z"

            [magnetometer]
            north = "-x"
            east = "-y"
            down = "-z"
        "#;

        let table = MountingTable::from_toml_str(toml).unwrap();
        assert_eq!(table, MountingTable::ICM20948);
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_from_toml_rejects_bad_axis() {
        let toml = r#"
            [accelerometer]
            north = "+x"
            east = "+x"
            down = "-z"

            [gyroscope]
            north = "-x"
            east = "-y"
            down = "+w"

            [magnetometer]
            north = "-x"
            east = "-y"
            down = "-z"
        "#;

        assert!(MountingTable::from_toml_str(toml).is_err());
    }
}
