//! The contract between a sensor driver and the orientation pipeline.
//!
//! Drivers only deliver raw counts and their scale constants; everything
//! from unit conversion onwards happens in this crate.

use crate::num::Real;
use crate::{AccelerometerReading, GyroscopeReading, MagnetometerReading};
use num_traits::AsPrimitive;

/// A source of raw 9-axis samples, e.g. an I²C driver.
pub trait ImuDevice<T> {
    type Error;

    /// Reads one sample of all three sensors. May block on bus I/O.
    fn read_sample(&mut self) -> Result<RawSample, Self::Error>;

    /// Returns the physical units per count of each sensor.
    fn scales(&self) -> SensorScales<T>;
}

/// Raw counts of one sampling tick, in the device frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSample {
    pub accelerometer: [i16; 3],
    pub gyroscope: [i16; 3],
    pub magnetometer: [i16; 3],
    /// `false` if the magnetometer reported stale or overflowed data.
    pub magnetometer_valid: bool,
}

/// Physical units per count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SensorScales<T> {
    /// g per count.
    pub accelerometer: T,
    /// °/s per count.
    pub gyroscope: T,
    /// µT per count.
    pub magnetometer: T,
}

impl<T> SensorScales<T>
where
    T: Real,
{
    /// ICM-20948 at ±2 g and ±250 °/s, with its AK09916 magnetometer.
    pub fn icm20948() -> Self {
        Self {
            accelerometer: nalgebra::convert::<f64, T>(2.0 / 32768.0),
            gyroscope: nalgebra::convert::<f64, T>(250.0 / 32768.0),
            magnetometer: nalgebra::convert::<f64, T>(4912.0 / 32752.0),
        }
    }
}

/// One sample in physical units, still in the device frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicalSample<T> {
    /// Specific force, in g.
    pub accelerometer: AccelerometerReading<T>,
    /// Angular rate, in °/s.
    pub gyroscope: GyroscopeReading<T>,
    /// Magnetic field, in µT; `None` if the reading is not usable.
    pub magnetometer: Option<MagnetometerReading<T>>,
}

#[inline]
fn scaled<T>(counts: [i16; 3], scale: T) -> [T; 3]
where
    T: Real,
    i16: AsPrimitive<T>,
{
    counts.map(|count| AsPrimitive::<T>::as_(count) * scale)
}

impl RawSample {
    /// Converts raw counts into physical units.
    pub fn to_physical<T>(&self, scales: &SensorScales<T>) -> PhysicalSample<T>
    where
        T: Real,
        i16: AsPrimitive<T>,
    {
        PhysicalSample {
            accelerometer: scaled(self.accelerometer, scales.accelerometer).into(),
            gyroscope: scaled(self.gyroscope, scales.gyroscope).into(),
            magnetometer: self
                .magnetometer_valid
                .then(|| scaled(self.magnetometer, scales.magnetometer).into()),
        }
    }
}
