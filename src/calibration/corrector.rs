use crate::calibration::{
    AccelerometerCalibration, CalibrationProfile, GyroscopeCalibration, MagnetometerCalibration,
};
use crate::num::Real;
use crate::{AccelerometerReading, GyroscopeReading, MagnetometerReading};

#[inline]
fn offset_and_scale<T: Real>(raw: [T; 3], offset: &[T; 3], scale: &[T; 3]) -> [T; 3] {
    [
        (raw[0] - offset[0]) * scale[0],
        (raw[1] - offset[1]) * scale[1],
        (raw[2] - offset[2]) * scale[2],
    ]
}

impl<T> AccelerometerCalibration<T>
where
    T: Real,
{
    /// Removes the bias, then applies the per-axis scale.
    pub fn correct(&self, raw: &AccelerometerReading<T>) -> AccelerometerReading<T> {
        offset_and_scale((*raw).into(), &self.bias, &self.scale).into()
    }
}

impl<T> GyroscopeCalibration<T>
where
    T: Real,
{
    /// Removes the zero-rate bias.
    pub fn correct(&self, raw: &GyroscopeReading<T>) -> GyroscopeReading<T> {
        GyroscopeReading::new(
            raw.omega_x - self.bias[0],
            raw.omega_y - self.bias[1],
            raw.omega_z - self.bias[2],
        )
    }
}

impl<T> MagnetometerCalibration<T>
where
    T: Real,
{
    /// Removes the hard-iron offset, then applies the soft-iron scale.
    pub fn correct(&self, raw: &MagnetometerReading<T>) -> MagnetometerReading<T> {
        offset_and_scale((*raw).into(), &self.hard_iron_offset, &self.soft_iron_scale).into()
    }
}

impl<T> CalibrationProfile<T>
where
    T: Real,
{
    /// Corrects an accelerometer reading (in g); identity if the section is absent.
    pub fn correct_accelerometer(&self, raw: &AccelerometerReading<T>) -> AccelerometerReading<T> {
        match &self.accelerometer {
            Some(calibration) => calibration.correct(raw),
            None => *raw,
        }
    }

    /// Corrects a gyroscope reading (in °/s); identity if the section is absent.
    pub fn correct_gyroscope(&self, raw: &GyroscopeReading<T>) -> GyroscopeReading<T> {
        match &self.gyroscope {
            Some(calibration) => calibration.correct(raw),
            None => *raw,
        }
    }

    /// Corrects a magnetometer reading (in µT); identity if the section is absent.
    pub fn correct_magnetometer(&self, raw: &MagnetometerReading<T>) -> MagnetometerReading<T> {
        match &self.magnetometer {
            Some(calibration) => calibration.correct(raw),
            None => *raw,
        }
    }
}
