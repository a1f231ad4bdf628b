//! One sampling tick, from a device sample to an orientation report.

use crate::calibration::CalibrationProfile;
use crate::device::{ImuDevice, PhysicalSample};
use crate::ekf::{EstimatorConfig, OrientationEstimator, OrientationReport};
use crate::frame::MountingTable;
use crate::num::Real;
use num_traits::AsPrimitive;

/// Runs calibration, frame transformation and the estimator for each sample.
///
/// The first sample initializes the estimator; every later sample runs a
/// prediction followed by the accelerometer and (if available) magnetometer
/// updates.
#[derive(Clone, Debug)]
pub struct OrientationPipeline<T> {
    calibration: CalibrationProfile<T>,
    mounting: MountingTable,
    estimator: OrientationEstimator<T>,
    unwrap_margin: Option<T>,
}

impl<T> OrientationPipeline<T>
where
    T: Real,
{
    /// Initializes a new [`OrientationPipeline`] instance.
    pub fn new(
        calibration: CalibrationProfile<T>,
        mounting: MountingTable,
        config: EstimatorConfig<T>,
    ) -> Self {
        Self {
            calibration,
            mounting,
            estimator: OrientationEstimator::new(config),
            unwrap_margin: None,
        }
    }

    /// Unwraps flipped roll/pitch representations after every tick.
    ///
    /// See [`OrientationEstimator::unwrap_angles`].
    pub fn with_unwrap_margin(mut self, margin: T) -> Self {
        self.unwrap_margin = Some(margin);
        self
    }

    /// The orientation filter fed by this pipeline.
    pub fn estimator(&self) -> &OrientationEstimator<T> {
        &self.estimator
    }

    /// The calibration applied to every sample.
    pub fn calibration(&self) -> &CalibrationProfile<T> {
        &self.calibration
    }

    /// The sensor-to-NED axis table.
    pub fn mounting(&self) -> &MountingTable {
        &self.mounting
    }

    /// Corrects a device-frame sample and transforms it into the NED frame.
    pub fn to_ned(&self, sample: &PhysicalSample<T>) -> PhysicalSample<T> {
        let accelerometer = self.calibration.correct_accelerometer(&sample.accelerometer);
        let gyroscope = self.calibration.correct_gyroscope(&sample.gyroscope);
        let magnetometer = sample
            .magnetometer
            .map(|m| self.calibration.correct_magnetometer(&m));

        PhysicalSample {
            accelerometer: self.mounting.accelerometer_to_ned(&accelerometer),
            gyroscope: self.mounting.gyroscope_to_ned(&gyroscope),
            magnetometer: magnetometer.map(|m| self.mounting.magnetometer_to_ned(&m)),
        }
    }

    /// Feeds one device-frame sample taken `delta_t` seconds after the previous one.
    ///
    /// Returns `None` while the estimator cannot be initialized yet.
    pub fn process(
        &mut self,
        sample: &PhysicalSample<T>,
        delta_t: T,
    ) -> Option<OrientationReport<T>> {
        let ned = self.to_ned(sample);

        if !self.estimator.is_initialized() {
            self.estimator
                .initialize(&ned.accelerometer, ned.magnetometer.as_ref())?;
            return Some(self.estimator.report());
        }

        self.estimator.predict(&ned.gyroscope.to_radians(), delta_t);
        self.estimator.update_accelerometer(&ned.accelerometer);
        if let Some(magnetometer) = &ned.magnetometer {
            self.estimator.update_magnetometer(magnetometer);
        }
        if let Some(margin) = self.unwrap_margin {
            self.estimator.unwrap_angles(margin);
        }

        Some(self.estimator.report())
    }

    /// Reads one sample from `device` and processes it.
    pub fn tick<D>(
        &mut self,
        device: &mut D,
        delta_t: T,
    ) -> Result<Option<OrientationReport<T>>, D::Error>
    where
        D: ImuDevice<T>,
        i16: AsPrimitive<T>,
    {
        let sample = device.read_sample()?.to_physical(&device.scales());
        Ok(self.process(&sample, delta_t))
    }
}
