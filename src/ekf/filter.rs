use crate::ekf::config::EstimatorConfig;
use crate::ekf::report::OrientationReport;
use crate::ekf::types::*;
use crate::num::{degrees, DetectGimbalLock, NormalizeAngle, Real};
use crate::{
    AccelerometerReading, EulerAngles, GyroscopeBias, GyroscopeReading, MagnetometerReading,
};
use nalgebra::Vector3;
use tracing::{debug, trace, warn};

/// Estimates roll, pitch, yaw and the gyroscope bias from NED-frame readings.
///
/// The estimator starts uninitialized; the first usable accelerometer sample
/// passed to [`initialize`](Self::initialize) moves it into the running
/// state, which it never leaves. Until then, all predictions and updates are
/// ignored.
///
/// All readings are expected in the NED frame, the accelerometer in g, the
/// gyroscope in rad/s and the magnetometer in µT.
#[derive(Clone, Debug)]
pub struct OrientationEstimator<T> {
    config: EstimatorConfig<T>,
    state: StateVector<T>,
    covariance: StateCovariance<T>,
    initialized: bool,
}

impl<T> OrientationEstimator<T>
where
    T: Real,
{
    /// Initializes a new, not yet initialized [`OrientationEstimator`].
    pub fn new(config: EstimatorConfig<T>) -> Self {
        Self {
            covariance: Self::initial_covariance(&config),
            state: StateVector::zeros(),
            config,
            initialized: false,
        }
    }

    fn initial_covariance(config: &EstimatorConfig<T>) -> StateCovariance<T> {
        let angle = config.initial_angle_variance;
        let bias = config.initial_bias_variance;
        StateCovariance::from_diagonal(&StateVector::new(angle, angle, angle, bias, bias, bias))
    }

    fn process_noise(&self) -> StateCovariance<T> {
        let angle = self.config.process_noise.angle;
        let bias = self.config.process_noise.bias;
        StateCovariance::from_diagonal(&StateVector::new(angle, angle, angle, bias, bias, bias))
    }

    /// Seeds the state from a gravity and (optionally) a magnetic field sample.
    ///
    /// Roll and pitch are taken from the direction of gravity. If a magnetometer
    /// sample with a field stronger than the configured minimum is provided,
    /// the tilt-compensated heading (plus declination) becomes the initial yaw;
    /// otherwise yaw starts at zero. The bias estimate starts at zero.
    ///
    /// Returns the initial angles, or `None` if the estimator was already
    /// initialized or the accelerometer sample is unusable (non-finite or zero).
    pub fn initialize(
        &mut self,
        accelerometer: &AccelerometerReading<T>,
        magnetometer: Option<&MagnetometerReading<T>>,
    ) -> Option<EulerAngles<T>> {
        if self.initialized {
            trace!("Estimator is already initialized");
            return None;
        }

        if !accelerometer.is_finite() || accelerometer.norm() <= T::zero() {
            warn!(
                accelerometer = ?accelerometer,
                "Cannot initialize from a degenerate accelerometer sample"
            );
            return None;
        }

        let AccelerometerReading {
            x: ax,
            y: ay,
            z: az,
        } = *accelerometer;
        let roll = ay.atan2((ax * ax + az * az).sqrt());
        let pitch = (-ax).atan2((ay * ay + az * az).sqrt());

        let magnetometer = magnetometer.filter(|m| m.norm() > self.config.min_magnetic_field);
        let yaw = match magnetometer {
            Some(m) => self.tilt_compensated_heading(m, roll, pitch),
            None => T::zero(),
        };

        self.state = StateVector::zeros();
        self.state[ROLL] = roll;
        self.state[PITCH] = pitch;
        self.state[YAW] = yaw;
        self.covariance = Self::initial_covariance(&self.config);
        self.initialized = true;

        let angles = self.estimated_angles();
        debug!(
            roll = ?degrees(roll),
            pitch = ?degrees(pitch),
            yaw = ?degrees(yaw),
            magnetic_heading = magnetometer.is_some(),
            "Initialized orientation estimate"
        );
        Some(angles)
    }

    fn tilt_compensated_heading(&self, m: &MagnetometerReading<T>, roll: T, pitch: T) -> T {
        let (sr, cr) = roll.sin_cos();
        let (sp, cp) = pitch.sin_cos();

        let mx = m.x * cp + m.z * sp;
        let my = m.x * sr * sp + m.y * cr - m.z * sr * cp;
        (my.atan2(mx) + self.config.declination).normalize_angle()
    }

    /// Propagates the state and covariance by `delta_t` seconds.
    ///
    /// The gyroscope reading is the raw NED angular rate in rad/s; the
    /// estimated bias is subtracted here. Non-positive time steps are ignored.
    pub fn predict(&mut self, gyroscope: &GyroscopeReading<T>, delta_t: T) {
        if !self.initialized {
            trace!("Ignoring prediction before initialization");
            return;
        }

        if !(delta_t > T::zero()) {
            trace!(delta_t = ?delta_t, "Ignoring prediction with non-positive time step");
            return;
        }

        let bias = self.gyroscope_bias();
        let omega = GyroscopeReading::new(
            gyroscope.omega_x - bias.omega_x,
            gyroscope.omega_y - bias.omega_y,
            gyroscope.omega_z - bias.omega_z,
        );
        let rates = euler_rates(&self.estimated_angles(), &omega);

        self.state[ROLL] = (self.state[ROLL] + rates.roll_phi * delta_t).normalize_angle();
        self.state[PITCH] = (self.state[PITCH] + rates.pitch_theta * delta_t).normalize_angle();
        self.state[YAW] = (self.state[YAW] + rates.yaw_psi * delta_t).normalize_angle();

        // The transition is linearized around the propagated angles.
        let f = state_jacobian(&self.estimated_angles(), &omega, delta_t);
        self.covariance = f * self.covariance * f.transpose() + self.process_noise() * delta_t;

        let pitch = self.state[PITCH];
        if pitch.close_to_zenith_or_nadir(self.config.gimbal_lock_tolerance) {
            warn!(
                pitch = ?degrees(pitch),
                "Pitch is close to ±90°, the Euler angle kinematics are near their singularity"
            );
        }
    }

    /// Corrects roll and pitch from a gravity measurement in g.
    pub fn update_accelerometer(&mut self, accelerometer: &AccelerometerReading<T>) {
        if !self.initialized {
            trace!("Ignoring accelerometer update before initialization");
            return;
        }

        if !accelerometer.is_finite() {
            warn!(accelerometer = ?accelerometer, "Ignoring non-finite accelerometer sample");
            return;
        }

        let g = self.config.gravity;
        let (sr, cr) = self.state[ROLL].sin_cos();
        let (sp, cp) = self.state[PITCH].sin_cos();

        let expected = Vector3::new(-g * sp, g * sr * cp, g * cr * cp);
        let measured = Vector3::new(accelerometer.x, accelerometer.y, accelerometer.z) * g;
        let innovation = measured - expected;

        let mut h = AccelerometerJacobian::<T>::zeros();
        h[(0, PITCH)] = -g * cp;
        h[(1, ROLL)] = g * cr * cp;
        h[(1, PITCH)] = -g * sr * sp;
        h[(2, ROLL)] = -g * sr * cp;
        h[(2, PITCH)] = -g * cr * sp;

        let r = self.config.accelerometer_noise.covariance();
        let pht = self.covariance * h.transpose();
        let s = h * pht + r;

        let Some(s_inv) = s.try_inverse() else {
            warn!("Innovation covariance is singular, skipping accelerometer update");
            return;
        };

        let k: AccelerometerGain<T> = pht * s_inv;
        self.state += k * innovation;

        let i_kh = StateCovariance::<T>::identity() - k * h;
        self.covariance = i_kh * self.covariance * i_kh.transpose() + k * r * k.transpose();
        self.normalize_angles();
    }

    /// Corrects yaw from the magnetic heading of a magnetometer reading in µT.
    ///
    /// The sample is only used if its horizontal field strength reaches the
    /// configured minimum. Returns whether the update was applied.
    pub fn update_magnetometer(&mut self, magnetometer: &MagnetometerReading<T>) -> bool {
        if !self.initialized {
            trace!("Ignoring magnetometer update before initialization");
            return false;
        }

        let horizontal = magnetometer.horizontal_norm();
        if !(horizontal >= self.config.min_magnetic_field) {
            trace!(
                horizontal_field = ?horizontal,
                "Magnetic field too weak for a heading update"
            );
            return false;
        }

        let measured = magnetometer.y.atan2(magnetometer.x) + self.config.declination;
        let innovation = (measured - self.state[YAW]).normalize_angle();

        let r = self.config.heading_noise;
        let s = self.covariance[(YAW, YAW)] + r;
        if !(s > T::zero()) {
            warn!(innovation_covariance = ?s, "Skipping magnetometer update");
            return false;
        }

        let k: StateVector<T> = self.covariance.column(YAW).into_owned() / s;
        self.state += k * innovation;

        let mut h = HeadingJacobian::<T>::zeros();
        h[(0, YAW)] = T::one();

        let i_kh = StateCovariance::<T>::identity() - k * h;
        self.covariance = i_kh * self.covariance * i_kh.transpose() + k * k.transpose() * r;
        self.normalize_angles();
        true
    }

    /// Replaces a flipped angle representation by its equivalent with roll and pitch near zero.
    ///
    /// When both roll and pitch lie within `margin` radians of ±π, the state is
    /// remapped to `(φ + π, π − θ, ψ + π)`, which describes the same rotation.
    /// The covariance is transformed accordingly. Returns whether a remapping
    /// took place.
    pub fn unwrap_angles(&mut self, margin: T) -> bool {
        if !self.initialized {
            return false;
        }

        let Some(angles) = self.estimated_angles().unflipped(margin) else {
            return false;
        };

        debug!(
            from = ?self.estimated_angles().to_degrees(),
            to = ?angles.to_degrees(),
            "Unwrapping flipped Euler angles"
        );

        self.state[ROLL] = angles.roll_phi;
        self.state[PITCH] = angles.pitch_theta;
        self.state[YAW] = angles.yaw_psi;

        // Only the pitch angle is mirrored; roll and yaw are shifted.
        let mut j = StateCovariance::<T>::identity();
        j[(PITCH, PITCH)] = -T::one();
        self.covariance = j * self.covariance * j.transpose();
        true
    }

    fn normalize_angles(&mut self) {
        self.state[ROLL] = self.state[ROLL].normalize_angle();
        self.state[PITCH] = self.state[PITCH].normalize_angle();
        self.state[YAW] = self.state[YAW].normalize_angle();
    }

    /// Gets the configuration the estimator was built with.
    pub fn config(&self) -> &EstimatorConfig<T> {
        &self.config
    }

    /// Whether a first accelerometer sample has set the initial attitude.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The estimated roll angle, in radians.
    pub fn roll(&self) -> T {
        self.state[ROLL]
    }

    /// The estimated pitch angle, in radians.
    pub fn pitch(&self) -> T {
        self.state[PITCH]
    }

    /// The estimated yaw angle, in radians.
    pub fn yaw(&self) -> T {
        self.state[YAW]
    }

    /// The estimated roll, pitch and yaw angles, in radians.
    pub fn estimated_angles(&self) -> EulerAngles<T> {
        EulerAngles::new(self.state[ROLL], self.state[PITCH], self.state[YAW])
    }

    /// The estimated gyroscope bias, in rad/s.
    pub fn gyroscope_bias(&self) -> GyroscopeBias<T> {
        GyroscopeBias::new(self.state[BIAS_X], self.state[BIAS_Y], self.state[BIAS_Z])
    }

    /// The variances of roll, pitch and yaw, in rad².
    pub fn angle_variances(&self) -> EulerAngles<T> {
        let p = &self.covariance;
        EulerAngles::new(p[(ROLL, ROLL)], p[(PITCH, PITCH)], p[(YAW, YAW)])
    }

    /// The variances of the gyroscope bias terms, in (rad/s)².
    pub fn bias_variances(&self) -> GyroscopeBias<T> {
        let p = &self.covariance;
        GyroscopeBias::new(
            p[(BIAS_X, BIAS_X)],
            p[(BIAS_Y, BIAS_Y)],
            p[(BIAS_Z, BIAS_Z)],
        )
    }

    /// The raw state vector `[roll, pitch, yaw, bias_x, bias_y, bias_z]`.
    pub fn state(&self) -> &StateVector<T> {
        &self.state
    }

    /// The state error covariance matrix.
    pub fn covariance(&self) -> &StateCovariance<T> {
        &self.covariance
    }

    /// Summarizes the current estimate in degrees and degrees per second.
    pub fn report(&self) -> OrientationReport<T> {
        let sigma = |index: usize| degrees(self.covariance[(index, index)].max(T::zero()).sqrt());

        OrientationReport {
            angles: self.estimated_angles().to_degrees(),
            bias: self.gyroscope_bias().to_degrees(),
            angle_uncertainty: EulerAngles::new(sigma(ROLL), sigma(PITCH), sigma(YAW)),
            bias_uncertainty: GyroscopeBias::new(sigma(BIAS_X), sigma(BIAS_Y), sigma(BIAS_Z)),
        }
    }
}

impl<T> Default for OrientationEstimator<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

/// The Euler angle rates for the body rates `omega`, in rad/s.
fn euler_rates<T: Real>(angles: &EulerAngles<T>, omega: &GyroscopeReading<T>) -> EulerAngles<T> {
    let (sr, cr) = angles.roll_phi.sin_cos();
    let tp = angles.pitch_theta.tan();
    let cp = angles.pitch_theta.cos();

    let GyroscopeReading {
        omega_x: wx,
        omega_y: wy,
        omega_z: wz,
    } = *omega;

    EulerAngles::new(
        wx + wy * sr * tp + wz * cr * tp,
        wy * cr - wz * sr,
        wy * sr / cp + wz * cr / cp,
    )
}

/// The Jacobian of the discretized kinematics with respect to the state.
fn state_jacobian<T: Real>(
    angles: &EulerAngles<T>,
    omega: &GyroscopeReading<T>,
    delta_t: T,
) -> StateCovariance<T> {
    let dt = delta_t;
    let (sr, cr) = angles.roll_phi.sin_cos();
    let tp = angles.pitch_theta.tan();
    let sec = T::one() / angles.pitch_theta.cos();
    let (wy, wz) = (omega.omega_y, omega.omega_z);

    let mut f = StateCovariance::<T>::identity();

    f[(ROLL, ROLL)] = T::one() + dt * (wy * cr * tp - wz * sr * tp);
    f[(ROLL, PITCH)] = dt * (wy * sr + wz * cr) * sec * sec;
    f[(ROLL, BIAS_X)] = -dt;
    f[(ROLL, BIAS_Y)] = -dt * sr * tp;
    f[(ROLL, BIAS_Z)] = -dt * cr * tp;

    f[(PITCH, ROLL)] = dt * (-wy * sr - wz * cr);
    f[(PITCH, BIAS_Y)] = -dt * cr;
    f[(PITCH, BIAS_Z)] = dt * sr;

    f[(YAW, ROLL)] = dt * (wy * cr - wz * sr) * sec;
    f[(YAW, PITCH)] = dt * (wy * sr + wz * cr) * sec * tp;
    f[(YAW, BIAS_Y)] = -dt * sr * sec;
    f[(YAW, BIAS_Z)] = -dt * cr * sec;

    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::radians;
    use approx::assert_relative_eq;
    use core::f64::consts::{FRAC_PI_2, PI};

    const LEVEL: AccelerometerReading<f64> = AccelerometerReading::new(0.0, 0.0, 1.0);

    fn assert_symmetric_psd(p: &StateCovariance<f64>) {
        let asymmetry = (p - p.transpose()).amax();
        assert!(asymmetry < 1e-9, "covariance is not symmetric: {asymmetry}");

        let eigenvalues = p.symmetric_eigenvalues();
        assert!(
            eigenvalues.iter().all(|&e| e >= -1e-12),
            "covariance is not positive semi-definite: {eigenvalues}"
        );
    }

    fn initialized(config: EstimatorConfig<f64>) -> OrientationEstimator<f64> {
        let mut estimator = OrientationEstimator::new(config);
        assert!(estimator.initialize(&LEVEL, None).is_some());
        estimator
    }

    #[test]
    fn test_initialize_level() {
        let mut estimator = OrientationEstimator::<f64>::default();
        assert!(!estimator.is_initialized());

        let angles = estimator.initialize(&LEVEL, None).expect("initializes");
        assert!(estimator.is_initialized());
        assert_eq!(angles, EulerAngles::new(0.0, 0.0, 0.0));
        assert_eq!(estimator.gyroscope_bias(), GyroscopeBias::new(0.0, 0.0, 0.0));

        let p = estimator.covariance();
        assert_eq!(p[(ROLL, ROLL)], 0.01);
        assert_eq!(p[(YAW, YAW)], 0.01);
        assert_eq!(p[(BIAS_Z, BIAS_Z)], 1e-4);
        assert_eq!(p[(ROLL, PITCH)], 0.0);
    }

    #[test]
    fn test_initialize_tilted() {
        let mut estimator = OrientationEstimator::<f64>::default();
        let roll = radians(30.0_f64);
        let accel = AccelerometerReading::new(0.0, roll.sin(), roll.cos());
        estimator.initialize(&accel, None);
        assert_relative_eq!(estimator.roll(), roll, epsilon = 1e-12);
        assert_relative_eq!(estimator.pitch(), 0.0, epsilon = 1e-12);

        let mut estimator = OrientationEstimator::<f64>::default();
        let pitch = radians(20.0_f64);
        let accel = AccelerometerReading::new(-pitch.sin(), 0.0, pitch.cos());
        estimator.initialize(&accel, None);
        assert_relative_eq!(estimator.roll(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(estimator.pitch(), pitch, epsilon = 1e-12);
    }

    #[test]
    fn test_initialize_heading() {
        let mut estimator = OrientationEstimator::<f64>::default();
        let mag = MagnetometerReading::new(0.0, 20.0, 40.0);
        estimator.initialize(&LEVEL, Some(&mag));
        assert_relative_eq!(estimator.yaw(), FRAC_PI_2, epsilon = 1e-12);

        let config = EstimatorConfig::default().with_declination_degrees(10.0);
        let mut estimator = OrientationEstimator::new(config);
        let mag = MagnetometerReading::new(20.0, 0.0, 40.0);
        estimator.initialize(&LEVEL, Some(&mag));
        assert_relative_eq!(estimator.yaw(), radians(10.0), epsilon = 1e-12);
    }

    #[test]
    fn test_initialize_ignores_weak_field() {
        let mut estimator = OrientationEstimator::<f64>::default();
        let mag = MagnetometerReading::new(0.0, 0.5, 0.5);
        estimator.initialize(&LEVEL, Some(&mag));
        assert_eq!(estimator.yaw(), 0.0);
    }

    #[test]
    fn test_initialize_rejects_degenerate_samples() {
        let mut estimator = OrientationEstimator::<f64>::default();
        assert!(estimator
            .initialize(&AccelerometerReading::new(0.0, 0.0, 0.0), None)
            .is_none());
        assert!(estimator
            .initialize(&AccelerometerReading::new(f64::NAN, 0.0, 1.0), None)
            .is_none());
        assert!(!estimator.is_initialized());
    }

    #[test]
    fn test_initialize_twice_is_ignored() {
        let mut estimator = initialized(EstimatorConfig::default());
        let tilted = AccelerometerReading::new(0.0, 0.5, 0.5);
        assert!(estimator.initialize(&tilted, None).is_none());
        assert_eq!(estimator.roll(), 0.0);
    }

    #[test]
    fn test_ignored_before_initialization() {
        let mut estimator = OrientationEstimator::<f64>::default();
        let before = estimator.clone();

        estimator.predict(&GyroscopeReading::new(1.0, 1.0, 1.0), 0.1);
        estimator.update_accelerometer(&AccelerometerReading::new(0.0, 0.5, 0.5));
        assert!(!estimator.update_magnetometer(&MagnetometerReading::new(20.0, 20.0, 0.0)));
        assert!(!estimator.unwrap_angles(0.3));

        assert_eq!(estimator.state(), before.state());
        assert_eq!(estimator.covariance(), before.covariance());
    }

    #[test]
    fn test_predict_ignores_non_positive_time_step() {
        let mut estimator = initialized(EstimatorConfig::default());
        let before = estimator.clone();
        let gyro = GyroscopeReading::new(0.1, 0.2, 0.3);

        estimator.predict(&gyro, 0.0);
        estimator.predict(&gyro, -0.01);
        estimator.predict(&gyro, f64::NAN);

        assert_eq!(estimator.state(), before.state());
        assert_eq!(estimator.covariance(), before.covariance());
    }

    #[test]
    fn test_predict_subtracts_bias() {
        let mut estimator = initialized(EstimatorConfig::default());
        estimator.state[BIAS_Z] = 0.1;

        estimator.predict(&GyroscopeReading::new(0.0, 0.0, 0.1), 0.5);
        assert_relative_eq!(estimator.yaw(), 0.0, epsilon = 1e-15);

        estimator.predict(&GyroscopeReading::new(0.0, 0.0, 0.3), 0.5);
        assert_relative_eq!(estimator.yaw(), 0.1, epsilon = 1e-15);
    }

    #[test]
    fn test_predict_wraps_yaw() {
        let mut estimator = initialized(EstimatorConfig::default());
        estimator.state[YAW] = PI - 0.05;

        estimator.predict(&GyroscopeReading::new(0.0, 0.0, 1.0), 0.1);
        assert_relative_eq!(estimator.yaw(), -PI + 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_state_jacobian_matches_finite_differences() {
        let angles = EulerAngles::new(0.3_f64, -0.4, 1.2);
        let bias = [0.01, -0.02, 0.03];
        let gyro = GyroscopeReading::new(0.2, -0.5, 0.7);
        let dt = 0.02;

        let propagate = |x: &StateVector<f64>| -> StateVector<f64> {
            let omega = GyroscopeReading::new(
                gyro.omega_x - x[3],
                gyro.omega_y - x[4],
                gyro.omega_z - x[5],
            );
            let rates = euler_rates(&EulerAngles::new(x[0], x[1], x[2]), &omega);
            StateVector::new(
                x[0] + rates.roll_phi * dt,
                x[1] + rates.pitch_theta * dt,
                x[2] + rates.yaw_psi * dt,
                x[3],
                x[4],
                x[5],
            )
        };

        let x = StateVector::new(
            angles.roll_phi,
            angles.pitch_theta,
            angles.yaw_psi,
            bias[0],
            bias[1],
            bias[2],
        );
        let omega = GyroscopeReading::new(
            gyro.omega_x - bias[0],
            gyro.omega_y - bias[1],
            gyro.omega_z - bias[2],
        );
        let f = state_jacobian(&angles, &omega, dt);

        let step = 1e-6;
        for column in 0..STATES {
            let mut plus = x;
            let mut minus = x;
            plus[column] += step;
            minus[column] -= step;
            let numeric = (propagate(&plus) - propagate(&minus)) / (2.0 * step);
            for row in 0..STATES {
                assert_relative_eq!(f[(row, column)], numeric[row], epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_static_convergence() {
        let mut estimator = OrientationEstimator::<f64>::default();
        let roll = radians(10.0_f64);
        let pitch = radians(-5.0_f64);
        let tilted = AccelerometerReading::new(
            -pitch.sin(),
            roll.sin() * pitch.cos(),
            roll.cos() * pitch.cos(),
        );
        estimator.initialize(&tilted, None);
        assert_relative_eq!(estimator.roll(), roll, epsilon = 1e-2);

        let still = GyroscopeReading::default();
        for _ in 0..200 {
            estimator.predict(&still, 0.01);
            estimator.update_accelerometer(&LEVEL);
        }

        assert!(degrees(estimator.roll()).abs() < 0.5);
        assert!(degrees(estimator.pitch()).abs() < 0.5);
        let bias = estimator.gyroscope_bias();
        assert!(bias.omega_x.abs() < 1e-2);
        assert!(bias.omega_y.abs() < 1e-2);
        assert!(bias.omega_z.abs() < 1e-2);
        assert_symmetric_psd(estimator.covariance());
    }

    #[test]
    fn test_magnetometer_drives_yaw_monotonically() {
        let config = EstimatorConfig {
            heading_noise: 0.01,
            ..EstimatorConfig::default()
        };
        let mut estimator = OrientationEstimator::new(config);
        estimator.initialize(&LEVEL, Some(&MagnetometerReading::new(0.0, 20.0, 0.0)));
        assert_relative_eq!(degrees(estimator.yaw()), 90.0, epsilon = 1e-9);

        let north = MagnetometerReading::new(1.0, 0.0, 0.0);
        let mut previous = estimator.yaw();
        for _ in 0..200 {
            assert!(estimator.update_magnetometer(&north));
            let yaw = estimator.yaw();
            assert!(yaw < previous, "yaw must decrease monotonically");
            assert!(yaw > 0.0, "yaw must not overshoot");
            previous = yaw;
        }

        assert!(degrees(estimator.yaw()) < 1.0);
        assert_symmetric_psd(estimator.covariance());
    }

    #[test]
    fn test_magnetometer_rejects_weak_horizontal_field() {
        let mut estimator = initialized(EstimatorConfig::default());
        let before = estimator.clone();

        // Strong, but almost vertical.
        let vertical = MagnetometerReading::new(0.5, 0.5, 45.0);
        assert!(!estimator.update_magnetometer(&vertical));
        assert_eq!(estimator.state(), before.state());
    }

    #[test]
    fn test_magnetometer_wraps_innovation() {
        let config = EstimatorConfig {
            heading_noise: 0.01,
            ..EstimatorConfig::default()
        };
        let mut estimator = initialized(config);
        estimator.state[YAW] = PI - 0.1;

        // The measured heading lies just across the ±π boundary.
        let mag = MagnetometerReading::new(-20.0, -20.0 * 0.1_f64.tan(), 0.0);
        assert!(estimator.update_magnetometer(&mag));

        let yaw = estimator.yaw();
        assert!(yaw > PI - 0.1 || yaw < -PI + 0.1, "yaw took the long way: {yaw}");
    }

    #[test]
    fn test_constant_yaw_rate() {
        let mut estimator = initialized(EstimatorConfig::default());
        let gyro = GyroscopeReading::new(0.0, 0.0, radians(10.0));

        for _ in 0..20 {
            estimator.predict(&gyro, 0.05);
            estimator.update_accelerometer(&LEVEL);
        }

        assert_relative_eq!(degrees(estimator.yaw()), 10.0, epsilon = 1e-6);
        assert_relative_eq!(estimator.roll(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(estimator.pitch(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_stays_symmetric() {
        let mut estimator = OrientationEstimator::<f64>::default();
        estimator.initialize(
            &AccelerometerReading::new(0.1, -0.2, 0.97),
            Some(&MagnetometerReading::new(18.0, 5.0, 42.0)),
        );

        for tick in 0..500 {
            let t = tick as f64 * 0.01;
            let gyro = GyroscopeReading::new(0.3 * t.sin(), 0.2 * (0.7 * t).cos(), 0.5);
            let roll = 0.2 * t.sin();
            let pitch = 0.1 * (0.5 * t).cos();
            let accel = AccelerometerReading::new(
                -pitch.sin(),
                roll.sin() * pitch.cos(),
                roll.cos() * pitch.cos(),
            );
            let heading = 0.5 * t;
            let mag = MagnetometerReading::new(20.0 * heading.cos(), 20.0 * heading.sin(), 40.0);

            estimator.predict(&gyro, 0.01);
            estimator.update_accelerometer(&accel);
            estimator.update_magnetometer(&mag);
            assert_symmetric_psd(estimator.covariance());
        }
    }

    #[test]
    fn test_unwrap_angles() {
        let mut estimator = initialized(EstimatorConfig::default());
        estimator.state[ROLL] = PI - 0.05;
        estimator.state[PITCH] = -PI + 0.1;
        estimator.state[YAW] = 0.5;
        estimator.covariance[(ROLL, PITCH)] = 0.001;
        estimator.covariance[(PITCH, ROLL)] = 0.001;
        let rotation = estimator.estimated_angles().rotation_matrix();

        assert!(!estimator.unwrap_angles(0.01));
        assert!(estimator.unwrap_angles(0.3));

        assert_relative_eq!(estimator.roll(), -0.05, epsilon = 1e-12);
        assert_relative_eq!(estimator.pitch(), -0.1, epsilon = 1e-12);
        assert_relative_eq!(estimator.yaw(), 0.5 - PI, epsilon = 1e-12);
        assert_relative_eq!(
            estimator.estimated_angles().rotation_matrix(),
            rotation,
            epsilon = 1e-12
        );

        assert_eq!(estimator.covariance()[(ROLL, PITCH)], -0.001);
        assert_eq!(estimator.covariance()[(PITCH, PITCH)], 0.01);
        assert_symmetric_psd(estimator.covariance());

        // Already unflipped.
        assert!(!estimator.unwrap_angles(0.3));
    }

    #[test]
    fn test_report() {
        let mut estimator = initialized(EstimatorConfig::default());
        estimator.state[YAW] = FRAC_PI_2;
        estimator.state[BIAS_X] = radians(2.0);

        let report = estimator.report();
        assert_relative_eq!(report.angles.yaw_psi, 90.0, epsilon = 1e-12);
        assert_relative_eq!(report.bias.omega_x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(report.angle_uncertainty.roll_phi, degrees(0.1), epsilon = 1e-12);
        assert_relative_eq!(report.bias_uncertainty.omega_z, degrees(0.01), epsilon = 1e-12);
    }

    #[test]
    fn test_f32() {
        let mut estimator = OrientationEstimator::<f32>::default();
        estimator.initialize(&AccelerometerReading::new(0.0, 0.0, 1.0), None);
        for _ in 0..10 {
            estimator.predict(&GyroscopeReading::new(0.0, 0.0, 0.1), 0.1);
            estimator.update_accelerometer(&AccelerometerReading::new(0.0, 0.0, 1.0));
        }
        assert_relative_eq!(estimator.yaw(), 0.1, epsilon = 1e-5);
    }
}
