use nalgebra::{SMatrix, SVector};

pub const STATES: usize = 6; // roll, pitch, yaw, bias_x, bias_y, bias_z
pub const ACCELEROMETER_OBSERVATIONS: usize = 3; // gravity x, y, z

pub const ROLL: usize = 0;
pub const PITCH: usize = 1;
pub const YAW: usize = 2;
pub const BIAS_X: usize = 3;
pub const BIAS_Y: usize = 4;
pub const BIAS_Z: usize = 5;

/// The state vector `[roll, pitch, yaw, bias_x, bias_y, bias_z]`, in rad and rad/s.
pub type StateVector<T> = SVector<T, STATES>;

/// The 6×6 state estimate covariance matrix.
pub type StateCovariance<T> = SMatrix<T, STATES, STATES>;

/// The Jacobian of the gravity observation with respect to the state.
pub type AccelerometerJacobian<T> = SMatrix<T, ACCELEROMETER_OBSERVATIONS, STATES>;

/// The Kalman gain of the gravity observation.
pub type AccelerometerGain<T> = SMatrix<T, STATES, ACCELEROMETER_OBSERVATIONS>;

/// The Jacobian of the scalar heading observation.
pub type HeadingJacobian<T> = SMatrix<T, 1, STATES>;
