//! Replays a recorded ICM-20948 CSV log through the orientation pipeline.
//!
//! ```sh
//! cargo run --example replay -- demos/data/stationary.csv [calibration.json] [estimator.toml]
//! ```
//!
//! The CSV holds one raw sample per row: `time` in seconds followed by the
//! accelerometer, gyroscope and magnetometer counts and the magnetometer
//! validity flag.

use std::error::Error;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{info, warn};

use marg_ekf::device::{ImuDevice, RawSample, SensorScales};
use marg_ekf::{CalibrationProfile, EstimatorConfig, MountingTable, OrientationPipeline};

/// One row of a recording.
#[derive(Debug, Deserialize)]
struct Record {
    time: f64,
    ax: i16,
    ay: i16,
    az: i16,
    gx: i16,
    gy: i16,
    gz: i16,
    mx: i16,
    my: i16,
    mz: i16,
    mag_valid: u8,
}

impl From<&Record> for RawSample {
    fn from(value: &Record) -> Self {
        Self {
            accelerometer: [value.ax, value.ay, value.az],
            gyroscope: [value.gx, value.gy, value.gz],
            magnetometer: [value.mx, value.my, value.mz],
            magnetometer_valid: value.mag_valid != 0,
        }
    }
}

/// Plays back recorded samples as if they came from the sensor.
struct RecordedDevice {
    records: std::vec::IntoIter<Record>,
    time: Option<f64>,
    delta_t: f64,
}

#[derive(Debug)]
struct EndOfRecording;

impl ImuDevice<f64> for RecordedDevice {
    type Error = EndOfRecording;

    fn read_sample(&mut self) -> Result<RawSample, Self::Error> {
        let record = self.records.next().ok_or(EndOfRecording)?;
        self.delta_t = self.time.map_or(0.0, |previous| record.time - previous);
        self.time = Some(record.time);
        Ok(RawSample::from(&record))
    }

    fn scales(&self) -> SensorScales<f64> {
        SensorScales::icm20948()
    }
}

fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let records = reader.deserialize().collect::<Result<Vec<Record>, _>>()?;
    Ok(records)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "replay=info,marg_ekf=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let recording = args
        .next()
        .unwrap_or_else(|| "demos/data/stationary.csv".to_string());

    let calibration = match args.next() {
        Some(path) => CalibrationProfile::<f64>::from_path(path)?,
        None => {
            warn!("No calibration file given, using uncorrected readings");
            CalibrationProfile::identity()
        }
    };

    let config = match args.next() {
        Some(path) => EstimatorConfig::<f64>::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => EstimatorConfig::default(),
    };

    let records = read_csv(&recording)?;
    info!(recording = %recording, samples = records.len(), quality = ?calibration.quality(), "Replaying");

    let mut device = RecordedDevice {
        records: records.into_iter(),
        time: None,
        delta_t: 0.0,
    };

    let mut pipeline = OrientationPipeline::new(calibration, MountingTable::ICM20948, config)
        .with_unwrap_margin(0.3);

    // The time step is only known once the sample has been read.
    while let Ok(sample) = device.read_sample() {
        let physical = sample.to_physical(&device.scales());
        let Some(report) = pipeline.process(&physical, device.delta_t) else {
            continue;
        };

        println!(
            "roll {:7.2}° ± {:5.2}  pitch {:7.2}° ± {:5.2}  yaw {:7.2}° ± {:5.2}  bias [{:6.3}, {:6.3}, {:6.3}] °/s",
            report.angles.roll_phi,
            report.angle_uncertainty.roll_phi,
            report.angles.pitch_theta,
            report.angle_uncertainty.pitch_theta,
            report.angles.yaw_psi,
            report.angle_uncertainty.yaw_psi,
            report.bias.omega_x,
            report.bias.omega_y,
            report.bias.omega_z,
        );
    }

    Ok(())
}
