// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the telemetry sink the controller writes its per-tick log entries to.
use std::collections::VecDeque;

use nalgebra::Vector3;

/// Log entry holding the linear acceleration of the body sensor.
pub static IMU_ACCEL_ENTRY: &str = "IMU Accel";
/// Log entry holding the angular velocity of the body sensor.
pub static IMU_GYRO_ENTRY: &str = "IMU Gyro";

/// Receives the logged signals of every tick.
pub trait TelemetrySink {
    /// Records `value` for the log entry `name` at controller time `time`.
    fn record(&mut self, time: f64, name: &str, value: Vector3<f64>);
}

/// Discards everything.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn record(&mut self, _time: f64, _name: &str, _value: Vector3<f64>) {}
}

/// One logged signal value.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    /// Controller time in \[s\].
    pub time: f64,
    pub name: String,
    pub value: Vector3<f64>,
}

/// Keeps the last `log_size` samples in memory.
#[derive(Debug, Clone)]
pub struct TelemetryLog {
    samples: VecDeque<TelemetrySample>,
    log_size: usize,
}

impl TelemetryLog {
    /// Creates a log holding at most `log_size` samples. A size of zero keeps nothing.
    pub fn new(log_size: usize) -> Self {
        TelemetryLog {
            samples: VecDeque::with_capacity(log_size),
            log_size,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates over the samples of one log entry, oldest first.
    pub fn entry<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TelemetrySample> + 'a {
        self.samples.iter().filter(move |sample| sample.name == name)
    }

    /// Returns all samples, oldest first, and empties the log.
    pub fn flush(&mut self) -> Vec<TelemetrySample> {
        self.samples.drain(..).collect()
    }
}

impl TelemetrySink for TelemetryLog {
    fn record(&mut self, time: f64, name: &str, value: Vector3<f64>) {
        if self.log_size == 0 {
            return;
        }
        if self.samples.len() == self.log_size {
            self.samples.pop_front();
        }
        self.samples.push_back(TelemetrySample {
            time,
            name: name.to_string(),
            value,
        });
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for &mut T {
    fn record(&mut self, time: f64, name: &str, value: Vector3<f64>) {
        (**self).record(time, name, value)
    }
}
