// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the circular reference trajectory for the end-effector.
use std::f64::consts::PI;

use nalgebra::{Quaternion, Rotation3, UnitQuaternion, Vector3};

use crate::config::TrajectoryConfig;
use crate::exception::{create_config_exception, ControllerResult};
use crate::utils::quaternion_to_rotation;

/// Reference for the end-effector task at one instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CartesianReference {
    /// Desired position in \[m\].
    pub position: Vector3<f64>,
    /// Desired linear velocity in \[m/s\].
    pub velocity: Vector3<f64>,
    /// Desired linear acceleration in \[m/s²\].
    pub acceleration: Vector3<f64>,
    /// Desired orientation, constant over the trajectory.
    pub orientation: Rotation3<f64>,
}

/// Circular motion of radius `R` in the Y-Z plane at fixed `x`, traversed with angular rate `ω`:
///
/// * position = (x₀, R·sin(ωt), z₀ + R·cos(ωt))
/// * velocity = (0, Rω·cos(ωt), −Rω·sin(ωt))
/// * acceleration = (0, −Rω²·sin(ωt), Rω²·cos(ωt))
///
/// The y components form an exact derivative chain. The z component of the acceleration is the
/// negated derivative of the z velocity: the acceleration reference keeps the sign the end-effector
/// task has always been fed, pointing away from the circle center at `t = 0`.
///
/// The generator is a pure function of the time it is given; accumulating time is the job of
/// the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularTrajectory {
    radius: f64,
    angular_rate: f64,
    x_offset: f64,
    z_offset: f64,
    orientation: Rotation3<f64>,
}

impl CircularTrajectory {
    /// Creates a new CircularTrajectory.
    /// # Arguments
    /// * `radius` - Circle radius in \[m\], positive and finite.
    /// * `angular_rate` - Angular rate in \[rad/s\], finite.
    /// * `x_offset` - Fixed x coordinate in \[m\].
    /// * `z_offset` - z coordinate of the circle center in \[m\].
    /// * `orientation` - Target orientation as quaternion `[w, x, y, z]`. It does not need to be
    /// normalized.
    /// # Errors
    /// [`InvalidConfiguration`](`crate::exception::ControllerException::InvalidConfiguration`)
    /// if any parameter is out of range.
    pub fn new(
        radius: f64,
        angular_rate: f64,
        x_offset: f64,
        z_offset: f64,
        orientation: [f64; 4],
    ) -> ControllerResult<Self> {
        let config = TrajectoryConfig {
            radius,
            angular_rate,
            x_offset,
            z_offset,
            orientation,
        };
        CircularTrajectory::from_config(&config)
    }

    /// Creates a CircularTrajectory from its configuration section.
    pub fn from_config(config: &TrajectoryConfig) -> ControllerResult<Self> {
        config.validate()?;
        let orientation = quaternion_to_rotation(&config.orientation).ok_or_else(|| {
            create_config_exception(format!(
                "orientation {:?} is not a valid quaternion",
                config.orientation
            ))
        })?;
        Ok(CircularTrajectory {
            radius: config.radius,
            angular_rate: config.angular_rate,
            x_offset: config.x_offset,
            z_offset: config.z_offset,
            orientation,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn angular_rate(&self) -> f64 {
        self.angular_rate
    }

    /// Duration of one revolution in \[s\], infinite for a zero angular rate.
    pub fn period(&self) -> f64 {
        2. * PI / self.angular_rate.abs()
    }

    pub fn position(&self, time: f64) -> Vector3<f64> {
        let phase = self.angular_rate * time;
        Vector3::new(
            self.x_offset,
            self.radius * phase.sin(),
            self.z_offset + self.radius * phase.cos(),
        )
    }

    pub fn velocity(&self, time: f64) -> Vector3<f64> {
        let phase = self.angular_rate * time;
        let speed = self.radius * self.angular_rate;
        Vector3::new(0., speed * phase.cos(), -speed * phase.sin())
    }

    /// Acceleration reference. Note the sign of the z component, see [`CircularTrajectory`].
    pub fn acceleration(&self, time: f64) -> Vector3<f64> {
        let phase = self.angular_rate * time;
        let centripetal = self.radius * self.angular_rate.powi(2);
        Vector3::new(0., -centripetal * phase.sin(), centripetal * phase.cos())
    }

    pub fn orientation(&self) -> Rotation3<f64> {
        self.orientation
    }

    /// Evaluates the full reference at `time` seconds after the start of the controller.
    pub fn reference_at(&self, time: f64) -> CartesianReference {
        CartesianReference {
            position: self.position(time),
            velocity: self.velocity(time),
            acceleration: self.acceleration(time),
            orientation: self.orientation,
        }
    }
}

impl Default for CircularTrajectory {
    fn default() -> Self {
        let config = TrajectoryConfig::default();
        let [w, x, y, z] = config.orientation;
        CircularTrajectory {
            radius: config.radius,
            angular_rate: config.angular_rate,
            x_offset: config.x_offset,
            z_offset: config.z_offset,
            orientation: UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
                .to_rotation_matrix(),
        }
    }
}
