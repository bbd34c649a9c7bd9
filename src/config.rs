// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the configuration of the [`CircularController`](`crate::CircularController`).
//!
//! Every field has a default, so an empty TOML document yields the stock controller:
//! ```
//! use circular::CircularControllerConfig;
//! let config = CircularControllerConfig::from_toml_str("").unwrap();
//! assert_eq!(config, CircularControllerConfig::default());
//! ```
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::exception::{create_config_exception, ControllerException, ControllerResult};
use crate::utils::quaternion_to_rotation;

/// Default control timestep: 5 ms
pub static DEFAULT_TIME_STEP: f64 = 0.005;
/// Name of the body sensor whose readings are logged every tick
pub static DEFAULT_SENSOR_NAME: &str = "Accelerometer";
/// Frame driven by the end-effector task
pub static DEFAULT_TOOL_FRAME: &str = "tool_frame";

/// Parameters of the circular reference trajectory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Circle radius in \[m\].
    pub radius: f64,
    /// Angular rate in \[rad/s\].
    pub angular_rate: f64,
    /// Fixed x coordinate of the circle plane in \[m\].
    pub x_offset: f64,
    /// z coordinate of the circle center in \[m\].
    pub z_offset: f64,
    /// Target orientation as quaternion `[w, x, y, z]`, normalized on use.
    pub orientation: [f64; 4],
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        TrajectoryConfig {
            radius: 0.15,
            angular_rate: 3.0,
            x_offset: 0.55,
            z_offset: 0.4,
            orientation: [0., 1., 0., 1.],
        }
    }
}

/// Parameters of the posture task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PostureTaskConfig {
    pub stiffness: f64,
    pub weight: f64,
}

impl Default for PostureTaskConfig {
    fn default() -> Self {
        PostureTaskConfig {
            stiffness: 5.,
            weight: 1.,
        }
    }
}

/// Parameters of the end-effector task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EndEffectorTaskConfig {
    /// Name of the controlled frame.
    pub frame: String,
    pub stiffness: f64,
    pub weight: f64,
    /// Per-DOF weighting, translation first then rotation.
    pub dim_weight: [f64; 6],
}

impl Default for EndEffectorTaskConfig {
    fn default() -> Self {
        EndEffectorTaskConfig {
            frame: DEFAULT_TOOL_FRAME.to_string(),
            stiffness: 20.0,
            weight: 10000.,
            dim_weight: [1.; 6],
        }
    }
}

/// Damping factors of the dynamics constraint.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct DamperConfig {
    pub velocity: f64,
    pub acceleration: f64,
    pub torque: f64,
}

impl Default for DamperConfig {
    fn default() -> Self {
        DamperConfig {
            velocity: 0.1,
            acceleration: 0.01,
            torque: 0.5,
        }
    }
}

/// Parameters of the dynamics constraint set.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct DynamicsConstraintConfig {
    pub damper: DamperConfig,
    pub safety_factor: f64,
    pub infinite_torque: bool,
    pub compound_joints: bool,
}

impl Default for DynamicsConstraintConfig {
    fn default() -> Self {
        DynamicsConstraintConfig {
            damper: DamperConfig::default(),
            safety_factor: 0.9,
            infinite_torque: false,
            compound_joints: true,
        }
    }
}

/// Complete controller configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CircularControllerConfig {
    /// Control timestep in \[s\], added to the controller time every tick.
    pub dt: f64,
    /// Body sensor read for the "IMU Accel" and "IMU Gyro" telemetry entries.
    pub sensor_name: String,
    pub trajectory: TrajectoryConfig,
    pub posture_task: PostureTaskConfig,
    pub end_effector_task: EndEffectorTaskConfig,
    pub dynamics_constraint: DynamicsConstraintConfig,
}

impl Default for CircularControllerConfig {
    fn default() -> Self {
        CircularControllerConfig {
            dt: DEFAULT_TIME_STEP,
            sensor_name: DEFAULT_SENSOR_NAME.to_string(),
            trajectory: TrajectoryConfig::default(),
            posture_task: PostureTaskConfig::default(),
            end_effector_task: EndEffectorTaskConfig::default(),
            dynamics_constraint: DynamicsConstraintConfig::default(),
        }
    }
}

impl CircularControllerConfig {
    /// Parses a configuration from a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(toml_str: &str) -> ControllerResult<Self> {
        toml::from_str(toml_str).map_err(|e| ControllerException::ConfigLoadException {
            message: e.to_string(),
        })
    }

    /// Loads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> ControllerResult<Self> {
        let path = path.as_ref();
        let toml_str =
            read_to_string(path).map_err(|e| ControllerException::ConfigLoadException {
                message: format!("{}: {}", path.display(), e),
            })?;
        let config = CircularControllerConfig::from_toml_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the controller relies on.
    pub fn validate(&self) -> ControllerResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.) {
            return Err(create_config_exception(format!(
                "timestep must be positive and finite, got {}",
                self.dt
            )));
        }
        if self.sensor_name.is_empty() {
            return Err(create_config_exception("sensor name must not be empty"));
        }
        if self.end_effector_task.frame.is_empty() {
            return Err(create_config_exception(
                "end-effector frame name must not be empty",
            ));
        }
        if self.end_effector_task.dim_weight.iter().any(|w| !w.is_finite() || *w < 0.) {
            return Err(create_config_exception(
                "dimension weights must be finite and non-negative",
            ));
        }
        self.trajectory.validate()
    }
}

impl TrajectoryConfig {
    /// Checks that the trajectory parameters describe a finite circle and a valid orientation.
    pub fn validate(&self) -> ControllerResult<()> {
        if !(self.radius.is_finite() && self.radius > 0.) {
            return Err(create_config_exception(format!(
                "radius must be positive and finite, got {}",
                self.radius
            )));
        }
        if !self.angular_rate.is_finite() {
            return Err(create_config_exception(format!(
                "angular rate must be finite, got {}",
                self.angular_rate
            )));
        }
        if !(self.x_offset.is_finite() && self.z_offset.is_finite()) {
            return Err(create_config_exception("circle offsets must be finite"));
        }
        if quaternion_to_rotation(&self.orientation).is_none() {
            return Err(create_config_exception(format!(
                "orientation {:?} is not a valid quaternion",
                self.orientation
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::CircularControllerConfig;
    use crate::exception::ControllerException;

    #[test]
    fn defaults() {
        let config = CircularControllerConfig::default();
        assert_eq!(config.trajectory.radius, 0.15);
        assert_eq!(config.trajectory.angular_rate, 3.0);
        assert_eq!(config.posture_task.stiffness, 5.);
        assert_eq!(config.posture_task.weight, 1.);
        assert_eq!(config.end_effector_task.frame, "tool_frame");
        assert_eq!(config.end_effector_task.stiffness, 20.);
        assert_eq!(config.end_effector_task.weight, 10000.);
        assert_eq!(config.end_effector_task.dim_weight, [1.; 6]);
        assert_eq!(config.dynamics_constraint.damper.velocity, 0.1);
        assert_eq!(config.dynamics_constraint.damper.acceleration, 0.01);
        assert_eq!(config.dynamics_constraint.damper.torque, 0.5);
        assert_eq!(config.dynamics_constraint.safety_factor, 0.9);
        assert!(!config.dynamics_constraint.infinite_torque);
        assert!(config.dynamics_constraint.compound_joints);
        assert_eq!(config.sensor_name, "Accelerometer");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml() {
        let config = CircularControllerConfig::from_toml_str(
            r#"
            dt = 0.002

            [trajectory]
            radius = 0.2

            [end_effector_task]
            frame = "flange"
            "#,
        )
        .unwrap();
        assert_eq!(config.dt, 0.002);
        assert_eq!(config.trajectory.radius, 0.2);
        assert_eq!(config.trajectory.angular_rate, 3.0);
        assert_eq!(config.end_effector_task.frame, "flange");
        assert_eq!(config.end_effector_task.weight, 10000.);
    }

    #[test]
    fn malformed_toml() {
        match CircularControllerConfig::from_toml_str("dt = \"fast\"") {
            Err(ControllerException::ConfigLoadException { .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn invalid_values() {
        let mut config = CircularControllerConfig::default();
        config.dt = 0.;
        assert!(config.validate().is_err());

        let mut config = CircularControllerConfig::default();
        config.trajectory.radius = -0.1;
        assert!(config.validate().is_err());

        let mut config = CircularControllerConfig::default();
        config.trajectory.orientation = [0.; 4];
        assert!(config.validate().is_err());

        let mut config = CircularControllerConfig::default();
        config.end_effector_task.dim_weight[3] = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file() {
        match CircularControllerConfig::load("/nonexistent/circular.toml") {
            Err(ControllerException::ConfigLoadException { message }) => {
                assert!(message.contains("circular.toml"))
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
