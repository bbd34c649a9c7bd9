// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the interface towards the host framework which owns the solver, the tasks and the
//! constraint sets.
//!
//! The controller never owns a task or a constraint set. It describes them once at construction,
//! keeps the opaque handles the host hands back and issues commands through [`HostSolver`].
use nalgebra::{Rotation3, Vector3};

use crate::config::{
    DamperConfig, DynamicsConstraintConfig, EndEffectorTaskConfig, PostureTaskConfig,
};
use crate::controller::control_types::FeedbackType;
use crate::exception::ControllerResult;
use crate::utils::Vector6;

/// Opaque reference to a task registered with the host solver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub usize);

/// Opaque reference to a constraint set registered with the host solver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintSetHandle(pub usize);

/// Constraint sets the controller registers.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintSetDescription {
    /// Contact constraints of the robot.
    Contact,
    /// Joint velocity, acceleration and torque limits.
    Dynamics {
        /// Solver timestep in \[s\].
        dt: f64,
        damper: DamperConfig,
        safety_factor: f64,
        infinite_torque: bool,
        compound_joints: bool,
    },
}

impl ConstraintSetDescription {
    pub fn dynamics(dt: f64, config: &DynamicsConstraintConfig) -> Self {
        ConstraintSetDescription::Dynamics {
            dt,
            damper: config.damper,
            safety_factor: config.safety_factor,
            infinite_torque: config.infinite_torque,
            compound_joints: config.compound_joints,
        }
    }
}

/// Tasks the controller registers.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskDescription {
    /// Keeps the joint configuration close to a reference posture.
    Posture { stiffness: f64, weight: f64 },
    /// Drives a frame to a position and orientation.
    EndEffector {
        frame: String,
        stiffness: f64,
        weight: f64,
        /// Weight of each task-space degree of freedom, translation first.
        dim_weight: Vector6,
    },
}

impl From<&PostureTaskConfig> for TaskDescription {
    fn from(config: &PostureTaskConfig) -> Self {
        TaskDescription::Posture {
            stiffness: config.stiffness,
            weight: config.weight,
        }
    }
}

impl From<&EndEffectorTaskConfig> for TaskDescription {
    fn from(config: &EndEffectorTaskConfig) -> Self {
        TaskDescription::EndEffector {
            frame: config.frame.clone(),
            stiffness: config.stiffness,
            weight: config.weight,
            dim_weight: Vector6::from_row_slice(&config.dim_weight),
        }
    }
}

/// Latest reading of a body-mounted inertial sensor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BodySensorReading {
    /// Linear acceleration in \[m/s²\].
    pub linear_acceleration: Vector3<f64>,
    /// Angular velocity in \[rad/s\].
    pub angular_velocity: Vector3<f64>,
}

impl Default for BodySensorReading {
    fn default() -> Self {
        BodySensorReading {
            linear_acceleration: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

/// Data handed over by the host when the controller is (re)started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetData {
    /// Joint configuration of the robot, one entry per joint.
    pub q: Vec<Vec<f64>>,
}

/// Commands and queries the controller issues to the host framework.
pub trait HostSolver {
    fn add_constraint_set(
        &mut self,
        constraint_set: &ConstraintSetDescription,
    ) -> ControllerResult<ConstraintSetHandle>;
    fn add_task(&mut self, task: &TaskDescription) -> ControllerResult<TaskHandle>;
    /// Resets the task's target to the current robot state.
    fn reset_task(&mut self, task: TaskHandle);

    fn set_position(&mut self, task: TaskHandle, position: Vector3<f64>);
    fn set_ref_vel(&mut self, task: TaskHandle, velocity: Vector3<f64>);
    fn set_ref_accel(&mut self, task: TaskHandle, acceleration: Vector3<f64>);
    fn set_orientation(&mut self, task: TaskHandle, orientation: Rotation3<f64>);

    /// Returns the current reading of the named body sensor, `None` if the robot has no such
    /// sensor.
    fn body_sensor(&self, name: &str) -> Option<BodySensorReading>;

    /// Runs one solver step with the given feedback law. Returns false if the step failed.
    fn run(&mut self, feedback: FeedbackType) -> bool;
    fn reset(&mut self, data: &ResetData);
}

impl<T: HostSolver + ?Sized> HostSolver for &mut T {
    fn add_constraint_set(
        &mut self,
        constraint_set: &ConstraintSetDescription,
    ) -> ControllerResult<ConstraintSetHandle> {
        (**self).add_constraint_set(constraint_set)
    }
    fn add_task(&mut self, task: &TaskDescription) -> ControllerResult<TaskHandle> {
        (**self).add_task(task)
    }
    fn reset_task(&mut self, task: TaskHandle) {
        (**self).reset_task(task)
    }
    fn set_position(&mut self, task: TaskHandle, position: Vector3<f64>) {
        (**self).set_position(task, position)
    }
    fn set_ref_vel(&mut self, task: TaskHandle, velocity: Vector3<f64>) {
        (**self).set_ref_vel(task, velocity)
    }
    fn set_ref_accel(&mut self, task: TaskHandle, acceleration: Vector3<f64>) {
        (**self).set_ref_accel(task, acceleration)
    }
    fn set_orientation(&mut self, task: TaskHandle, orientation: Rotation3<f64>) {
        (**self).set_orientation(task, orientation)
    }
    fn body_sensor(&self, name: &str) -> Option<BodySensorReading> {
        (**self).body_sensor(name)
    }
    fn run(&mut self, feedback: FeedbackType) -> bool {
        (**self).run(feedback)
    }
    fn reset(&mut self, data: &ResetData) {
        (**self).reset(data)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::CircularControllerConfig;
    use crate::controller::host::{ConstraintSetDescription, TaskDescription};
    use crate::utils::Vector6;

    #[test]
    fn descriptions_from_default_config() {
        let config = CircularControllerConfig::default();
        match ConstraintSetDescription::dynamics(config.dt, &config.dynamics_constraint) {
            ConstraintSetDescription::Dynamics {
                dt,
                damper,
                safety_factor,
                infinite_torque,
                compound_joints,
            } => {
                assert_eq!(dt, 0.005);
                assert_eq!([damper.velocity, damper.acceleration, damper.torque], [0.1, 0.01, 0.5]);
                assert_eq!(safety_factor, 0.9);
                assert!(!infinite_torque);
                assert!(compound_joints);
            }
            other => panic!("unexpected description {:?}", other),
        }
        assert_eq!(
            TaskDescription::from(&config.posture_task),
            TaskDescription::Posture {
                stiffness: 5.,
                weight: 1.
            }
        );
        assert_eq!(
            TaskDescription::from(&config.end_effector_task),
            TaskDescription::EndEffector {
                frame: "tool_frame".to_string(),
                stiffness: 20.,
                weight: 10000.,
                dim_weight: Vector6::repeat(1.),
            }
        );
    }
}
