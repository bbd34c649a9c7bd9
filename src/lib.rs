// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! # circular-controller
//! A controller which moves the tool frame of a robot along a circle in the Y-Z plane while
//! switching between position control and torque control.
//!
//! **ALWAYS HAVE THE USER STOP BUTTON AT
//! HAND WHILE CONTROLLING THE ROBOT!**
//!
//! ## Design
//! Solving the dynamics, weighting the tasks, enforcing contacts and scheduling the control loop
//! is the job of the host framework. This crate only configures the host and computes the
//! reference every tick. The host is reached through two traits:
//! * [`HostSolver`](`crate::HostSolver`) - registers tasks and constraint sets, takes the
//! reference of the end-effector task and runs one solver step.
//! * [`Datastore`](`crate::Datastore`) - the key-value store shared with the host, holding the
//! current control mode.
//!
//! The library is divided into three modules:
//! * [controller](`crate::controller`) - the controller, the trajectory and the host interface.
//! * [config](`crate::config`) - the configuration, loadable from TOML.
//! * [exception](`crate::exception`) - the error type.
//!
//! # Example:
//!```no_run
//! use circular::{
//!     CircularController, CircularControllerConfig, ControllerResult, ControlMode, GuiCommand,
//!     HostSolver, MemoryDatastore,
//! };
//! fn drive<H: HostSolver>(host: H) -> ControllerResult<()> {
//!     let config = CircularControllerConfig::load("circular.toml")?;
//!     let mut controller = CircularController::new(host, MemoryDatastore::new(), config)?;
//!     controller.handle(GuiCommand::SetMotionEnabled(true));
//!     for tick in 0..2000 {
//!         if tick == 1000 {
//!             controller.set_control_mode(ControlMode::Torque);
//!         }
//!         if !controller.run() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every call to [`run`](`crate::CircularController::run`) advances the controller time by
//! `dt`. If the motion is enabled the end-effector task receives
//! position, velocity and acceleration of the circle at that time:
//! ```
//! use circular::CircularTrajectory;
//! let trajectory = CircularTrajectory::default();
//! let reference = trajectory.reference_at(0.);
//! assert!((reference.position.z - 0.55).abs() < 1e-12);
//! assert!((reference.velocity.y - 0.45).abs() < 1e-12);
//! assert!((reference.acceleration.z - 1.35).abs() < 1e-12);
//! ```
//! Then the stored control mode is read. Exactly `"Position"` runs the solver open loop, every
//! other value runs it closed loop and integrates the measured state.
pub mod config;
pub mod controller;
pub mod exception;
pub mod utils;

pub use config::CircularControllerConfig;
pub use controller::control_types::{select_feedback, ControlMode, FeedbackType};
pub use controller::datastore::{Datastore, DatastoreValue, MemoryDatastore};
pub use controller::gui::{GuiCommand, GuiElement, GuiWidget};
pub use controller::host::{
    BodySensorReading, ConstraintSetDescription, ConstraintSetHandle, HostSolver, ResetData,
    TaskDescription, TaskHandle,
};
pub use controller::telemetry::{NullTelemetry, TelemetryLog, TelemetrySample, TelemetrySink};
pub use controller::trajectory::{CartesianReference, CircularTrajectory};
pub use controller::CircularController;
pub use exception::{ControllerException, ControllerResult};
