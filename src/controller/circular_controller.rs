// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the [`CircularController`] which moves the tool frame along a circle.
use log::{debug, info, trace, warn};

use crate::config::CircularControllerConfig;
use crate::controller::control_types::{select_feedback, ControlMode, FeedbackType};
use crate::controller::datastore::{Datastore, CONTROL_MODE_KEY, CORIOLIS_KEY, POSTURE_TASK_KEY};
use crate::controller::gui::{control_panel, GuiCommand, GuiElement};
use crate::controller::host::{
    ConstraintSetDescription, ConstraintSetHandle, HostSolver, ResetData, TaskDescription,
    TaskHandle,
};
use crate::controller::telemetry::{
    NullTelemetry, TelemetrySink, IMU_ACCEL_ENTRY, IMU_GYRO_ENTRY,
};
use crate::controller::trajectory::{CartesianReference, CircularTrajectory};
use crate::exception::{ControllerException, ControllerResult};

/// Drives the end-effector along a [`CircularTrajectory`] and switches the solver feedback
/// between open loop (position control) and closed loop (torque control).
///
/// The controller is ticked by the host loop through [`run`](`Self::run`). Operator actions
/// arrive as [`GuiCommand`]s or through [`set_control_mode`](`Self::set_control_mode`) and
/// [`set_motion_enabled`](`Self::set_motion_enabled`).
pub struct CircularController<H: HostSolver, D: Datastore, L: TelemetrySink = NullTelemetry> {
    host: H,
    datastore: D,
    telemetry: L,
    config: CircularControllerConfig,
    trajectory: CircularTrajectory,
    posture_task: TaskHandle,
    end_effector_task: TaskHandle,
    contact_constraint: ConstraintSetHandle,
    dynamics_constraint: ConstraintSetHandle,
    time: f64,
    motion_enabled: bool,
    last_reference: Option<CartesianReference>,
    last_mode: Option<String>,
}

impl<H: HostSolver, D: Datastore> CircularController<H, D, NullTelemetry> {
    /// Creates the controller and registers everything it needs with the host.
    /// Telemetry is discarded, see [`with_telemetry`](`Self::with_telemetry`).
    pub fn new(host: H, datastore: D, config: CircularControllerConfig) -> ControllerResult<Self> {
        CircularController::with_telemetry(host, datastore, NullTelemetry, config)
    }
}

impl<H: HostSolver, D: Datastore, L: TelemetrySink> CircularController<H, D, L> {
    /// Creates the controller.
    ///
    /// Registers the contact and dynamics constraint sets, the posture task and the end-effector
    /// task with the host, and creates the `"ControlMode"`, `"Coriolis"` and `"getPostureTask"`
    /// datastore entries. The body sensor is checked first, so on
    /// [`SensorNotFound`](`ControllerException::SensorNotFound`) neither host nor datastore has
    /// been touched.
    /// # Errors
    /// * [`InvalidConfiguration`](`ControllerException::InvalidConfiguration`) if `config` is
    /// invalid.
    /// * [`HostException`](`ControllerException::HostException`) if the host refuses a
    /// registration.
    /// * [`SensorNotFound`](`ControllerException::SensorNotFound`) if the robot lacks the
    /// configured body sensor.
    /// * [`DatastoreKeyExists`](`ControllerException::DatastoreKeyExists`) if the datastore
    /// already holds one of the entries.
    pub fn with_telemetry(
        mut host: H,
        mut datastore: D,
        telemetry: L,
        config: CircularControllerConfig,
    ) -> ControllerResult<Self> {
        config.validate()?;
        let trajectory = CircularTrajectory::from_config(&config.trajectory)?;
        if host.body_sensor(&config.sensor_name).is_none() {
            return Err(ControllerException::SensorNotFound {
                name: config.sensor_name.clone(),
            });
        }

        let contact_constraint = host.add_constraint_set(&ConstraintSetDescription::Contact)?;
        let dynamics_constraint = host.add_constraint_set(&ConstraintSetDescription::dynamics(
            config.dt,
            &config.dynamics_constraint,
        ))?;

        let posture_task = host.add_task(&TaskDescription::from(&config.posture_task))?;
        let end_effector_task = host.add_task(&TaskDescription::from(&config.end_effector_task))?;
        host.reset_task(end_effector_task);

        datastore.make(CONTROL_MODE_KEY, ControlMode::Position.as_str().into())?;
        datastore.make(CORIOLIS_KEY, "Yes".into())?;
        datastore.make(POSTURE_TASK_KEY, posture_task.into())?;

        info!("CircularController init done");
        Ok(CircularController {
            host,
            datastore,
            telemetry,
            config,
            trajectory,
            posture_task,
            end_effector_task,
            contact_constraint,
            dynamics_constraint,
            time: 0.,
            motion_enabled: false,
            last_reference: None,
            last_mode: Some(ControlMode::Position.as_str().to_string()),
        })
    }

    /// Runs one control tick.
    ///
    /// Advances the controller time by one timestep, updates the end-effector reference if
    /// motion is enabled, and runs one solver step with the feedback law selected by the stored
    /// control mode. The result of the solver step is returned unchanged.
    pub fn run(&mut self) -> bool {
        self.time += self.config.dt;
        if self.motion_enabled {
            self.update_reference();
        }
        self.report_mode_change();
        let feedback = self.feedback_type();
        trace!("t = {:.4} s, feedback {:?}", self.time, feedback);
        let success = self.host.run(feedback);
        if !success {
            warn!("Solver step failed at t = {:.4} s", self.time);
        }
        self.log_telemetry();
        success
    }

    /// Resets the controller through the host. No additional state is restored: the controller
    /// time, the control mode and the motion flag keep their values.
    pub fn reset(&mut self, data: &ResetData) {
        info!("CircularController reset at t = {:.4} s", self.time);
        self.host.reset(data);
    }

    /// Feedback law the next tick will use, based on the stored control mode.
    ///
    /// Any value other than exactly `"Position"`, including a missing entry, selects closed-loop
    /// feedback.
    pub fn feedback_type(&self) -> FeedbackType {
        match self.datastore.get_text(CONTROL_MODE_KEY) {
            Some(mode) => select_feedback(&mode),
            None => FeedbackType::ClosedLoopIntegrateReal,
        }
    }

    pub fn set_control_mode(&mut self, mode: ControlMode) {
        debug!("Control mode set to {}", mode);
        self.datastore.set(CONTROL_MODE_KEY, mode.as_str().into());
    }

    /// Enables or freezes the circular motion. While frozen the end-effector task keeps the last
    /// reference it received.
    pub fn set_motion_enabled(&mut self, enabled: bool) {
        if enabled != self.motion_enabled {
            debug!(
                "Circular motion {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        self.motion_enabled = enabled;
    }

    pub fn handle(&mut self, command: GuiCommand) {
        match command {
            GuiCommand::SetControlMode(mode) => self.set_control_mode(mode),
            GuiCommand::SetMotionEnabled(enabled) => self.set_motion_enabled(enabled),
        }
    }

    /// Raw control mode value as stored in the datastore, what the GUI label shows.
    pub fn control_mode_label(&self) -> Option<String> {
        self.datastore.get_text(CONTROL_MODE_KEY)
    }

    /// Stored control mode, `None` if the entry is missing or holds an unknown value.
    pub fn control_mode(&self) -> Option<ControlMode> {
        self.control_mode_label()
            .and_then(|label| label.parse::<ControlMode>().ok())
    }

    pub fn motion_enabled(&self) -> bool {
        self.motion_enabled
    }

    /// Controller time in \[s\].
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Last reference sent to the end-effector task, `None` before the first moving tick.
    pub fn last_reference(&self) -> Option<&CartesianReference> {
        self.last_reference.as_ref()
    }

    pub fn gui_elements(&self) -> Vec<GuiElement> {
        let label = self.control_mode_label().unwrap_or_default();
        control_panel(&label, self.motion_enabled)
    }

    pub fn posture_task(&self) -> TaskHandle {
        self.posture_task
    }

    pub fn end_effector_task(&self) -> TaskHandle {
        self.end_effector_task
    }

    /// Handles of the contact and the dynamics constraint sets.
    pub fn constraint_sets(&self) -> [ConstraintSetHandle; 2] {
        [self.contact_constraint, self.dynamics_constraint]
    }

    pub fn trajectory(&self) -> &CircularTrajectory {
        &self.trajectory
    }

    pub fn config(&self) -> &CircularControllerConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn datastore(&self) -> &D {
        &self.datastore
    }

    /// Gives access to the datastore as the host's own handlers would have it.
    pub fn datastore_mut(&mut self) -> &mut D {
        &mut self.datastore
    }

    pub fn telemetry(&self) -> &L {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut L {
        &mut self.telemetry
    }

    fn update_reference(&mut self) {
        let reference = self.trajectory.reference_at(self.time);
        let task = self.end_effector_task;
        self.host.set_position(task, reference.position);
        self.host.set_ref_vel(task, reference.velocity);
        self.host.set_ref_accel(task, reference.acceleration);
        self.host.set_orientation(task, reference.orientation);
        self.last_reference = Some(reference);
    }

    fn report_mode_change(&mut self) {
        let mode = self.datastore.get_text(CONTROL_MODE_KEY);
        if mode == self.last_mode {
            return;
        }
        match &mode {
            None => warn!(
                "Datastore entry {:?} is missing, running closed loop",
                CONTROL_MODE_KEY
            ),
            Some(label) if label.parse::<ControlMode>().is_err() => warn!(
                "Unknown control mode {:?}, running closed loop",
                label
            ),
            Some(label) => debug!("Running with control mode {}", label),
        }
        self.last_mode = mode;
    }

    fn log_telemetry(&mut self) {
        if let Some(reading) = self.host.body_sensor(&self.config.sensor_name) {
            self.telemetry
                .record(self.time, IMU_ACCEL_ENTRY, reading.linear_acceleration);
            self.telemetry
                .record(self.time, IMU_GYRO_ENTRY, reading.angular_velocity);
        }
    }
}
