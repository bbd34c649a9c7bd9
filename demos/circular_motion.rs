// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

use circular::{
    BodySensorReading, CircularController, CircularControllerConfig, ConstraintSetDescription,
    ConstraintSetHandle, ControlMode, ControllerResult, FeedbackType, GuiCommand, HostSolver,
    MemoryDatastore, ResetData, TaskDescription, TaskHandle, TelemetryLog,
};
use clap::Parser;
use nalgebra::{Rotation3, Vector3};

/// An example showing how to run the circular controller against a host.
///
/// The host here is a stand-in which only records what the controller commands, so no robot is
/// needed.
#[derive(Parser, Debug)]
#[clap(author, version, name = "circular_motion")]
struct CommandLineArguments {
    /// Number of control ticks to run
    #[clap(short, long, default_value_t = 400)]
    pub ticks: usize,

    /// Switch to torque control after this many ticks
    #[clap(long)]
    pub torque_after: Option<usize>,

    /// TOML configuration file, defaults are used if omitted
    #[clap(short, long)]
    pub config: Option<String>,

    /// Print every n-th reference
    #[clap(long, default_value_t = 20)]
    pub print_every: usize,
}

#[derive(Default)]
struct RecordingHost {
    tasks: Vec<TaskDescription>,
    constraint_sets: Vec<ConstraintSetDescription>,
    position: Option<Vector3<f64>>,
    open_loop_steps: usize,
    closed_loop_steps: usize,
}

impl HostSolver for RecordingHost {
    fn add_constraint_set(
        &mut self,
        constraint_set: &ConstraintSetDescription,
    ) -> ControllerResult<ConstraintSetHandle> {
        self.constraint_sets.push(constraint_set.clone());
        Ok(ConstraintSetHandle(self.constraint_sets.len() - 1))
    }

    fn add_task(&mut self, task: &TaskDescription) -> ControllerResult<TaskHandle> {
        self.tasks.push(task.clone());
        Ok(TaskHandle(self.tasks.len() - 1))
    }

    fn reset_task(&mut self, _task: TaskHandle) {}

    fn set_position(&mut self, _task: TaskHandle, position: Vector3<f64>) {
        self.position = Some(position);
    }

    fn set_ref_vel(&mut self, _task: TaskHandle, _velocity: Vector3<f64>) {}

    fn set_ref_accel(&mut self, _task: TaskHandle, _acceleration: Vector3<f64>) {}

    fn set_orientation(&mut self, _task: TaskHandle, _orientation: Rotation3<f64>) {}

    fn body_sensor(&self, name: &str) -> Option<BodySensorReading> {
        if name == "Accelerometer" {
            Some(BodySensorReading {
                linear_acceleration: Vector3::new(0., 0., 9.81),
                angular_velocity: Vector3::zeros(),
            })
        } else {
            None
        }
    }

    fn run(&mut self, feedback: FeedbackType) -> bool {
        match feedback {
            FeedbackType::OpenLoop => self.open_loop_steps += 1,
            FeedbackType::ClosedLoopIntegrateReal => self.closed_loop_steps += 1,
        }
        true
    }

    fn reset(&mut self, _data: &ResetData) {}
}

fn main() -> ControllerResult<()> {
    env_logger::init();
    let args = CommandLineArguments::parse();
    let config = match &args.config {
        Some(path) => CircularControllerConfig::load(path)?,
        None => CircularControllerConfig::default(),
    };
    let mut controller = CircularController::with_telemetry(
        RecordingHost::default(),
        MemoryDatastore::new(),
        TelemetryLog::new(1000),
        config,
    )?;
    println!(
        "Registered {} tasks and {} constraint sets",
        controller.host().tasks.len(),
        controller.host().constraint_sets.len()
    );
    controller.handle(GuiCommand::SetMotionEnabled(true));
    let print_every = args.print_every.max(1);
    for tick in 0..args.ticks {
        if Some(tick) == args.torque_after {
            controller.handle(GuiCommand::SetControlMode(ControlMode::Torque));
        }
        if !controller.run() {
            println!("Solver step failed, stopping");
            break;
        }
        if tick % print_every == 0 {
            if let Some(position) = controller.host().position {
                println!(
                    "t = {:.3} s  mode = {:<8} position = [{:.4}, {:.4}, {:.4}]",
                    controller.time(),
                    controller.control_mode_label().unwrap_or_default(),
                    position.x,
                    position.y,
                    position.z
                );
            }
        }
    }
    let host = controller.host();
    println!(
        "Finished: {} open loop steps, {} closed loop steps, {} telemetry samples",
        host.open_loop_steps,
        host.closed_loop_steps,
        controller.telemetry().len()
    );
    Ok(())
}
