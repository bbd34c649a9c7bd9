// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the control modes and the feedback types they are dispatched to.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::exception::ControllerException;

/// Control modes selectable by the operator.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ControlMode {
    /// Position control: the solver integrates its own reference only.
    Position,
    /// Torque control: the solver integrates the measured robot state.
    Torque,
}

impl ControlMode {
    /// The string stored in the datastore for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Position => "Position",
            ControlMode::Torque => "Torque",
        }
    }

    pub fn feedback_type(&self) -> FeedbackType {
        select_feedback(self.as_str())
    }
}

impl Default for ControlMode {
    fn default() -> Self {
        ControlMode::Position
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing. The tick dispatch does not use this, see [`select_feedback`].
impl FromStr for ControlMode {
    type Err = ControllerException;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Position" => Ok(ControlMode::Position),
            "Torque" => Ok(ControlMode::Torque),
            _ => Err(ControllerException::UnknownControlMode {
                value: value.to_string(),
            }),
        }
    }
}

/// Feedback law the host solver applies for one step.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FeedbackType {
    /// Only the reference trajectory is used.
    OpenLoop,
    /// The measured robot state is integrated into the solver state.
    ClosedLoopIntegrateReal,
}

/// Picks the feedback law for a stored control mode value.
///
/// Exactly `"Position"` selects [`FeedbackType::OpenLoop`]. Every other value, `"Torque"` as well
/// as an empty or unknown string, selects [`FeedbackType::ClosedLoopIntegrateReal`]. The
/// dispatch is binary on purpose and performs no validation.
pub fn select_feedback(mode: &str) -> FeedbackType {
    if mode == ControlMode::Position.as_str() {
        FeedbackType::OpenLoop
    } else {
        FeedbackType::ClosedLoopIntegrateReal
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::control_types::{select_feedback, ControlMode, FeedbackType};
    use crate::exception::ControllerException;

    #[test]
    fn position_is_open_loop() {
        assert_eq!(select_feedback("Position"), FeedbackType::OpenLoop);
        assert_eq!(ControlMode::Position.feedback_type(), FeedbackType::OpenLoop);
    }

    #[test]
    fn everything_else_is_closed_loop() {
        for mode in &["Torque", "", "position", "Position ", "Velocity", "POSITION"] {
            assert_eq!(
                select_feedback(mode),
                FeedbackType::ClosedLoopIntegrateReal,
                "mode {:?}",
                mode
            );
        }
        assert_eq!(
            ControlMode::Torque.feedback_type(),
            FeedbackType::ClosedLoopIntegrateReal
        );
    }

    #[test]
    fn parse_and_display() {
        for mode in &[ControlMode::Position, ControlMode::Torque] {
            assert_eq!(mode.to_string().parse::<ControlMode>().unwrap(), *mode);
        }
        assert_eq!(
            "torque".parse::<ControlMode>(),
            Err(ControllerException::UnknownControlMode {
                value: "torque".to_string()
            })
        );
        assert_eq!(ControlMode::default(), ControlMode::Position);
    }
}
