// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the GUI elements the controller publishes and the commands they trigger.
//!
//! The controller does not depend on a UI toolkit. The host renders the elements returned by
//! [`CircularController::gui_elements`](`crate::CircularController::gui_elements`) and feeds
//! user actions back as [`GuiCommand`]s.
use crate::controller::control_types::ControlMode;

/// Category holding the control mode label and buttons.
pub static CONTROL_MODE_CATEGORY: &str = "Control Mode";
/// Category holding the motion checkbox.
pub static TASKS_CATEGORY: &str = "Tasks";

/// Action requested by the operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GuiCommand {
    SetControlMode(ControlMode),
    SetMotionEnabled(bool),
}

/// What a GUI element shows and which command it sends.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiWidget {
    Label { text: String },
    Button { command: GuiCommand },
    /// Clicking sends the command for the opposite of `checked`.
    Checkbox { checked: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuiElement {
    pub category: Vec<String>,
    pub name: String,
    pub widget: GuiWidget,
}

impl GuiElement {
    pub(crate) fn new(category: &str, name: &str, widget: GuiWidget) -> Self {
        GuiElement {
            category: vec![category.to_string()],
            name: name.to_string(),
            widget,
        }
    }

    /// The command the host should send when the operator activates this element.
    pub fn on_click(&self) -> Option<GuiCommand> {
        match self.widget {
            GuiWidget::Label { .. } => None,
            GuiWidget::Button { command } => Some(command),
            GuiWidget::Checkbox { checked } => Some(GuiCommand::SetMotionEnabled(!checked)),
        }
    }
}

/// Builds the control panel for the current controller state.
pub(crate) fn control_panel(control_mode_label: &str, motion_enabled: bool) -> Vec<GuiElement> {
    vec![
        GuiElement::new(
            CONTROL_MODE_CATEGORY,
            "Current Control :",
            GuiWidget::Label {
                text: control_mode_label.to_string(),
            },
        ),
        GuiElement::new(
            CONTROL_MODE_CATEGORY,
            ControlMode::Position.as_str(),
            GuiWidget::Button {
                command: GuiCommand::SetControlMode(ControlMode::Position),
            },
        ),
        GuiElement::new(
            CONTROL_MODE_CATEGORY,
            ControlMode::Torque.as_str(),
            GuiWidget::Button {
                command: GuiCommand::SetControlMode(ControlMode::Torque),
            },
        ),
        GuiElement::new(
            TASKS_CATEGORY,
            "Circular Moving",
            GuiWidget::Checkbox {
                checked: motion_enabled,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::controller::control_types::ControlMode;
    use crate::controller::gui::{control_panel, GuiCommand, GuiWidget};

    #[test]
    fn panel_layout() {
        let panel = control_panel("Position", false);
        let names: Vec<&str> = panel.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Current Control :", "Position", "Torque", "Circular Moving"]
        );
        assert_eq!(panel[0].category, vec!["Control Mode".to_string()]);
        assert_eq!(panel[3].category, vec!["Tasks".to_string()]);
        assert_eq!(
            panel[0].widget,
            GuiWidget::Label {
                text: "Position".to_string()
            }
        );
    }

    #[test]
    fn clicks() {
        let panel = control_panel("Torque", true);
        assert_eq!(panel[0].on_click(), None);
        assert_eq!(
            panel[1].on_click(),
            Some(GuiCommand::SetControlMode(ControlMode::Position))
        );
        assert_eq!(
            panel[2].on_click(),
            Some(GuiCommand::SetControlMode(ControlMode::Torque))
        );
        assert_eq!(panel[3].on_click(), Some(GuiCommand::SetMotionEnabled(false)));
    }
}
