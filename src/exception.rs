// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains exception and Result definitions
use thiserror::Error;

/// Represents all kind of errors which can occur while configuring or constructing a
/// [`CircularController`](`crate::CircularController`).
///
/// Running a control tick is not fallible in this sense: the tick only reports the boolean
/// result of the host solver step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerException {
    /// InvalidConfiguration is returned if a configuration value violates its invariant,
    /// e.g. a non-positive timestep or a zero-norm target quaternion.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// ConfigLoadException is returned if a configuration file cannot be read or parsed.
    #[error("Cannot load configuration: {message}")]
    ConfigLoadException { message: String },

    /// HostException is returned if the host framework refuses a registration.
    #[error("{message:?}")]
    HostException { message: String },

    /// SensorNotFound is returned if the robot has no body sensor with the requested name.
    #[error("No body sensor named {name:?}")]
    SensorNotFound { name: String },

    /// DatastoreKeyExists is returned when creating a datastore entry that already exists.
    #[error("Datastore key {key:?} already exists")]
    DatastoreKeyExists { key: String },

    /// UnknownControlMode is returned when strictly parsing a control mode string.
    #[error("Unknown control mode {value:?}, expected \"Position\" or \"Torque\"")]
    UnknownControlMode { value: String },
}

/// creates an InvalidConfiguration from a message
pub(crate) fn create_config_exception<S: Into<String>>(message: S) -> ControllerException {
    ControllerException::InvalidConfiguration {
        message: message.into(),
    }
}

/// Result type which can have ControllerException as Error
pub type ControllerResult<T> = Result<T, ControllerException>;
