// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains everything needed to run the circular controller inside a host framework.
pub mod circular_controller;
pub mod control_types;
pub mod datastore;
pub mod gui;
pub mod host;
pub mod telemetry;
pub mod trajectory;

pub use circular_controller::CircularController;
