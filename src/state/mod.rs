// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod command;
pub mod controller;

pub use command::{Command, Outcome};
pub use controller::ControllerState;
