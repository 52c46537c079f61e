// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod node;
pub mod application;

pub use application::{Application, ApplicationRegistry};
pub use node::{Node, NodeRegistry};
