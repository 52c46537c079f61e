// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event resolution protocol.
//!
//! Each submodule owns one step of an event's life. `check_*` functions validate without
//! touching state; the matching `record_*` / `resolve` functions are infallible and are only
//! called by the controller after the check passed, so a rejected command never leaves
//! partial writes behind.

pub mod event_store;
pub mod replies;
pub mod reputation;
pub mod election;
pub mod resolver;

pub use event_store::{Event, EventStore};
pub use replies::Reply;
pub use reputation::Standing;
pub use resolver::Resolution;
