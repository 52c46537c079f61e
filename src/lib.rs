// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! hidra-controller: a deterministic event resolution controller.
//!
//! Nodes register under a capability tag, applications are registered with the specs they
//! need, and events dispatched against an application are resolved by the registered nodes:
//! each node submits one reputation reply, votes for a solver, and once a solver holds a
//! strict majority the event can be finalized.
//!
//! Every mutation is a [`state::command::Command`] applied atomically to a
//! [`state::controller::ControllerState`]. Accepted commands form a journal that replays to
//! the same state (and the same BLAKE3 state hash) on any machine.

pub mod config;
pub mod error;
pub mod types;
pub mod registry;
pub mod protocol;
pub mod state;
pub mod journal;
pub mod snapshot;
pub mod verify;
pub mod proof;
pub mod replay;

#[cfg(test)]
pub mod tests;
