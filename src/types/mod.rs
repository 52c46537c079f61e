// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod address;
pub mod id;
pub mod enums;

pub use address::Address;
pub use enums::{Action, Entity, EventState};
pub use id::{ApplicationId, EventId, Version};

/// One entry of a reputation reply: `value` is the reputation delta the author assigns
/// to `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Score {
    pub target: Address,
    pub value: i64,
}

impl Score {
    pub fn new(target: Address, value: i64) -> Self {
        Self { target, value }
    }
}
