// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Application registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Address, ApplicationId, Version};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    /// Opaque, caller-encoded application metadata.
    pub info: String,
    pub required_specs: Vec<String>,
    /// When false, replies to one event may not disagree on the score of a target.
    pub multi_reply_allowed: bool,
    pub owner: Address,
    pub created_at: Version,
}

impl Application {
    pub fn requires_spec(&self, spec: &str) -> bool {
        self.required_specs.iter().any(|s| s == spec)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRegistry {
    applications: BTreeMap<ApplicationId, Application>,
    last_id: u64,
}

impl ApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next registration will receive. Ids are dense and start at 1.
    pub fn next_id(&self) -> ApplicationId {
        ApplicationId(self.last_id + 1)
    }

    pub fn register(
        &mut self,
        info: String,
        required_specs: Vec<String>,
        multi_reply_allowed: bool,
        owner: Address,
        at: Version,
    ) -> ApplicationId {
        let id = self.next_id();
        self.last_id = id.0;
        self.applications.insert(
            id,
            Application {
                id,
                info,
                required_specs,
                multi_reply_allowed,
                owner,
                created_at: at,
            },
        );
        id
    }

    pub fn get(&self, id: ApplicationId) -> Option<&Application> {
        self.applications.get(&id)
    }

    pub fn contains(&self, id: ApplicationId) -> bool {
        self.applications.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Application> {
        self.applications.values()
    }
}
