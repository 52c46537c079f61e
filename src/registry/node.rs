// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Node registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Address, Version};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub address: Address,
    /// Capability tag the node registered under.
    pub spec: String,
    /// Running sum of the scores peers assigned to this node.
    pub reputation_score: i64,
    pub registered_at: Version,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRegistry {
    nodes: BTreeMap<Address, Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `address` under `spec`. Re-registration replaces the tag and keeps
    /// reputation and registration time. Returns `true` when the node is new.
    pub fn register(&mut self, address: Address, spec: String, at: Version) -> bool {
        match self.nodes.get_mut(&address) {
            Some(node) => {
                node.spec = spec;
                false
            }
            None => {
                self.nodes.insert(
                    address,
                    Node {
                        address,
                        spec,
                        reputation_score: 0,
                        registered_at: at,
                    },
                );
                true
            }
        }
    }

    pub fn get(&self, address: &Address) -> Option<&Node> {
        self.nodes.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.nodes.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn with_spec<'a>(&'a self, spec: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.values().filter(move |n| n.spec == spec)
    }

    /// Adds `delta` to a registered node's reputation. Unknown addresses are ignored.
    pub(crate) fn adjust_reputation(&mut self, address: &Address, delta: i64) -> bool {
        match self.nodes.get_mut(address) {
            Some(node) => {
                node.reputation_score = node.reputation_score.saturating_add(delta);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reregistration_overwrites_spec_only() {
        let mut reg = NodeRegistry::new();
        let a = Address::from_low_u64(1);
        assert!(reg.register(a, "SPECS".into(), Version(1)));
        reg.adjust_reputation(&a, 5);
        assert!(!reg.register(a, "GPU".into(), Version(2)));

        let node = reg.get(&a).unwrap();
        assert_eq!(node.spec, "GPU");
        assert_eq!(node.reputation_score, 5);
        assert_eq!(node.registered_at, Version(1));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn reputation_of_unknown_address_is_ignored() {
        let mut reg = NodeRegistry::new();
        assert!(!reg.adjust_reputation(&Address::from_low_u64(9), 1));
        assert!(reg.is_empty());
    }
}
