// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;

use hidra_controller::config::{ControllerConfig, SolveAuthority};

use crate::errors::EngineError;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Append-only command journal. `None` keeps the node purely in memory.
    pub journal_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
    pub auth_token: Option<String>,
    pub auto_snapshot_interval_secs: Option<u64>,
    pub controller: ControllerConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            journal_path: None,
            snapshot_path: None,
            auth_token: None,
            auto_snapshot_interval_secs: None,
            controller: ControllerConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `HIDRA_*` environment variables.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("HIDRA_BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .map_err(|e| EngineError::Config(format!("HIDRA_BIND_ADDR: {}", e)))?;
        }
        cfg.journal_path = lookup("HIDRA_JOURNAL_PATH").map(PathBuf::from);
        cfg.snapshot_path = lookup("HIDRA_SNAPSHOT_PATH").map(PathBuf::from);
        cfg.auth_token = lookup("HIDRA_AUTH_TOKEN").filter(|t| !t.is_empty());
        if let Some(secs) = lookup("HIDRA_SNAPSHOT_INTERVAL_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| EngineError::Config(format!("HIDRA_SNAPSHOT_INTERVAL_SECS: {}", e)))?;
            cfg.auto_snapshot_interval_secs = Some(secs).filter(|s| *s > 0);
        }
        if let Some(authority) = lookup("HIDRA_SOLVE_AUTHORITY") {
            cfg.controller.solve_authority = authority
                .parse::<SolveAuthority>()
                .map_err(EngineError::Config)?;
        }
        if let Some(min) = lookup("HIDRA_MIN_REPLIES") {
            cfg.controller.min_replies_before_vote = min
                .parse()
                .map_err(|e| EngineError::Config(format!("HIDRA_MIN_REPLIES: {}", e)))?;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = NodeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert!(cfg.journal_path.is_none());
        assert_eq!(cfg.controller, ControllerConfig::default());
    }

    #[test]
    fn environment_overrides() {
        let cfg = NodeConfig::from_lookup(lookup(&[
            ("HIDRA_BIND_ADDR", "0.0.0.0:8080"),
            ("HIDRA_JOURNAL_PATH", "/tmp/hidra.journal"),
            ("HIDRA_AUTH_TOKEN", "secret"),
            ("HIDRA_SNAPSHOT_INTERVAL_SECS", "0"),
            ("HIDRA_SOLVE_AUTHORITY", "solver"),
            ("HIDRA_MIN_REPLIES", "2"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.journal_path, Some(PathBuf::from("/tmp/hidra.journal")));
        assert_eq!(cfg.auth_token.as_deref(), Some("secret"));
        assert_eq!(cfg.auto_snapshot_interval_secs, None);
        assert_eq!(cfg.controller.solve_authority, SolveAuthority::ElectedSolver);
        assert_eq!(cfg.controller.min_replies_before_vote, 2);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(NodeConfig::from_lookup(lookup(&[("HIDRA_BIND_ADDR", "nowhere")])).is_err());
        assert!(NodeConfig::from_lookup(lookup(&[("HIDRA_SOLVE_AUTHORITY", "anyone")])).is_err());
    }
}
